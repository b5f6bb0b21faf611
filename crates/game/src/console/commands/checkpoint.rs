//! Active checkpoint report.

use bevy::prelude::*;
use bevy_console::{ConsoleCommand, reply};
use clap::Parser;

use crate::level::ActiveCheckpoint;

#[derive(Parser, ConsoleCommand)]
#[command(name = "checkpoint")]
pub struct CheckpointCommand {}

pub fn checkpoint_command(
  mut log: ConsoleCommand<CheckpointCommand>,
  active: Res<ActiveCheckpoint>,
) {
  if let Some(Ok(CheckpointCommand {})) = log.take() {
    let spawn = active.spawn();
    match active.entity() {
      Some(entity) => reply!(log, "Checkpoint {:?}, respawn at ({}, {})", entity, spawn.x, spawn.y),
      None => reply!(log, "No checkpoint reached, respawn at ({}, {})", spawn.x, spawn.y),
    }
  }
}
