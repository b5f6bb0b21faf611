//! Teleport command.

use bevy::prelude::*;
use bevy_console::{ConsoleCommand, reply};
use clap::Parser;

use crate::character::{CharacterMover, TeleportCommand};
use crate::player::components::Player;

/// Queues a teleport on the player, like any other teleport source.
#[derive(Parser, ConsoleCommand)]
#[command(name = "tp")]
pub struct TpCommand {
  /// X coordinate
  x: f32,
  /// Y coordinate
  y: f32,
  /// Keep the player visible while teleporting
  #[arg(long)]
  show: bool,
}

pub fn tp_command(
  mut log: ConsoleCommand<TpCommand>,
  mut players: Query<&mut CharacterMover, With<Player>>,
) {
  if let Some(Ok(TpCommand { x, y, show })) = log.take() {
    if let Ok(mut mover) = players.single_mut() {
      mover.add_teleport(TeleportCommand::new(Vec2::new(x, y)).shown(show));
      reply!(
        log,
        "Teleporting to ({}, {}), {} command(s) queued",
        x,
        y,
        mover.teleports().len()
      );
    } else {
      reply!(log, "No player found");
    }
  }
}
