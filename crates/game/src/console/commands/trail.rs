//! Trail toggle.

use bevy::prelude::*;
use bevy_console::{ConsoleCommand, reply};
use clap::Parser;

use crate::character::{CharacterCues, CharacterMover};
use crate::player::components::Player;

#[derive(Parser, ConsoleCommand)]
#[command(name = "trail")]
pub struct TrailCommand {
  /// on or off
  state: String,
}

/// Parses `on`/`off` (also `1`/`0`, `true`/`false`).
pub fn parse_switch(value: &str) -> Option<bool> {
  match value.to_ascii_lowercase().as_str() {
    "on" | "1" | "true" => Some(true),
    "off" | "0" | "false" => Some(false),
    _ => None,
  }
}

pub fn trail_command(
  mut log: ConsoleCommand<TrailCommand>,
  mut players: Query<(&CharacterMover, &mut CharacterCues), With<Player>>,
) {
  if let Some(Ok(TrailCommand { state })) = log.take() {
    let Some(emitting) = parse_switch(&state) else {
      reply!(log, "Expected on or off, got '{}'", state);
      return;
    };
    let Ok((mover, mut cues)) = players.single_mut() else {
      reply!(log, "No player found");
      return;
    };
    if mover.is_dead() {
      reply!(log, "Player is dead, trail unchanged");
      return;
    }

    mover.switch_trail_emission(emitting, &mut *cues);
    reply!(log, "Trail {}", if emitting { "on" } else { "off" });
  }
}
