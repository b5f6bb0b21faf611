//! Kill command.

use bevy::prelude::*;
use bevy_console::{ConsoleCommand, reply};
use clap::Parser;

use crate::character::death::UnknownDeathType;
use crate::character::{CharacterCues, CharacterMover, DeathType, MotionBody, MoverContext};
use crate::level::ActiveCheckpoint;
use crate::player::components::Player;

#[derive(Parser, ConsoleCommand)]
#[command(name = "kill")]
pub struct KillCommand {
  /// Death type: fall, abism, drown, spikes or reset
  death: Option<String>,
}

/// Parses an optional death type, defaulting to a plain reset.
pub fn parse_death(value: Option<&str>) -> Result<DeathType, UnknownDeathType> {
  value.map_or(Ok(DeathType::Reset), str::parse)
}

pub fn kill_command(
  mut log: ConsoleCommand<KillCommand>,
  mut players: Query<(&mut CharacterMover, &mut MotionBody, &mut CharacterCues), With<Player>>,
  checkpoint: Res<ActiveCheckpoint>,
) {
  if let Some(Ok(KillCommand { death })) = log.take() {
    let death = match parse_death(death.as_deref()) {
      Ok(death) => death,
      Err(err) => {
        reply!(log, "{}", err);
        return;
      }
    };
    let Ok((mut mover, mut body, mut cues)) = players.single_mut() else {
      reply!(log, "No player found");
      return;
    };

    let death_time = mover.config().death_time;
    let mut ctx = MoverContext {
      body: &mut body,
      ports: &mut *cues,
      checkpoints: &*checkpoint,
    };
    if mover.kill(death, death_time, &mut ctx) {
      reply!(log, "Killed player ({})", death);
    } else {
      reply!(log, "Player is already dead");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_death_defaults_to_reset() {
    assert_eq!(parse_death(None).unwrap(), DeathType::Reset);
  }

  #[test]
  fn death_names_are_parsed() {
    assert_eq!(parse_death(Some("Drown")).unwrap(), DeathType::Drown);
    assert!(parse_death(Some("lava")).is_err());
  }
}
