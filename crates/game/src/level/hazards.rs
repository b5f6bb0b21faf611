use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::checkpoints::ActiveCheckpoint;
use super::trigger_collider;
use crate::character::{CharacterCues, CharacterMover, DeathType, MotionBody, MoverContext};
use crate::config::ConfigLoaded;
use crate::player::components::Player;

/// Kill volume. Touching it kills the player with `death`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hazard {
  pub death: DeathType,
}

fn hazard_color(death: DeathType) -> Color {
  match death {
    DeathType::Drown => Color::srgba(0.2, 0.45, 0.9, 0.6),
    DeathType::Spikes => Color::srgb(0.85, 0.2, 0.2),
    _ => Color::NONE,
  }
}

pub fn spawn_hazards(mut commands: Commands, config: Res<ConfigLoaded>) {
  for hazard in &config.level.hazards {
    let area = hazard.area();
    commands.spawn((
      Hazard {
        death: hazard.death,
      },
      Sprite {
        color: hazard_color(hazard.death),
        custom_size: Some(area.size()),
        ..default()
      },
      Transform::from_translation(area.center().extend(1.0)),
      trigger_collider(area.size()),
    ));
  }
}

pub fn hazard_contacts(
  hazards: Query<(&Hazard, &CollidingEntities)>,
  mut players: Query<(&mut CharacterMover, &mut MotionBody, &mut CharacterCues), With<Player>>,
  checkpoint: Res<ActiveCheckpoint>,
) {
  for (hazard, colliding) in &hazards {
    for other in colliding.iter() {
      let Ok((mut mover, mut body, mut cues)) = players.get_mut(other) else {
        continue;
      };
      let death_time = mover.config().death_time;
      let mut ctx = MoverContext {
        body: &mut body,
        ports: &mut *cues,
        checkpoints: &*checkpoint,
      };
      // No-op while a death is already in flight
      mover.kill(hazard.death, death_time, &mut ctx);
    }
  }
}
