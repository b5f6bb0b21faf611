use bevy::prelude::*;

use super::CharacterCueMessage;
use crate::character::CharacterCue;
use crate::character::CharacterMover;
use crate::character::ports::DeathAnimation;
use crate::config::ConfigLoaded;
use crate::player::components::{Player, PlayerVisual};

const JUMP_STRETCH: Vec2 = Vec2::new(-0.25, 0.3);
const LAND_SQUASH: Vec2 = Vec2::new(0.25, -0.2);
const COLLAPSED_SCALE: Vec2 = Vec2::new(1.4, 0.3);
const SETTLE_RATE: f32 = 14.0;

/// Transient sprite deformation on top of the rest pose.
#[derive(Component, Default, Debug)]
pub struct SpritePose {
  stretch: Vec2,
  collapsed: bool,
}

pub fn apply_visual_cues(
  mut commands: Commands,
  mut cues: MessageReader<CharacterCueMessage>,
  mut visuals: Query<(Entity, &mut Visibility, Option<&mut SpritePose>), With<PlayerVisual>>,
) {
  let Ok((entity, mut visibility, pose)) = visuals.single_mut() else {
    cues.clear();
    return;
  };
  let Some(mut pose) = pose else {
    commands.entity(entity).insert(SpritePose::default());
    return;
  };

  for message in cues.read() {
    match message.cue {
      CharacterCue::EnterTeleport => *visibility = Visibility::Hidden,
      CharacterCue::ExitTeleport => *visibility = Visibility::Inherited,
      CharacterCue::TriggerJump => pose.stretch = JUMP_STRETCH,
      CharacterCue::BurstFall => pose.stretch = LAND_SQUASH,
      CharacterCue::TriggerDeath(DeathAnimation::Collapse) => pose.collapsed = true,
      _ => {}
    }
  }
}

/// Stands the sprite back up once its player is alive again.
pub fn recover_from_death(
  players: Query<&CharacterMover, With<Player>>,
  mut poses: Query<&mut SpritePose, With<PlayerVisual>>,
) {
  let Ok(mover) = players.single() else {
    return;
  };
  for mut pose in &mut poses {
    if pose.collapsed && !mover.is_dead() {
      pose.collapsed = false;
    }
  }
}

pub fn settle_stretch(
  time: Res<Time>,
  config: Res<ConfigLoaded>,
  mut visuals: Query<(&mut SpritePose, &mut Transform, &mut Sprite), With<PlayerVisual>>,
) {
  let decay = (-SETTLE_RATE * time.delta_secs()).exp();
  let [r, g, b] = config.player.color;
  for (mut pose, mut transform, mut sprite) in &mut visuals {
    pose.stretch *= decay;
    let rest = if pose.collapsed {
      COLLAPSED_SCALE
    } else {
      Vec2::ONE
    };
    let scale = rest + pose.stretch;
    transform.scale = scale.extend(1.0);

    let shade = if pose.collapsed { 0.55 } else { 1.0 };
    sprite.color = Color::srgb(r * shade, g * shade, b * shade);
  }
}
