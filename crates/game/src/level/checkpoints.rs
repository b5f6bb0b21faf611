use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::trigger_collider;
use crate::character::{CharacterMover, CheckpointProvider};
use crate::config::ConfigLoaded;
use crate::player::components::Player;

const CHECKPOINT_SIZE: Vec2 = Vec2::new(16.0, 64.0);
const IDLE_COLOR: Color = Color::srgb(0.45, 0.45, 0.5);
const ACTIVE_COLOR: Color = Color::srgb(0.3, 0.9, 0.5);

#[derive(Component, Debug, Clone, Copy)]
pub struct Checkpoint {
  /// World-space respawn position.
  pub spawn: Vec2,
}

/// The most recently reached checkpoint. Starts at the player's spawn.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ActiveCheckpoint {
  spawn: Vec2,
  entity: Option<Entity>,
}

impl ActiveCheckpoint {
  pub fn at(spawn: Vec2) -> Self {
    Self {
      spawn,
      entity: None,
    }
  }

  pub fn spawn(&self) -> Vec2 {
    self.spawn
  }

  pub fn entity(&self) -> Option<Entity> {
    self.entity
  }

  /// Returns false if `entity` is already active.
  pub fn activate(&mut self, entity: Entity, spawn: Vec2) -> bool {
    if self.entity == Some(entity) {
      return false;
    }
    self.entity = Some(entity);
    self.spawn = spawn;
    true
  }
}

impl CheckpointProvider for ActiveCheckpoint {
  fn spawn_point(&self) -> Vec2 {
    self.spawn
  }
}

pub fn spawn_checkpoints(mut commands: Commands, config: Res<ConfigLoaded>) {
  for checkpoint in &config.level.checkpoints {
    let position = Vec2::new(checkpoint.x, checkpoint.y);
    let [dx, dy] = checkpoint.spawn_offset;
    commands.spawn((
      Checkpoint {
        spawn: position + Vec2::new(dx, dy),
      },
      Sprite {
        color: IDLE_COLOR,
        custom_size: Some(CHECKPOINT_SIZE),
        ..default()
      },
      Transform::from_translation(position.extend(-1.0)),
      trigger_collider(CHECKPOINT_SIZE),
    ));
  }
}

/// A living player touching a checkpoint makes it the active one.
pub fn activate_checkpoints(
  checkpoints: Query<(Entity, &Checkpoint, &CollidingEntities)>,
  players: Query<&CharacterMover, With<Player>>,
  mut active: ResMut<ActiveCheckpoint>,
) {
  for (entity, checkpoint, colliding) in &checkpoints {
    let touched = colliding
      .iter()
      .any(|other| players.get(other).is_ok_and(|mover| !mover.is_dead()));
    if touched && active.entity() != Some(entity) {
      active.activate(entity, checkpoint.spawn);
      info!("Checkpoint activated, respawn at {:?}", checkpoint.spawn);
    }
  }
}

pub fn tint_checkpoints(
  active: Res<ActiveCheckpoint>,
  mut checkpoints: Query<(Entity, &mut Sprite), With<Checkpoint>>,
) {
  if !active.is_changed() {
    return;
  }
  for (entity, mut sprite) in &mut checkpoints {
    sprite.color = if active.entity() == Some(entity) {
      ACTIVE_COLOR
    } else {
      IDLE_COLOR
    };
  }
}
