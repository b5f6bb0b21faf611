//! Level geometry and trigger volumes, spawned from the `level` config table.

mod checkpoints;
mod hazards;
mod platforms;
mod springs;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
pub use checkpoints::{ActiveCheckpoint, Checkpoint};
pub use hazards::Hazard;
pub use springs::{SPRING_COOLDOWN, Spring, spring_tint};

use crate::config::ConfigLoaded;
use crate::core::layers;
use crate::player::LocomotionSet;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
  fn build(&self, app: &mut App) {
    let initial = app
      .world()
      .get_resource::<ConfigLoaded>()
      .map(|config| Vec2::new(config.player.spawn_x, config.player.spawn_y))
      .unwrap_or_default();

    app
      .insert_resource(ActiveCheckpoint::at(initial))
      .add_systems(
        Startup,
        (
          platforms::spawn_platforms,
          checkpoints::spawn_checkpoints,
          hazards::spawn_hazards,
          springs::spawn_springs,
        ),
      );
    add_trigger_systems(app);
    app.add_systems(Update, checkpoints::tint_checkpoints);
  }
}

/// Registers the fixed-step trigger checks. Shared with headless tests.
pub fn add_trigger_systems(app: &mut App) {
  app.add_systems(
    FixedUpdate,
    (
      checkpoints::activate_checkpoints,
      hazards::hazard_contacts,
      springs::spring_contacts,
    )
      .chain()
      .in_set(LocomotionSet::Triggers),
  );
}

/// Sensor volume that reports overlaps with the player body.
fn trigger_collider(size: Vec2) -> impl Bundle {
  (
    Collider::cuboid(size.x / 2.0, size.y / 2.0),
    Sensor,
    CollisionGroups::new(layers::TRIGGER, layers::PLAYER),
    ActiveEvents::COLLISION_EVENTS,
    CollidingEntities::default(),
  )
}
