use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::ConfigLoaded;

/// Collision groups used across the level.
pub mod layers {
  use bevy_rapier2d::prelude::Group;

  /// Solid level geometry. Matches `ground_mask = 1`.
  pub const GROUND: Group = Group::GROUP_1;
  /// The player's ground probe.
  pub const PROBE: Group = Group::GROUP_2;
  /// The player's body collider.
  pub const PLAYER: Group = Group::GROUP_3;
  /// Checkpoints, hazards and springs.
  pub const TRIGGER: Group = Group::GROUP_4;
}

const DEFAULT_LENGTH_UNIT: f32 = 50.0;

#[derive(Resource)]
pub struct GravityConfig {
  pub value: f32,
}

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
  fn build(&self, app: &mut App) {
    let (length_unit, gravity) = app
      .world()
      .get_resource::<ConfigLoaded>()
      .map(|config| (config.physics.length_unit, config.physics.gravity))
      .unwrap_or((DEFAULT_LENGTH_UNIT, 9.81 * DEFAULT_LENGTH_UNIT));

    app
      .add_plugins(
        RapierPhysicsPlugin::<NoUserData>::default()
          .with_length_unit(length_unit)
          .in_fixed_schedule(),
      )
      .insert_resource(GravityConfig { value: gravity })
      .add_systems(PreUpdate, sync_gravity);
  }
}

/// Pushes [`GravityConfig`] into every rapier context.
pub fn sync_gravity(gravity: Res<GravityConfig>, mut contexts: Query<&mut RapierConfiguration>) {
  let target = Vec2::new(0.0, -gravity.value);
  for mut configuration in &mut contexts {
    if configuration.gravity != target {
      configuration.gravity = target;
    }
  }
}
