pub mod components;
pub mod interpolation;
pub mod locomotion;
mod spawn;


use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
pub use locomotion::LocomotionSet;
pub use spawn::{spawn_character, spawn_player_entity};

use crate::presentation::CharacterCueMessage;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<CharacterCueMessage>()
      .add_systems(Startup, spawn::spawn_player);

    add_locomotion_systems(app);

    app
      // Read physics output AFTER Rapier writeback
      .add_systems(
        FixedPostUpdate,
        interpolation::store_current_position.after(PhysicsSet::Writeback),
      )
      // Update: Interpolate the visual for smooth rendering
      .add_systems(Update, interpolation::interpolate_visual);
  }
}

/// Registers the fixed-step locomotion chain. Shared with headless tests.
pub fn add_locomotion_systems(app: &mut App) {
  app
    .configure_sets(
      FixedUpdate,
      (
        LocomotionSet::Sense,
        LocomotionSet::Input,
        LocomotionSet::Triggers,
        LocomotionSet::Tick,
        LocomotionSet::Write,
      )
        .chain(),
    )
    // FixedFirst: Shift positions for interpolation
    .add_systems(FixedFirst, interpolation::shift_positions)
    .add_systems(
      FixedUpdate,
      (
        locomotion::sense_ground.in_set(LocomotionSet::Sense),
        locomotion::read_body.in_set(LocomotionSet::Sense),
        locomotion::drive_input.in_set(LocomotionSet::Input),
        locomotion::tick_locomotion.in_set(LocomotionSet::Tick),
        (locomotion::write_body, locomotion::dispatch_cues)
          .chain()
          .in_set(LocomotionSet::Write),
      ),
    );
}
