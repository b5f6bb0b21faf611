//! Consumers of the locomotion cues: audio, particles, trail and sprite state.
//!
//! The locomotion core records cues during the fixed step; they arrive here as
//! [`CharacterCueMessage`]s and are handled once per frame.

mod audio;
mod particles;
mod trail;
mod visuals;

use bevy::prelude::*;
pub use particles::{Particle, ParticleBurst};
pub use trail::Trail;

use crate::character::CharacterCue;

/// One side effect requested by a character's locomotion core.
#[derive(Message, Debug, Clone, Copy)]
pub struct CharacterCueMessage {
  pub entity: Entity,
  pub cue: CharacterCue,
}

pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<CharacterCueMessage>()
      .add_systems(Startup, audio::load_player_sounds)
      .add_systems(
        Update,
        (
          audio::play_cue_sounds,
          trail::attach_trail,
          trail::switch_trail,
          trail::record_trail,
          trail::draw_trail,
          visuals::apply_visual_cues,
          visuals::recover_from_death,
          visuals::settle_stretch,
          particles::emit_cue_particles,
          particles::update_particles,
        )
          .chain()
          .after(crate::player::interpolation::interpolate_visual),
      );
  }
}
