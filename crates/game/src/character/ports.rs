//! Narrow interfaces the locomotion core calls for side effects.
//!
//! The core never plays audio or spawns particles itself. It calls
//! [`CharacterPorts`] at well-defined transition points; the game records
//! those calls as [`CharacterCue`]s and fans them out to presentation systems.

use bevy::prelude::*;

use super::LocomotionState;
use super::state_machine::Transition;

/// Sounds the character can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerSound {
  Jump,
  Grounded,
  /// Impact thud from the feet, layered over `Grounded`.
  GroundHit,
  Drown,
  Death,
  Scream,
}

/// Death animations selectable by [`CharacterPorts::trigger_death`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathAnimation {
  Collapse,
}

/// Side-effect sink for the locomotion core.
pub trait CharacterPorts {
  // Effects
  fn activate_run(&mut self, speed: f32);
  fn burst_jump(&mut self);
  fn burst_fall(&mut self);
  fn burst_drown(&mut self);
  fn scatter_body_parts(&mut self, at: Vec2);
  fn set_trail(&mut self, emitting: bool);

  // Animation
  fn trigger_jump(&mut self);
  fn trigger_death(&mut self, animation: DeathAnimation);
  fn enter_teleport(&mut self);
  fn exit_teleport(&mut self);

  // Audio
  fn play_sound(&mut self, sound: PlayerSound);

  /// Called after every committed locomotion transition.
  fn state_changed(&mut self, _transition: Transition<LocomotionState>) {}
}

/// Where a dead character respawns.
pub trait CheckpointProvider {
  fn spawn_point(&self) -> Vec2;
}

impl CheckpointProvider for Vec2 {
  fn spawn_point(&self) -> Vec2 {
    *self
  }
}

/// One recorded port call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CharacterCue {
  Run(f32),
  BurstJump,
  BurstFall,
  BurstDrown,
  ScatterBodyParts(Vec2),
  Trail(bool),
  TriggerJump,
  TriggerDeath(DeathAnimation),
  EnterTeleport,
  ExitTeleport,
  Sound(PlayerSound),
  StateChanged(Transition<LocomotionState>),
}

/// Records port calls in order. Drained once per tick by the game.
#[derive(Component, Clone, Debug, Default)]
pub struct CharacterCues(Vec<CharacterCue>);

impl CharacterCues {
  pub fn as_slice(&self) -> &[CharacterCue] {
    &self.0
  }

  pub fn drain(&mut self) -> std::vec::Drain<'_, CharacterCue> {
    self.0.drain(..)
  }

  pub fn clear(&mut self) {
    self.0.clear();
  }

  /// Counts cues matching `predicate`.
  pub fn count(&self, predicate: impl Fn(&CharacterCue) -> bool) -> usize {
    self.0.iter().filter(|cue| predicate(cue)).count()
  }
}

impl CharacterPorts for CharacterCues {
  fn activate_run(&mut self, speed: f32) {
    self.0.push(CharacterCue::Run(speed));
  }

  fn burst_jump(&mut self) {
    self.0.push(CharacterCue::BurstJump);
  }

  fn burst_fall(&mut self) {
    self.0.push(CharacterCue::BurstFall);
  }

  fn burst_drown(&mut self) {
    self.0.push(CharacterCue::BurstDrown);
  }

  fn scatter_body_parts(&mut self, at: Vec2) {
    self.0.push(CharacterCue::ScatterBodyParts(at));
  }

  fn set_trail(&mut self, emitting: bool) {
    self.0.push(CharacterCue::Trail(emitting));
  }

  fn trigger_jump(&mut self) {
    self.0.push(CharacterCue::TriggerJump);
  }

  fn trigger_death(&mut self, animation: DeathAnimation) {
    self.0.push(CharacterCue::TriggerDeath(animation));
  }

  fn enter_teleport(&mut self) {
    self.0.push(CharacterCue::EnterTeleport);
  }

  fn exit_teleport(&mut self) {
    self.0.push(CharacterCue::ExitTeleport);
  }

  fn play_sound(&mut self, sound: PlayerSound) {
    self.0.push(CharacterCue::Sound(sound));
  }

  fn state_changed(&mut self, transition: Transition<LocomotionState>) {
    self.0.push(CharacterCue::StateChanged(transition));
  }
}
