//! The single controlled body, as seen by the locomotion core.
//!
//! Physics integration itself belongs to rapier; this is the per-tick snapshot
//! the locomotion state machine reads and writes. Writes made here are pushed
//! back to the rigid body after the tick.

use bevy::prelude::*;

/// Which friction material the body collider uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SurfaceMaterial {
  #[default]
  Air,
  Ground,
}

#[derive(Component, Clone, Debug)]
pub struct MotionBody {
  position: Vec2,
  velocity: Vec2,
  gravity_scale: f32,
  surface: SurfaceMaterial,
  pending_impulse: Vec2,
  pending_teleport: Option<Vec2>,
}

impl MotionBody {
  pub fn new(position: Vec2, gravity_scale: f32) -> Self {
    Self {
      position,
      velocity: Vec2::ZERO,
      gravity_scale,
      surface: SurfaceMaterial::Air,
      pending_impulse: Vec2::ZERO,
      pending_teleport: None,
    }
  }

  pub fn position(&self) -> Vec2 {
    self.position
  }

  pub fn velocity(&self) -> Vec2 {
    self.velocity
  }

  pub fn gravity_scale(&self) -> f32 {
    self.gravity_scale
  }

  pub fn surface(&self) -> SurfaceMaterial {
    self.surface
  }

  /// Impulse accumulated since the last [`take_impulse`](Self::take_impulse).
  pub fn pending_impulse(&self) -> Vec2 {
    self.pending_impulse
  }

  /// Refreshes the snapshot from the physics engine at the start of a tick.
  pub fn sync_from_physics(&mut self, position: Vec2, velocity: Vec2, gravity_scale: f32) {
    self.position = position;
    self.velocity = velocity;
    self.gravity_scale = gravity_scale;
  }

  /// Drains the impulse to hand to the physics engine.
  pub fn take_impulse(&mut self) -> Vec2 {
    std::mem::take(&mut self.pending_impulse)
  }

  /// Drains a teleport target written during the tick.
  pub fn take_teleport(&mut self) -> Option<Vec2> {
    self.pending_teleport.take()
  }

  pub(crate) fn set_velocity(&mut self, velocity: Vec2) {
    self.velocity = velocity;
  }

  pub(crate) fn set_horizontal_velocity(&mut self, x: f32) {
    self.velocity.x = x;
  }

  pub(crate) fn set_vertical_velocity(&mut self, y: f32) {
    self.velocity.y = y;
  }

  pub(crate) fn set_gravity_scale(&mut self, scale: f32) {
    self.gravity_scale = scale;
  }

  pub(crate) fn set_surface(&mut self, surface: SurfaceMaterial) {
    self.surface = surface;
  }

  pub(crate) fn apply_impulse(&mut self, impulse: Vec2) {
    self.pending_impulse += impulse;
  }

  /// Moves the body to `target` and stops it.
  pub(crate) fn teleport_to(&mut self, target: Vec2) {
    self.position = target;
    self.velocity = Vec2::ZERO;
    self.pending_impulse = Vec2::ZERO;
    self.pending_teleport = Some(target);
  }
}
