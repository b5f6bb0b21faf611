use bevy::prelude::*;

#[derive(Component)]
pub struct Player;

/// Marker for the visual entity (sprite, camera target)
#[derive(Component)]
pub struct PlayerVisual;

/// Marker for the sensor collider at the player's feet.
#[derive(Component)]
pub struct GroundProbe;

/// This tick's ground sensor reading.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundContact(pub bool);

/// Friction coefficients selected by the body's surface material.
#[derive(Component, Debug, Clone, Copy)]
pub struct SurfaceFriction {
  pub air: f32,
  pub ground: f32,
}

/// Stores physics positions for fixed-timestep interpolation.
#[derive(Component)]
pub struct InterpolationState {
  pub previous: Vec3,
  pub current: Vec3,
}

impl InterpolationState {
  pub fn new(position: Vec3) -> Self {
    Self {
      previous: position,
      current: position,
    }
  }

  /// Drops the in-between positions, e.g. after a teleport.
  pub fn snap(&mut self, position: Vec3) {
    self.previous = position;
    self.current = position;
  }
}

/// The interpolated visual position for this frame.
#[derive(Component, Default)]
pub struct VisualPosition(pub Vec3);
