//! Ground detection: a circle overlap at the character's feet.

use bevy::prelude::*;

use crate::config::{ConfigError, LocomotionConfig};

/// Source of overlap results for a ground probe.
///
/// Implementations report how many colliders matching the probe's mask
/// currently overlap the probe circle.
pub trait GroundContacts {
  fn ground_contacts(&self) -> usize;
}

impl GroundContacts for bevy_rapier2d::prelude::CollidingEntities {
  fn ground_contacts(&self) -> usize {
    self.len()
  }
}

/// Probe circle placed relative to the body origin.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct GroundSensor {
  anchor: Vec2,
  radius: f32,
  mask: u32,
}

impl GroundSensor {
  /// Builds the sensor. A missing anchor is a configuration error.
  pub fn from_config(config: &LocomotionConfig) -> Result<Self, ConfigError> {
    let [x, y] = config
      .ground_check_anchor
      .ok_or(ConfigError::MissingGroundAnchor)?;
    if config.ground_check_radius <= 0.0 {
      return Err(ConfigError::NonPositive {
        field: "ground_check_radius",
        value: config.ground_check_radius,
      });
    }
    Ok(Self {
      anchor: Vec2::new(x, y),
      radius: config.ground_check_radius,
      mask: config.ground_mask,
    })
  }

  pub fn anchor(&self) -> Vec2 {
    self.anchor
  }

  pub fn radius(&self) -> f32 {
    self.radius
  }

  /// Collision-group bits the probe reacts to.
  pub fn mask(&self) -> u32 {
    self.mask
  }

  /// World-space probe centre for a body at `origin`.
  pub fn center(&self, origin: Vec2) -> Vec2 {
    origin + self.anchor
  }

  /// Pure query: grounded iff anything overlaps the probe.
  pub fn is_grounded(&self, contacts: &impl GroundContacts) -> bool {
    contacts.ground_contacts() > 0
  }
}
