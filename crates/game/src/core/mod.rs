pub(crate) mod camera;
mod physics;

use bevy::prelude::*;
use bevy::transform::TransformSystems;
pub use camera::{CameraSmoothness, GameCamera};
pub use physics::{GravityConfig, PhysicsPlugin, layers, sync_gravity};

pub struct CorePlugin;

impl Plugin for CorePlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(physics::PhysicsPlugin)
      .init_resource::<CameraSmoothness>()
      .add_systems(Startup, camera::setup_camera)
      .add_systems(PostUpdate, camera::camera_follow.before(TransformSystems::Propagate));
  }
}
