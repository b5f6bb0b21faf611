use bevy::{camera::ScalingMode, prelude::*};

use crate::config::ConfigLoaded;
use crate::player::components::{Player, VisualPosition};

/// Marker component for the game camera
#[derive(Component)]
pub struct GameCamera;

/// Camera smoothing factor (higher = snappier, lower = smoother)
#[derive(Resource)]
pub struct CameraSmoothness(pub f32);

impl Default for CameraSmoothness {
  fn default() -> Self {
    Self(8.0)
  }
}

/// Simple orthographic 2D camera setup
pub fn setup_camera(mut commands: Commands, config: Res<ConfigLoaded>) {
  let spawn = Vec3::new(config.player.spawn_x, config.player.spawn_y, 0.0);
  commands.spawn((
    GameCamera,
    Camera2d,
    Camera {
      order: 0,
      clear_color: ClearColorConfig::Custom(Color::srgb(0.07, 0.08, 0.11)),
      ..default()
    },
    Projection::Orthographic(OrthographicProjection {
      near: -1000.0,
      far: 1000.0,
      scale: 1.0,
      viewport_origin: Vec2::new(0.5, 0.5),
      scaling_mode: ScalingMode::AutoMin {
        min_width: config.camera.viewport_width,
        min_height: config.camera.viewport_height,
      },
      area: Rect::default(),
    }),
    Transform::from_translation(spawn),
  ));
}

/// Eases the camera towards the player's interpolated position.
///
/// A jump larger than half the viewport (respawn, console teleport) snaps
/// instead of easing.
pub fn camera_follow(
  player_query: Query<&VisualPosition, With<Player>>,
  mut camera_query: Query<&mut Transform, With<GameCamera>>,
  smoothness: Res<CameraSmoothness>,
  config: Res<ConfigLoaded>,
  time: Res<Time>,
) {
  let Ok(visual_pos) = player_query.single() else {
    return;
  };
  let Ok(mut camera_transform) = camera_query.single_mut() else {
    return;
  };

  let target = visual_pos.0.truncate();
  let current = camera_transform.translation.truncate();
  let snap_distance = config.camera.viewport_width * 0.5;

  let next = if current.distance(target) > snap_distance {
    target
  } else {
    let t = 1.0 - (-smoothness.0 * time.delta_secs()).exp();
    current.lerp(target, t)
  };
  camera_transform.translation.x = next.x;
  camera_transform.translation.y = next.y;
}
