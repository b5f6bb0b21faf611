use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use crate::character::{CharacterMover, GroundSensor, MotionBody};
use crate::input::{Move, PlayerInput};
use crate::player::components::{GroundContact, Player};

/// Resource for frame-by-frame debug mode
#[derive(Resource, Default)]
pub struct FrameStepMode {
  pub enabled: bool,
  advance_requested: bool,
}

/// Gizmo overlay toggle (F3).
#[derive(Resource)]
pub struct DebugOverlay {
  pub enabled: bool,
}

impl Default for DebugOverlay {
  fn default() -> Self {
    Self { enabled: true }
  }
}

pub struct VisualDebugPlugin;

impl Plugin for VisualDebugPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<FrameStepMode>()
      .init_resource::<DebugOverlay>()
      .add_systems(PreUpdate, (frame_step_control, overlay_toggle))
      .add_systems(
        Update,
        (draw_ground_probe, draw_debug_vectors).run_if(|overlay: Res<DebugOverlay>| overlay.enabled),
      );
  }
}

fn overlay_toggle(keyboard: Res<ButtonInput<KeyCode>>, mut overlay: ResMut<DebugOverlay>) {
  if keyboard.just_pressed(KeyCode::F3) {
    overlay.enabled = !overlay.enabled;
  }
}

/// Controls frame-by-frame stepping mode
/// F5: Toggle frame-step mode
/// Period: Advance one frame (when in frame-step mode)
fn frame_step_control(
  keyboard: Res<ButtonInput<KeyCode>>,
  mut frame_step: ResMut<FrameStepMode>,
  mut time: ResMut<Time<Virtual>>,
) {
  // Toggle frame-step mode with F5
  if keyboard.just_pressed(KeyCode::F5) {
    frame_step.enabled = !frame_step.enabled;
    if frame_step.enabled {
      time.pause();
      info!("Frame-step mode ENABLED (press . to advance, F5 to disable)");
    } else {
      time.unpause();
      info!("Frame-step mode DISABLED");
    }
  }

  // Arrow keys move the player, so stepping uses Period
  if frame_step.enabled {
    if keyboard.just_pressed(KeyCode::Period) {
      frame_step.advance_requested = true;
      time.unpause();
    } else if frame_step.advance_requested {
      frame_step.advance_requested = false;
      time.pause();
    }
  }
}

/// Ground probe circle: green while grounded, red otherwise.
fn draw_ground_probe(
  mut gizmos: Gizmos,
  players: Query<(&Transform, &GroundSensor, &GroundContact), With<Player>>,
) {
  for (transform, sensor, contact) in &players {
    let color = if contact.0 {
      Color::srgb(0.2, 1.0, 0.3)
    } else {
      Color::srgb(1.0, 0.25, 0.25)
    };
    let center = sensor.center(transform.translation.truncate());
    gizmos.circle_2d(Isometry2d::from_translation(center), sensor.radius(), color);
  }
}

/// Draws velocity (yellow) and input (green) vectors, and the fall watermark
fn draw_debug_vectors(
  mut gizmos: Gizmos,
  players: Query<
    (&Transform, &MotionBody, &CharacterMover, &Actions<PlayerInput>),
    With<Player>,
  >,
  move_actions: Query<(&Action<Move>, &ActionState)>,
) {
  const VELOCITY_SCALE: f32 = 0.25; // Scale factor for velocity visualization
  const INPUT_LENGTH: f32 = 50.0; // Fixed length for input vector

  for (transform, body, mover, actions) in &players {
    let player_pos = transform.translation.truncate();
    let velocity = body.velocity();

    if velocity.length_squared() > 0.01 {
      let velocity_end = player_pos + velocity * VELOCITY_SCALE;
      gizmos.line_2d(player_pos, velocity_end, Color::srgb(1.0, 1.0, 0.0));
    }

    let mut move_value = 0.0;
    for action_entity in actions.iter() {
      if let Ok((action, action_state)) = move_actions.get(action_entity) {
        if matches!(action_state, ActionState::Fired | ActionState::Ongoing) {
          move_value = **action;
        }
      }
    }

    if move_value.abs() > 0.01 {
      let input_direction = Vec2::new(move_value, 0.0).normalize_or_zero();
      let input_end = player_pos + input_direction * INPUT_LENGTH;
      gizmos.line_2d(player_pos, input_end, Color::srgb(0.0, 1.0, 0.0));
    }

    // Fall watermark
    let mark = Vec2::new(player_pos.x, mover.fall_watermark());
    gizmos.line_2d(
      mark - Vec2::X * 12.0,
      mark + Vec2::X * 12.0,
      Color::srgb(1.0, 0.5, 0.0),
    );
  }
}
