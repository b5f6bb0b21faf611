use bevy::prelude::*;

use super::components::{InterpolationState, Player, PlayerVisual, VisualPosition};

/// Runs in FixedFirst: Shift positions for interpolation
pub fn shift_positions(mut players: Query<&mut InterpolationState, With<Player>>) {
  for mut state in &mut players {
    state.previous = state.current;
  }
}

/// Runs after Rapier writeback: Store new current position
pub fn store_current_position(
  mut players: Query<(&Transform, &mut InterpolationState), With<Player>>,
) {
  for (transform, mut state) in &mut players {
    state.current = transform.translation;
  }
}

/// Runs in Update: blend the last two physics positions by the fixed-step
/// overstep and move the visual there.
pub fn interpolate_visual(
  mut players: Query<(&InterpolationState, &mut VisualPosition), With<Player>>,
  mut visuals: Query<&mut Transform, (With<PlayerVisual>, Without<Player>)>,
  fixed_time: Res<Time<Fixed>>,
) {
  let t = fixed_time.overstep_fraction();

  let Ok((state, mut visual_pos)) = players.single_mut() else {
    return;
  };
  visual_pos.0 = state.previous.lerp(state.current, t);

  for mut transform in &mut visuals {
    transform.translation.x = visual_pos.0.x;
    transform.translation.y = visual_pos.0.y;
  }
}
