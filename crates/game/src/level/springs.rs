//! Spring launchers.
//!
//! A living player entering a spring is snapped onto it with a shown teleport,
//! then launched by the teleport's impulse completion. The spring ignores
//! further contacts until the launch plus [`SPRING_COOLDOWN`] has passed.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::trigger_collider;
use crate::character::teleport::DEFAULT_TELEPORT_SECONDS;
use crate::character::{CharacterMover, GroundSensor, TeleportCommand, TeleportCompletion};
use crate::config::ConfigLoaded;
use crate::player::components::Player;

/// Seconds a spring stays inactive after its launch.
pub const SPRING_COOLDOWN: f32 = 0.3;

const SPRING_SIZE: Vec2 = Vec2::new(40.0, 20.0);
const MIN_STRENGTH: f32 = 1.0;
const MAX_STRENGTH: f32 = 7.0;

#[derive(Component, Debug, Clone, Copy)]
pub struct Spring {
  /// Launch impulse, already scaled by strength.
  pub force: f32,
  /// Unit launch direction.
  pub direction: Vec2,
  busy: f32,
}

impl Spring {
  pub fn new(base_force: f32, strength: f32, direction: Vec2) -> Self {
    Self {
      force: base_force * strength,
      direction: direction.try_normalize().unwrap_or(Vec2::Y),
      busy: 0.0,
    }
  }

  pub fn is_busy(&self) -> bool {
    self.busy > 0.0
  }
}

/// White for the weakest springs, orange for the strongest.
pub fn spring_tint(strength: f32) -> Color {
  let t = ((strength - MIN_STRENGTH) / (MAX_STRENGTH - MIN_STRENGTH)).clamp(0.0, 1.0);
  let weak = Vec3::new(1.0, 1.0, 1.0);
  let strong = Vec3::new(1.0, 0.3, 0.0);
  let c = weak.lerp(strong, t);
  Color::srgb(c.x, c.y, c.z)
}

pub fn spawn_springs(mut commands: Commands, config: Res<ConfigLoaded>) {
  let level = &config.level;
  for spring in &level.springs {
    let [dx, dy] = spring.direction;
    let component = Spring::new(level.spring_force, spring.strength, Vec2::new(dx, dy));
    commands.spawn((
      component,
      Sprite {
        color: spring_tint(spring.strength),
        custom_size: Some(SPRING_SIZE),
        ..default()
      },
      Transform::from_xyz(spring.x, spring.y, 1.0)
        .with_rotation(Quat::from_rotation_arc_2d(Vec2::Y, component.direction)),
      trigger_collider(SPRING_SIZE),
    ));
  }
}

pub fn spring_contacts(
  time: Res<Time>,
  mut springs: Query<(&mut Spring, &Transform, &CollidingEntities)>,
  mut players: Query<(&mut CharacterMover, &GroundSensor), With<Player>>,
) {
  let dt = time.delta_secs();
  for (mut spring, transform, colliding) in &mut springs {
    if spring.is_busy() {
      spring.busy = (spring.busy - dt).max(0.0);
      continue;
    }

    for other in colliding.iter() {
      let Ok((mut mover, sensor)) = players.get_mut(other) else {
        continue;
      };
      if mover.is_dead() {
        continue;
      }

      // Feet on the spring's centre
      let target = transform.translation.truncate() - sensor.anchor();
      mover.add_teleport(
        TeleportCommand::new(target)
          .shown(true)
          .with_completion(TeleportCompletion::Impulse {
            force: spring.force,
            direction: spring.direction,
          }),
      );
      spring.busy = DEFAULT_TELEPORT_SECONDS + SPRING_COOLDOWN;
      debug!("Spring launch queued towards {:?}", spring.direction);
      break;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rgb(color: Color) -> [f32; 3] {
    let srgba = color.to_srgba();
    [srgba.red, srgba.green, srgba.blue]
  }

  fn close(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
  }

  #[test]
  fn tint_runs_from_white_to_orange() {
    assert!(close(rgb(spring_tint(1.0)), [1.0, 1.0, 1.0]));
    assert!(close(rgb(spring_tint(7.0)), [1.0, 0.3, 0.0]));
    assert!(close(rgb(spring_tint(4.0)), [1.0, 0.65, 0.5]));
    assert!(close(rgb(spring_tint(20.0)), rgb(spring_tint(7.0))), "clamped above");
    assert!(close(rgb(spring_tint(0.0)), rgb(spring_tint(1.0))), "clamped below");
  }

  #[test]
  fn direction_is_normalized() {
    let spring = Spring::new(600.0, 1.5, Vec2::new(0.0, 4.0));
    assert_eq!(spring.direction, Vec2::Y);
    assert_eq!(spring.force, 900.0);
    assert!(!spring.is_busy());

    let fallback = Spring::new(600.0, 1.0, Vec2::ZERO);
    assert_eq!(fallback.direction, Vec2::Y);
  }
}
