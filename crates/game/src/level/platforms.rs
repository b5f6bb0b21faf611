use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::ConfigLoaded;
use crate::core::layers;

pub fn spawn_platforms(mut commands: Commands, config: Res<ConfigLoaded>) {
  let level = &config.level;
  let [r, g, b] = level.platform_color;

  // Rapier cuboid uses half-extents
  for platform in &level.platforms {
    let size = platform.size();
    commands.spawn((
      Sprite {
        color: Color::srgb(r, g, b),
        custom_size: Some(size),
        ..default()
      },
      Transform::from_translation(platform.center().extend(0.0)),
      RigidBody::Fixed,
      Collider::cuboid(size.x / 2.0, size.y / 2.0),
      CollisionGroups::new(layers::GROUND, Group::ALL),
      // Defer to the player's surface material
      Friction {
        coefficient: 1.0,
        combine_rule: CoefficientCombineRule::Min,
      },
    ));
  }
}
