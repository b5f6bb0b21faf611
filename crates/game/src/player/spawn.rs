use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::{
  GroundContact, GroundProbe, InterpolationState, Player, PlayerVisual, SurfaceFriction,
  VisualPosition,
};
use crate::character::{CharacterCues, CharacterMover, GroundSensor, MotionBody};
use crate::config::{ConfigLoaded, PlayerConfig};
use crate::core::layers;
use crate::input::{PlayerInput, player_input_actions};

/// Spawn player at the configured position
pub fn spawn_player(mut commands: Commands, config: Res<ConfigLoaded>) {
  let player = &config.player;
  let spawn_pos = Vec3::new(player.spawn_x, player.spawn_y, 0.0);
  spawn_player_entity(&mut commands, player, spawn_pos);
}

/// Spawns the controllable player: the character plus its input context.
pub fn spawn_player_entity(commands: &mut Commands, player: &PlayerConfig, spawn_pos: Vec3) -> Entity {
  let entity = spawn_character(commands, player, spawn_pos);
  commands
    .entity(entity)
    .insert((PlayerInput, player_input_actions()));
  entity
}

/// Spawns the physics body, its ground probe and the separate visual, without
/// any input bindings.
///
/// Panics if the locomotion config is unusable; the config plugin has
/// already validated it, so this only fires for hand-built configs.
pub fn spawn_character(commands: &mut Commands, player: &PlayerConfig, spawn_pos: Vec3) -> Entity {
  let body = MotionBody::new(spawn_pos.truncate(), 1.0);
  let (mover, sensor) = match (
    CharacterMover::new(player.locomotion.clone(), &body),
    GroundSensor::from_config(&player.locomotion),
  ) {
    (Ok(mover), Ok(sensor)) => (mover, sensor),
    (Err(err), _) | (_, Err(err)) => panic!("Cannot spawn player: {}", err),
  };

  // Rapier capsule_y uses half_height (cylinder part) and radius
  let half_height = player.collider_length / 2.0;

  // Physics entity - authoritative position for collision
  let entity = commands
    .spawn((
      Player,
      Transform::from_translation(spawn_pos),
      Visibility::default(),
      (
        RigidBody::Dynamic,
        Collider::capsule_y(half_height, player.collider_radius),
        ColliderMassProperties::Mass(player.mass),
        LockedAxes::ROTATION_LOCKED,
        Velocity::zero(),
        GravityScale(body.gravity_scale()),
        ExternalImpulse::default(),
        Friction::coefficient(player.air_friction),
        CollisionGroups::new(layers::PLAYER, layers::GROUND | layers::TRIGGER),
        Ccd::enabled(),
        Sleeping::disabled(),
      ),
      (
        body,
        mover,
        sensor,
        GroundContact::default(),
        CharacterCues::default(),
        SurfaceFriction {
          air: player.air_friction,
          ground: player.ground_friction,
        },
      ),
      InterpolationState::new(spawn_pos),
      VisualPosition(spawn_pos),
    ))
    .id();

  // Ground probe - sensor child, only overlaps the configured ground groups
  commands.spawn((
    GroundProbe,
    ChildOf(entity),
    Transform::from_translation(sensor.anchor().extend(0.0)),
    Collider::ball(sensor.radius()),
    Sensor,
    ColliderMassProperties::Density(0.0),
    CollisionGroups::new(layers::PROBE, Group::from_bits_truncate(sensor.mask())),
    ActiveEvents::COLLISION_EVENTS,
    CollidingEntities::default(),
  ));

  // Visual entity - separate root entity, follows VisualPosition directly
  let [r, g, b] = player.color;
  commands.spawn((
    PlayerVisual,
    Sprite {
      color: Color::srgb(r, g, b),
      custom_size: Some(Vec2::new(player.sprite_size[0], player.sprite_size[1])),
      ..default()
    },
    Transform::from_translation(Vec3::new(spawn_pos.x, spawn_pos.y, 100.0)),
    Visibility::default(),
  ));

  info!("Spawned player at {:?}", spawn_pos.truncate());
  entity
}
