//! Bridges rapier and the locomotion core, once per fixed step.
//!
//! Order inside [`LocomotionSet`]: sense ground, read the body back from
//! physics, apply input, run level triggers, tick the state machine, write the
//! body to physics, publish cues. Rapier steps afterwards in `FixedPostUpdate`.

use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::{
  GroundContact, GroundProbe, InterpolationState, Player, SurfaceFriction,
};
use crate::character::{
  CharacterCues, CharacterMover, DeathType, GroundSensor, LocomotionState, MotionBody,
  MoverContext, SurfaceMaterial,
};
use crate::input::{Jump, Move, PlayerInput, Respawn};
use crate::level::ActiveCheckpoint;
use crate::presentation::CharacterCueMessage;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
  Sense,
  Input,
  Triggers,
  Tick,
  Write,
}

/// Reads the probe's overlaps into [`GroundContact`].
pub fn sense_ground(
  probes: Query<(&ChildOf, &CollidingEntities), With<GroundProbe>>,
  mut players: Query<(&GroundSensor, &mut GroundContact), With<Player>>,
) {
  for (child_of, colliding) in &probes {
    let Ok((sensor, mut contact)) = players.get_mut(child_of.parent()) else {
      continue;
    };
    let grounded = sensor.is_grounded(colliding);
    if contact.0 != grounded {
      contact.0 = grounded;
    }
  }
}

/// Refreshes the [`MotionBody`] snapshot from rapier's output.
///
/// Gravity scale is owned by the locomotion core and is not read back.
pub fn read_body(mut players: Query<(&Transform, &Velocity, &mut MotionBody), With<Player>>) {
  for (transform, velocity, mut body) in &mut players {
    let gravity_scale = body.gravity_scale();
    body.sync_from_physics(transform.translation.truncate(), velocity.linvel, gravity_scale);
  }
}

/// Applies the move axis every step; jump and respawn fire on press.
pub fn drive_input(
  mut players: Query<
    (
      &Actions<PlayerInput>,
      &mut CharacterMover,
      &mut MotionBody,
      &mut CharacterCues,
    ),
    With<Player>,
  >,
  move_actions: Query<(&Action<Move>, &ActionState)>,
  jump_actions: Query<&ActionState, With<Action<Jump>>>,
  respawn_actions: Query<&ActionState, With<Action<Respawn>>>,
  checkpoint: Res<ActiveCheckpoint>,
  mut held: Local<(bool, bool)>,
) {
  for (actions, mut mover, mut body, mut cues) in &mut players {
    let mut move_value = 0.0;
    let mut jump_pressed = false;
    let mut respawn_pressed = false;

    for action_entity in actions.iter() {
      if let Ok((action, action_state)) = move_actions.get(action_entity) {
        // Only use input when action is active (Fired or Ongoing)
        if matches!(action_state, ActionState::Fired | ActionState::Ongoing) {
          move_value = **action;
        }
      }
      if let Ok(action_state) = jump_actions.get(action_entity) {
        jump_pressed |= matches!(action_state, ActionState::Fired | ActionState::Ongoing);
      }
      if let Ok(action_state) = respawn_actions.get(action_entity) {
        respawn_pressed |= matches!(action_state, ActionState::Fired | ActionState::Ongoing);
      }
    }

    if move_value != 0.0 {
      trace!(
        "Move: axis={}, vel_x={:.1}, state={:?}",
        move_value,
        body.velocity().x,
        mover.state()
      );
    }
    mover.move_axis(move_value, &mut body);

    let (jump_held, respawn_held) = *held;
    let mut ctx = MoverContext {
      body: &mut body,
      ports: &mut *cues,
      checkpoints: &*checkpoint,
    };
    if jump_pressed && !jump_held {
      mover.jump(1.0, None, &mut ctx);
    }
    if respawn_pressed && !respawn_held {
      let death_time = mover.config().death_time;
      mover.kill(DeathType::Reset, death_time, &mut ctx);
    }
    *held = (jump_pressed, respawn_pressed);
  }
}

/// Runs the state machine and the teleport queue for one fixed step.
pub fn tick_locomotion(
  time: Res<Time>,
  checkpoint: Res<ActiveCheckpoint>,
  mut players: Query<
    (
      &mut CharacterMover,
      &mut MotionBody,
      &mut CharacterCues,
      &GroundContact,
    ),
    With<Player>,
  >,
) {
  let dt = time.delta_secs();
  for (mut mover, mut body, mut cues, contact) in &mut players {
    let mut ctx = MoverContext {
      body: &mut body,
      ports: &mut *cues,
      checkpoints: &*checkpoint,
    };
    mover.tick(contact.0, dt, &mut ctx);
    mover.advance_teleports(dt, &mut ctx);
  }
}

/// Pushes the [`MotionBody`] back into rapier.
///
/// A dead body is held still until its respawn teleport lands, unless it is
/// being launched: impulses always reach rapier, even while dead.
pub fn write_body(
  mut players: Query<
    (
      &mut MotionBody,
      &CharacterMover,
      &SurfaceFriction,
      &mut Transform,
      &mut Velocity,
      &mut GravityScale,
      &mut ExternalImpulse,
      &mut Friction,
      &mut InterpolationState,
    ),
    With<Player>,
  >,
) {
  for (
    mut body,
    mover,
    friction_table,
    mut transform,
    mut velocity,
    mut gravity,
    mut impulse,
    mut friction,
    mut interpolation,
  ) in &mut players
  {
    if let Some(target) = body.take_teleport() {
      transform.translation.x = target.x;
      transform.translation.y = target.y;
      interpolation.snap(transform.translation);
    }

    let pending = body.take_impulse();
    if mover.is_dead() && mover.state() != LocomotionState::Impulsing {
      velocity.linvel = Vec2::ZERO;
      gravity.0 = 0.0;
    } else {
      velocity.linvel = body.velocity();
      gravity.0 = body.gravity_scale();
    }
    impulse.impulse += pending;

    let coefficient = match body.surface() {
      SurfaceMaterial::Air => friction_table.air,
      SurfaceMaterial::Ground => friction_table.ground,
    };
    if friction.coefficient != coefficient {
      friction.coefficient = coefficient;
    }
  }
}

/// Publishes the cues recorded this step.
pub fn dispatch_cues(
  mut players: Query<(Entity, &mut CharacterCues), With<Player>>,
  mut messages: MessageWriter<CharacterCueMessage>,
) {
  for (entity, mut cues) in &mut players {
    for cue in cues.drain() {
      messages.write(CharacterCueMessage { entity, cue });
    }
  }
}
