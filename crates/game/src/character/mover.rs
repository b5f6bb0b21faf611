//! Five-state locomotion machine for the player character.
//!
//! Call order per fixed step: sync the [`MotionBody`] from physics, apply
//! input ([`CharacterMover::move_axis`], [`CharacterMover::jump`]), then
//! [`CharacterMover::tick`] and [`CharacterMover::advance_teleports`], then
//! push the body back to physics.

use bevy::log::{debug, info};
use bevy::prelude::*;

use super::LocomotionState;
use super::body::{MotionBody, SurfaceMaterial};
use super::death::{DeathBurst, DeathType};
use super::ports::{CharacterPorts, CheckpointProvider, PlayerSound};
use super::state_machine::StateMachine;
use super::teleport::{TeleportCommand, TeleportEvent, TeleportQueue};
use crate::config::{ConfigError, LocomotionConfig};

/// Timers at or below this count as expired.
const TIMER_EPSILON: f32 = 1e-4;

/// What happens once a teleport command lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TeleportCompletion {
  /// Clears the dead flag.
  Revive,
  /// Launches the character, e.g. off a spring.
  Impulse { force: f32, direction: Vec2 },
}

/// Collaborators borrowed for the duration of one operation.
pub struct MoverContext<'a> {
  pub body: &'a mut MotionBody,
  pub ports: &'a mut dyn CharacterPorts,
  pub checkpoints: &'a dyn CheckpointProvider,
}

#[derive(Component, Debug)]
pub struct CharacterMover {
  config: LocomotionConfig,
  state: StateMachine<LocomotionState>,
  teleports: TeleportQueue<TeleportCompletion>,
  original_gravity_scale: f32,
  coyote_timer: f32,
  jump_timer: f32,
  fall_watermark: f32,
  dead: bool,
}

impl CharacterMover {
  /// Validates `config` and starts airborne at the body's current height.
  pub fn new(config: LocomotionConfig, body: &MotionBody) -> Result<Self, ConfigError> {
    config.validate()?;
    Ok(Self {
      coyote_timer: config.coyote_time,
      jump_timer: config.jump_time,
      original_gravity_scale: body.gravity_scale(),
      fall_watermark: body.position().y,
      state: StateMachine::new(LocomotionState::Airing),
      teleports: TeleportQueue::new(),
      dead: false,
      config,
    })
  }

  pub fn config(&self) -> &LocomotionConfig {
    &self.config
  }

  pub fn state(&self) -> LocomotionState {
    self.state.current()
  }

  pub fn is_dead(&self) -> bool {
    self.dead
  }

  pub fn coyote_timer(&self) -> f32 {
    self.coyote_timer
  }

  pub fn jump_timer(&self) -> f32 {
    self.jump_timer
  }

  /// Highest height reached since the last ground, air or impulse entry.
  pub fn fall_watermark(&self) -> f32 {
    self.fall_watermark
  }

  pub fn teleports(&self) -> &TeleportQueue<TeleportCompletion> {
    &self.teleports
  }

  pub fn can_move(&self) -> bool {
    !self.dead && !self.state.is_in_state(&[LocomotionState::Impulsing])
  }

  pub fn can_jump(&self) -> bool {
    !self.dead
      && self
        .state
        .is_in_state(&[LocomotionState::Grounded, LocomotionState::Coyoting])
  }

  /// One physics step. `grounded` is this step's ground sensor reading.
  pub fn tick(&mut self, grounded: bool, dt: f32, ctx: &mut MoverContext<'_>) {
    match self.state.current() {
      LocomotionState::Airing => {
        if grounded {
          self.change_state(LocomotionState::Grounded, ctx);
        } else {
          self.apply_travel_gravity(ctx.body);
          self.raise_watermark(ctx.body);
        }
      }
      LocomotionState::Coyoting => {
        if grounded {
          self.change_state(LocomotionState::Grounded, ctx);
        } else {
          self.coyote_timer -= dt;
          if self.coyote_timer <= TIMER_EPSILON {
            self.change_state(LocomotionState::Airing, ctx);
          }
        }
      }
      LocomotionState::Grounded => {
        if grounded {
          ctx.ports.activate_run(ctx.body.velocity().x);
        } else {
          self.change_state(LocomotionState::Coyoting, ctx);
        }
      }
      LocomotionState::Impulsing => {
        if grounded {
          self.change_state(LocomotionState::Grounded, ctx);
        } else {
          self.raise_watermark(ctx.body);
        }
      }
      LocomotionState::Jumping => {
        self.jump_timer -= dt;
        if self.jump_timer <= TIMER_EPSILON && grounded {
          self.change_state(LocomotionState::Grounded, ctx);
        }
        if !grounded {
          self.apply_travel_gravity(ctx.body);
          self.raise_watermark(ctx.body);
        }
      }
    }
  }

  /// Sets horizontal velocity from an input axis in `[-1, 1]`.
  pub fn move_axis(&self, axis: f32, body: &mut MotionBody) {
    if !self.can_move() {
      return;
    }
    body.set_horizontal_velocity(axis * self.config.run_speed);
  }

  /// Jumps if grounded or within the coyote window. `direction` defaults to up.
  pub fn jump(&mut self, force: f32, direction: Option<Vec2>, ctx: &mut MoverContext<'_>) -> bool {
    if !self.can_jump() {
      return false;
    }
    let direction = direction.unwrap_or(Vec2::Y);
    ctx
      .body
      .apply_impulse(direction * self.config.jump_force * force);
    self.change_state(LocomotionState::Jumping, ctx);
    true
  }

  /// Replaces the current velocity with a launch. Works while dead.
  pub fn impulse(&mut self, force: f32, direction: Vec2, ctx: &mut MoverContext<'_>) {
    ctx.body.set_velocity(Vec2::ZERO);
    ctx.body.apply_impulse(direction * force);
    self.change_state(LocomotionState::Impulsing, ctx);
  }

  /// Starts a death sequence: effects, then a teleport to the death position
  /// (held for `death_time` seconds) followed by a teleport to the checkpoint
  /// resolved right now. Returns false if already dead.
  pub fn kill(&mut self, death: DeathType, death_time: f32, ctx: &mut MoverContext<'_>) -> bool {
    if self.dead {
      return false;
    }

    ctx.ports.set_trail(false);
    ctx.body.set_velocity(Vec2::ZERO);
    self.dead = true;

    let sequence = death.sequence();
    if let Some(sound) = sequence.sound {
      ctx.ports.play_sound(sound);
    }
    if let Some(animation) = sequence.animation {
      ctx.ports.trigger_death(animation);
    }
    if let Some(DeathBurst::Drown) = sequence.burst {
      ctx.ports.burst_drown();
    }
    if sequence.scatter_body_parts {
      ctx.ports.scatter_body_parts(ctx.body.position());
    }

    let death_position = ctx.body.position();
    let spawn_point = ctx.checkpoints.spawn_point();
    info!(
      "Player died ({}) at {:?}, respawning at {:?}",
      death, death_position, spawn_point
    );

    self.add_teleport(
      TeleportCommand::new(death_position)
        .shown(sequence.shows_body())
        .lasting(death_time),
    );
    self.add_teleport(TeleportCommand::new(spawn_point).with_completion(TeleportCompletion::Revive));
    true
  }

  pub fn add_teleport(&mut self, command: TeleportCommand<TeleportCompletion>) {
    self.teleports.add_command(command);
  }

  /// Runs the teleport queue for `dt` seconds.
  pub fn advance_teleports(&mut self, dt: f32, ctx: &mut MoverContext<'_>) {
    for event in self.teleports.advance(dt) {
      match event {
        TeleportEvent::Started { show, .. } => {
          if !show {
            ctx.ports.enter_teleport();
          }
        }
        TeleportEvent::Arrived {
          target,
          show,
          completion,
        } => {
          ctx.body.teleport_to(target);
          if !show {
            ctx.ports.exit_teleport();
          }
          self.fall_watermark = target.y;
          if let Some(completion) = completion {
            self.complete_teleport(completion, ctx);
          }
        }
      }
    }
  }

  /// Toggles the trail. Ignored while dead.
  pub fn switch_trail_emission(&self, emitting: bool, ports: &mut dyn CharacterPorts) {
    if !self.dead {
      ports.set_trail(emitting);
    }
  }

  fn complete_teleport(&mut self, completion: TeleportCompletion, ctx: &mut MoverContext<'_>) {
    match completion {
      TeleportCompletion::Revive => {
        self.dead = false;
        ctx.ports.set_trail(true);
        info!("Player respawned at {:?}", ctx.body.position());
      }
      TeleportCompletion::Impulse { force, direction } => {
        self.impulse(force, direction, ctx);
      }
    }
  }

  fn change_state(&mut self, next: LocomotionState, ctx: &mut MoverContext<'_>) {
    let mut request = Some(next);
    while let Some(next) = request.take() {
      let Some(transition) = self.state.begin(next) else {
        continue;
      };
      self.on_exit(transition.from, ctx);
      self.state.commit();
      debug!("Locomotion {:?} -> {:?}", transition.from, transition.to);
      ctx.ports.state_changed(transition);
      self.on_enter(transition.to, ctx);
      request = self.state.finish();
    }
  }

  fn on_exit(&mut self, state: LocomotionState, ctx: &mut MoverContext<'_>) {
    match state {
      LocomotionState::Grounded => ctx.ports.activate_run(0.0),
      LocomotionState::Coyoting => {
        ctx.body.set_gravity_scale(self.original_gravity_scale);
        self.coyote_timer = self.config.coyote_time;
      }
      LocomotionState::Jumping => self.jump_timer = self.config.jump_time,
      LocomotionState::Airing | LocomotionState::Impulsing => {}
    }
  }

  fn on_enter(&mut self, state: LocomotionState, ctx: &mut MoverContext<'_>) {
    match state {
      LocomotionState::Airing => {
        ctx.body.set_surface(SurfaceMaterial::Air);
        self.fall_watermark = ctx.body.position().y;
      }
      LocomotionState::Coyoting => {
        // Gravity is suspended for the grace window.
        ctx.body.set_vertical_velocity(0.0);
        self.original_gravity_scale = ctx.body.gravity_scale();
        ctx.body.set_gravity_scale(0.0);
      }
      LocomotionState::Grounded => {
        ctx
          .body
          .set_gravity_scale(self.config.downward_gravity_scale);
        ctx.body.set_surface(SurfaceMaterial::Ground);

        let fall_distance = self.fall_watermark - ctx.body.position().y;
        if fall_distance >= self.config.fall_death {
          ctx.ports.play_sound(PlayerSound::Death);
          self.kill(DeathType::Fall, self.config.death_time, ctx);
        }

        ctx.ports.burst_fall();
        ctx.ports.play_sound(PlayerSound::Grounded);
        ctx.ports.play_sound(PlayerSound::GroundHit);
      }
      LocomotionState::Impulsing => {
        ctx
          .body
          .set_gravity_scale(self.config.downward_gravity_scale);
        ctx.body.set_surface(SurfaceMaterial::Air);
        self.fall_watermark = ctx.body.position().y;
        ctx.ports.trigger_jump();
      }
      LocomotionState::Jumping => {
        ctx.body.set_surface(SurfaceMaterial::Air);
        self.fall_watermark = ctx.body.position().y;
        ctx.ports.burst_jump();
        ctx.ports.trigger_jump();
        ctx.ports.play_sound(PlayerSound::Jump);
      }
    }
  }

  /// Lighter gravity on the way up, heavier on the way down.
  fn apply_travel_gravity(&self, body: &mut MotionBody) {
    let scale = if body.velocity().y > 0.0 {
      self.config.upward_gravity_scale
    } else {
      self.config.downward_gravity_scale
    };
    body.set_gravity_scale(scale);
  }

  fn raise_watermark(&mut self, body: &MotionBody) {
    self.fall_watermark = self.fall_watermark.max(body.position().y);
  }
}
