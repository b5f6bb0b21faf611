use bevy::prelude::*;

use super::ports::DeathAnimation;
use super::*;
use crate::config::LocomotionConfig;

const DT: f32 = 0.02;

/// A mover with its body, a cue recorder and a fixed spawn point.
struct Rig {
  mover: CharacterMover,
  body: MotionBody,
  cues: CharacterCues,
  spawn: Vec2,
}

impl Rig {
  fn at(y: f32, config: LocomotionConfig) -> Self {
    let body = MotionBody::new(Vec2::new(0.0, y), 1.0);
    let mover = CharacterMover::new(config, &body).unwrap();
    Self {
      mover,
      body,
      cues: CharacterCues::default(),
      spawn: Vec2::new(-40.0, 20.0),
    }
  }

  fn tick(&mut self, grounded: bool) {
    let mut ctx = MoverContext {
      body: &mut self.body,
      ports: &mut self.cues,
      checkpoints: &self.spawn,
    };
    self.mover.tick(grounded, DT, &mut ctx);
    self.mover.advance_teleports(DT, &mut ctx);
  }

  fn advance_teleports(&mut self, dt: f32) {
    let mut ctx = MoverContext {
      body: &mut self.body,
      ports: &mut self.cues,
      checkpoints: &self.spawn,
    };
    self.mover.advance_teleports(dt, &mut ctx);
  }

  fn jump(&mut self) -> bool {
    let mut ctx = MoverContext {
      body: &mut self.body,
      ports: &mut self.cues,
      checkpoints: &self.spawn,
    };
    self.mover.jump(1.0, None, &mut ctx)
  }

  fn impulse(&mut self, force: f32, direction: Vec2) {
    let mut ctx = MoverContext {
      body: &mut self.body,
      ports: &mut self.cues,
      checkpoints: &self.spawn,
    };
    self.mover.impulse(force, direction, &mut ctx);
  }

  fn kill(&mut self, death: DeathType) -> bool {
    let mut ctx = MoverContext {
      body: &mut self.body,
      ports: &mut self.cues,
      checkpoints: &self.spawn,
    };
    self.mover.kill(death, 1.0, &mut ctx)
  }

  /// Moves the body as physics would between ticks.
  fn place(&mut self, y: f32) {
    let velocity = self.body.velocity();
    let gravity_scale = self.body.gravity_scale();
    self
      .body
      .sync_from_physics(Vec2::new(self.body.position().x, y), velocity, gravity_scale);
  }

  fn deaths(&self) -> usize {
    self
      .cues
      .count(|cue| matches!(cue, CharacterCue::TriggerDeath(_)))
  }
}

fn grounded_rig(config: LocomotionConfig) -> Rig {
  let mut rig = Rig::at(0.0, config);
  rig.tick(true);
  assert_eq!(rig.mover.state(), LocomotionState::Grounded);
  rig.cues.clear();
  rig
}

fn fall_config() -> LocomotionConfig {
  LocomotionConfig {
    fall_death: 5.0,
    ..LocomotionConfig::default()
  }
}

#[test]
fn coyote_window_expires_into_airing() {
  let mut rig = grounded_rig(LocomotionConfig::default());

  rig.tick(false);
  assert_eq!(rig.mover.state(), LocomotionState::Coyoting);
  assert_eq!(rig.body.gravity_scale(), 0.0, "gravity suspended while coyoting");

  for _ in 0..4 {
    rig.tick(false);
  }
  assert_eq!(
    rig.mover.state(),
    LocomotionState::Coyoting,
    "0.08s without contact is still inside a 0.1s window"
  );

  rig.tick(false);
  assert_eq!(
    rig.mover.state(),
    LocomotionState::Airing,
    "six ticks without contact must leave the window"
  );
  assert!(!rig.mover.can_jump());
}

#[test]
fn regaining_contact_during_coyote_lands_and_resets_timer() {
  let mut rig = grounded_rig(LocomotionConfig::default());
  let gravity_before = rig.body.gravity_scale();

  rig.tick(false);
  rig.tick(false);
  rig.tick(false);
  assert!(rig.mover.coyote_timer() < rig.mover.config().coyote_time);
  assert!(rig.mover.can_jump(), "coyote time still honours jumps");

  rig.tick(true);
  assert_eq!(rig.mover.state(), LocomotionState::Grounded);
  assert_eq!(rig.mover.coyote_timer(), rig.mover.config().coyote_time);
  assert_eq!(rig.body.gravity_scale(), rig.mover.config().downward_gravity_scale);
  assert!(gravity_before > 0.0);
}

#[test]
fn coyote_exit_restores_cached_gravity() {
  let mut rig = grounded_rig(LocomotionConfig::default());
  let grounded_gravity = rig.body.gravity_scale();

  rig.tick(false);
  for _ in 0..10 {
    rig.tick(false);
  }
  assert_eq!(rig.mover.state(), LocomotionState::Airing);
  // Airing overrides it again on the next tick; the exit hook must restore first.
  assert!(
    rig
      .cues
      .as_slice()
      .iter()
      .any(|cue| matches!(
        cue,
        CharacterCue::StateChanged(Transition {
          from: LocomotionState::Coyoting,
          to: LocomotionState::Airing
        })
      ))
  );
  assert!(grounded_gravity > 0.0);
  assert_ne!(rig.body.gravity_scale(), 0.0);
}

#[test]
fn fatal_fall_from_airing_kills() {
  let mut rig = Rig::at(10.0, fall_config());
  rig.tick(false);
  rig.place(4.0);
  rig.tick(true);

  assert!(rig.mover.is_dead());
  assert_eq!(rig.deaths(), 1);
  assert!(
    rig
      .cues
      .as_slice()
      .contains(&CharacterCue::TriggerDeath(DeathAnimation::Collapse))
  );
  assert!(rig.cues.as_slice().contains(&CharacterCue::Sound(PlayerSound::Death)));
  // Landing effects play even on a fatal landing.
  assert!(rig.cues.as_slice().contains(&CharacterCue::BurstFall));
  assert!(rig.cues.as_slice().contains(&CharacterCue::Sound(PlayerSound::Grounded)));
  assert!(rig.cues.as_slice().contains(&CharacterCue::Sound(PlayerSound::GroundHit)));
}

#[test]
fn short_fall_from_airing_survives() {
  let mut rig = Rig::at(10.0, fall_config());
  rig.tick(false);
  rig.place(6.0);
  rig.tick(true);

  assert!(!rig.mover.is_dead());
  assert_eq!(rig.mover.state(), LocomotionState::Grounded);
  assert_eq!(rig.deaths(), 0);
}

#[test]
fn fall_of_exactly_the_threshold_kills() {
  let mut rig = Rig::at(10.0, fall_config());
  rig.tick(false);
  rig.place(5.0);
  rig.tick(true);

  assert!(rig.mover.is_dead(), "the threshold distance itself is fatal");
  assert_eq!(rig.deaths(), 1);
  assert!(
    rig
      .cues
      .as_slice()
      .contains(&CharacterCue::TriggerDeath(DeathAnimation::Collapse))
  );
}

#[test]
fn fatal_fall_after_impulse_kills() {
  let mut rig = grounded_rig(fall_config());
  rig.impulse(100.0, Vec2::Y);
  assert_eq!(rig.mover.state(), LocomotionState::Impulsing);

  rig.place(10.0);
  rig.tick(false);
  assert_eq!(rig.mover.fall_watermark(), 10.0);

  rig.place(4.0);
  rig.tick(true);
  assert!(rig.mover.is_dead(), "impulse arcs count towards fall damage");
}

#[test]
fn short_fall_after_impulse_survives() {
  let mut rig = grounded_rig(fall_config());
  rig.impulse(100.0, Vec2::Y);
  rig.place(10.0);
  rig.tick(false);
  rig.place(6.0);
  rig.tick(true);

  assert!(!rig.mover.is_dead());
  assert_eq!(rig.mover.state(), LocomotionState::Grounded);
}

#[test]
fn second_kill_is_ignored() {
  let mut rig = grounded_rig(LocomotionConfig::default());

  assert!(rig.kill(DeathType::Fall));
  assert!(!rig.kill(DeathType::Fall));
  assert!(!rig.kill(DeathType::Spikes));

  assert_eq!(rig.deaths(), 1);
  assert_eq!(rig.mover.teleports().len(), 2);
  assert_eq!(
    rig
      .cues
      .count(|cue| matches!(cue, CharacterCue::ScatterBodyParts(_))),
    0,
    "the ignored spikes death must not scatter debris"
  );
}

#[test]
fn kill_stops_the_body_and_trail() {
  let mut rig = grounded_rig(LocomotionConfig::default());
  rig.mover.move_axis(1.0, &mut rig.body);
  assert!(rig.body.velocity().x > 0.0);

  rig.kill(DeathType::Drown);
  assert_eq!(rig.body.velocity(), Vec2::ZERO);
  assert!(rig.cues.as_slice().contains(&CharacterCue::Trail(false)));
  assert!(rig.cues.as_slice().contains(&CharacterCue::Sound(PlayerSound::Drown)));
  assert!(rig.cues.as_slice().contains(&CharacterCue::BurstDrown));

  rig.cues.clear();
  rig.mover.switch_trail_emission(true, &mut rig.cues);
  assert!(rig.cues.as_slice().is_empty(), "trail stays off while dead");
}

#[test]
fn move_and_jump_do_nothing_while_dead() {
  let mut rig = grounded_rig(LocomotionConfig::default());
  rig.kill(DeathType::Reset);
  let state = rig.mover.state();

  rig.mover.move_axis(1.0, &mut rig.body);
  assert_eq!(rig.body.velocity(), Vec2::ZERO);

  assert!(!rig.jump());
  assert_eq!(rig.mover.state(), state);
  assert_eq!(rig.body.pending_impulse(), Vec2::ZERO);
}

#[test]
fn move_is_ignored_while_impulsing() {
  let mut rig = grounded_rig(LocomotionConfig::default());
  rig.impulse(50.0, Vec2::X);
  rig.mover.move_axis(-1.0, &mut rig.body);
  assert_eq!(rig.body.velocity().x, 0.0);
}

#[test]
fn move_keeps_vertical_velocity() {
  let mut rig = Rig::at(0.0, LocomotionConfig::default());
  rig.body.sync_from_physics(Vec2::ZERO, Vec2::new(0.0, -30.0), 1.0);
  rig.mover.move_axis(-0.5, &mut rig.body);
  assert_eq!(
    rig.body.velocity(),
    Vec2::new(-0.5 * rig.mover.config().run_speed, -30.0)
  );
}

#[test]
fn jump_lands_after_jump_window_and_resets_timer() {
  let mut rig = grounded_rig(LocomotionConfig::default());

  assert!(rig.jump());
  assert_eq!(rig.mover.state(), LocomotionState::Jumping);
  assert_eq!(
    rig.body.pending_impulse(),
    Vec2::new(0.0, rig.mover.config().jump_force)
  );
  assert!(rig.cues.as_slice().contains(&CharacterCue::Sound(PlayerSound::Jump)));

  for _ in 0..4 {
    rig.tick(true);
    assert_eq!(
      rig.mover.state(),
      LocomotionState::Jumping,
      "probe still touching the floor right after take-off"
    );
  }

  rig.tick(true);
  assert_eq!(rig.mover.state(), LocomotionState::Grounded);
  assert_eq!(rig.mover.jump_timer(), rig.mover.config().jump_time);
}

#[test]
fn jump_is_refused_in_the_air() {
  let mut rig = Rig::at(0.0, LocomotionConfig::default());
  assert_eq!(rig.mover.state(), LocomotionState::Airing);
  assert!(!rig.jump());
  assert_eq!(rig.body.pending_impulse(), Vec2::ZERO);
}

#[test]
fn airborne_gravity_follows_travel_direction() {
  let mut rig = Rig::at(0.0, LocomotionConfig::default());
  let config = rig.mover.config().clone();

  rig.body.sync_from_physics(Vec2::ZERO, Vec2::new(0.0, 50.0), 1.0);
  rig.tick(false);
  assert_eq!(rig.body.gravity_scale(), config.upward_gravity_scale);

  rig.body.sync_from_physics(Vec2::ZERO, Vec2::new(0.0, -50.0), 1.0);
  rig.tick(false);
  assert_eq!(rig.body.gravity_scale(), config.downward_gravity_scale);
}

#[test]
fn impulse_works_while_dead() {
  let mut rig = grounded_rig(LocomotionConfig::default());
  rig.kill(DeathType::Spikes);

  rig.impulse(80.0, Vec2::new(1.0, 0.0));
  assert_eq!(rig.mover.state(), LocomotionState::Impulsing);
  assert_eq!(rig.body.pending_impulse(), Vec2::new(80.0, 0.0));
  assert_eq!(rig.body.velocity(), Vec2::ZERO);
}

#[test]
fn death_teleports_to_spawn_resolved_at_death() {
  let mut rig = Rig::at(0.0, LocomotionConfig::default());
  rig.body.sync_from_physics(Vec2::new(12.0, -3.0), Vec2::ZERO, 1.0);
  let spawn = rig.spawn;

  rig.kill(DeathType::Spikes);
  rig.spawn = Vec2::new(900.0, 900.0);

  // First command holds at the death position for death_time.
  rig.advance_teleports(0.5);
  assert!(rig.mover.is_dead());
  assert!(rig.cues.as_slice().contains(&CharacterCue::EnterTeleport));
  rig.advance_teleports(0.5);
  assert_eq!(rig.body.take_teleport(), Some(Vec2::new(12.0, -3.0)));
  assert!(rig.mover.is_dead(), "still dead until the spawn teleport lands");

  for _ in 0..10 {
    rig.advance_teleports(0.1);
  }
  assert!(!rig.mover.is_dead());
  assert_eq!(rig.body.position(), spawn);
  assert_eq!(rig.body.take_teleport(), Some(spawn));
  assert_eq!(rig.mover.fall_watermark(), spawn.y);
  assert!(rig.mover.teleports().is_idle());
  assert!(rig.cues.as_slice().contains(&CharacterCue::Trail(true)));
  assert_eq!(
    rig.cues.count(|cue| *cue == CharacterCue::EnterTeleport),
    rig.cues.count(|cue| *cue == CharacterCue::ExitTeleport),
    "every hidden command is revealed again"
  );
}

#[test]
fn fall_death_shows_body_during_death_pose() {
  let mut rig = grounded_rig(LocomotionConfig::default());
  rig.kill(DeathType::Fall);
  rig.advance_teleports(0.1);
  assert_eq!(
    rig.cues.count(|cue| *cue == CharacterCue::EnterTeleport),
    0,
    "collapse animation needs the body visible"
  );
}

#[test]
fn spring_teleport_completes_with_impulse() {
  let mut rig = Rig::at(0.0, LocomotionConfig::default());
  let pad = Vec2::new(30.0, 0.0);
  rig.mover.add_teleport(
    TeleportCommand::new(pad)
      .shown(true)
      .lasting(0.1)
      .with_completion(TeleportCompletion::Impulse {
        force: 900.0,
        direction: Vec2::Y,
      }),
  );

  rig.advance_teleports(0.05);
  assert_eq!(rig.mover.state(), LocomotionState::Airing);
  rig.advance_teleports(0.05);

  assert_eq!(rig.body.position(), pad);
  assert_eq!(rig.mover.state(), LocomotionState::Impulsing);
  assert_eq!(rig.body.pending_impulse(), Vec2::new(0.0, 900.0));
  assert!(
    !rig
      .cues
      .as_slice()
      .iter()
      .any(|cue| matches!(cue, CharacterCue::EnterTeleport | CharacterCue::ExitTeleport))
  );
}

#[test]
fn transitions_form_a_single_chain() {
  let mut rig = Rig::at(0.0, fall_config());
  let contact = [
    true, true, false, false, true, false, false, false, false, false, false, false, true,
  ];
  for (step, grounded) in contact.into_iter().enumerate() {
    if step == 3 {
      rig.jump();
    }
    if step == 9 {
      rig.impulse(10.0, Vec2::Y);
    }
    rig.tick(grounded);
  }

  let mut current = LocomotionState::Airing;
  for cue in rig.cues.as_slice() {
    if let CharacterCue::StateChanged(transition) = cue {
      assert_eq!(transition.from, current, "transition skipped a state");
      assert_ne!(transition.from, transition.to);
      current = transition.to;
    }
  }
  assert_eq!(current, rig.mover.state());
  assert!(LocomotionState::ALL.contains(&current));
}

#[test]
fn new_rejects_missing_anchor() {
  let config = LocomotionConfig {
    ground_check_anchor: None,
    ..LocomotionConfig::default()
  };
  let body = MotionBody::new(Vec2::ZERO, 1.0);
  assert!(CharacterMover::new(config, &body).is_err());
}
