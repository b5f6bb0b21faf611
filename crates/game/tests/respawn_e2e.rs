//! E2E test for the death and respawn loop against real rapier physics.
//!
//! Loads the shipped level, drops the character onto it and walks it through
//! checkpoint activation, a hazard death and a spring launch.
//!
//! Run: cargo test -p springfall --test respawn_e2e

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use springfall::character::{CharacterMover, LocomotionState};
use springfall::config::{ConfigLoaded, GameConfig};
use springfall::core::PhysicsPlugin;
use springfall::level::{ActiveCheckpoint, LevelPlugin};
use springfall::player::components::GroundContact;
use springfall::player::{add_locomotion_systems, spawn_character};
use springfall::presentation::CharacterCueMessage;

const DELTA_TIME: f64 = 1.0 / 60.0;
const CHECKPOINT_SPAWN: Vec2 = Vec2::new(-300.0, -120.0);
const SPIKES: Vec2 = Vec2::new(880.0, -150.0);
const SPRING: Vec2 = Vec2::new(300.0, -150.0);

struct TestHarness {
  app: App,
  player: Entity,
}

impl TestHarness {
  fn new(spawn: Vec2) -> Self {
    let source = include_str!("../assets/config/game.config.toml");
    let config = GameConfig::from_toml_str(source).expect("shipped config is valid");

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(bevy::transform::TransformPlugin);
    app.add_plugins(bevy::asset::AssetPlugin::default());
    app.add_plugins(bevy::scene::ScenePlugin);
    app.insert_resource(Time::<Fixed>::from_hz(60.0));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
      DELTA_TIME,
    )));

    // Plugins below read the config while they are built
    app.insert_resource(ConfigLoaded::from(config));
    app.add_plugins((PhysicsPlugin, LevelPlugin));
    app.add_message::<CharacterCueMessage>();
    add_locomotion_systems(&mut app);

    let player_config = app.world().resource::<ConfigLoaded>().player.clone();
    let mut commands = app.world_mut().commands();
    let player = spawn_character(&mut commands, &player_config, spawn.extend(0.0));
    app.world_mut().flush();

    app.update();
    Self { app, player }
  }

  fn run(&mut self, updates: usize) {
    for _ in 0..updates {
      self.app.update();
    }
  }

  /// Runs until `done` holds, up to `max_updates`. Returns whether it did.
  fn run_until(&mut self, max_updates: usize, mut done: impl FnMut(&Self) -> bool) -> bool {
    for _ in 0..max_updates {
      self.app.update();
      if done(self) {
        return true;
      }
    }
    false
  }

  fn mover(&self) -> &CharacterMover {
    self.app.world().get::<CharacterMover>(self.player).unwrap()
  }

  fn position(&self) -> Vec2 {
    self
      .app
      .world()
      .get::<Transform>(self.player)
      .unwrap()
      .translation
      .truncate()
  }

  fn grounded(&self) -> bool {
    self.app.world().get::<GroundContact>(self.player).unwrap().0
  }

  fn place(&mut self, position: Vec2) {
    let mut transform = self
      .app
      .world_mut()
      .get_mut::<Transform>(self.player)
      .unwrap();
    transform.translation.x = position.x;
    transform.translation.y = position.y;
  }
}

#[test]
fn character_lands_on_the_first_platform() {
  let mut harness = TestHarness::new(Vec2::new(0.0, -120.0));

  let landed = harness.run_until(120, |h| h.mover().state() == LocomotionState::Grounded);
  assert!(landed, "never landed, resting at {:?}", harness.position());
  assert!(harness.grounded());

  // Top of the platform is y = -180; the capsule reaches 24 below its center
  harness.run(30);
  let y = harness.position().y;
  assert!((y - -156.0).abs() < 3.0, "resting height {y}");
}

#[test]
fn touching_a_checkpoint_moves_the_spawn() {
  let mut harness = TestHarness::new(CHECKPOINT_SPAWN);

  let activated = harness.run_until(120, |h| {
    h.app.world().resource::<ActiveCheckpoint>().entity().is_some()
  });
  assert!(activated, "checkpoint never activated");
  assert_eq!(
    harness.app.world().resource::<ActiveCheckpoint>().spawn(),
    CHECKPOINT_SPAWN
  );
}

#[test]
fn spikes_kill_and_respawn_at_active_checkpoint() {
  let mut harness = TestHarness::new(CHECKPOINT_SPAWN);
  assert!(harness.run_until(120, |h| h.grounded()));

  harness.place(SPIKES);
  let died = harness.run_until(30, |h| h.mover().is_dead());
  assert!(died, "spikes did not kill, at {:?}", harness.position());

  // Held at the death position while dead
  harness.run(10);
  assert!(harness.mover().is_dead());
  assert!(harness.position().distance(SPIKES) < 12.0);

  let revived = harness.run_until(180, |h| !h.mover().is_dead());
  assert!(revived, "never respawned");
  let position = harness.position();
  assert!(
    (position.x - CHECKPOINT_SPAWN.x).abs() < 1.0,
    "respawned at {position:?}"
  );

  // Alive again, the character settles back on the ground
  assert!(harness.run_until(120, |h| h.grounded()));
  assert!(!harness.mover().is_dead());
}

#[test]
fn spring_launches_after_its_teleport() {
  let mut harness = TestHarness::new(Vec2::new(0.0, -120.0));
  assert!(harness.run_until(120, |h| h.grounded()));

  harness.place(SPRING);
  let launched = harness.run_until(120, |h| {
    h.mover().state() == LocomotionState::Impulsing
  });
  assert!(launched, "spring never launched");

  let mut peak = f32::MIN;
  for _ in 0..30 {
    harness.run(1);
    peak = peak.max(harness.position().y);
  }
  assert!(peak > SPRING.y + 50.0, "peak height {peak}");
}
