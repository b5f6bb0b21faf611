//! Sprite particles for jump, landing, drowning, running and body parts.

use bevy::prelude::*;
use rand::Rng;

use super::CharacterCueMessage;
use crate::character::CharacterCue;
use crate::config::ConfigLoaded;
use crate::player::components::{Player, VisualPosition};

const PARTICLE_GRAVITY: f32 = 600.0;
/// Minimum run speed that kicks up dust.
const DUST_SPEED: f32 = 60.0;
/// Dust particles per second at full run speed.
const DUST_RATE: f32 = 30.0;

#[derive(Component, Debug)]
pub struct Particle {
  pub velocity: Vec2,
  pub lifetime: f32,
  pub gravity: f32,
  age: f32,
}

/// Shape of a particle burst.
#[derive(Clone, Copy, Debug)]
pub struct ParticleBurst {
  pub count: usize,
  pub speed: (f32, f32),
  /// Spread around straight up, in radians.
  pub spread: f32,
  pub lifetime: f32,
  pub size: f32,
  pub color: Color,
  pub gravity: f32,
}

impl ParticleBurst {
  const JUMP: Self = Self {
    count: 8,
    speed: (60.0, 140.0),
    spread: 2.6,
    lifetime: 0.35,
    size: 4.0,
    color: Color::srgb(0.85, 0.82, 0.75),
    gravity: PARTICLE_GRAVITY,
  };
  const FALL: Self = Self {
    count: 12,
    speed: (80.0, 180.0),
    spread: 3.0,
    lifetime: 0.4,
    size: 4.0,
    color: Color::srgb(0.8, 0.78, 0.7),
    gravity: PARTICLE_GRAVITY,
  };
  const DROWN: Self = Self {
    count: 24,
    speed: (60.0, 220.0),
    spread: 1.2,
    lifetime: 0.8,
    size: 5.0,
    color: Color::srgba(0.55, 0.75, 1.0, 0.9),
    gravity: PARTICLE_GRAVITY,
  };
  const DUST: Self = Self {
    count: 1,
    speed: (20.0, 60.0),
    spread: 1.5,
    lifetime: 0.3,
    size: 3.0,
    color: Color::srgba(0.8, 0.78, 0.7, 0.7),
    gravity: 0.0,
  };
  const BODY_PARTS: Self = Self {
    count: 6,
    speed: (180.0, 360.0),
    spread: 2.4,
    lifetime: 1.4,
    size: 8.0,
    color: Color::srgb(0.95, 0.8, 0.4),
    gravity: PARTICLE_GRAVITY * 1.5,
  };
}

fn spawn_burst(commands: &mut Commands, rng: &mut impl Rng, at: Vec2, burst: ParticleBurst) {
  for _ in 0..burst.count {
    let angle = rng.random_range(-burst.spread / 2.0..=burst.spread / 2.0);
    let speed = rng.random_range(burst.speed.0..=burst.speed.1);
    let direction = Vec2::from_angle(angle).rotate(Vec2::Y);
    commands.spawn((
      Particle {
        velocity: direction * speed,
        lifetime: burst.lifetime,
        gravity: burst.gravity,
        age: 0.0,
      },
      Sprite {
        color: burst.color,
        custom_size: Some(Vec2::splat(burst.size)),
        ..default()
      },
      Transform::from_translation(at.extend(50.0)),
    ));
  }
}

pub fn emit_cue_particles(
  mut commands: Commands,
  mut cues: MessageReader<CharacterCueMessage>,
  players: Query<&VisualPosition, With<Player>>,
  config: Res<ConfigLoaded>,
  time: Res<Time>,
  mut dust_budget: Local<f32>,
) {
  let mut rng = rand::rng();
  let feet_offset = config
    .player
    .locomotion
    .ground_check_anchor
    .map(|[x, y]| Vec2::new(x, y))
    .unwrap_or_default();
  let run_speed = config.player.locomotion.run_speed;
  let mut running = false;

  for message in cues.read() {
    let Ok(visual_pos) = players.get(message.entity) else {
      continue;
    };
    let feet = visual_pos.0.truncate() + feet_offset;
    match message.cue {
      CharacterCue::BurstJump => spawn_burst(&mut commands, &mut rng, feet, ParticleBurst::JUMP),
      CharacterCue::BurstFall => spawn_burst(&mut commands, &mut rng, feet, ParticleBurst::FALL),
      CharacterCue::BurstDrown => {
        spawn_burst(&mut commands, &mut rng, visual_pos.0.truncate(), ParticleBurst::DROWN)
      }
      CharacterCue::ScatterBodyParts(at) => {
        spawn_burst(&mut commands, &mut rng, at, ParticleBurst::BODY_PARTS)
      }
      CharacterCue::Run(speed) if speed.abs() >= DUST_SPEED && !running => {
        running = true;
        *dust_budget += DUST_RATE * (speed.abs() / run_speed) * time.delta_secs();
        while *dust_budget >= 1.0 {
          *dust_budget -= 1.0;
          spawn_burst(&mut commands, &mut rng, feet, ParticleBurst::DUST);
        }
      }
      _ => {}
    }
  }
}

pub fn update_particles(
  mut commands: Commands,
  time: Res<Time>,
  mut particles: Query<(Entity, &mut Particle, &mut Transform, &mut Sprite)>,
) {
  let dt = time.delta_secs();
  for (entity, mut particle, mut transform, mut sprite) in &mut particles {
    particle.age += dt;
    if particle.age >= particle.lifetime {
      commands.entity(entity).despawn();
      continue;
    }
    particle.velocity.y -= particle.gravity * dt;
    transform.translation += (particle.velocity * dt).extend(0.0);

    let remaining = 1.0 - particle.age / particle.lifetime;
    let alpha = sprite.color.alpha();
    sprite.color.set_alpha(alpha.min(remaining));
  }
}
