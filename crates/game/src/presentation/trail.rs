use std::collections::VecDeque;

use bevy::prelude::*;

use super::CharacterCueMessage;
use crate::character::CharacterCue;
use crate::config::ConfigLoaded;
use crate::player::components::{Player, VisualPosition};

const MIN_SPACING: f32 = 4.0;

/// Recent visual positions, drawn as a fading line while emitting.
#[derive(Component, Debug)]
pub struct Trail {
  points: VecDeque<Vec2>,
  capacity: usize,
  emitting: bool,
}

impl Trail {
  pub fn new(capacity: usize) -> Self {
    Self {
      points: VecDeque::with_capacity(capacity),
      capacity,
      emitting: true,
    }
  }

  pub fn is_emitting(&self) -> bool {
    self.emitting
  }

  pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
    self.points.iter().copied()
  }

  /// Stopping drops the recorded points so a respawn does not draw a line
  /// back to the death position.
  pub fn set_emitting(&mut self, emitting: bool) {
    self.emitting = emitting;
    if !emitting {
      self.points.clear();
    }
  }

  pub fn record(&mut self, point: Vec2) {
    if !self.emitting {
      return;
    }
    if self
      .points
      .back()
      .is_some_and(|last| last.distance(point) < MIN_SPACING)
    {
      return;
    }
    self.points.push_back(point);
    while self.points.len() > self.capacity {
      self.points.pop_front();
    }
  }
}

pub fn attach_trail(
  mut commands: Commands,
  players: Query<Entity, (With<Player>, Without<Trail>)>,
  config: Res<ConfigLoaded>,
) {
  for entity in &players {
    commands
      .entity(entity)
      .insert(Trail::new(config.player.trail_length));
  }
}

pub fn switch_trail(
  mut cues: MessageReader<CharacterCueMessage>,
  mut trails: Query<&mut Trail>,
) {
  for message in cues.read() {
    let CharacterCue::Trail(emitting) = message.cue else {
      continue;
    };
    if let Ok(mut trail) = trails.get_mut(message.entity) {
      trail.set_emitting(emitting);
    }
  }
}

pub fn record_trail(mut players: Query<(&VisualPosition, &mut Trail), With<Player>>) {
  for (visual_pos, mut trail) in &mut players {
    trail.record(visual_pos.0.truncate());
  }
}

pub fn draw_trail(mut gizmos: Gizmos, trails: Query<&Trail>) {
  for trail in &trails {
    let count = trail.points.len();
    if count < 2 {
      continue;
    }
    gizmos.linestrip_gradient_2d(trail.points().enumerate().map(|(i, point)| {
      let alpha = (i + 1) as f32 / count as f32;
      (point, Color::srgba(1.0, 0.9, 0.6, alpha * 0.8))
    }));
  }
}
