//! Sequential teleport runner.
//!
//! Commands run strictly one at a time in FIFO order. Each command waits
//! `duration` seconds (time is injected through [`TeleportQueue::advance`]),
//! then reports arrival together with its completion payload. The owner
//! interprets the payload, so completions can touch the owner's state without
//! the queue holding references to it.

use std::collections::VecDeque;

use bevy::log::debug;
use bevy::prelude::*;

/// Seconds a teleport takes unless stated otherwise.
pub const DEFAULT_TELEPORT_SECONDS: f32 = 0.5;

const ARRIVAL_EPSILON: f32 = 1e-4;

#[derive(Clone, Debug, PartialEq)]
pub struct TeleportCommand<C> {
  pub target: Vec2,
  pub completion: Option<C>,
  /// Keep the character visible while the command runs.
  pub show_while_teleporting: bool,
  pub duration: f32,
}

impl<C> TeleportCommand<C> {
  pub fn new(target: Vec2) -> Self {
    Self {
      target,
      completion: None,
      show_while_teleporting: false,
      duration: DEFAULT_TELEPORT_SECONDS,
    }
  }

  pub fn with_completion(mut self, completion: C) -> Self {
    self.completion = Some(completion);
    self
  }

  pub fn shown(mut self, show: bool) -> Self {
    self.show_while_teleporting = show;
    self
  }

  pub fn lasting(mut self, seconds: f32) -> Self {
    self.duration = seconds.max(0.0);
    self
  }
}

/// Progress reported by [`TeleportQueue::advance`], in order of occurrence.
#[derive(Clone, Debug, PartialEq)]
pub enum TeleportEvent<C> {
  Started {
    target: Vec2,
    show: bool,
  },
  Arrived {
    target: Vec2,
    show: bool,
    completion: Option<C>,
  },
}

#[derive(Debug)]
struct ActiveTeleport<C> {
  command: TeleportCommand<C>,
  elapsed: f32,
}

#[derive(Debug)]
pub struct TeleportQueue<C> {
  queued: VecDeque<TeleportCommand<C>>,
  active: Option<ActiveTeleport<C>>,
}

impl<C> Default for TeleportQueue<C> {
  fn default() -> Self {
    Self {
      queued: VecDeque::new(),
      active: None,
    }
  }
}

impl<C> TeleportQueue<C> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_command(&mut self, command: TeleportCommand<C>) {
    self.queued.push_back(command);
  }

  /// True when nothing is running or waiting.
  pub fn is_idle(&self) -> bool {
    self.active.is_none() && self.queued.is_empty()
  }

  /// Commands not yet finished, including the running one.
  pub fn len(&self) -> usize {
    self.queued.len() + usize::from(self.active.is_some())
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn active(&self) -> Option<&TeleportCommand<C>> {
    self.active.as_ref().map(|active| &active.command)
  }

  /// Advances the running command by `dt` seconds.
  ///
  /// Starts the next queued command if idle. A finished command is followed
  /// immediately by the start of the next one; the new command begins its
  /// wait on the following call.
  pub fn advance(&mut self, dt: f32) -> Vec<TeleportEvent<C>> {
    let mut events = Vec::new();
    if self.active.is_none() {
      self.start_next(&mut events);
    }

    let Some(active) = self.active.as_mut() else {
      return events;
    };
    active.elapsed += dt;
    if active.elapsed + ARRIVAL_EPSILON < active.command.duration {
      return events;
    }

    if let Some(finished) = self.active.take() {
      let command = finished.command;
      debug!("Teleport arrived at {:?}", command.target);
      events.push(TeleportEvent::Arrived {
        target: command.target,
        show: command.show_while_teleporting,
        completion: command.completion,
      });
    }
    self.start_next(&mut events);
    events
  }

  fn start_next(&mut self, events: &mut Vec<TeleportEvent<C>>) {
    let Some(command) = self.queued.pop_front() else {
      return;
    };
    debug!(
      "Teleport started towards {:?} ({:.2}s, shown: {})",
      command.target, command.duration, command.show_while_teleporting
    );
    events.push(TeleportEvent::Started {
      target: command.target,
      show: command.show_while_teleporting,
    });
    self.active = Some(ActiveTeleport {
      command,
      elapsed: 0.0,
    });
  }
}
