//! Generic state container with synchronous transition notifications.
//!
//! A transition is split into three steps so that an owner can run its own
//! exit/enter hooks around the commit:
//!
//! 1. [`StateMachine::begin`] opens the transition (or rejects/defers it).
//! 2. [`StateMachine::commit`] notifies listeners, then stores the new state.
//! 3. [`StateMachine::finish`] closes the transition and hands back any request
//!    that arrived while it was open.
//!
//! Owners without hooks use [`StateMachine::change_state`], which runs all
//! three steps and drains deferred requests.

use std::fmt;

use bevy::log::{debug, warn};

/// A single state change, `from` the previous state `to` the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<S> {
  pub from: S,
  pub to: S,
}

/// Callback invoked for every committed transition.
pub type StateListener<S> = Box<dyn FnMut(Transition<S>) + Send + Sync>;

pub struct StateMachine<S> {
  current: S,
  in_flight: Option<Transition<S>>,
  pending: Option<S>,
  listeners: Vec<StateListener<S>>,
}

impl<S: Copy + PartialEq + fmt::Debug> StateMachine<S> {
  pub fn new(initial: S) -> Self {
    Self {
      current: initial,
      in_flight: None,
      pending: None,
      listeners: Vec::new(),
    }
  }

  pub fn current(&self) -> S {
    self.current
  }

  /// Returns true if the current state is any of `candidates`.
  pub fn is_in_state(&self, candidates: &[S]) -> bool {
    candidates.contains(&self.current)
  }

  /// True between [`begin`](Self::begin) and [`finish`](Self::finish).
  pub fn is_transitioning(&self) -> bool {
    self.in_flight.is_some()
  }

  /// Registers a listener. Listeners run in registration order.
  pub fn subscribe(&mut self, listener: impl FnMut(Transition<S>) + Send + Sync + 'static) {
    self.listeners.push(Box::new(listener));
  }

  /// Opens a transition to `next`.
  ///
  /// Returns `None` when `next` equals the current state, or when another
  /// transition is already open. In the latter case the request is parked in
  /// the pending slot, unless it targets the state being committed or the slot
  /// is already taken.
  pub fn begin(&mut self, next: S) -> Option<Transition<S>> {
    if let Some(open) = self.in_flight {
      if next == open.to {
        debug!("Ignoring re-entrant transition to {:?} (already committing it)", next);
      } else if let Some(parked) = self.pending {
        warn!(
          "Rejecting re-entrant transition to {:?}: {:?} is already pending",
          next, parked
        );
      } else {
        debug!("Deferring re-entrant transition {:?} -> {:?}", open.to, next);
        self.pending = Some(next);
      }
      return None;
    }

    if next == self.current {
      return None;
    }

    let transition = Transition {
      from: self.current,
      to: next,
    };
    self.in_flight = Some(transition);
    Some(transition)
  }

  /// Publishes the open transition to every listener, then commits it.
  pub fn commit(&mut self) {
    let Some(transition) = self.in_flight else {
      return;
    };
    for listener in &mut self.listeners {
      listener(transition);
    }
    self.current = transition.to;
  }

  /// Closes the open transition, returning a deferred request if one arrived.
  pub fn finish(&mut self) -> Option<S> {
    self.in_flight = None;
    self.pending.take()
  }

  /// Changes state without owner hooks. No-op if `next` is the current state.
  /// Returns true if at least one transition was committed.
  pub fn change_state(&mut self, next: S) -> bool {
    let mut changed = false;
    let mut request = Some(next);
    while let Some(next) = request.take() {
      if self.begin(next).is_some() {
        self.commit();
        changed = true;
        request = self.finish();
      }
    }
    changed
  }
}

impl<S: fmt::Debug> fmt::Debug for StateMachine<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StateMachine")
      .field("current", &self.current)
      .field("in_flight", &self.in_flight)
      .field("pending", &self.pending)
      .field("listeners", &self.listeners.len())
      .finish()
  }
}
