//! Character locomotion core.
//!
//! Engine-agnostic apart from Bevy's math and component derives: every
//! operation takes the body snapshot and side-effect ports explicitly, and
//! time is always injected, so the whole state machine runs in plain tests.

pub mod body;
pub mod death;
pub mod mover;
pub mod ports;
pub mod sensor;
pub mod state_machine;
pub mod teleport;

#[cfg(test)]
mod tests;

pub use body::{MotionBody, SurfaceMaterial};
pub use death::{DeathSequence, DeathType};
pub use mover::{CharacterMover, MoverContext, TeleportCompletion};
pub use ports::{CharacterCue, CharacterCues, CharacterPorts, CheckpointProvider, PlayerSound};
pub use sensor::{GroundContacts, GroundSensor};
pub use state_machine::{StateMachine, Transition};
pub use teleport::{TeleportCommand, TeleportEvent, TeleportQueue};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LocomotionState {
  Grounded,
  Coyoting,
  #[default]
  Airing,
  Jumping,
  Impulsing,
}

impl LocomotionState {
  pub const ALL: [LocomotionState; 5] = [
    LocomotionState::Grounded,
    LocomotionState::Coyoting,
    LocomotionState::Airing,
    LocomotionState::Jumping,
    LocomotionState::Impulsing,
  ];
}
