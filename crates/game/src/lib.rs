//! Springfall: a physics-driven 2D platformer character.
//!
//! [`character`] holds the engine-independent locomotion core; the remaining
//! modules wire it into Bevy and rapier.

pub mod character;
pub mod config;
pub mod console;
pub mod core;
pub mod input;
pub mod level;
pub mod player;
pub mod presentation;
pub mod visual_debug;
