//! Console commands.

mod checkpoint;
mod kill;
mod teleport;
mod trail;

pub use checkpoint::{CheckpointCommand, checkpoint_command};
pub use kill::{KillCommand, kill_command, parse_death};
pub use teleport::{TpCommand, tp_command};
pub use trail::{TrailCommand, parse_switch, trail_command};
