use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::actions::{Jump, Move, PlayerInput, Respawn};

pub fn player_input_actions() -> impl Bundle {
  actions!(PlayerInput[
      (
          Action::<Move>::new(),
          Bindings::spawn((
              Bidirectional::ad_keys(),
              Bidirectional::left_right_arrow(),
          )),
      ),
      (
          Action::<Jump>::new(),
          bindings![KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp],
      ),
      (
          Action::<Respawn>::new(),
          bindings![KeyCode::KeyR],
      ),
  ])
}
