//! `/` toggles the console, Escape closes it.

use bevy::ecs::message::MessageWriter;
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;
use bevy_console::ConsoleOpen;
use bevy_egui::{EguiContexts, egui};

/// Forwards `/` and Escape to bevy_console's own toggle (a synthetic F12),
/// consuming the key so it is not typed into the input line.
pub fn handle_console_toggle(
  keys: Res<ButtonInput<KeyCode>>,
  console_open: Res<ConsoleOpen>,
  mut contexts: EguiContexts,
  mut keyboard_events: MessageWriter<KeyboardInput>,
) {
  let close = keys.just_pressed(KeyCode::Escape) && console_open.open;
  let toggle = keys.just_pressed(KeyCode::Slash);
  if !close && !toggle {
    return;
  }

  if console_open.open {
    let key = if close {
      egui::Key::Escape
    } else {
      egui::Key::Slash
    };
    if let Ok(ctx) = contexts.ctx_mut() {
      ctx.input_mut(|i| {
        i.consume_key(egui::Modifiers::NONE, key);
      });
    }
  }

  keyboard_events.write(KeyboardInput {
    key_code: KeyCode::F12,
    logical_key: Key::F12,
    state: ButtonState::Pressed,
    text: None,
    repeat: false,
    window: Entity::PLACEHOLDER,
  });
}
