//! Developer console: teleport, kill, trail toggle and checkpoint inspection.

pub mod commands;
mod toggle;

use bevy::prelude::*;
use bevy_console::{AddConsoleCommand, ConsoleConfiguration, ConsolePlugin};
use bevy_egui::EguiPlugin;
use commands::{
  CheckpointCommand, KillCommand, TpCommand, TrailCommand, checkpoint_command, kill_command,
  tp_command, trail_command,
};

pub struct ConsolePlugins;

impl Plugin for ConsolePlugins {
  fn build(&self, app: &mut App) {
    if !app.is_plugin_added::<EguiPlugin>() {
      app.add_plugins(EguiPlugin::default());
    }

    app
      .add_plugins(ConsolePlugin)
      .insert_resource(ConsoleConfiguration {
        // Disable default toggle keys, we use custom `/` handling
        keys: vec![],
        ..default()
      })
      .add_console_command::<TpCommand, _>(tp_command)
      .add_console_command::<KillCommand, _>(kill_command)
      .add_console_command::<CheckpointCommand, _>(checkpoint_command)
      .add_console_command::<TrailCommand, _>(trail_command)
      .add_systems(Update, toggle::handle_console_toggle);
  }
}
