use bevy::{
  prelude::*,
  window::{PresentMode, WindowResolution},
};
use springfall::config::ConfigLoaded;
use springfall::{config, console, core, input, level, player, presentation, visual_debug};

fn main() {
  // WASM: set up panic hook for better error messages
  #[cfg(target_family = "wasm")]
  console_error_panic_hook::set_once();

  let mut app = App::new();

  app.insert_resource(Time::<Fixed>::from_hz(60.0));

  // Loads and validates the config; aborts on a bad file
  app.add_plugins(config::ConfigPlugin);
  let window = app.world().resource::<ConfigLoaded>().window.clone();

  app
    .add_plugins(
      DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
          resolution: WindowResolution::new(window.width, window.height),
          title: window.title,
          // WASM: only Fifo (vsync) is supported on WebGL2
          #[cfg(target_family = "wasm")]
          present_mode: PresentMode::Fifo,
          #[cfg(not(target_family = "wasm"))]
          present_mode: PresentMode::AutoVsync,
          #[cfg(target_family = "wasm")]
          canvas: Some("#bevy".to_string()),
          #[cfg(target_family = "wasm")]
          fit_canvas_to_parent: true,
          ..default()
        }),
        ..default()
      }),
    )
    .add_plugins(core::CorePlugin)
    .add_plugins(input::InputPlugin)
    .add_plugins(player::PlayerPlugin)
    .add_plugins(level::LevelPlugin)
    .add_plugins(presentation::PresentationPlugin)
    .add_plugins(console::ConsolePlugins)
    .add_plugins(visual_debug::VisualDebugPlugin);

  app.run();
}
