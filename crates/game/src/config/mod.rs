mod plugin;

use std::fmt;

use bevy::prelude::*;
pub use plugin::ConfigPlugin;
use serde::{Deserialize, Deserializer, de};

use crate::character::DeathType;

/// Path of the game config, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/config/game.config.toml";

#[derive(Deserialize, Debug, Clone)]
pub struct GameConfig {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub physics: PhysicsConfig,
  pub player: PlayerConfig,
  pub audio: AudioConfig,
  pub level: LevelConfig,
}

impl GameConfig {
  /// Parses and validates a config document.
  pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
    let config: GameConfig = toml::from_str(source).map_err(ConfigError::Parse)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    positive("physics.gravity", self.physics.gravity)?;
    positive("physics.length_unit", self.physics.length_unit)?;
    positive("player.collider_radius", self.player.collider_radius)?;
    non_negative("player.collider_length", self.player.collider_length)?;
    positive("player.mass", self.player.mass)?;
    non_negative("player.air_friction", self.player.air_friction)?;
    non_negative("player.ground_friction", self.player.ground_friction)?;
    positive("level.spring_force", self.level.spring_force)?;
    let [low, high] = self.audio.pitch_range;
    positive("audio.pitch_range[0]", low)?;
    if high < low {
      return Err(ConfigError::InvertedRange {
        field: "audio.pitch_range",
        low,
        high,
      });
    }
    self.player.locomotion.validate()
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
  pub width: u32,
  pub height: u32,
  pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CameraConfig {
  pub viewport_width: f32,
  pub viewport_height: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PhysicsConfig {
  /// Downward acceleration in pixels per second squared.
  pub gravity: f32,
  /// Pixels per physics meter.
  pub length_unit: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlayerConfig {
  pub spawn_x: f32,
  pub spawn_y: f32,
  pub collider_radius: f32,
  pub collider_length: f32,
  pub mass: f32,
  pub air_friction: f32,
  pub ground_friction: f32,
  pub sprite_size: [f32; 2],
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub color: [f32; 3],
  /// Trail points kept while emitting.
  #[serde(default = "default_trail_length")]
  pub trail_length: usize,
  pub locomotion: LocomotionConfig,
}

fn default_trail_length() -> usize {
  24
}

/// Designer-tunable locomotion values. Validated once at startup.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LocomotionConfig {
  /// Seconds the player may still jump after leaving the ground.
  pub coyote_time: f32,
  /// Horizontal speed at full input.
  pub run_speed: f32,
  pub ground_check_radius: f32,
  /// Probe centre relative to the body origin. Required.
  pub ground_check_anchor: Option<[f32; 2]>,
  /// Collision-group bits treated as ground.
  pub ground_mask: u32,
  /// Impulse applied by a full-strength jump.
  pub jump_force: f32,
  /// Seconds before a jump may land back into Grounded.
  pub jump_time: f32,
  pub upward_gravity_scale: f32,
  pub downward_gravity_scale: f32,
  /// Fall distance that kills on landing.
  pub fall_death: f32,
  /// Seconds the death pose is held before respawning.
  #[serde(default = "default_death_time")]
  pub death_time: f32,
}

fn default_death_time() -> f32 {
  1.0
}

impl Default for LocomotionConfig {
  fn default() -> Self {
    Self {
      coyote_time: 0.1,
      run_speed: 400.0,
      ground_check_radius: 6.0,
      ground_check_anchor: Some([0.0, -26.0]),
      ground_mask: 0b0001,
      jump_force: 660.0,
      jump_time: 0.1,
      upward_gravity_scale: 3.0,
      downward_gravity_scale: 9.0,
      fall_death: 250.0,
      death_time: 1.0,
    }
  }
}

impl LocomotionConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.ground_check_anchor.is_none() {
      return Err(ConfigError::MissingGroundAnchor);
    }
    if self.ground_mask == 0 {
      return Err(ConfigError::EmptyGroundMask);
    }
    non_negative("locomotion.coyote_time", self.coyote_time)?;
    positive("locomotion.run_speed", self.run_speed)?;
    positive("locomotion.ground_check_radius", self.ground_check_radius)?;
    positive("locomotion.jump_force", self.jump_force)?;
    non_negative("locomotion.jump_time", self.jump_time)?;
    non_negative("locomotion.upward_gravity_scale", self.upward_gravity_scale)?;
    non_negative(
      "locomotion.downward_gravity_scale",
      self.downward_gravity_scale,
    )?;
    positive("locomotion.fall_death", self.fall_death)?;
    non_negative("locomotion.death_time", self.death_time)
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AudioConfig {
  pub jump: String,
  pub grounded: String,
  pub ground_hit: String,
  pub drown: String,
  pub death: String,
  pub scream: String,
  /// Random playback speed range applied per sound.
  pub pitch_range: [f32; 2],
}

#[derive(Deserialize, Debug, Clone)]
pub struct LevelConfig {
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub platform_color: [f32; 3],
  pub platforms: Vec<RectConfig>,
  #[serde(default)]
  pub checkpoints: Vec<CheckpointConfig>,
  #[serde(default)]
  pub springs: Vec<SpringConfig>,
  #[serde(default)]
  pub hazards: Vec<HazardConfig>,
  /// Impulse of a strength-1 spring.
  pub spring_force: f32,
}

/// Axis-aligned box given by its centre and full size.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct RectConfig {
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
}

impl RectConfig {
  pub fn center(&self) -> Vec2 {
    Vec2::new(self.x, self.y)
  }

  pub fn size(&self) -> Vec2 {
    Vec2::new(self.width, self.height)
  }
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct CheckpointConfig {
  pub x: f32,
  pub y: f32,
  /// Respawn position relative to the checkpoint.
  #[serde(default)]
  pub spawn_offset: [f32; 2],
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct SpringConfig {
  pub x: f32,
  pub y: f32,
  /// Multiplier on `level.spring_force`.
  pub strength: f32,
  #[serde(default = "default_spring_direction")]
  pub direction: [f32; 2],
}

fn default_spring_direction() -> [f32; 2] {
  [0.0, 1.0]
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct HazardConfig {
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
  pub death: DeathType,
}

impl HazardConfig {
  pub fn area(&self) -> RectConfig {
    RectConfig {
      x: self.x,
      y: self.y,
      width: self.width,
      height: self.height,
    }
  }
}

fn deserialize_hex_color<'de, D>(deserializer: D) -> Result<[f32; 3], D::Error>
where
  D: Deserializer<'de>,
{
  let s: String = Deserialize::deserialize(deserializer)?;
  let s = s.trim_start_matches('#');
  if !s.is_ascii() || s.len() != 6 {
    return Err(de::Error::custom("hex color must be 6 hex digits"));
  }
  let r = u8::from_str_radix(&s[0..2], 16).map_err(de::Error::custom)?;
  let g = u8::from_str_radix(&s[2..4], 16).map_err(de::Error::custom)?;
  let b = u8::from_str_radix(&s[4..6], 16).map_err(de::Error::custom)?;
  Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
  if value > 0.0 && value.is_finite() {
    Ok(())
  } else {
    Err(ConfigError::NonPositive { field, value })
  }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
  if value >= 0.0 && value.is_finite() {
    Ok(())
  } else {
    Err(ConfigError::Negative { field, value })
  }
}

/// Config loading and validation errors.
#[derive(Debug)]
pub enum ConfigError {
  Io(std::io::Error),
  Parse(toml::de::Error),
  MissingGroundAnchor,
  EmptyGroundMask,
  NonPositive {
    field: &'static str,
    value: f32,
  },
  Negative {
    field: &'static str,
    value: f32,
  },
  InvertedRange {
    field: &'static str,
    low: f32,
    high: f32,
  },
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Io(e) => write!(f, "failed to read config: {}", e),
      Self::Parse(e) => write!(f, "failed to parse config: {}", e),
      Self::MissingGroundAnchor => write!(f, "ground check anchor is not set"),
      Self::EmptyGroundMask => write!(f, "ground mask selects no collision groups"),
      Self::NonPositive { field, value } => {
        write!(f, "{} must be positive, got {}", field, value)
      }
      Self::Negative { field, value } => {
        write!(f, "{} must not be negative, got {}", field, value)
      }
      Self::InvertedRange { field, low, high } => {
        write!(f, "{} is inverted: [{}, {}]", field, low, high)
      }
    }
  }
}

impl std::error::Error for ConfigError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io(e) => Some(e),
      Self::Parse(e) => Some(e),
      _ => None,
    }
  }
}

/// The validated config, inserted while the app is built.
#[derive(Resource, Debug, Clone)]
pub struct ConfigLoaded {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub physics: PhysicsConfig,
  pub player: PlayerConfig,
  pub audio: AudioConfig,
  pub level: LevelConfig,
}

impl From<GameConfig> for ConfigLoaded {
  fn from(config: GameConfig) -> Self {
    Self {
      window: config.window,
      camera: config.camera,
      physics: config.physics,
      player: config.player,
      audio: config.audio,
      level: config.level,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SHIPPED: &str = include_str!("../../assets/config/game.config.toml");

  #[test]
  fn shipped_config_is_valid() {
    let config = GameConfig::from_toml_str(SHIPPED).unwrap();
    assert!(!config.level.platforms.is_empty());
    assert!(!config.level.checkpoints.is_empty());
    assert!(config.player.locomotion.ground_check_anchor.is_some());
  }

  #[test]
  fn shipped_hazards_cover_every_environmental_death() {
    let config = GameConfig::from_toml_str(SHIPPED).unwrap();
    for death in [DeathType::Abism, DeathType::Drown, DeathType::Spikes] {
      assert!(
        config.level.hazards.iter().any(|h| h.death == death),
        "no {death} hazard in shipped level"
      );
    }
  }

  #[test]
  fn missing_anchor_is_rejected() {
    let source = SHIPPED.replace("ground_check_anchor", "# ground_check_anchor");
    assert!(matches!(
      GameConfig::from_toml_str(&source),
      Err(ConfigError::MissingGroundAnchor)
    ));
  }

  #[test]
  fn negative_values_name_the_field() {
    let config = LocomotionConfig {
      coyote_time: -0.5,
      ..LocomotionConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(
      err.to_string().contains("coyote_time"),
      "unexpected message: {err}"
    );
  }

  #[test]
  fn zero_fall_death_is_rejected() {
    let config = LocomotionConfig {
      fall_death: 0.0,
      ..LocomotionConfig::default()
    };
    assert!(matches!(
      config.validate(),
      Err(ConfigError::NonPositive {
        field: "locomotion.fall_death",
        ..
      })
    ));
  }

  #[test]
  fn garbage_fails_to_parse() {
    assert!(matches!(
      GameConfig::from_toml_str("window = 3"),
      Err(ConfigError::Parse(_))
    ));
  }

  #[derive(Deserialize, Debug)]
  struct Swatch {
    #[serde(deserialize_with = "deserialize_hex_color")]
    color: [f32; 3],
  }

  #[test]
  fn hex_colors_are_decoded() {
    let swatch: Swatch = toml::from_str("color = \"#ff0000\"").unwrap();
    assert_eq!(swatch.color, [1.0, 0.0, 0.0]);
  }

  #[test]
  fn non_ascii_hex_color_is_an_error() {
    // Six bytes, but not six characters
    let err = toml::from_str::<Swatch>("color = \"aéé!\"").unwrap_err();
    assert!(
      err.to_string().contains("hex color"),
      "unexpected message: {err}"
    );
  }
}
