//! Death causes and the effects that accompany each one.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::ports::{DeathAnimation, PlayerSound};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathType {
  /// Landed after falling past the fatal distance.
  Fall,
  /// Fell into a bottomless pit.
  Abism,
  Drown,
  Spikes,
  /// Player-requested restart from the last checkpoint.
  Reset,
}

/// Particle burst played alongside a death.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathBurst {
  Drown,
}

/// Presentation bundle for one death cause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeathSequence {
  pub sound: Option<PlayerSound>,
  pub animation: Option<DeathAnimation>,
  pub burst: Option<DeathBurst>,
  pub scatter_body_parts: bool,
}

impl DeathSequence {
  /// A death with an animation keeps the character visible at the death
  /// position while it plays.
  pub fn shows_body(&self) -> bool {
    self.animation.is_some()
  }
}

impl DeathType {
  pub const ALL: [DeathType; 5] = [
    DeathType::Fall,
    DeathType::Abism,
    DeathType::Drown,
    DeathType::Spikes,
    DeathType::Reset,
  ];

  pub fn sequence(self) -> DeathSequence {
    match self {
      DeathType::Fall => DeathSequence {
        animation: Some(DeathAnimation::Collapse),
        ..Default::default()
      },
      DeathType::Abism => DeathSequence {
        sound: Some(PlayerSound::Scream),
        ..Default::default()
      },
      DeathType::Drown => DeathSequence {
        sound: Some(PlayerSound::Drown),
        burst: Some(DeathBurst::Drown),
        ..Default::default()
      },
      DeathType::Spikes => DeathSequence {
        scatter_body_parts: true,
        ..Default::default()
      },
      DeathType::Reset => DeathSequence::default(),
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      DeathType::Fall => "fall",
      DeathType::Abism => "abism",
      DeathType::Drown => "drown",
      DeathType::Spikes => "spikes",
      DeathType::Reset => "reset",
    }
  }
}

impl fmt::Display for DeathType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Unknown death type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDeathType(pub String);

impl fmt::Display for UnknownDeathType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "unknown death type '{}' (expected fall, abism, drown, spikes or reset)",
      self.0
    )
  }
}

impl std::error::Error for UnknownDeathType {}

impl FromStr for DeathType {
  type Err = UnknownDeathType;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_lowercase();
    DeathType::ALL
      .into_iter()
      .find(|death| death.name() == wanted)
      .ok_or_else(|| UnknownDeathType(s.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_fall_has_a_death_animation() {
    for death in DeathType::ALL {
      assert_eq!(
        death.sequence().shows_body(),
        death == DeathType::Fall,
        "{death} animation mismatch"
      );
    }
  }

  #[test]
  fn drown_plays_sound_and_burst() {
    let sequence = DeathType::Drown.sequence();
    assert_eq!(sequence.sound, Some(PlayerSound::Drown));
    assert_eq!(sequence.burst, Some(DeathBurst::Drown));
    assert!(!sequence.scatter_body_parts);
  }

  #[test]
  fn abism_screams_and_spikes_scatter() {
    assert_eq!(DeathType::Abism.sequence().sound, Some(PlayerSound::Scream));
    assert!(DeathType::Spikes.sequence().scatter_body_parts);
    assert_eq!(DeathType::Reset.sequence(), DeathSequence::default());
  }

  #[test]
  fn parses_names_case_insensitively() {
    assert_eq!("Spikes".parse::<DeathType>(), Ok(DeathType::Spikes));
    assert_eq!(" reset ".parse::<DeathType>(), Ok(DeathType::Reset));
    assert!("lava".parse::<DeathType>().is_err());
  }
}
