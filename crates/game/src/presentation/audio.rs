use bevy::prelude::*;
use rand::Rng;

use super::CharacterCueMessage;
use crate::character::{CharacterCue, PlayerSound};
use crate::config::ConfigLoaded;

/// Loaded clip per [`PlayerSound`].
#[derive(Resource)]
pub struct PlayerSounds {
  jump: Handle<AudioSource>,
  grounded: Handle<AudioSource>,
  ground_hit: Handle<AudioSource>,
  drown: Handle<AudioSource>,
  death: Handle<AudioSource>,
  scream: Handle<AudioSource>,
  pitch_range: [f32; 2],
}

impl PlayerSounds {
  fn clip(&self, sound: PlayerSound) -> Handle<AudioSource> {
    match sound {
      PlayerSound::Jump => self.jump.clone(),
      PlayerSound::Grounded => self.grounded.clone(),
      PlayerSound::GroundHit => self.ground_hit.clone(),
      PlayerSound::Drown => self.drown.clone(),
      PlayerSound::Death => self.death.clone(),
      PlayerSound::Scream => self.scream.clone(),
    }
  }
}

pub fn load_player_sounds(
  mut commands: Commands,
  asset_server: Res<AssetServer>,
  config: Res<ConfigLoaded>,
) {
  let audio = &config.audio;
  commands.insert_resource(PlayerSounds {
    jump: asset_server.load(&audio.jump),
    grounded: asset_server.load(&audio.grounded),
    ground_hit: asset_server.load(&audio.ground_hit),
    drown: asset_server.load(&audio.drown),
    death: asset_server.load(&audio.death),
    scream: asset_server.load(&audio.scream),
    pitch_range: audio.pitch_range,
  });
}

/// Plays each requested sound once, at a random pitch within the configured range.
pub fn play_cue_sounds(
  mut commands: Commands,
  mut cues: MessageReader<CharacterCueMessage>,
  sounds: Option<Res<PlayerSounds>>,
) {
  let Some(sounds) = sounds else {
    cues.clear();
    return;
  };

  let mut rng = rand::rng();
  let [low, high] = sounds.pitch_range;
  for message in cues.read() {
    let CharacterCue::Sound(sound) = message.cue else {
      continue;
    };
    let speed = if high > low {
      rng.random_range(low..=high)
    } else {
      low
    };
    commands.spawn((
      AudioPlayer::new(sounds.clip(sound)),
      PlaybackSettings::DESPAWN.with_speed(speed),
    ));
  }
}
