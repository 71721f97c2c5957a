//! Audio sink that reports cues through the log instead of a sound device.

use gloom_session::{AudioError, AudioSink};
use tracing::{debug, info};

/// Logs every cue; keeps track of whether the music loop would be running.
#[derive(Debug, Default)]
pub(crate) struct TracingAudio {
    music_playing: bool,
}

impl TracingAudio {
    #[cfg(test)]
    pub(crate) fn music_playing(&self) -> bool {
        self.music_playing
    }
}

impl AudioSink for TracingAudio {
    fn play_shoot(&mut self) -> Result<(), AudioError> {
        debug!(cue = "shoot", "audio cue");
        Ok(())
    }

    fn play_hit(&mut self) -> Result<(), AudioError> {
        debug!(cue = "hit", "audio cue");
        Ok(())
    }

    fn play_pickup(&mut self) -> Result<(), AudioError> {
        debug!(cue = "pickup", "audio cue");
        Ok(())
    }

    fn set_music(&mut self, playing: bool) -> Result<(), AudioError> {
        if self.music_playing != playing {
            info!(playing, "music loop toggled");
            self.music_playing = playing;
        }
        Ok(())
    }
}
