//! Narrow interfaces to the collaborators the session drives but does not own.

use std::io;

use thiserror::Error;

/// Sound cues emitted by the session.
pub trait AudioSink {
    /// Weapon discharge.
    fn play_shoot(&mut self) -> Result<(), AudioError>;

    /// An enemy struck the player.
    fn play_hit(&mut self) -> Result<(), AudioError>;

    /// A health pack was collected.
    fn play_pickup(&mut self) -> Result<(), AudioError>;

    /// Starts or stops the background music loop.
    fn set_music(&mut self, playing: bool) -> Result<(), AudioError>;
}

/// Storage for the best score across sessions.
pub trait HighScoreStore {
    /// Reads the persisted high score; an absent record reads as zero.
    fn load(&mut self) -> Result<u32, PersistenceError>;

    /// Persists a new high score.
    fn save(&mut self, high_score: u32) -> Result<(), PersistenceError>;
}

/// Failure raised by an audio backend.
#[derive(Debug, Error)]
pub enum AudioError {
    /// No output device could be opened.
    #[error("audio device unavailable: {0}")]
    Unavailable(String),
    /// A cue could not be played.
    #[error("failed to play {cue}: {reason}")]
    Playback {
        /// Name of the cue.
        cue: &'static str,
        /// Backend-provided description.
        reason: String,
    },
}

/// Failure raised by a high-score store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing medium could not be read or written.
    #[error("high score storage is not accessible")]
    Io(#[from] io::Error),
    /// The stored record could not be decoded.
    #[error("high score record is corrupt: {0}")]
    Corrupt(String),
    /// The record could not be encoded.
    #[error("high score record could not be encoded: {0}")]
    Encode(String),
}

/// Audio sink that discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl AudioSink for Silence {
    fn play_shoot(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play_hit(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play_pickup(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn set_music(&mut self, _playing: bool) -> Result<(), AudioError> {
        Ok(())
    }
}

/// High-score store that keeps the record in memory only.
#[derive(Clone, Copy, Debug, Default)]
pub struct InMemoryHighScore {
    value: u32,
}

impl InMemoryHighScore {
    /// Creates a store seeded with `value`.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self { value }
    }

    /// Last value saved or seeded.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }
}

impl HighScoreStore for InMemoryHighScore {
    fn load(&mut self) -> Result<u32, PersistenceError> {
        Ok(self.value)
    }

    fn save(&mut self, high_score: u32) -> Result<(), PersistenceError> {
        self.value = high_score;
        Ok(())
    }
}
