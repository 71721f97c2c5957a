//! High score persisted as a small TOML document.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use gloom_session::{HighScoreStore, PersistenceError};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// Stores the high score in a TOML file; a missing file reads as zero.
#[derive(Clone, Debug)]
pub(crate) struct TomlHighScoreStore {
    path: PathBuf,
}

impl TomlHighScoreStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for TomlHighScoreStore {
    fn load(&mut self) -> Result<u32, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no high score recorded yet");
                return Ok(0);
            }
            Err(error) => return Err(error.into()),
        };

        let record: HighScoreRecord = toml::from_str(&contents)
            .map_err(|error| PersistenceError::Corrupt(error.to_string()))?;
        Ok(record.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<(), PersistenceError> {
        let contents = toml::to_string(&HighScoreRecord { high_score })
            .map_err(|error| PersistenceError::Encode(error.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), high_score, "high score saved");
        Ok(())
    }
}
