//! Loads custom arenas from TOML documents.
//!
//! ```toml
//! layout = [
//!     "11111",
//!     "10001",
//!     "11111",
//! ]
//! player = { x = 1.5, y = 1.5 }
//! enemies = [{ x = 3.5, y = 1.5 }]
//! pickups = []
//! ```

use std::{fs, path::Path};

use gloom_core::Position;
use gloom_world::{LayoutError, Level, TileMap};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelDocument {
    layout: Vec<String>,
    player: Position,
    #[serde(default)]
    enemies: Vec<Position>,
    #[serde(default)]
    pickups: Vec<Position>,
}

/// Errors raised while reading a level document.
#[derive(Debug, Error)]
pub(crate) enum LevelFileError {
    /// The file could not be read.
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid TOML or misses required keys.
    #[error("malformed level document: {0}")]
    Malformed(#[from] toml::de::Error),
    /// A layout row contains something other than a digit.
    #[error("row {row}, column {column}: expected a tile digit, found {found:?}")]
    NotADigit {
        /// Row of the offending character.
        row: usize,
        /// Column of the offending character.
        column: usize,
        /// Offending character.
        found: char,
    },
    /// The layout or spawn points were rejected.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Reads and validates the level stored at `path`.
pub(crate) fn load(path: &Path) -> Result<Level, LevelFileError> {
    let contents = fs::read_to_string(path)?;
    parse(&contents)
}

/// Parses a level document held in memory.
pub(crate) fn parse(contents: &str) -> Result<Level, LevelFileError> {
    let document: LevelDocument = toml::from_str(contents)?;

    let mut rows = Vec::with_capacity(document.layout.len());
    for (row, line) in document.layout.iter().enumerate() {
        let codes = line
            .chars()
            .enumerate()
            .map(|(column, found)| {
                found
                    .to_digit(10)
                    .and_then(|digit| u8::try_from(digit).ok())
                    .ok_or(LevelFileError::NotADigit { row, column, found })
            })
            .collect::<Result<Vec<u8>, _>>()?;
        rows.push(codes);
    }

    let map = TileMap::from_rows(&rows)?;
    let level = Level::new(map, document.player, document.enemies, document.pickups)?;
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_ROOM: &str = r#"
layout = [
    "11111",
    "10201",
    "10001",
    "11111",
]
player = { x = 1.5, y = 1.5 }
enemies = [{ x = 3.5, y = 2.5 }]
pickups = [{ x = 1.5, y = 2.5 }]
"#;

    fn room(layout: &str, x: f32, y: f32) -> String {
        format!("layout = {layout}\nplayer = {{ x = {x}, y = {y} }}\n")
    }

    #[test]
    fn parses_small_room() {
        let level = parse(SMALL_ROOM).expect("room is valid");

        assert_eq!(level.player_spawn(), Position::new(1.5, 1.5));
        assert_eq!(level.enemy_spawns(), &[Position::new(3.5, 2.5)]);
        assert_eq!(level.pickup_spawns(), &[Position::new(1.5, 2.5)]);
        assert!(!level.map().is_walkable(2.5, 1.5));
    }

    #[test]
    fn missing_rosters_default_to_empty() {
        let level = parse(&room(r#"["111", "101", "111"]"#, 1.5, 1.5)).expect("room is valid");

        assert!(level.enemy_spawns().is_empty());
        assert!(level.pickup_spawns().is_empty());
    }

    #[test]
    fn rejects_non_digit_cells() {
        let error = parse(&room(r#"["111", "1x1", "111"]"#, 1.5, 1.5))
            .expect_err("letters are not tiles");

        assert!(matches!(
            error,
            LevelFileError::NotADigit {
                row: 1,
                column: 1,
                found: 'x'
            }
        ));
    }

    #[test]
    fn rejects_spawn_inside_wall() {
        let error = parse(&room(r#"["111", "101", "111"]"#, 0.5, 0.5)).expect_err("spawn is solid");

        assert!(matches!(
            error,
            LevelFileError::Layout(LayoutError::BlockedSpawn { .. })
        ));
    }

    #[test]
    fn rejects_open_border() {
        let error = parse(&room(r#"["111", "100", "111"]"#, 1.5, 1.5))
            .expect_err("border must be solid");

        assert!(matches!(
            error,
            LevelFileError::Layout(LayoutError::OpenBorder { .. })
        ));
    }
}
