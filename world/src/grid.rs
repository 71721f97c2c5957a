//! Static tile map that bounds the world and answers collision queries.

use gloom_core::TileKind;
use thiserror::Error;

/// Immutable grid of tiles addressed by column and row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
}

impl TileMap {
    /// Builds a tile map from rows of layout codes.
    ///
    /// Rows must share a length, every code must be `0`, `1` or `2`, and every
    /// border cell must be solid so that nothing can leave the grid.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, LayoutError>
    where
        R: AsRef<[u8]>,
    {
        let expected = rows.first().map_or(0, |row| row.as_ref().len());
        if expected == 0 {
            return Err(LayoutError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != expected {
                return Err(LayoutError::Ragged {
                    row: row_index,
                    expected,
                    found: row.len(),
                });
            }
            for (column_index, &code) in row.iter().enumerate() {
                let kind = TileKind::from_code(code).ok_or(LayoutError::UnknownCode {
                    code,
                    column: column_index,
                    row: row_index,
                })?;
                tiles.push(kind);
            }
        }

        let map = Self {
            columns: u32::try_from(expected).map_err(|_| LayoutError::TooLarge)?,
            rows: u32::try_from(rows.len()).map_err(|_| LayoutError::TooLarge)?,
            tiles,
        };
        map.check_border()?;
        Ok(map)
    }

    /// Builds a tile map from a compile-time layout without validation.
    ///
    /// Unknown codes decode as stone.
    pub(crate) fn from_static<const W: usize, const H: usize>(layout: &[[u8; W]; H]) -> Self {
        let tiles = layout
            .iter()
            .flat_map(|row| row.iter())
            .map(|&code| TileKind::from_code(code).unwrap_or(TileKind::Stone))
            .collect();
        Self {
            columns: W as u32,
            rows: H as u32,
            tiles,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the tile stored at the provided column and row.
    #[must_use]
    pub fn tile(&self, column: u32, row: u32) -> Option<TileKind> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let index = usize::try_from(row).ok()? * usize::try_from(self.columns).ok()?
            + usize::try_from(column).ok()?;
        self.tiles.get(index).copied()
    }

    /// Classifies the cell containing the continuous coordinate `(x, y)`.
    ///
    /// Returns `None` outside the grid; callers treat that as solid.
    #[must_use]
    pub fn cell_at(&self, x: f32, y: f32) -> Option<TileKind> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        self.tile(x.floor() as u32, y.floor() as u32)
    }

    /// Reports whether `(x, y)` lies inside the grid on an empty cell.
    #[must_use]
    pub fn is_walkable(&self, x: f32, y: f32) -> bool {
        matches!(self.cell_at(x, y), Some(TileKind::Empty))
    }

    fn check_border(&self) -> Result<(), LayoutError> {
        let last_column = self.columns.saturating_sub(1);
        let last_row = self.rows.saturating_sub(1);
        for row in 0..self.rows {
            for column in 0..self.columns {
                let on_border =
                    row == 0 || column == 0 || row == last_row || column == last_column;
                if on_border && !self.tile(column, row).map_or(true, TileKind::is_solid) {
                    return Err(LayoutError::OpenBorder { column, row });
                }
            }
        }
        Ok(())
    }
}

/// Reasons a layout may be rejected.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// The layout contains no cells.
    #[error("layout contains no cells")]
    Empty,
    /// The layout exceeds the addressable grid size.
    #[error("layout exceeds the addressable grid size")]
    TooLarge,
    /// A row's length differs from the first row.
    #[error("row {row} has {found} cells but the first row has {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A cell uses a code other than `0`, `1` or `2`.
    #[error("unknown tile code {code} at column {column}, row {row}")]
    UnknownCode {
        /// Offending code.
        code: u8,
        /// Column of the offending cell.
        column: usize,
        /// Row of the offending cell.
        row: usize,
    },
    /// A border cell is walkable.
    #[error("border cell at column {column}, row {row} is walkable")]
    OpenBorder {
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
    },
    /// A spawn point lies outside the walkable area.
    #[error("spawn point ({x}, {y}) is not walkable")]
    BlockedSpawn {
        /// Horizontal coordinate of the spawn.
        x: f32,
        /// Vertical coordinate of the spawn.
        y: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> TileMap {
        let rows: [[u8; 4]; 4] = [[1, 1, 1, 1], [1, 0, 2, 1], [1, 0, 0, 1], [1, 1, 1, 1]];
        TileMap::from_rows(&rows).expect("valid room")
    }

    #[test]
    fn cell_at_floors_continuous_coordinates() {
        let map = room();
        assert_eq!(map.cell_at(1.2, 1.9), Some(TileKind::Empty));
        assert_eq!(map.cell_at(2.99, 1.0), Some(TileKind::Brick));
        assert_eq!(map.cell_at(0.5, 0.5), Some(TileKind::Stone));
    }

    #[test]
    fn out_of_bounds_is_never_walkable() {
        let map = room();
        assert_eq!(map.cell_at(-0.1, 1.0), None);
        assert_eq!(map.cell_at(1.0, 4.0), None);
        assert_eq!(map.cell_at(f32::NAN, 1.0), None);
        assert!(!map.is_walkable(-0.1, 1.0));
        assert!(!map.is_walkable(17.0, 1.0));
    }

    #[test]
    fn walls_of_both_kinds_block() {
        let map = room();
        assert!(map.is_walkable(1.5, 1.5));
        assert!(!map.is_walkable(2.5, 1.5));
        assert!(!map.is_walkable(0.5, 1.5));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 1, 1], vec![1, 1]];
        assert_eq!(
            TileMap::from_rows(&rows),
            Err(LayoutError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let rows: [[u8; 3]; 3] = [[1, 1, 1], [1, 7, 1], [1, 1, 1]];
        let error = TileMap::from_rows(&rows).expect_err("code 7 is not a tile");
        assert_eq!(
            error,
            LayoutError::UnknownCode {
                code: 7,
                column: 1,
                row: 1
            }
        );
    }

    #[test]
    fn open_border_is_rejected() {
        let rows: [[u8; 3]; 3] = [[1, 1, 1], [0, 0, 1], [1, 1, 1]];
        let error = TileMap::from_rows(&rows).expect_err("walkable border");
        assert_eq!(error, LayoutError::OpenBorder { column: 0, row: 1 });
    }

    #[test]
    fn empty_layout_is_rejected() {
        let rows: Vec<Vec<u8>> = Vec::new();
        assert_eq!(TileMap::from_rows(&rows), Err(LayoutError::Empty));
    }
}
