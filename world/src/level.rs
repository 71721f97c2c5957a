//! Level definitions: a tile map plus the spawn points of every entity.

use gloom_core::Position;

use crate::grid::{LayoutError, TileMap};

const CLASSIC_LAYOUT: [[u8; 16]; 16] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 1, 1, 0, 0, 0, 0, 1, 1, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 1, 1, 1, 0, 0, 0, 0, 1, 1, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const CLASSIC_PLAYER_SPAWN: Position = Position::new(2.0, 2.0);

const CLASSIC_ENEMY_SPAWNS: [Position; 3] = [
    Position::new(9.5, 9.5),
    Position::new(13.5, 3.5),
    Position::new(3.5, 13.5),
];

const CLASSIC_PICKUP_SPAWNS: [Position; 2] = [Position::new(4.5, 4.5), Position::new(10.5, 9.5)];

/// Tile map together with the spawn points used to populate a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    map: TileMap,
    player_spawn: Position,
    enemy_spawns: Vec<Position>,
    pickup_spawns: Vec<Position>,
}

impl Level {
    /// Creates a level after checking that every spawn point is walkable.
    pub fn new(
        map: TileMap,
        player_spawn: Position,
        enemy_spawns: Vec<Position>,
        pickup_spawns: Vec<Position>,
    ) -> Result<Self, LayoutError> {
        let spawns = std::iter::once(&player_spawn)
            .chain(enemy_spawns.iter())
            .chain(pickup_spawns.iter());
        for spawn in spawns {
            if !map.is_walkable(spawn.x(), spawn.y()) {
                return Err(LayoutError::BlockedSpawn {
                    x: spawn.x(),
                    y: spawn.y(),
                });
            }
        }

        Ok(Self {
            map,
            player_spawn,
            enemy_spawns,
            pickup_spawns,
        })
    }

    /// Built-in 16×16 arena with three enemies and two health packs.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            map: TileMap::from_static(&CLASSIC_LAYOUT),
            player_spawn: CLASSIC_PLAYER_SPAWN,
            enemy_spawns: CLASSIC_ENEMY_SPAWNS.to_vec(),
            pickup_spawns: CLASSIC_PICKUP_SPAWNS.to_vec(),
        }
    }

    /// Static grid of the level.
    #[must_use]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Where the player appears when a session starts.
    #[must_use]
    pub const fn player_spawn(&self) -> Position {
        self.player_spawn
    }

    /// Where each enemy of the roster appears, in identifier order.
    #[must_use]
    pub fn enemy_spawns(&self) -> &[Position] {
        &self.enemy_spawns
    }

    /// Where each health pack appears, in identifier order.
    #[must_use]
    pub fn pickup_spawns(&self) -> &[Position] {
        &self.pickup_spawns
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_layout_passes_validation() {
        let validated = TileMap::from_rows(&CLASSIC_LAYOUT).expect("classic layout is valid");
        let level = Level::new(
            validated,
            CLASSIC_PLAYER_SPAWN,
            CLASSIC_ENEMY_SPAWNS.to_vec(),
            CLASSIC_PICKUP_SPAWNS.to_vec(),
        )
        .expect("classic spawns are walkable");

        assert_eq!(level, Level::classic());
        assert_eq!(level.enemy_spawns().len(), 3);
        assert_eq!(level.pickup_spawns().len(), 2);
    }

    #[test]
    fn spawns_inside_walls_are_rejected() {
        let map = TileMap::from_rows(&CLASSIC_LAYOUT).expect("classic layout is valid");
        let error = Level::new(
            map,
            CLASSIC_PLAYER_SPAWN,
            vec![Position::new(8.0, 8.0)],
            Vec::new(),
        )
        .expect_err("pillar is solid");

        assert_eq!(error, LayoutError::BlockedSpawn { x: 8.0, y: 8.0 });
    }
}
