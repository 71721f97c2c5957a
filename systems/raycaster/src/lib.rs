#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that projects the grid and the enemies into per-column depth
//! samples for a first-person view.
//!
//! Rays are marched with a fixed step rather than a DDA traversal, so the
//! reported distances are quantised to that step. The output is a plain
//! [`RayFrame`]; adapters decide how to paint it.

use std::f32::consts::FRAC_PI_3;

use gloom_core::{
    wrap_angle, EnemyView, PlayerSnapshot, Position, RayColumn, RayFrame, SpriteOverlay, TileKind,
};
use gloom_world::TileMap;
use thiserror::Error;

/// Distance at which wall shading reaches its floor.
const SHADE_DISTANCE: f32 = 10.0;
/// Darkest brightness applied to distant walls.
const MIN_BRIGHTNESS: f32 = 0.2;
/// Wall height relative to `viewport height / distance`.
const WALL_SCALE: f32 = 0.5;
/// Sprite height relative to `viewport height / distance`.
const SPRITE_SCALE: f32 = 0.3;

/// Viewport and marching parameters used by the raycaster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastConfig {
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Width of a single ray column in pixels.
    pub column_width: f32,
    /// Horizontal field of view in radians.
    pub fov: f32,
    /// Distance advanced per marching step.
    pub step: f32,
    /// Distance after which a ray gives up.
    pub max_range: f32,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            column_width: 2.0,
            fov: FRAC_PI_3,
            step: 0.05,
            max_range: 20.0,
        }
    }
}

impl RaycastConfig {
    /// Number of columns the viewport is split into.
    #[must_use]
    pub fn column_count(&self) -> u32 {
        (self.width / self.column_width).floor() as u32
    }

    fn validate(self) -> Result<Self, RaycastError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !positive(self.width) || !positive(self.height) || !positive(self.column_width) {
            return Err(RaycastError::InvalidViewport {
                width: self.width,
                height: self.height,
                column_width: self.column_width,
            });
        }
        if self.column_width > self.width {
            return Err(RaycastError::InvalidViewport {
                width: self.width,
                height: self.height,
                column_width: self.column_width,
            });
        }
        if !positive(self.fov) || self.fov >= std::f32::consts::PI {
            return Err(RaycastError::InvalidFov(self.fov));
        }
        if !positive(self.step) || !positive(self.max_range) {
            return Err(RaycastError::InvalidMarch {
                step: self.step,
                max_range: self.max_range,
            });
        }
        Ok(self)
    }
}

/// Reasons a raycaster configuration may be rejected.
#[derive(Debug, Error, PartialEq)]
pub enum RaycastError {
    /// The viewport cannot hold at least one column.
    #[error("viewport {width}x{height} cannot hold columns {column_width} px wide")]
    InvalidViewport {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
        /// Requested column width.
        column_width: f32,
    },
    /// The field of view is not in `(0, π)`.
    #[error("field of view {0} rad is outside (0, π)")]
    InvalidFov(f32),
    /// Marching would never terminate or never start.
    #[error("march step {step} and range {max_range} must both be positive")]
    InvalidMarch {
        /// Requested step.
        step: f32,
        /// Requested range.
        max_range: f32,
    },
}

/// Raycaster producing a [`RayFrame`] from the world state.
#[derive(Debug)]
pub struct Raycaster {
    config: RaycastConfig,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            config: RaycastConfig::default(),
        }
    }
}

impl Raycaster {
    /// Creates a raycaster after validating the configuration.
    pub fn new(config: RaycastConfig) -> Result<Self, RaycastError> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    /// Casts one ray per column and overlays the visible enemies.
    ///
    /// `recoil` lifts every wall slice by that many pixels; sprites are not
    /// affected.
    #[must_use]
    pub fn cast(
        &self,
        map: &TileMap,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        recoil: u32,
    ) -> RayFrame {
        let config = &self.config;
        let count = config.column_count();
        let half_height = config.height / 2.0;
        let recoil = recoil as f32;

        let columns = (0..count)
            .map(|index| {
                let ray_angle =
                    player.angle - config.fov / 2.0 + config.fov * index as f32 / count as f32;
                let (raw_distance, wall) = self.march(map, player.position, ray_angle);
                let distance = raw_distance * (ray_angle - player.angle).cos();
                let wall_height = config.height / distance * WALL_SCALE;
                let screen_x = index as f32 * config.column_width;

                RayColumn {
                    index,
                    screen_x,
                    ray_angle,
                    raw_distance,
                    distance,
                    wall,
                    wall_height,
                    wall_top: half_height - wall_height / 2.0 - recoil,
                    brightness: (1.0 - distance / SHADE_DISTANCE).max(MIN_BRIGHTNESS),
                    sprite: self.sprite_for(screen_x, raw_distance, player, enemies),
                }
            })
            .collect();

        RayFrame {
            width: config.width,
            height: config.height,
            column_width: config.column_width,
            columns,
        }
    }

    fn march(&self, map: &TileMap, origin: Position, angle: f32) -> (f32, Option<TileKind>) {
        let (dir_y, dir_x) = angle.sin_cos();
        let (mut x, mut y) = (origin.x(), origin.y());
        let mut distance = 0.0;

        while distance < self.config.max_range {
            x += dir_x * self.config.step;
            y += dir_y * self.config.step;
            distance += self.config.step;

            match map.cell_at(x, y) {
                Some(TileKind::Empty) => {}
                other => return (distance, other),
            }
        }

        (distance, None)
    }

    fn sprite_for(
        &self,
        screen_x: f32,
        wall_distance: f32,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
    ) -> Option<SpriteOverlay> {
        let config = &self.config;
        let mut overlay = None;

        for enemy in enemies.active() {
            let distance = player.position.distance_to(enemy.position);
            let delta = wrap_angle(player.position.bearing_to(enemy.position) - player.angle);
            if delta.abs() >= config.fov / 2.0 || distance >= wall_distance || distance <= 0.0 {
                continue;
            }

            let center = delta / config.fov * config.width + config.width / 2.0;
            let size = config.height / distance * SPRITE_SCALE;
            if (center - screen_x).abs() < size / 2.0 {
                overlay = Some(SpriteOverlay {
                    enemy: enemy.id,
                    size,
                    top: config.height / 2.0 - size / 2.0,
                });
            }
        }

        overlay
    }
}
