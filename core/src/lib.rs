#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gloom engine.
//!
//! This crate defines the message surface that connects the session
//! controller, the authoritative world, and pure systems. The session submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and collaborators to react to deterministically. Systems
//! consume event streams, query immutable snapshots, and respond exclusively
//! with new command batches.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

pub mod tuning;

/// Canonical title shown by adapters.
pub const GAME_TITLE: &str = "Gloom";

/// Lifecycle of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Title screen; no simulation runs.
    Menu,
    /// Simulation advances every tick.
    Playing,
    /// Session is frozen but kept for resumption.
    Paused,
    /// Player health reached zero; waiting for a restart or the menu.
    GameOver,
}

/// Classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Walkable floor (code `0`).
    Empty,
    /// Primary wall material (code `1`).
    Stone,
    /// Decorative wall variant with identical solidity (code `2`).
    Brick,
}

impl TileKind {
    /// Decodes a layout code into a tile classification.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Stone),
            2 => Some(Self::Brick),
            _ => None,
        }
    }

    /// Layout code of the tile.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Stone => 1,
            Self::Brick => 2,
        }
    }

    /// Reports whether the tile blocks movement and terminates rays.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Continuous location measured in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate; its floor is the grid column.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate; its floor is the grid row.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle of the vector pointing from `self` towards `other`.
    #[must_use]
    pub fn bearing_to(self, other: Position) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Returns the position reached by travelling `distance` along `heading`.
    #[must_use]
    pub fn advanced(self, heading: f32, distance: f32) -> Self {
        Self {
            x: self.x + heading.cos() * distance,
            y: self.y + heading.sin() * distance,
        }
    }
}

/// Wraps an angle into the half-open range `(-π, π]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Translational movement relative to the player's facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stride {
    /// Along the facing angle.
    Forward,
    /// Against the facing angle.
    Backward,
    /// Facing angle minus a quarter turn.
    StrafeLeft,
    /// Facing angle plus a quarter turn.
    StrafeRight,
}

impl Stride {
    /// Every stride in the order the world evaluates them within a tick.
    pub const ALL: [Stride; 4] = [
        Self::Forward,
        Self::Backward,
        Self::StrafeLeft,
        Self::StrafeRight,
    ];

    /// Heading of the stride for a player facing `facing`.
    #[must_use]
    pub fn heading(self, facing: f32) -> f32 {
        match self {
            Self::Forward => facing,
            Self::Backward => facing + PI,
            Self::StrafeLeft => facing - PI / 2.0,
            Self::StrafeRight => facing + PI / 2.0,
        }
    }
}

/// Held controls that the input layer latches between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    /// Move forward.
    Forward,
    /// Move backward.
    Backward,
    /// Strafe left.
    StrafeLeft,
    /// Strafe right.
    StrafeRight,
    /// Turn counter-clockwise at the keyboard turn rate.
    TurnLeft,
    /// Turn clockwise at the keyboard turn rate.
    TurnRight,
}

/// Discrete input delivered by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A held control went down.
    Pressed(Control),
    /// A held control was released.
    Released(Control),
    /// Relative horizontal pointer motion in pixels.
    PointerMoved {
        /// Horizontal delta since the previous report.
        dx: f32,
    },
    /// Trigger pull.
    Fire,
    /// Start (or restart) a session.
    BeginSession,
    /// Abandon the current session and show the menu.
    ReturnToMenu,
    /// Toggle between playing and paused.
    TogglePause,
}

/// Latched input consumed by a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct InputFrame {
    /// Forward control held.
    pub forward: bool,
    /// Backward control held.
    pub backward: bool,
    /// Strafe-left control held.
    pub strafe_left: bool,
    /// Strafe-right control held.
    pub strafe_right: bool,
    /// Keyboard turn-left control held.
    pub turn_left: bool,
    /// Keyboard turn-right control held.
    pub turn_right: bool,
    /// Horizontal pointer motion accumulated since the previous tick.
    pub pointer_dx: f32,
}

impl InputFrame {
    /// Reports whether the control is held in this frame.
    #[must_use]
    pub const fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Forward => self.forward,
            Control::Backward => self.backward,
            Control::StrafeLeft => self.strafe_left,
            Control::StrafeRight => self.strafe_right,
            Control::TurnLeft => self.turn_left,
            Control::TurnRight => self.turn_right,
        }
    }

    /// Reports whether the stride's control is held in this frame.
    #[must_use]
    pub const fn strides(&self, stride: Stride) -> bool {
        match stride {
            Stride::Forward => self.forward,
            Stride::Backward => self.backward,
            Stride::StrafeLeft => self.strafe_left,
            Stride::StrafeRight => self.strafe_right,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Recreates the player, enemies and pickups and enters play.
    BeginSession,
    /// Leaves the current session for the menu.
    ReturnToMenu,
    /// Freezes or resumes an ongoing session.
    SetPaused {
        /// Whether the session should be paused.
        paused: bool,
    },
    /// Rotates the player by the provided amount.
    TurnPlayer {
        /// Signed rotation in radians.
        radians: f32,
    },
    /// Attempts one tick worth of player translation.
    StepPlayer {
        /// Direction of travel relative to the player's facing.
        stride: Stride,
    },
    /// Advances the simulation clock by one tick.
    ///
    /// Resolves pickups against the current player position and decays every
    /// tick-based counter.
    Tick,
    /// Attempts to fire the player's weapon.
    PullTrigger,
    /// Turns an enemy towards the player and optionally steps it forward.
    PursuePlayer {
        /// Identifier of the pursuing enemy.
        enemy: EnemyId,
        /// Bearing from the enemy to the player.
        heading: f32,
        /// Whether the enemy should attempt to advance along `heading`.
        advance: bool,
    },
    /// Applies an enemy strike to the player.
    StrikePlayer {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
    },
    /// Applies hit-scan damage to an enemy.
    DamageEnemy {
        /// Identifier of the enemy that was hit.
        enemy: EnemyId,
        /// Health removed from the enemy.
        amount: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A fresh session began.
    SessionStarted,
    /// The session was abandoned for the menu.
    ReturnedToMenu,
    /// The session entered or left the paused state.
    PauseChanged {
        /// Whether the session is now paused.
        paused: bool,
    },
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Number of ticks simulated in the current session.
        tick: u64,
    },
    /// The player moved to a walkable position.
    PlayerMoved {
        /// Position before the step.
        from: Position,
        /// Position after the step.
        to: Position,
    },
    /// A player step was rejected by collision.
    PlayerBlocked {
        /// Stride that was rejected.
        stride: Stride,
    },
    /// The player collected a health pack.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: PickupId,
        /// Player health after healing.
        health: u32,
    },
    /// An enemy moved towards the player.
    EnemyAdvanced {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Position before the step.
        from: Position,
        /// Position after the step.
        to: Position,
    },
    /// An enemy struck the player.
    PlayerStruck {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
        /// Damage applied by the strike.
        damage: u32,
        /// Player health after the strike.
        health: u32,
    },
    /// The player's weapon fired.
    ShotFired {
        /// Player position at the moment of firing.
        origin: Position,
        /// Player facing at the moment of firing.
        angle: f32,
        /// Rounds left after the shot.
        ammo: u32,
    },
    /// An enemy survived a hit.
    EnemyDamaged {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Enemy health after the hit.
        health: u32,
    },
    /// An enemy was taken out.
    EnemyKilled {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Session score after awarding the kill.
        score: u32,
    },
    /// Player health reached zero and the session ended.
    GameOver {
        /// Final session score.
        score: u32,
        /// High score after the session.
        high_score: u32,
        /// Whether the session beat the previous high score.
        new_record: bool,
    },
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current location.
    pub position: Position,
    /// Facing angle in radians.
    pub angle: f32,
    /// Remaining health in `0..=100`.
    pub health: u32,
    /// Remaining rounds.
    pub ammo: u32,
    /// Distance covered per movement key per tick.
    pub speed: f32,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current location.
    pub position: Position,
    /// Facing angle in radians.
    pub angle: f32,
    /// Remaining health.
    pub health: u32,
    /// Whether the enemy still takes part in the session.
    pub active: bool,
    /// Ticks until the enemy may strike again; zero or negative means ready.
    pub attack_cooldown: i32,
}

/// Read-only snapshot describing all enemies of the session.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the enemies that are still active.
    pub fn active(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.active)
    }

    /// Number of enemies that are still active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single pickup used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Unique identifier assigned to the pickup.
    pub id: PickupId,
    /// Location of the pickup.
    pub position: Position,
    /// Whether the pickup has already been consumed.
    pub collected: bool,
}

/// Enemy sprite drawn over a single screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteOverlay {
    /// Enemy occupying the column.
    pub enemy: EnemyId,
    /// Projected sprite height in pixels.
    pub size: f32,
    /// Screen-space y of the sprite's top edge.
    pub top: f32,
}

/// Raycast result for a single screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayColumn {
    /// Zero-based column index.
    pub index: u32,
    /// Screen-space x of the column's left edge.
    pub screen_x: f32,
    /// Absolute angle of the ray.
    pub ray_angle: f32,
    /// Distance travelled by the ray before it stopped.
    pub raw_distance: f32,
    /// Fish-eye corrected distance to the wall plane.
    pub distance: f32,
    /// Wall that stopped the ray; `None` when the ray left the grid or ran out of range.
    pub wall: Option<TileKind>,
    /// Projected wall height in pixels.
    pub wall_height: f32,
    /// Screen-space y of the wall's top edge, including recoil.
    pub wall_top: f32,
    /// Distance attenuation in `0.2..=1.0`.
    pub brightness: f32,
    /// Enemy drawn over this column, if any.
    pub sprite: Option<SpriteOverlay>,
}

impl RayColumn {
    /// Layout code of the wall hit by the ray, `0` when nothing was recorded.
    #[must_use]
    pub fn wall_code(&self) -> u8 {
        self.wall.map_or(0, TileKind::code)
    }
}

/// Column-indexed depth buffer produced once per rendered frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RayFrame {
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Width of a single column in pixels.
    pub column_width: f32,
    /// Samples ordered from the left edge of the screen.
    pub columns: Vec<RayColumn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_keeps_small_angles() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-0.5) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn wrap_angle_folds_full_turns() {
        assert!((wrap_angle(TAU + 0.1) - 0.1).abs() < 1e-5);
        assert!((wrap_angle(-TAU - 0.1) + 0.1).abs() < 1e-5);
        assert!((wrap_angle(3.0 * PI).abs() - PI).abs() < 1e-5);
    }

    #[test]
    fn bearing_and_distance_match_expectation() {
        let origin = Position::new(1.0, 1.0);
        let east = Position::new(4.0, 1.0);
        let south = Position::new(1.0, 3.0);

        assert!((origin.distance_to(east) - 3.0).abs() < 1e-6);
        assert!(origin.bearing_to(east).abs() < 1e-6);
        assert!((origin.bearing_to(south) - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn advanced_moves_along_heading() {
        let moved = Position::new(2.0, 2.0).advanced(PI / 2.0, 0.5);
        assert!((moved.x() - 2.0).abs() < 1e-6);
        assert!((moved.y() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn tile_codes_round_trip() {
        for code in 0..3 {
            let kind = TileKind::from_code(code).expect("known code");
            assert_eq!(kind.code(), code);
        }
        assert_eq!(TileKind::from_code(3), None);
        assert!(!TileKind::Empty.is_solid());
        assert!(TileKind::Stone.is_solid());
        assert!(TileKind::Brick.is_solid());
    }

    #[test]
    fn strafes_are_perpendicular_to_facing() {
        let facing = 0.3;
        assert!((Stride::StrafeRight.heading(facing) - facing - PI / 2.0).abs() < 1e-6);
        assert!((Stride::StrafeLeft.heading(facing) - facing + PI / 2.0).abs() < 1e-6);
        assert!((Stride::Backward.heading(facing) - facing - PI).abs() < 1e-6);
    }

    #[test]
    fn enemy_view_orders_snapshots_and_counts_active() {
        let snapshot = |id: u32, active: bool| EnemySnapshot {
            id: EnemyId::new(id),
            position: Position::default(),
            angle: 0.0,
            health: if active { 100 } else { 0 },
            active,
            attack_cooldown: 0,
        };
        let view = EnemyView::from_snapshots(vec![
            snapshot(2, true),
            snapshot(0, false),
            snapshot(1, true),
        ]);

        let ids: Vec<u32> = view.iter().map(|enemy| enemy.id.get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(view.active_count(), 2);
    }
}
