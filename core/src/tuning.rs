//! Gameplay constants shared by the world and the systems.
//!
//! Every duration is expressed in whole simulation ticks so that replays stay
//! deterministic regardless of the presentation frame rate.

use std::time::Duration;

/// Logical simulation rate.
pub const TICK_RATE_HZ: u32 = 60;

/// Length of a single simulation tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE_HZ as u64);

/// Upper bound on ticks executed for one presentation frame.
pub const MAX_TICKS_PER_ADVANCE: u32 = 5;

/// Health assigned to the player at spawn and the ceiling for healing.
pub const PLAYER_MAX_HEALTH: u32 = 100;

/// Rounds available to the player at spawn.
pub const PLAYER_STARTING_AMMO: u32 = 50;

/// Distance covered by one movement key during a single tick.
pub const PLAYER_SPEED: f32 = 0.05;

/// Radians turned per tick while a keyboard turn control is held.
pub const KEY_TURN_RATE: f32 = 0.05;

/// Radians turned per pixel of horizontal pointer motion.
pub const POINTER_SENSITIVITY: f32 = 0.002;

/// Distance below which the player collects a health pack.
pub const PICKUP_RADIUS: f32 = 0.5;

/// Health restored by a single health pack.
pub const PICKUP_HEAL: u32 = 30;

/// Health assigned to every enemy at spawn.
pub const ENEMY_MAX_HEALTH: u32 = 100;

/// Distance covered by a pursuing enemy during a single tick.
pub const ENEMY_SPEED: f32 = 0.02;

/// Enemies closer than this stop advancing.
pub const ENEMY_MIN_PURSUIT_DISTANCE: f32 = 0.5;

/// Enemies farther than this stay put.
pub const ENEMY_SIGHT_RANGE: f32 = 8.0;

/// Enemies closer than this may strike the player.
pub const ENEMY_ATTACK_RANGE: f32 = 1.5;

/// Damage dealt by a single enemy strike.
pub const ENEMY_ATTACK_DAMAGE: u32 = 5;

/// Ticks an enemy waits between strikes.
pub const ENEMY_ATTACK_COOLDOWN_TICKS: i32 = 60;

/// Damage dealt to an enemy by one hit-scan shot.
pub const WEAPON_DAMAGE: u32 = 25;

/// Maximum distance covered by the hit-scan check.
pub const WEAPON_RANGE: f32 = 10.0;

/// Half-angle of the hit-scan cone in radians.
pub const WEAPON_CONE: f32 = 0.2;

/// Ticks during which further trigger pulls are ignored (≈200 ms).
pub const WEAPON_COOLDOWN_TICKS: u32 = 12;

/// Camera kick applied when the weapon fires, in pixels.
pub const RECOIL_PEAK: u32 = 10;

/// Score awarded for each enemy taken out.
pub const KILL_SCORE: u32 = 100;
