#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Gloom.

mod grid;
mod level;

pub use grid::{LayoutError, TileMap};
pub use level::Level;

use gloom_core::{
    tuning::{
        ENEMY_ATTACK_COOLDOWN_TICKS, ENEMY_ATTACK_DAMAGE, ENEMY_MAX_HEALTH, ENEMY_SPEED,
        KILL_SCORE, PICKUP_HEAL, PICKUP_RADIUS, PLAYER_MAX_HEALTH, PLAYER_SPEED,
        PLAYER_STARTING_AMMO, RECOIL_PEAK, WEAPON_COOLDOWN_TICKS,
    },
    Command, EnemyId, Event, GameState, PickupId, Position, Stride,
};

/// Represents the authoritative Gloom world state.
#[derive(Debug)]
pub struct World {
    level: Level,
    state: GameState,
    player: Player,
    enemies: Vec<Enemy>,
    pickups: Vec<Pickup>,
    score: u32,
    high_score: u32,
    new_record: bool,
    recoil: u32,
    weapon_cooldown: u32,
    tick_index: u64,
}

impl World {
    /// Creates a world on the classic level, waiting on the menu.
    #[must_use]
    pub fn new() -> Self {
        Self::with_level(Level::classic())
    }

    /// Creates a world on the provided level, waiting on the menu.
    #[must_use]
    pub fn with_level(level: Level) -> Self {
        let mut world = Self {
            player: Player::spawn(level.player_spawn()),
            level,
            state: GameState::Menu,
            enemies: Vec::new(),
            pickups: Vec::new(),
            score: 0,
            high_score: 0,
            new_record: false,
            recoil: 0,
            weapon_cooldown: 0,
            tick_index: 0,
        };
        world.reset_session();
        world
    }

    /// Seeds the high score restored from persistent storage.
    #[must_use]
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }

    fn reset_session(&mut self) {
        self.player = Player::spawn(self.level.player_spawn());
        self.enemies = self
            .level
            .enemy_spawns()
            .iter()
            .enumerate()
            .map(|(index, &position)| Enemy::spawn(EnemyId::new(index as u32), position))
            .collect();
        self.pickups = self
            .level
            .pickup_spawns()
            .iter()
            .enumerate()
            .map(|(index, &position)| Pickup::spawn(PickupId::new(index as u32), position))
            .collect();
        self.score = 0;
        self.new_record = false;
        self.recoil = 0;
        self.weapon_cooldown = 0;
        self.tick_index = 0;
    }

    fn active_enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies
            .iter_mut()
            .find(|enemy| enemy.id == id && enemy.active)
    }

    fn step_player(&mut self, stride: Stride, out_events: &mut Vec<Event>) {
        let from = self.player.position;
        let to = from.advanced(stride.heading(self.player.angle), self.player.speed);
        if self.level.map().is_walkable(to.x(), to.y()) {
            self.player.position = to;
            out_events.push(Event::PlayerMoved { from, to });
        } else {
            out_events.push(Event::PlayerBlocked { stride });
        }
    }

    fn advance_tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        let position = self.player.position;
        for pickup in self.pickups.iter_mut().filter(|pickup| !pickup.collected) {
            if pickup.position.distance_to(position) < PICKUP_RADIUS {
                pickup.collected = true;
                self.player.heal(PICKUP_HEAL);
                out_events.push(Event::PickupCollected {
                    pickup: pickup.id,
                    health: self.player.health,
                });
            }
        }

        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.active) {
            enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(1);
        }

        self.recoil = self.recoil.saturating_sub(1);
        self.weapon_cooldown = self.weapon_cooldown.saturating_sub(1);
    }

    fn pull_trigger(&mut self, out_events: &mut Vec<Event>) {
        if self.player.ammo == 0 || self.weapon_cooldown > 0 {
            return;
        }

        self.player.ammo -= 1;
        self.recoil = RECOIL_PEAK;
        self.weapon_cooldown = WEAPON_COOLDOWN_TICKS;
        out_events.push(Event::ShotFired {
            origin: self.player.position,
            angle: self.player.angle,
            ammo: self.player.ammo,
        });
    }

    fn pursue(&mut self, id: EnemyId, heading: f32, advance: bool, out_events: &mut Vec<Event>) {
        let Some(index) = self
            .enemies
            .iter()
            .position(|enemy| enemy.id == id && enemy.active)
        else {
            return;
        };

        let enemy = &mut self.enemies[index];
        enemy.angle = heading;
        if !advance {
            return;
        }

        let from = enemy.position;
        let to = from.advanced(heading, ENEMY_SPEED);
        if self.level.map().is_walkable(to.x(), to.y()) {
            enemy.position = to;
            out_events.push(Event::EnemyAdvanced { enemy: id, from, to });
        }
    }

    fn strike_player(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.active_enemy_mut(id) else {
            return;
        };
        enemy.attack_cooldown = ENEMY_ATTACK_COOLDOWN_TICKS;

        self.player.health = self.player.health.saturating_sub(ENEMY_ATTACK_DAMAGE);
        out_events.push(Event::PlayerStruck {
            enemy: id,
            damage: ENEMY_ATTACK_DAMAGE,
            health: self.player.health,
        });

        if self.player.health == 0 {
            self.finish_session(out_events);
        }
    }

    fn damage_enemy(&mut self, id: EnemyId, amount: u32, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.active_enemy_mut(id) else {
            return;
        };
        enemy.health = enemy.health.saturating_sub(amount);
        if enemy.health > 0 {
            let health = enemy.health;
            out_events.push(Event::EnemyDamaged { enemy: id, health });
            return;
        }

        enemy.active = false;
        self.score = self.score.saturating_add(KILL_SCORE);
        out_events.push(Event::EnemyKilled {
            enemy: id,
            score: self.score,
        });
    }

    fn finish_session(&mut self, out_events: &mut Vec<Event>) {
        self.state = GameState::GameOver;
        self.new_record = self.score > self.high_score;
        if self.new_record {
            self.high_score = self.score;
        }
        out_events.push(Event::GameOver {
            score: self.score,
            high_score: self.high_score,
            new_record: self.new_record,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Gameplay commands are ignored unless a session is being played, so a
/// command batch that crosses into game over stops taking effect at that point.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginSession => {
            world.reset_session();
            world.state = GameState::Playing;
            out_events.push(Event::SessionStarted);
        }
        Command::ReturnToMenu => {
            if world.state != GameState::Menu {
                world.state = GameState::Menu;
                out_events.push(Event::ReturnedToMenu);
            }
        }
        Command::SetPaused { paused } => match (world.state, paused) {
            (GameState::Playing, true) => {
                world.state = GameState::Paused;
                out_events.push(Event::PauseChanged { paused });
            }
            (GameState::Paused, false) => {
                world.state = GameState::Playing;
                out_events.push(Event::PauseChanged { paused });
            }
            _ => {}
        },
        _ if world.state != GameState::Playing => {}
        Command::TurnPlayer { radians } => {
            world.player.angle += radians;
        }
        Command::StepPlayer { stride } => world.step_player(stride, out_events),
        Command::Tick => world.advance_tick(out_events),
        Command::PullTrigger => world.pull_trigger(out_events),
        Command::PursuePlayer {
            enemy,
            heading,
            advance,
        } => world.pursue(enemy, heading, advance, out_events),
        Command::StrikePlayer { enemy } => world.strike_player(enemy, out_events),
        Command::DamageEnemy { enemy, amount } => world.damage_enemy(enemy, amount, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gloom_core::{EnemySnapshot, EnemyView, GameState, PickupSnapshot, PlayerSnapshot};

    use super::{TileMap, World};

    /// Current lifecycle state of the session.
    #[must_use]
    pub fn state(world: &World) -> GameState {
        world.state
    }

    /// Provides read-only access to the world's tile map.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        world.level.map()
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.position,
            angle: player.angle,
            health: player.health,
            ammo: player.ammo,
            speed: player.speed,
        }
    }

    /// Captures a read-only view of the session's enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    angle: enemy.angle,
                    health: enemy.health,
                    active: enemy.active,
                    attack_cooldown: enemy.attack_cooldown,
                })
                .collect(),
        )
    }

    /// Captures the session's pickups in identifier order.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        world
            .pickups
            .iter()
            .map(|pickup| PickupSnapshot {
                id: pickup.id,
                position: pickup.position,
                collected: pickup.collected,
            })
            .collect()
    }

    /// Score accumulated in the current session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Best score across sessions.
    #[must_use]
    pub fn high_score(world: &World) -> u32 {
        world.high_score
    }

    /// Whether the most recent game over beat the previous high score.
    #[must_use]
    pub fn new_record(world: &World) -> bool {
        world.new_record
    }

    /// Remaining camera kick in pixels.
    #[must_use]
    pub fn recoil(world: &World) -> u32 {
        world.recoil
    }

    /// Ticks until the weapon accepts another trigger pull.
    #[must_use]
    pub fn weapon_cooldown(world: &World) -> u32 {
        world.weapon_cooldown
    }

    /// Ticks simulated in the current session.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Debug)]
struct Player {
    position: Position,
    angle: f32,
    health: u32,
    ammo: u32,
    speed: f32,
}

impl Player {
    fn spawn(position: Position) -> Self {
        Self {
            position,
            angle: 0.0,
            health: PLAYER_MAX_HEALTH,
            ammo: PLAYER_STARTING_AMMO,
            speed: PLAYER_SPEED,
        }
    }

    fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(PLAYER_MAX_HEALTH);
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    position: Position,
    angle: f32,
    health: u32,
    active: bool,
    attack_cooldown: i32,
}

impl Enemy {
    fn spawn(id: EnemyId, position: Position) -> Self {
        Self {
            id,
            position,
            angle: 0.0,
            health: ENEMY_MAX_HEALTH,
            active: true,
            attack_cooldown: 0,
        }
    }
}

#[derive(Clone, Debug)]
struct Pickup {
    id: PickupId,
    position: Position,
    collected: bool,
}

impl Pickup {
    fn spawn(id: PickupId, position: Position) -> Self {
        Self {
            id,
            position,
            collected: false,
        }
    }
}
