#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input and session controller for Gloom.
//!
//! The [`Session`] is the only writer of world state. It latches input from
//! the presentation layer, drives the fixed-step simulation, routes command
//! batches between the world and the pure systems, and forwards the resulting
//! events to the audio and persistence collaborators.

mod capabilities;
mod input;

pub use capabilities::{
    AudioError, AudioSink, HighScoreStore, InMemoryHighScore, PersistenceError, Silence,
};
pub use input::InputLatch;

use std::time::Duration;

use gloom_core::{
    tuning::{MAX_TICKS_PER_ADVANCE, POINTER_SENSITIVITY, TICK_DURATION},
    Command, Event, GameState, InputEvent, RayFrame,
};
use gloom_system_hitscan::Hitscan;
use gloom_system_locomotion::Locomotion;
use gloom_system_pursuit::Pursuit;
use gloom_system_raycaster::{RaycastConfig, RaycastError, Raycaster};
use gloom_world::{self as world, query, Level, World};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Options used when constructing a [`Session`].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Level played by every session.
    pub level: Level,
    /// Radians turned per pixel of pointer motion.
    pub pointer_sensitivity: f32,
    /// Viewport and marching parameters of the renderer.
    pub raycast: RaycastConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            level: Level::classic(),
            pointer_sensitivity: POINTER_SENSITIVITY,
            raycast: RaycastConfig::default(),
        }
    }
}

/// Failure raised while constructing a [`Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The renderer configuration was rejected.
    #[error("invalid raycaster configuration")]
    Raycast(#[from] RaycastError),
    /// The pointer sensitivity is not a finite number.
    #[error("pointer sensitivity {0} is not finite")]
    Sensitivity(f32),
}

/// Heads-up display values captured from the current session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Lifecycle state of the session.
    pub state: GameState,
    /// Player health in `0..=100`.
    pub health: u32,
    /// Rounds left.
    pub ammo: u32,
    /// Score of the current session.
    pub score: u32,
    /// Best score across sessions.
    pub high_score: u32,
    /// Enemies still active.
    pub enemies_remaining: usize,
    /// Remaining camera kick in pixels.
    pub recoil: u32,
    /// Whether the muzzle flash is visible.
    pub muzzle_flash: bool,
    /// Whether the last game over set a new record.
    pub new_record: bool,
}

/// Owns the world, the systems and the collaborators of a running game.
#[derive(Debug)]
pub struct Session<A, S> {
    world: World,
    latch: InputLatch,
    locomotion: Locomotion,
    pursuit: Pursuit,
    hitscan: Hitscan,
    raycaster: Raycaster,
    audio: A,
    store: S,
    accumulator: Duration,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl<A, S> Session<A, S>
where
    A: AudioSink,
    S: HighScoreStore,
{
    /// Creates a session waiting on the menu, seeded with the stored high score.
    ///
    /// A store that cannot be read is logged and treated as empty.
    pub fn new(config: SessionConfig, audio: A, mut store: S) -> Result<Self, SessionError> {
        if !config.pointer_sensitivity.is_finite() {
            return Err(SessionError::Sensitivity(config.pointer_sensitivity));
        }
        let raycaster = Raycaster::new(config.raycast)?;
        let high_score = store.load().unwrap_or_else(|error| {
            warn!(%error, "failed to load high score, starting from zero");
            0
        });
        info!(high_score, "session controller ready");

        Ok(Self {
            world: World::with_level(config.level).with_high_score(high_score),
            latch: InputLatch::default(),
            locomotion: Locomotion::new().with_sensitivity(config.pointer_sensitivity),
            pursuit: Pursuit::new(),
            hitscan: Hitscan::new(),
            raycaster,
            audio,
            store,
            accumulator: Duration::ZERO,
            commands: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Lifecycle state of the session.
    #[must_use]
    pub fn state(&self) -> GameState {
        query::state(&self.world)
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the audio collaborator.
    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Read-only access to the persistence collaborator.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Routes one input event from the presentation layer.
    pub fn handle_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::Pressed(control) => self.latch.press(control),
            InputEvent::Released(control) => self.latch.release(control),
            InputEvent::PointerMoved { dx } => {
                if self.state() == GameState::Playing {
                    self.latch.pointer_motion(dx);
                }
            }
            InputEvent::Fire => self.fire(),
            InputEvent::BeginSession => {
                if matches!(self.state(), GameState::Menu | GameState::GameOver) {
                    self.latch.discard_motion();
                    self.accumulator = Duration::ZERO;
                    self.submit(Command::BeginSession);
                }
            }
            InputEvent::ReturnToMenu => self.submit(Command::ReturnToMenu),
            InputEvent::TogglePause => match self.state() {
                GameState::Playing => self.submit(Command::SetPaused { paused: true }),
                GameState::Paused => self.submit(Command::SetPaused { paused: false }),
                GameState::Menu | GameState::GameOver => {}
            },
        }
    }

    /// Pulls the trigger and resolves the shot immediately.
    pub fn fire(&mut self) {
        if self.state() != GameState::Playing {
            return;
        }

        world::apply(&mut self.world, Command::PullTrigger, &mut self.events);
        let enemies = query::enemy_view(&self.world);
        self.hitscan.handle(&self.events, &enemies, &mut self.commands);
        self.apply_pending();
        self.dispatch();
    }

    /// Accumulates wall-clock time and runs every whole tick it covers.
    ///
    /// At most [`MAX_TICKS_PER_ADVANCE`] ticks run per call; any larger backlog
    /// is dropped. Outside of play the accumulator is discarded. Returns the
    /// number of ticks executed.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.state() != GameState::Playing {
            self.accumulator = Duration::ZERO;
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut ticks = 0;
        while self.accumulator >= TICK_DURATION {
            if ticks == MAX_TICKS_PER_ADVANCE {
                debug!(backlog = ?self.accumulator, "dropping simulation backlog");
                self.accumulator = Duration::ZERO;
                break;
            }

            self.accumulator -= TICK_DURATION;
            self.tick();
            ticks += 1;

            if self.state() != GameState::Playing {
                self.accumulator = Duration::ZERO;
                break;
            }
        }
        ticks
    }

    /// Runs a single simulation tick: movement, then the clock, then enemy AI.
    pub fn tick(&mut self) {
        if self.state() != GameState::Playing {
            return;
        }

        let frame = self.latch.take_frame();
        self.locomotion.handle(&frame, &mut self.commands);
        self.commands.push(Command::Tick);
        self.apply_pending();

        let player = query::player(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.pursuit.handle(&player, &enemies, &mut self.commands);
        self.apply_pending();

        self.dispatch();
    }

    /// Captures the values shown by the heads-up display.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        let player = query::player(&self.world);
        let recoil = query::recoil(&self.world);
        HudSnapshot {
            state: query::state(&self.world),
            health: player.health,
            ammo: player.ammo,
            score: query::score(&self.world),
            high_score: query::high_score(&self.world),
            enemies_remaining: query::enemy_view(&self.world).active_count(),
            recoil,
            muzzle_flash: recoil > 0,
            new_record: query::new_record(&self.world),
        }
    }

    /// Raycasts the first-person view while a session is on screen.
    #[must_use]
    pub fn render(&self) -> Option<RayFrame> {
        if !matches!(self.state(), GameState::Playing | GameState::Paused) {
            return None;
        }

        Some(self.raycaster.cast(
            query::tile_map(&self.world),
            &query::player(&self.world),
            &query::enemy_view(&self.world),
            query::recoil(&self.world),
        ))
    }

    fn submit(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
        self.dispatch();
    }

    fn apply_pending(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn dispatch(&mut self) {
        let mut events = std::mem::take(&mut self.events);
        for event in &events {
            self.react(event);
        }
        events.clear();
        self.events = events;
    }

    fn react(&mut self, event: &Event) {
        match *event {
            Event::SessionStarted => {
                info!("session started");
                self.cue("music", |audio| audio.set_music(true));
            }
            Event::ReturnedToMenu => {
                info!("returned to menu");
                self.latch.clear();
                self.cue("music", |audio| audio.set_music(false));
            }
            Event::PauseChanged { paused } => {
                info!(paused, "pause toggled");
                self.cue("music", |audio| audio.set_music(!paused));
            }
            Event::ShotFired { ammo, .. } => {
                debug!(ammo, "shot fired");
                self.cue("shoot", A::play_shoot);
            }
            Event::PlayerStruck { enemy, health, .. } => {
                debug!(enemy = enemy.get(), health, "player struck");
                self.cue("hit", A::play_hit);
            }
            Event::PickupCollected { pickup, health } => {
                debug!(pickup = pickup.get(), health, "pickup collected");
                self.cue("pickup", A::play_pickup);
            }
            Event::EnemyDamaged { enemy, health } => {
                debug!(enemy = enemy.get(), health, "enemy damaged");
            }
            Event::EnemyKilled { enemy, score } => {
                info!(enemy = enemy.get(), score, "enemy killed");
            }
            Event::GameOver {
                score,
                high_score,
                new_record,
            } => {
                info!(score, high_score, new_record, "game over");
                self.latch.clear();
                self.cue("music", |audio| audio.set_music(false));
                if new_record {
                    if let Err(error) = self.store.save(high_score) {
                        warn!(%error, high_score, "failed to persist high score");
                    }
                }
            }
            Event::TimeAdvanced { .. }
            | Event::PlayerMoved { .. }
            | Event::PlayerBlocked { .. }
            | Event::EnemyAdvanced { .. } => {}
        }
    }

    fn cue<F>(&mut self, name: &'static str, play: F)
    where
        F: FnOnce(&mut A) -> Result<(), AudioError>,
    {
        if let Err(error) = play(&mut self.audio) {
            warn!(%error, cue = name, "audio cue failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session<Silence, InMemoryHighScore> {
        Session::new(SessionConfig::default(), Silence, InMemoryHighScore::new(0))
            .expect("default config is valid")
    }

    #[test]
    fn starts_on_menu_without_a_view() {
        let session = session();
        assert_eq!(session.state(), GameState::Menu);
        assert!(session.render().is_none());
    }

    #[test]
    fn advance_runs_whole_ticks_only() {
        let mut session = session();
        session.handle_input(InputEvent::BeginSession);

        assert_eq!(session.advance(TICK_DURATION / 2), 0);
        assert_eq!(session.advance(TICK_DURATION / 2), 1);
        assert_eq!(session.advance(TICK_DURATION * 3), 3);
        assert_eq!(query::tick_index(session.world()), 4);
    }

    #[test]
    fn advance_caps_long_frames() {
        let mut session = session();
        session.handle_input(InputEvent::BeginSession);

        assert_eq!(session.advance(Duration::from_secs(2)), MAX_TICKS_PER_ADVANCE);
        assert_eq!(session.advance(Duration::ZERO), 0);
    }

    #[test]
    fn paused_session_does_not_tick() {
        let mut session = session();
        session.handle_input(InputEvent::BeginSession);
        session.handle_input(InputEvent::TogglePause);

        assert_eq!(session.state(), GameState::Paused);
        assert_eq!(session.advance(Duration::from_millis(100)), 0);
        assert!(session.render().is_some());

        session.handle_input(InputEvent::TogglePause);
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn invalid_sensitivity_is_rejected() {
        let config = SessionConfig {
            pointer_sensitivity: f32::NAN,
            ..SessionConfig::default()
        };
        let result = Session::new(config, Silence, InMemoryHighScore::default());
        assert!(matches!(result, Err(SessionError::Sensitivity(_))));
    }
}
