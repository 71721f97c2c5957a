#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Gloom in a macroquad window.

mod audio;
mod high_score;
mod level_file;

use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gloom_core::{tuning::POINTER_SENSITIVITY, GAME_TITLE};
use gloom_rendering::{
    FrameSimulationBreakdown, Hud, Palette, Presentation, RenderingBackend, Scene, Viewport,
};
use gloom_rendering_macroquad::MacroquadBackend;
use gloom_session::{AudioSink, HighScoreStore, HudSnapshot, Session, SessionConfig};
use gloom_system_raycaster::RaycastConfig;
use gloom_world::Level;
use tracing::info;

use crate::{audio::TracingAudio, high_score::TomlHighScoreStore};

/// Output format of the log subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human readable single-line records.
    Compact,
    /// One JSON object per record.
    Json,
}

/// Command-line arguments accepted by the Gloom executable.
#[derive(Debug, Parser)]
#[command(name = "gloom", about = "Retro raycasting shooter.")]
struct CliArgs {
    /// File the best score is read from and written to.
    #[arg(long, value_name = "PATH", default_value = "gloom-highscore.toml")]
    high_score_file: PathBuf,
    /// TOML level replacing the built-in arena.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
    /// Radians turned per pixel of horizontal mouse motion.
    #[arg(long, value_name = "RADIANS", default_value_t = POINTER_SENSITIVITY)]
    mouse_sensitivity: f32,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Log output format; `RUST_LOG` selects the filter.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

/// Entry point for the Gloom command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_format);

    let level = match &args.level {
        Some(path) => level_file::load(path)
            .with_context(|| format!("failed to load level from {}", path.display()))?,
        None => Level::classic(),
    };

    let raycast = RaycastConfig::default();
    let viewport =
        Viewport::new(raycast.width, raycast.height).context("invalid rendering viewport")?;
    let config = SessionConfig {
        level,
        pointer_sensitivity: args.mouse_sensitivity,
        raycast,
    };

    let store = TomlHighScoreStore::new(args.high_score_file);
    info!(path = %store.path().display(), "high score file");

    let mut session = Session::new(config, TracingAudio::default(), store)
        .context("failed to configure game session")?;

    let mut scene = Scene::new(viewport, Palette::classic());
    populate_scene(&session, &mut scene);
    let presentation = Presentation::new(GAME_TITLE, scene);

    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |dt, input, scene| {
            let simulation_start = Instant::now();
            for event in input.events {
                session.handle_input(event);
            }
            let _ = session.advance(dt);
            let simulation = simulation_start.elapsed();

            let population_start = Instant::now();
            populate_scene(&session, scene);

            FrameSimulationBreakdown {
                simulation,
                scene_population: population_start.elapsed(),
            }
        })
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init(),
    }
}

/// Copies the session's current view into the scene the backend draws.
fn populate_scene<A: AudioSink, S: HighScoreStore>(session: &Session<A, S>, scene: &mut Scene) {
    let hud = session.hud();
    scene.state = hud.state;
    scene.hud = hud_from_snapshot(&hud);
    scene.set_frame(session.render().as_ref());
}

fn hud_from_snapshot(snapshot: &HudSnapshot) -> Hud {
    Hud {
        health: snapshot.health,
        ammo: snapshot.ammo,
        score: snapshot.score,
        high_score: snapshot.high_score,
        enemies_remaining: snapshot.enemies_remaining,
        muzzle_flash: snapshot.muzzle_flash,
        new_record: snapshot.new_record,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloom_core::{GameState, InputEvent};
    use gloom_session::{InMemoryHighScore, Silence};

    #[test]
    fn defaults_match_built_in_tuning() {
        let args = CliArgs::try_parse_from(["gloom"]).expect("no arguments required");

        assert_eq!(args.high_score_file, PathBuf::from("gloom-highscore.toml"));
        assert!(args.level.is_none());
        assert!((args.mouse_sensitivity - POINTER_SENSITIVITY).abs() < f32::EPSILON);
        assert!(args.vsync);
        assert!(!args.show_fps);
        assert_eq!(args.log_format, LogFormat::Compact);
    }

    #[test]
    fn parses_overrides() {
        let args = CliArgs::try_parse_from([
            "gloom",
            "--level",
            "arena.toml",
            "--mouse-sensitivity",
            "0.004",
            "--vsync",
            "false",
            "--show-fps",
            "--log-format",
            "json",
        ])
        .expect("arguments are valid");

        assert_eq!(args.level, Some(PathBuf::from("arena.toml")));
        assert!((args.mouse_sensitivity - 0.004).abs() < f32::EPSILON);
        assert!(!args.vsync);
        assert!(args.show_fps);
        assert_eq!(args.log_format, LogFormat::Json);
    }

    #[test]
    fn scene_tracks_session_lifecycle() {
        let mut session =
            Session::new(SessionConfig::default(), Silence, InMemoryHighScore::new(70))
                .expect("default config is valid");
        let viewport = Viewport::new(800.0, 600.0).expect("viewport is valid");
        let mut scene = Scene::new(viewport, Palette::classic());

        populate_scene(&session, &mut scene);
        assert_eq!(scene.state, GameState::Menu);
        assert!(scene.strips.is_empty());
        assert_eq!(scene.hud.high_score, 70);

        session.handle_input(InputEvent::BeginSession);
        populate_scene(&session, &mut scene);
        assert_eq!(scene.state, GameState::Playing);
        assert!(!scene.strips.is_empty());
        assert_eq!(scene.hud.health, 100);
        assert_eq!(scene.hud.ammo, 50);

        session.handle_input(InputEvent::TogglePause);
        populate_scene(&session, &mut scene);
        assert_eq!(scene.state, GameState::Paused);
        assert!(!scene.strips.is_empty());
    }
}
