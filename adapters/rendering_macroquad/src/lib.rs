#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Gloom.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature; sound cues are routed through the session's audio
//! capability instead.

use anyhow::Result;
use glam::Vec2;
use gloom_core::{Control, GameState, InputEvent, GAME_TITLE};
use gloom_rendering::{
    Color, FrameInput, FrameSimulationBreakdown, Hud, Presentation, RenderingBackend, Scene,
};
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode,
    MouseButton,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tracing::info;

/// Keys bound to held controls. Several keys may drive the same control.
const CONTROL_BINDINGS: [(KeyCode, Control); 8] = [
    (KeyCode::W, Control::Forward),
    (KeyCode::Up, Control::Forward),
    (KeyCode::S, Control::Backward),
    (KeyCode::Down, Control::Backward),
    (KeyCode::A, Control::StrafeLeft),
    (KeyCode::D, Control::StrafeRight),
    (KeyCode::Left, Control::TurnLeft),
    (KeyCode::Right, Control::TurnRight),
];

const HUD_FONT_SIZE: f32 = 24.0;
const TITLE_FONT_SIZE: f32 = 64.0;
const CROSSHAIR_HALF_LENGTH: f32 = 10.0;

/// Edge-triggered observations gathered during a single frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameObservations {
    /// Controls whose key went down this frame.
    pub pressed: Vec<Control>,
    /// Controls whose key went up this frame.
    pub released: Vec<Control>,
    /// Horizontal pointer travel since the previous frame.
    pub pointer_dx: f32,
    /// Fire button or key went down.
    pub fire: bool,
    /// Start key went down.
    pub begin: bool,
    /// Menu key went down.
    pub menu: bool,
    /// Pause key went down.
    pub pause: bool,
}

impl FrameObservations {
    fn poll(pointer: &mut PointerTracker, controls: &mut ControlTracker) -> Self {
        let mut observations = Self::default();
        let keys = CONTROL_BINDINGS
            .iter()
            .map(|&(key, control)| (control, is_key_down(key)));
        controls.observe(keys, &mut observations);

        let (x, y) = mouse_position();
        observations.pointer_dx = pointer.observe(Vec2::new(x, y));
        observations.fire =
            is_key_pressed(KeyCode::Space) || is_mouse_button_pressed(MouseButton::Left);
        observations.begin = is_key_pressed(KeyCode::Enter);
        observations.menu = is_key_pressed(KeyCode::M) || is_key_pressed(KeyCode::Backspace);
        observations.pause = is_key_pressed(KeyCode::P) || is_key_pressed(KeyCode::Escape);
        observations
    }

    /// Orders the observations into input events: releases, presses, pointer
    /// motion, then discrete actions.
    #[must_use]
    pub fn into_frame_input(self) -> FrameInput {
        let mut events = Vec::with_capacity(self.pressed.len() + self.released.len() + 4);
        events.extend(self.released.into_iter().map(InputEvent::Released));
        events.extend(self.pressed.into_iter().map(InputEvent::Pressed));
        if self.pointer_dx != 0.0 {
            events.push(InputEvent::PointerMoved { dx: self.pointer_dx });
        }
        if self.menu {
            events.push(InputEvent::ReturnToMenu);
        }
        if self.begin {
            events.push(InputEvent::BeginSession);
        }
        if self.pause {
            events.push(InputEvent::TogglePause);
        }
        if self.fire {
            events.push(InputEvent::Fire);
        }
        FrameInput { events }
    }
}

/// Folds the held state of every bound key into per-control edges.
///
/// A control stays held while any of its keys is down, so releasing one of
/// two keys bound to the same control emits nothing.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct ControlTracker {
    held: Vec<Control>,
}

impl ControlTracker {
    /// Compares the keys currently down against the previous frame and records
    /// the controls that were pressed or released.
    pub fn observe<I>(&mut self, keys: I, observations: &mut FrameObservations)
    where
        I: IntoIterator<Item = (Control, bool)>,
    {
        let mut down: Vec<Control> = Vec::new();
        for (control, is_down) in keys {
            if is_down && !down.contains(&control) {
                down.push(control);
            }
        }

        for &control in &self.held {
            if !down.contains(&control) {
                observations.released.push(control);
            }
        }
        for &control in &down {
            if !self.held.contains(&control) {
                observations.pressed.push(control);
            }
        }
        self.held = down;
    }
}

/// Converts absolute cursor positions into relative horizontal motion.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    last: Option<Vec2>,
}

impl PointerTracker {
    /// Records the cursor position and returns the horizontal travel since the
    /// previous observation. The first observation reports no motion.
    pub fn observe(&mut self, position: Vec2) -> f32 {
        let dx = self.last.map_or(0.0, |last| position.x - last.x);
        self.last = Some(position);
        dx
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    scene_population_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_scene_population: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.scene_population_accum += breakdown.scene_population;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_scene_population: self.scene_population_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.scene_population_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.viewport.width() as i32,
            window_height: scene.viewport.height() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut pointer = PointerTracker::default();
            let mut controls = ControlTracker::default();
            let mut fps_counter = FpsCounter::default();
            let background = to_macroquad_color(scene.palette.clear);

            loop {
                if is_key_pressed(KeyCode::Q) {
                    info!("quit requested");
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input =
                    FrameObservations::poll(&mut pointer, &mut controls).into_frame_input();
                let simulation_breakdown = update_scene(frame_dt, frame_input, &mut scene);

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                let screen = ScreenMapping::new(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_scene(&scene, &screen);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation,
                    scene_population: simulation_breakdown.scene_population,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(metrics) = fps_metrics {
                        info!(
                            fps = metrics.per_second,
                            fps_10s = metrics.trailing_ten_seconds,
                            sim_ms = metrics.avg_simulation.as_secs_f64() * 1_000.0,
                            scene_ms = metrics.avg_scene_population.as_secs_f64() * 1_000.0,
                            render_ms = metrics.avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps viewport coordinates onto the window, preserving the aspect ratio.
#[derive(Clone, Copy, Debug)]
struct ScreenMapping {
    scale: f32,
    offset: Vec2,
    width: f32,
    height: f32,
}

impl ScreenMapping {
    fn new(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let (scale, offset) = scene.viewport.fit(screen_width, screen_height);
        Self {
            scale,
            offset,
            width: scene.viewport.width(),
            height: scene.viewport.height(),
        }
    }

    fn point(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }

    fn rect(&self, origin: Vec2, size: Vec2, color: Color) {
        let top_left = self.point(origin);
        let size = size * self.scale;
        macroquad::shapes::draw_rectangle(
            top_left.x,
            top_left.y,
            size.x,
            size.y,
            to_macroquad_color(color),
        );
    }

    fn centered_text(&self, text: &str, baseline: f32, font_size: f32, color: Color) {
        let scaled_size = (font_size * self.scale).max(1.0);
        let dimensions = macroquad::text::measure_text(text, None, scaled_size as u16, 1.0);
        let anchor = self.point(Vec2::new(self.width / 2.0, baseline));
        macroquad::text::draw_text(
            text,
            anchor.x - dimensions.width / 2.0,
            anchor.y,
            scaled_size,
            to_macroquad_color(color),
        );
    }
}

fn draw_scene(scene: &Scene, screen: &ScreenMapping) {
    match scene.state {
        GameState::Menu => draw_menu(scene, screen),
        GameState::Playing => draw_view(scene, screen),
        GameState::Paused => {
            draw_view(scene, screen);
            draw_banner(scene, screen, "PAUSED", "P to resume, M for menu");
        }
        GameState::GameOver => draw_game_over(scene, screen),
    }
}

fn draw_view(scene: &Scene, screen: &ScreenMapping) {
    let palette = &scene.palette;
    let half = Vec2::new(screen.width, screen.height / 2.0);
    screen.rect(Vec2::ZERO, half, palette.ceiling);
    screen.rect(Vec2::new(0.0, half.y), half, palette.floor);

    for strip in &scene.strips {
        screen.rect(strip.origin, strip.size, strip.color);
    }
    draw_crosshair(scene, screen);
    draw_hud(&scene.hud, palette.foreground, palette.accent, screen);
}

fn draw_crosshair(scene: &Scene, screen: &ScreenMapping) {
    let center = screen.point(Vec2::new(screen.width / 2.0, screen.height / 2.0));
    let length = CROSSHAIR_HALF_LENGTH * screen.scale;
    let color = to_macroquad_color(if scene.hud.muzzle_flash {
        scene.palette.accent
    } else {
        scene.palette.foreground
    });
    macroquad::shapes::draw_line(
        center.x - length,
        center.y,
        center.x + length,
        center.y,
        2.0,
        color,
    );
    macroquad::shapes::draw_line(
        center.x,
        center.y - length,
        center.x,
        center.y + length,
        2.0,
        color,
    );
}

fn draw_hud(hud: &Hud, foreground: Color, accent: Color, screen: &ScreenMapping) {
    let color = if hud.health <= 25 { accent } else { foreground };
    let anchor = screen.point(Vec2::new(16.0, screen.height - 16.0));
    macroquad::text::draw_text(
        &hud.status_line(),
        anchor.x,
        anchor.y,
        HUD_FONT_SIZE * screen.scale,
        to_macroquad_color(color),
    );

    if hud.muzzle_flash {
        let size = Vec2::new(24.0, 24.0);
        let origin = Vec2::new(screen.width / 2.0 - size.x / 2.0, screen.height - 64.0);
        screen.rect(origin, size, accent.lighten(0.4));
    }
}

fn draw_banner(scene: &Scene, screen: &ScreenMapping, title: &str, hint: &str) {
    let palette = &scene.palette;
    let mut veil = palette.clear;
    veil.alpha = 0.6;
    screen.rect(Vec2::ZERO, Vec2::new(screen.width, screen.height), veil);
    screen.centered_text(title, screen.height * 0.45, TITLE_FONT_SIZE, palette.foreground);
    screen.centered_text(hint, screen.height * 0.55, HUD_FONT_SIZE, palette.foreground);
}

fn draw_menu(scene: &Scene, screen: &ScreenMapping) {
    let palette = &scene.palette;
    screen.centered_text(
        &GAME_TITLE.to_uppercase(),
        screen.height * 0.35,
        TITLE_FONT_SIZE,
        palette.enemy,
    );
    screen.centered_text(
        "ENTER to start",
        screen.height * 0.5,
        HUD_FONT_SIZE,
        palette.foreground,
    );
    screen.centered_text(
        "WASD move, arrows or mouse turn, SPACE or click fire, P pause, Q quit",
        screen.height * 0.6,
        HUD_FONT_SIZE * 0.75,
        palette.foreground,
    );
    if scene.hud.high_score > 0 {
        screen.centered_text(
            &format!("HIGH SCORE {}", scene.hud.high_score),
            screen.height * 0.7,
            HUD_FONT_SIZE,
            palette.accent,
        );
    }
}

fn draw_game_over(scene: &Scene, screen: &ScreenMapping) {
    let palette = &scene.palette;
    let hud = &scene.hud;
    screen.centered_text("GAME OVER", screen.height * 0.35, TITLE_FONT_SIZE, palette.enemy);
    screen.centered_text(
        &format!("SCORE {}", hud.score),
        screen.height * 0.5,
        HUD_FONT_SIZE,
        palette.foreground,
    );
    if hud.new_record {
        screen.centered_text(
            "NEW HIGH SCORE",
            screen.height * 0.57,
            HUD_FONT_SIZE,
            palette.accent,
        );
    } else if hud.high_score > 0 {
        screen.centered_text(
            &format!("HIGH SCORE {}", hud.high_score),
            screen.height * 0.57,
            HUD_FONT_SIZE,
            palette.foreground,
        );
    }
    screen.centered_text(
        "ENTER to play again, M for menu",
        screen.height * 0.7,
        HUD_FONT_SIZE,
        palette.foreground,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
