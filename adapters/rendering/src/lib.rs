#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Gloom adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use gloom_core::{GameState, InputEvent, RayFrame, TileKind};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the color with every RGB channel multiplied by `brightness`.
    #[must_use]
    pub fn shade(self, brightness: f32) -> Self {
        let brightness = brightness.clamp(0.0, 1.0);

        Self {
            red: self.red * brightness,
            green: self.green * brightness,
            blue: self.blue * brightness,
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors used to paint the first-person view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Solid color used to clear each frame.
    pub clear: Color,
    /// Upper half of the view.
    pub ceiling: Color,
    /// Lower half of the view.
    pub floor: Color,
    /// Primary wall material.
    pub stone: Color,
    /// Decorative wall material.
    pub brick: Color,
    /// Enemy sprite fill.
    pub enemy: Color,
    /// Crosshair and HUD text.
    pub foreground: Color,
    /// Accent used for warnings and the muzzle flash.
    pub accent: Color,
}

impl Palette {
    /// Palette of the classic arena.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            clear: Color::from_rgb_u8(0x0a, 0x0a, 0x0a),
            ceiling: Color::from_rgb_u8(0x1a, 0x1a, 0x2e),
            floor: Color::from_rgb_u8(0x2a, 0x2a, 0x3e),
            stone: Color::from_rgb_u8(0x4a, 0x4a, 0x5a),
            brick: Color::from_rgb_u8(0x6a, 0x4a, 0x4a),
            enemy: Color::from_rgb_u8(0xea, 0x38, 0x4c),
            foreground: Color::from_rgb_u8(0xf0, 0xf0, 0xf0),
            accent: Color::from_rgb_u8(0xff, 0xc8, 0x57),
        }
    }

    /// Unshaded color for a wall of the provided kind.
    #[must_use]
    pub const fn wall(&self, kind: TileKind) -> Color {
        match kind {
            TileKind::Stone => self.stone,
            TileKind::Brick => self.brick,
            TileKind::Empty => self.floor,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic()
    }
}

/// Logical canvas the ray frame is expressed in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a viewport descriptor.
    ///
    /// Returns an error unless both dimensions are finite and positive.
    pub fn new(width: f32, height: f32) -> std::result::Result<Self, RenderingError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(width) || !valid(height) {
            return Err(RenderingError::InvalidViewport { width, height });
        }

        Ok(Self { width, height })
    }

    /// Width in logical pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height in logical pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Uniform scale and letterbox offset that fit the viewport into a screen.
    #[must_use]
    pub fn fit(&self, screen_width: f32, screen_height: f32) -> (f32, Vec2) {
        let scale = (screen_width / self.width)
            .min(screen_height / self.height)
            .max(0.0);
        let offset = Vec2::new(
            (screen_width - self.width * scale) / 2.0,
            (screen_height - self.height * scale) / 2.0,
        );
        (scale, offset)
    }
}

/// What a strip depicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StripKind {
    /// Wall slice.
    Wall,
    /// Enemy sprite slice drawn over the wall.
    Sprite,
}

/// Filled rectangle in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strip {
    /// What the strip depicts.
    pub kind: StripKind,
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
    /// Fill color.
    pub color: Color,
}

/// Converts a ray frame into the strips that paint it, back to front.
///
/// Columns whose ray ran out of range still get a dim brick slice at the
/// distance the march stopped.
#[must_use]
pub fn strips_from_frame(frame: &RayFrame, palette: &Palette) -> Vec<Strip> {
    let mut strips = Vec::with_capacity(frame.columns.len() * 2);
    for column in &frame.columns {
        let base = column.wall.map_or(palette.brick, |kind| palette.wall(kind));
        strips.push(Strip {
            kind: StripKind::Wall,
            origin: Vec2::new(column.screen_x, column.wall_top),
            size: Vec2::new(frame.column_width, column.wall_height),
            color: base.shade(column.brightness),
        });
        if let Some(sprite) = column.sprite {
            strips.push(Strip {
                kind: StripKind::Sprite,
                origin: Vec2::new(column.screen_x, sprite.top),
                size: Vec2::new(frame.column_width, sprite.size),
                color: palette.enemy,
            });
        }
    }
    strips
}

/// Heads-up display values.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Hud {
    /// Player health.
    pub health: u32,
    /// Rounds left.
    pub ammo: u32,
    /// Score of the current session.
    pub score: u32,
    /// Best score across sessions.
    pub high_score: u32,
    /// Enemies still active.
    pub enemies_remaining: usize,
    /// Whether the muzzle flash is visible.
    pub muzzle_flash: bool,
    /// Whether the last game over set a new record.
    pub new_record: bool,
}

impl Hud {
    /// Single-line summary drawn along the bottom edge while playing.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!(
            "HEALTH {}   AMMO {}   SCORE {}   ENEMIES {}",
            self.health, self.ammo, self.score, self.enemies_remaining
        )
    }
}

/// Scene description combining the first-person view and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Lifecycle state selecting which screen is drawn.
    pub state: GameState,
    /// Logical canvas the strips are expressed in.
    pub viewport: Viewport,
    /// Colors used for every element.
    pub palette: Palette,
    /// Wall and sprite strips, back to front.
    pub strips: Vec<Strip>,
    /// Heads-up display values.
    pub hud: Hud,
}

impl Scene {
    /// Creates an empty scene showing the menu.
    #[must_use]
    pub fn new(viewport: Viewport, palette: Palette) -> Self {
        Self {
            state: GameState::Menu,
            viewport,
            palette,
            strips: Vec::new(),
            hud: Hud::default(),
        }
    }

    /// Replaces the strips with those of `frame`, or clears them when absent.
    pub fn set_frame(&mut self, frame: Option<&RayFrame>) {
        self.strips.clear();
        if let Some(frame) = frame {
            self.strips.extend(strips_from_frame(frame, &self.palette));
        }
    }
}

/// Input captured by adapters for a single frame, in arrival order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Events observed since the previous frame.
    pub events: Vec<InputEvent>,
}

/// Time spent by the update closure, reported back for frame metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSimulationBreakdown {
    /// Time spent advancing the simulation.
    pub simulation: Duration,
    /// Time spent raycasting and filling the scene.
    pub scene_population: Duration,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Gloom scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Viewport dimensions must be finite and positive.
    InvalidViewport {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(
                    f,
                    "viewport dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
