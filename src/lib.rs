//! Hatch Countdown - a flip-clock countdown toy with a scripted intro
//!
//! Core modules:
//! - `sim`: Pure state (flip digits, clock, code buffer, phase machine types)
//! - `fx`: Ambient particle systems (rain, fog, smoke)
//! - `renderer`: Scene renderers emitting backend-neutral canvas commands
//! - `game`: The session controller that owns all of the above
//! - `platform`: Input routing and the presentation sink seam
//! - `persistence`: Key-value storage and the persisted deadline

pub mod assets;
pub mod audio;
pub mod fx;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::Game;
pub use settings::{Settings, SettingsError};
pub use sim::GamePhase;

/// Game configuration constants
pub mod consts {
    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Flip tile animation length (ms)
    pub const FLIP_DURATION_MS: f64 = 300.0;
    /// Number of tiles in the MMM:SS display
    pub const CLOCK_DIGITS: usize = 5;

    /// Flip tile geometry
    pub const TILE_WIDTH: f32 = 110.0;
    pub const TILE_HEIGHT: f32 = 150.0;
    pub const TILE_GAP: f32 = 12.0;

    /// Rain pool
    pub const RAIN_DROP_COUNT: usize = 100;
    pub const RAIN_SPEED_MIN: f32 = 400.0;
    pub const RAIN_SPEED_MAX: f32 = 700.0;
    pub const RAIN_LENGTH_MIN: f32 = 15.0;
    pub const RAIN_LENGTH_MAX: f32 = 30.0;
    pub const RAIN_OPACITY: f32 = 0.3;

    /// Fog pool
    pub const FOG_BLOB_COUNT: usize = 40;

    /// Scroll choreography (pixels per second)
    pub const SCROLL_START_SPEED: f32 = 180.0;
    pub const SCROLL_CLICK_BOOST: f32 = 120.0;
    pub const SCROLL_MAX_SPEED: f32 = 600.0;
    pub const SCROLL_MIN_SPEED: f32 = 60.0;
    /// Distance from target where the scroll starts easing out
    pub const SCROLL_EASE_DISTANCE: f32 = 100.0;
    /// Offset slack treated as "arrived"
    pub const SCROLL_SNAP: f32 = 10.0;

    /// Typewriter rate for the story text
    pub const STORY_CHARS_PER_SEC: f64 = 30.0;
    /// Story overlay fade-in (alpha per second) and ceiling
    pub const STORY_FADE_RATE: f32 = 0.6;
    pub const STORY_MAX_ALPHA: f32 = 0.85;

    /// Largest frame delta fed to the simulations (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Lead time before the code window where the warning flickers (ms)
    pub const CODE_WARNING_LEAD_MS: f64 = 60_000.0;
}

/// Milliseconds in one minute
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Whole seconds shown for a remaining duration (rounded up, never negative)
#[inline]
pub fn display_seconds(remaining_ms: f64) -> u64 {
    if remaining_ms <= 0.0 {
        0
    } else {
        (remaining_ms / 1000.0).ceil() as u64
    }
}

/// Split a remaining duration into the (minutes, seconds) pair the clock shows
#[inline]
pub fn minutes_seconds(remaining_ms: f64) -> (u64, u64) {
    let total = display_seconds(remaining_ms);
    (total / 60, total % 60)
}
