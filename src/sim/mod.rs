//! Pure simulation state
//!
//! Nothing in here touches the DOM, storage or a canvas. Every time-dependent
//! query takes `now` (epoch ms) explicitly so it can be driven from tests.

pub mod clock;
pub mod code;
pub mod flip;
pub mod state;
pub mod tick;

pub use clock::{FlipClock, countdown_digits, format_countdown};
pub use code::{CORRECT_CODE, CodeEntry};
pub use flip::{FlapPhase, FlipDigit, flap_scale};
pub use state::{
    GamePhase, ScrollState, StoryState, story_char_count, story_lines, visible_lines,
};
pub use tick::{advance_phase, in_warning_window, remaining_ms, resume_phase};
