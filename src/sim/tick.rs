//! Deadline-driven phase transitions
//!
//! Remaining time is always recomputed from the deadline; these functions only
//! decide which phase a given remaining duration implies.

use super::state::GamePhase;
use crate::consts::CODE_WARNING_LEAD_MS;

/// Remaining time for a deadline, or 0 with no run in progress
#[inline]
pub fn remaining_ms(end_time: Option<f64>, now: f64) -> f64 {
    end_time.map(|end| end - now).unwrap_or(0.0)
}

/// Phase after one frame of a timed phase
///
/// Expiry is tested before the code-window threshold so an expired deadline
/// never shows the keypad. Untimed phases pass through unchanged.
pub fn advance_phase(phase: GamePhase, remaining_ms: f64, code_window_ms: f64) -> GamePhase {
    if !phase.is_timed() {
        return phase;
    }
    if remaining_ms <= 0.0 {
        return GamePhase::Fail;
    }
    if phase == GamePhase::Running && remaining_ms <= code_window_ms {
        return GamePhase::CodeWindow;
    }
    phase
}

/// Phase to resume into when a deadline is found at start-up
pub fn resume_phase(remaining_ms: f64, code_window_ms: f64) -> GamePhase {
    advance_phase(GamePhase::Running, remaining_ms, code_window_ms)
}

/// The last minute of RUNNING before the code window opens
pub fn in_warning_window(remaining_ms: f64, code_window_ms: f64) -> bool {
    remaining_ms > code_window_ms && remaining_ms <= code_window_ms + CODE_WARNING_LEAD_MS
}
