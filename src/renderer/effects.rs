//! Screen-space effects and overlays

use glam::Vec2;

use super::draw::{Align, Color, DrawList, Font, Paint};
use crate::consts::*;
use crate::ui::Rect;

pub fn full_screen() -> Rect {
    Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT)
}

/// Darken toward the corners
pub fn vignette(out: &mut DrawList) {
    let center = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
    out.fill_rect(
        full_screen(),
        Paint::Radial {
            center,
            inner: CANVAS_WIDTH * 0.2,
            outer: CANVAS_WIDTH * 0.7,
            stops: vec![
                (0.0, Color::rgba(0, 0, 0, 0.0)),
                (1.0, Color::rgba(0, 0, 0, 0.5)),
            ],
        },
    );
}

/// Film grain; `seed` varies it frame to frame
pub fn noise(out: &mut DrawList, alpha: f32, seed: u64) {
    out.noise(alpha, seed);
}

/// Loading bar geometry
const BAR_WIDTH: f32 = 200.0;
const BAR_HEIGHT: f32 = 10.0;

pub fn loading_screen(out: &mut DrawList, progress: f32) {
    out.fill_rect(full_screen(), Color::hex(0x000000));
    out.text(
        "LOADING...",
        CANVAS_WIDTH / 2.0,
        CANVAS_HEIGHT / 2.0,
        Font::mono(24.0),
        Color::hex(0x666666),
        Align::Center,
    );

    let bar = Rect::new(
        (CANVAS_WIDTH - BAR_WIDTH) / 2.0,
        CANVAS_HEIGHT / 2.0 + 30.0,
        BAR_WIDTH,
        BAR_HEIGHT,
    );
    out.stroke_rect(bar, Color::hex(0x444444), 1.0);
    out.fill_rect(
        Rect::new(bar.x, bar.y, bar.w * progress.clamp(0.0, 1.0), bar.h),
        Color::hex(0xcc0000),
    );
}

/// Values shown by the debug overlay
#[derive(Debug, Clone, PartialEq)]
pub struct DebugInfo {
    pub phase: &'static str,
    pub end_time: Option<f64>,
    pub remaining_ms: f64,
    pub flipping: String,
    pub digits: String,
}

impl DebugInfo {
    pub fn lines(&self) -> [String; 5] {
        let end_time = match self.end_time {
            Some(t) => format!("{:.0}", t),
            None => "null".to_string(),
        };
        [
            format!("State: {}", self.phase),
            format!("endTime: {}", end_time),
            format!("remainingMs: {}", self.remaining_ms.round()),
            format!("Flipping: {}", self.flipping),
            format!("Digits: {}", self.digits),
        ]
    }
}

pub fn debug_overlay(out: &mut DrawList, info: &DebugInfo) {
    let panel = Rect::new(10.0, 10.0, 280.0, 120.0);
    let green = Color::hex(0x00ff00);
    out.fill_rect(panel, Color::rgba(0, 0, 0, 0.85));
    out.stroke_rect(panel, green, 1.0);
    for (i, line) in info.lines().into_iter().enumerate() {
        out.text(
            line,
            20.0,
            35.0 + i as f32 * 20.0,
            Font::mono(14.0),
            green,
            Align::Left,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawCmd;

    #[test]
    fn test_debug_lines() {
        let info = DebugInfo {
            phase: "RUNNING",
            end_time: Some(1_700_000_360_000.0),
            remaining_ms: 359_000.4,
            flipping: "00011".to_string(),
            digits: "00559".to_string(),
        };
        let lines = info.lines();
        assert_eq!(lines[0], "State: RUNNING");
        assert_eq!(lines[1], "endTime: 1700000360000");
        assert_eq!(lines[2], "remainingMs: 359000");
        assert_eq!(lines[3], "Flipping: 00011");

        let idle = DebugInfo {
            end_time: None,
            ..info
        };
        assert_eq!(idle.lines()[1], "endTime: null");
    }

    #[test]
    fn test_loading_bar_tracks_progress() {
        let mut out = DrawList::new();
        loading_screen(&mut out, 0.5);
        assert!(out.contains_text("LOADING..."));
        let last = out.cmds().last().cloned();
        match last {
            Some(DrawCmd::FillRect { rect, .. }) => assert_eq!(rect.w, 100.0),
            other => panic!("unexpected {:?}", other),
        }
    }
}
