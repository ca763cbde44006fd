//! Split-flap tile drawing
//!
//! A flipping tile is composited back to front: the static top half (old
//! character), the static bottom half (old before the midpoint, new after),
//! the animated flap squashed about the seam, the flap's shadow, then the seam
//! line on top.

use glam::Vec2;

use super::draw::{Align, Baseline, Color, DrawCmd, DrawList, Font, FontFamily, FontStyle, Paint};
use crate::consts::*;
use crate::sim::{FlapPhase, FlipClock, FlipDigit, flap_scale};
use crate::ui::Rect;

const TILE_TOP: Color = Color::hex(0x3a3a3a);
const TILE_UPPER: Color = Color::hex(0x2d2d2d);
const TILE_MID: Color = Color::hex(0x252525);
const TILE_LOWER: Color = Color::hex(0x1a1a1a);
const TILE_BOTTOM: Color = Color::hex(0x0f0f0f);
const SEAM: Color = Color::hex(0x0a0a0a);
const GLYPH: Color = Color::hex(0xe8e8e8);

/// Flap scales below this are not drawn
const MIN_FLAP_SCALE: f32 = 0.01;

/// Where the clock sits on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockLayout {
    pub start_x: f32,
    pub start_y: f32,
}

impl ClockLayout {
    pub const COLON_WIDTH: f32 = 40.0;
    pub const FRAME_PADDING: f32 = 15.0;
    pub const START_Y: f32 = 160.0;

    /// Horizontally centred at the standard height
    pub fn centered() -> Self {
        Self {
            start_x: (CANVAS_WIDTH - Self::total_width()) / 2.0,
            start_y: Self::START_Y,
        }
    }

    pub fn minutes_width() -> f32 {
        3.0 * TILE_WIDTH + 2.0 * TILE_GAP
    }

    pub fn seconds_width() -> f32 {
        2.0 * TILE_WIDTH + TILE_GAP
    }

    pub fn total_width() -> f32 {
        Self::minutes_width() + Self::COLON_WIDTH + Self::seconds_width()
    }

    /// Left edge of tile `index` (0..5)
    pub fn tile_x(&self, index: usize) -> f32 {
        if index < 3 {
            self.start_x + index as f32 * (TILE_WIDTH + TILE_GAP)
        } else {
            self.start_x
                + Self::minutes_width()
                + Self::COLON_WIDTH
                + (index - 3) as f32 * (TILE_WIDTH + TILE_GAP)
        }
    }

    pub fn colon_x(&self) -> f32 {
        self.start_x + Self::minutes_width() + Self::COLON_WIDTH / 2.0
    }

    /// Metal frames around the minute and second groups
    pub fn frames(&self) -> [Rect; 2] {
        let pad = Self::FRAME_PADDING;
        let h = TILE_HEIGHT + pad * 2.0;
        [
            Rect::new(
                self.start_x - pad,
                self.start_y - pad,
                Self::minutes_width() + pad * 2.0,
                h,
            ),
            Rect::new(
                self.start_x + Self::minutes_width() + Self::COLON_WIDTH - pad,
                self.start_y - pad,
                Self::seconds_width() + pad * 2.0,
                h,
            ),
        ]
    }
}

/// Draw the whole clock: frames, five tiles and the colon
pub fn draw_clock(out: &mut DrawList, clock: &FlipClock, now: f64, layout: &ClockLayout) {
    for frame in layout.frames() {
        draw_metal_frame(out, frame);
    }
    for (i, digit) in clock.digits.iter().enumerate() {
        draw_flip_digit(out, digit, now, layout.tile_x(i), layout.start_y);
    }
    draw_colon(out, layout.colon_x(), layout.start_y);
}

fn tile_font() -> Font {
    Font::new((TILE_HEIGHT * 0.75).floor(), FontStyle::Bold, FontFamily::Heavy)
}

fn draw_tile_background(out: &mut DrawList, x: f32, y: f32) {
    let (w, h) = (TILE_WIDTH, TILE_HEIGHT);
    out.fill_rect(
        Rect::new(x, y, w, h),
        Paint::Linear {
            from: Vec2::new(x, y),
            to: Vec2::new(x, y + h),
            stops: vec![
                (0.0, TILE_TOP),
                (0.02, TILE_UPPER),
                (0.5, TILE_MID),
                (0.98, TILE_LOWER),
                (1.0, TILE_BOTTOM),
            ],
        },
    );

    // Bevel: light top-left, dark bottom-right
    out.polyline(
        vec![Vec2::new(x, y + h), Vec2::new(x, y), Vec2::new(x + w, y)],
        Color::hex(0x4a4a4a),
        2.0,
    );
    out.polyline(
        vec![Vec2::new(x + w, y), Vec2::new(x + w, y + h), Vec2::new(x, y + h)],
        SEAM,
        2.0,
    );

    let seam_y = y + h / 2.0;
    out.fill_rect(Rect::new(x, seam_y - 1.5, w, 3.0), SEAM);
    out.fill_rect(
        Rect::new(x + 2.0, seam_y - 3.0, w - 4.0, 2.0),
        Color::rgba(255, 255, 255, 0.05),
    );
}

/// A glyph centred on the tile, visible only inside `clip`
fn draw_glyph(out: &mut DrawList, c: char, x: f32, y: f32, clip: Rect) {
    out.save();
    out.clip(clip);
    out.shadow(Color::rgba(0, 0, 0, 0.5), 4.0, 2.0);
    out.push(DrawCmd::Text {
        text: c.to_string(),
        pos: Vec2::new(x + TILE_WIDTH / 2.0, y + TILE_HEIGHT / 2.0),
        font: tile_font(),
        color: GLYPH,
        align: Align::Center,
        baseline: Baseline::Middle,
    });
    out.restore();
}

pub fn draw_flip_digit(out: &mut DrawList, digit: &FlipDigit, now: f64, x: f32, y: f32) {
    let (w, h) = (TILE_WIDTH, TILE_HEIGHT);
    let half = h / 2.0;
    let seam_y = y + half;
    let t = digit.progress(now);

    draw_tile_background(out, x, y);

    if !digit.is_flipping() || t >= 1.0 {
        draw_glyph(out, digit.current(), x, y, Rect::new(x, y, w, h));
        return;
    }

    let top = Rect::new(x, y, w, half);
    let bottom = Rect::new(x, seam_y, w, half);
    let phase = FlapPhase::for_progress(t);
    let scale = flap_scale(t, phase);

    draw_glyph(out, digit.current(), x, y, top);
    let bottom_char = match phase {
        FlapPhase::Folding => digit.current(),
        FlapPhase::Unfolding => digit.next(),
    };
    draw_glyph(out, bottom_char, x, y, bottom);

    if scale > MIN_FLAP_SCALE {
        let pivot = Vec2::new(x + w / 2.0, seam_y);
        match phase {
            FlapPhase::Folding => {
                // Upper flap of the old character falling toward the seam
                out.save();
                out.clip(Rect::new(x, y, w, half + 5.0));
                out.scale_about(pivot, Vec2::new(1.0, scale));
                out.fill_rect(
                    top,
                    Paint::Linear {
                        from: Vec2::new(x, y),
                        to: Vec2::new(x, seam_y),
                        stops: vec![(0.0, TILE_TOP), (1.0, TILE_MID)],
                    },
                );
                draw_glyph(out, digit.current(), x, y, top);
                out.restore();

                out.fill_rect(
                    Rect::new(x + 2.0, seam_y, w - 4.0, half * (1.0 - scale) * 0.3 + 5.0),
                    Color::rgba(0, 0, 0, t * 0.6),
                );
            }
            FlapPhase::Unfolding => {
                // Lower flap of the new character opening from the seam
                out.save();
                out.clip(Rect::new(x, seam_y - 5.0, w, half + 5.0));
                out.scale_about(pivot, Vec2::new(1.0, scale));
                out.fill_rect(
                    bottom,
                    Paint::Linear {
                        from: Vec2::new(x, seam_y),
                        to: Vec2::new(x, y + h),
                        stops: vec![(0.0, TILE_MID), (1.0, TILE_LOWER)],
                    },
                );
                draw_glyph(out, digit.next(), x, y, bottom);
                out.restore();

                out.fill_rect(
                    Rect::new(x + 2.0, seam_y, w - 4.0, half * scale * 0.2 + 3.0),
                    Color::rgba(0, 0, 0, (1.0 - t) * 0.5),
                );
            }
        }
    }

    out.fill_rect(Rect::new(x, seam_y - 1.0, w, 2.0), SEAM);
}

fn draw_colon(out: &mut DrawList, x: f32, y: f32) {
    let spacing = TILE_HEIGHT * 0.25;
    let mid = y + TILE_HEIGHT / 2.0;
    out.save();
    out.shadow(Color::rgba(0, 0, 0, 0.5), 3.0, 0.0);
    for dy in [-spacing, spacing] {
        out.circle(Vec2::new(x, mid + dy), 12.0, Color::hex(0x888888));
    }
    out.restore();
}

fn draw_metal_frame(out: &mut DrawList, frame: Rect) {
    const FRAME_WIDTH: f32 = 8.0;
    let Rect { x, y, w, h } = frame;
    out.stroke_rect(
        Rect::new(
            x - FRAME_WIDTH / 2.0,
            y - FRAME_WIDTH / 2.0,
            w + FRAME_WIDTH,
            h + FRAME_WIDTH,
        ),
        Color::hex(0x5a5a5a),
        FRAME_WIDTH,
    );

    let (l, t) = (x - FRAME_WIDTH, y - FRAME_WIDTH);
    let (r, b) = (x + w + FRAME_WIDTH, y + h + FRAME_WIDTH);
    out.polyline(
        vec![Vec2::new(l, b), Vec2::new(l, t), Vec2::new(r, t)],
        Color::hex(0x6a6a6a),
        2.0,
    );
    out.polyline(
        vec![Vec2::new(r, t), Vec2::new(r, b), Vec2::new(l, b)],
        Color::hex(0x3a3a3a),
        2.0,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(out: &DrawList) -> Vec<String> {
        out.texts().map(str::to_string).collect()
    }

    #[test]
    fn test_layout_is_centered() {
        let layout = ClockLayout::centered();
        // 3*110 + 24 + 40 + 2*110 + 12 = 626
        assert_eq!(ClockLayout::total_width(), 626.0);
        assert_eq!(layout.start_x, 87.0);
        assert_eq!(layout.tile_x(3), 87.0 + 354.0 + 40.0);
        assert_eq!(layout.colon_x(), 87.0 + 354.0 + 20.0);
        assert_eq!(layout.frames()[0].w, 384.0);
    }

    #[test]
    fn test_idle_tile_draws_one_glyph() {
        let digit = FlipDigit::new('7');
        let mut out = DrawList::new();
        draw_flip_digit(&mut out, &digit, 0.0, 0.0, 0.0);
        assert_eq!(glyphs(&out), vec!["7"]);
        assert!(out.is_balanced());
    }

    #[test]
    fn test_folding_shows_old_char_on_both_halves() {
        let mut digit = FlipDigit::new('5');
        digit.set_char('4', 1_000.0);
        let mut out = DrawList::new();
        draw_flip_digit(&mut out, &digit, 1_000.0 + FLIP_DURATION_MS * 0.25, 0.0, 0.0);
        // Top half, bottom half, flap
        assert_eq!(glyphs(&out), vec!["5", "5", "5"]);
        assert!(out.is_balanced());
    }

    #[test]
    fn test_unfolding_reveals_new_char_below() {
        let mut digit = FlipDigit::new('5');
        digit.set_char('4', 1_000.0);
        let mut out = DrawList::new();
        draw_flip_digit(&mut out, &digit, 1_000.0 + FLIP_DURATION_MS * 0.75, 0.0, 0.0);
        assert_eq!(glyphs(&out), vec!["5", "4", "4"]);
        assert!(out.is_balanced());
    }

    #[test]
    fn test_flap_skipped_at_edge_of_fold() {
        let mut digit = FlipDigit::new('5');
        digit.set_char('4', 0.0);
        let mut out = DrawList::new();
        // Exactly at the midpoint the flap is edge-on
        draw_flip_digit(&mut out, &digit, FLIP_DURATION_MS * 0.5, 0.0, 0.0);
        assert_eq!(glyphs(&out), vec!["5", "4"]);
    }

    #[test]
    fn test_clock_draws_five_tiles() {
        let clock = FlipClock::from_digits("00600");
        let mut out = DrawList::new();
        draw_clock(&mut out, &clock, 0.0, &ClockLayout::centered());
        assert_eq!(glyphs(&out).concat(), "00600");
        assert!(out.is_balanced());
    }
}
