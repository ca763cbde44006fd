//! Backend-neutral 2D draw commands
//!
//! Scene renderers append to a `DrawList`; the canvas backend replays it. This
//! keeps every renderer testable without a browser.

use glam::Vec2;

use crate::assets::ImageId;
use crate::ui::Rect;

/// sRGB color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn as_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }
}

/// Fill source
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear {
        from: Vec2,
        to: Vec2,
        stops: Vec<(f32, Color)>,
    },
    /// Concentric radial gradient
    Radial {
        center: Vec2,
        inner: f32,
        outer: f32,
        stops: Vec<(f32, Color)>,
    },
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Mono,
    Sans,
    /// Heavy display face used on the tiles
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f32,
    pub style: FontStyle,
    pub family: FontFamily,
}

impl Font {
    pub const fn new(size: f32, style: FontStyle, family: FontFamily) -> Self {
        Self {
            size,
            style,
            family,
        }
    }

    pub const fn mono(size: f32) -> Self {
        Self::new(size, FontStyle::Normal, FontFamily::Mono)
    }

    pub const fn sans(size: f32) -> Self {
        Self::new(size, FontStyle::Normal, FontFamily::Sans)
    }

    pub const fn bold(self) -> Self {
        Self {
            style: FontStyle::Bold,
            ..self
        }
    }

    pub const fn italic(self) -> Self {
        Self {
            style: FontStyle::Italic,
            ..self
        }
    }

    pub fn as_css(&self) -> String {
        let style = match self.style {
            FontStyle::Normal => "",
            FontStyle::Bold => "bold ",
            FontStyle::Italic => "italic ",
        };
        let family = match self.family {
            FontFamily::Mono => "\"Courier New\", monospace",
            FontFamily::Sans => "\"Arial\", sans-serif",
            FontFamily::Heavy => "\"Arial Black\", \"Helvetica Neue\", sans-serif",
        };
        format!("{}{}px {}", style, self.size.floor(), family)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Alphabetic,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Save,
    Restore,
    /// Intersect the clip with a rectangle
    Clip(Rect),
    Translate(Vec2),
    Scale(Vec2),
    /// Global alpha for following commands
    Alpha(f32),
    /// Shadow for following commands, until the enclosing `Restore`
    Shadow(Shadow),
    FillRect {
        rect: Rect,
        paint: Paint,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
    },
    Polyline {
        points: Vec<Vec2>,
        color: Color,
        width: f32,
        round_caps: bool,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
    Text {
        text: String,
        pos: Vec2,
        font: Font,
        color: Color,
        align: Align,
        baseline: Baseline,
    },
    /// Blit `src` (image pixels) of an image into `dst`
    Image {
        id: ImageId,
        src: Rect,
        dst: Rect,
    },
    /// Per-pixel grain over everything drawn so far
    Noise {
        alpha: f32,
        seed: u64,
    },
}

/// An ordered list of draw commands for one frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn save(&mut self) {
        self.push(DrawCmd::Save);
    }

    pub fn restore(&mut self) {
        self.push(DrawCmd::Restore);
    }

    pub fn clip(&mut self, rect: Rect) {
        self.push(DrawCmd::Clip(rect));
    }

    pub fn alpha(&mut self, alpha: f32) {
        self.push(DrawCmd::Alpha(alpha));
    }

    pub fn shadow(&mut self, color: Color, blur: f32, offset_y: f32) {
        self.push(DrawCmd::Shadow(Shadow {
            color,
            blur,
            offset_y,
        }));
    }

    /// Scale about a pivot point
    pub fn scale_about(&mut self, pivot: Vec2, scale: Vec2) {
        self.push(DrawCmd::Translate(pivot));
        self.push(DrawCmd::Scale(scale));
        self.push(DrawCmd::Translate(-pivot));
    }

    pub fn fill_rect(&mut self, rect: Rect, paint: impl Into<Paint>) {
        self.push(DrawCmd::FillRect {
            rect,
            paint: paint.into(),
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.push(DrawCmd::StrokeRect { rect, color, width });
    }

    pub fn polyline(&mut self, points: Vec<Vec2>, color: Color, width: f32) {
        self.push(DrawCmd::Polyline {
            points,
            color,
            width,
            round_caps: false,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, paint: impl Into<Paint>) {
        self.push(DrawCmd::FillCircle {
            center,
            radius,
            paint: paint.into(),
        });
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        font: Font,
        color: Color,
        align: Align,
    ) {
        self.push(DrawCmd::Text {
            text: text.into(),
            pos: Vec2::new(x, y),
            font,
            color,
            align,
            baseline: Baseline::Alphabetic,
        });
    }

    pub fn image(&mut self, id: ImageId, src: Rect, dst: Rect) {
        self.push(DrawCmd::Image { id, src, dst });
    }

    pub fn noise(&mut self, alpha: f32, seed: u64) {
        self.push(DrawCmd::Noise { alpha, seed });
    }

    /// All text strings in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// True if every `Save` has a matching `Restore`
    pub fn is_balanced(&self) -> bool {
        let mut depth: i32 = 0;
        for cmd in &self.cmds {
            match cmd {
                DrawCmd::Save => depth += 1,
                DrawCmd::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_css() {
        assert_eq!(Color::hex(0x3a3a3a).as_css(), "#3a3a3a");
        assert_eq!(Color::rgba(180, 200, 220, 0.3).as_css(), "rgba(180, 200, 220, 0.3)");
        assert_eq!(Color::rgb(1, 2, 3).with_alpha(-1.0).as_css(), "rgba(1, 2, 3, 0)");
    }

    #[test]
    fn test_font_css() {
        assert_eq!(Font::mono(18.0).as_css(), "18px \"Courier New\", monospace");
        assert_eq!(Font::sans(28.0).bold().as_css(), "bold 28px \"Arial\", sans-serif");
        assert_eq!(Font::mono(16.0).italic().as_css(), "italic 16px \"Courier New\", monospace");
    }

    #[test]
    fn test_balance() {
        let mut list = DrawList::new();
        list.save();
        list.text("hi", 0.0, 0.0, Font::mono(12.0), Color::rgb(0, 0, 0), Align::Left);
        assert!(!list.is_balanced());
        list.restore();
        assert!(list.is_balanced());
        assert!(list.contains_text("hi"));
    }
}
