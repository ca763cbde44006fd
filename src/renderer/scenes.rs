//! One renderer per phase
//!
//! Renderers only read the controller; every animated value they draw was
//! already advanced by `Game::frame`.

use glam::Vec2;

use super::draw::{Align, Color, DrawList, Font, FontFamily, FontStyle, Paint};
use super::effects::{full_screen, noise, vignette};
use super::flip_clock::{ClockLayout, draw_clock};
use crate::assets::{Assets, ImageId};
use crate::consts::*;
use crate::fx::ParticleSystem;
use crate::game::Game;
use crate::sim::{format_countdown, visible_lines};
use crate::ui::{KeypadKey, RESTART_BUTTON, Rect, keypad_buttons};

const CENTER_X: f32 = CANVAS_WIDTH / 2.0;

/// Logo placement: (image, scale, top y)
const LOGOS: [(ImageId, f32, f32); 2] = [
    (ImageId::Logo, 0.6, 60.0),
    (ImageId::Logo2, 0.35, 220.0),
];

/// Story text placement
const STORY_X: f32 = 280.0;
const STORY_Y: f32 = 200.0;
const STORY_LINE_HEIGHT: f32 = 28.0;

/// Background scrolled down by `offset` canvas pixels
fn background(out: &mut DrawList, assets: &Assets, offset: f32) {
    let Some(base) = assets.get(ImageId::Base) else {
        out.fill_rect(full_screen(), Color::hex(0x0a0a0a));
        return;
    };
    let scale = CANVAS_WIDTH / base.width;
    let max_offset = (base.height * scale - CANVAS_HEIGHT).max(0.0);
    let offset = offset.clamp(0.0, max_offset);
    out.image(
        ImageId::Base,
        Rect::new(0.0, offset / scale, base.width, CANVAS_HEIGHT / scale),
        full_screen(),
    );
}

/// The two logos, raised by `rise` pixels
fn logos(out: &mut DrawList, assets: &Assets, rise: f32) {
    for (id, scale, top) in LOGOS {
        if let Some(size) = assets.get(id) {
            let (w, h) = (size.width * scale, size.height * scale);
            out.image(
                id,
                Rect::new(0.0, 0.0, size.width, size.height),
                Rect::new((CANVAS_WIDTH - w) / 2.0, top - rise, w, h),
            );
        }
    }
}

fn pulse(phase: f32, base: f32, swing: f32) -> f32 {
    base + phase.sin() * swing
}

pub fn intro(out: &mut DrawList, game: &Game, assets: &Assets) {
    background(out, assets, 0.0);
    logos(out, assets, 0.0);
    game.weather().rain.render(out, 1.0);

    let alpha = pulse(game.flicker(), 0.5, 0.3);
    out.text(
        "[ Click to continue ]",
        CENTER_X,
        520.0,
        Font::mono(18.0),
        Color::rgba(200, 200, 200, alpha),
        Align::Center,
    );
    out.text(
        "A = admin | D = debug | R = reset",
        CENTER_X,
        580.0,
        Font::mono(12.0),
        Color::hex(0x333333),
        Align::Center,
    );

    vignette(out);
}

pub fn scroll(out: &mut DrawList, game: &Game, assets: &Assets) {
    let scroll = game.scroll();
    background(out, assets, scroll.offset);

    let logo_fade = scroll.logo_fade();
    if logo_fade > 0.0 {
        out.save();
        out.alpha(logo_fade);
        logos(out, assets, scroll.offset * 0.5);
        out.restore();
    }

    // Outdoors gives way to the hatch: rain thins as fog gathers
    let rain_fade = scroll.rain_fade();
    game.weather().fog.render(out, 1.0 - rain_fade);
    if rain_fade > 0.0 {
        game.weather().rain.render(out, rain_fade);
    }

    vignette(out);
}

pub fn story(out: &mut DrawList, game: &Game, assets: &Assets) {
    background(out, assets, f32::MAX);
    let weather = game.weather();
    weather.fog.render(out, 1.0);
    weather.smoke.render(out, 1.0);

    let story = game.story();
    out.fill_rect(full_screen(), Color::rgba(0, 0, 0, story.alpha * 0.7));

    out.save();
    out.alpha(story.alpha);
    let lines = game.story_lines();
    for (i, shown) in visible_lines(lines, story.revealed) {
        let line = &lines[i];
        let (font, color) = if line.contains("4  8  15") {
            (Font::mono(20.0).bold(), Color::hex(0xff4444))
        } else if line.starts_with("[Click") {
            (Font::mono(16.0).italic(), Color::hex(0x888888))
        } else {
            (Font::mono(18.0), Color::hex(0xcccccc))
        };
        out.text(
            shown,
            STORY_X,
            STORY_Y + i as f32 * STORY_LINE_HEIGHT,
            font,
            color,
            Align::Left,
        );
    }
    out.restore();

    vignette(out);
}

/// Header colour escalates as the run drains
pub fn header_color(remaining_ms: f64, total_ms: f64) -> Color {
    let ratio = if total_ms > 0.0 { remaining_ms / total_ms } else { 0.0 };
    if ratio < 0.1 {
        Color::hex(0xaa4444)
    } else if ratio < 0.25 {
        Color::hex(0x886644)
    } else {
        Color::hex(0x666666)
    }
}

pub fn running(out: &mut DrawList, game: &Game, now: f64, remaining: f64) {
    out.fill_rect(full_screen(), Color::hex(0x0c0c0c));

    out.text(
        "SYSTEM COUNTDOWN",
        CENTER_X,
        100.0,
        Font::sans(28.0).bold(),
        header_color(remaining, game.settings().total_ms()),
        Align::Center,
    );

    draw_clock(out, game.clock(), now, &ClockLayout::centered());

    out.text(
        "EXECUTE PROTOCOL",
        CENTER_X,
        380.0,
        Font::sans(18.0),
        Color::hex(0x555555),
        Align::Center,
    );

    if game.in_warning(remaining) {
        out.text(
            "PREPARE TO ENTER THE NUMBERS",
            CENTER_X,
            430.0,
            Font::sans(22.0).bold(),
            Color::rgba(255, 100, 0, pulse(game.flicker(), 0.5, 0.3)),
            Align::Center,
        );
    }

    vignette(out);
    noise(out, 0.02, game.frame_count());
}

/// Left column centre on the code window screen
const CODE_COLUMN_X: f32 = 220.0;

pub fn code_window(out: &mut DrawList, game: &Game, remaining: f64) {
    out.fill_rect(full_screen(), Color::hex(0x0a0505));

    let border = pulse(game.flicker(), 0.3, 0.2);
    out.stroke_rect(
        Rect::new(4.0, 4.0, CANVAS_WIDTH - 8.0, CANVAS_HEIGHT - 8.0),
        Color::rgba(200, 50, 50, border),
        8.0,
    );

    let red = Color::hex(0xcc0000);
    out.save();
    out.shadow(Color::hex(0xff0000), 20.0, 0.0);
    out.text(
        format_countdown(remaining),
        CODE_COLUMN_X,
        110.0,
        Font::new(64.0, FontStyle::Bold, FontFamily::Heavy),
        red,
        Align::Center,
    );
    out.restore();

    out.text(
        "ENTER THE NUMBERS",
        CODE_COLUMN_X,
        165.0,
        Font::sans(26.0).bold(),
        Color::hex(0xff4444),
        Align::Center,
    );

    let field = Rect::new(40.0, 200.0, 360.0, 55.0);
    out.fill_rect(field, Color::hex(0x111111));
    out.stroke_rect(field, Color::hex(0xaa3333), 2.0);
    let entered = if game.code().is_empty() {
        "_"
    } else {
        game.code().as_str()
    };
    out.text(
        entered,
        55.0,
        238.0,
        Font::mono(30.0).bold(),
        Color::hex(0x00dd00),
        Align::Left,
    );

    out.text(
        "4  8  15  16  23  42",
        CODE_COLUMN_X,
        295.0,
        Font::mono(16.0),
        Color::hex(0x555555),
        Align::Center,
    );

    for button in keypad_buttons() {
        out.fill_rect(button.rect, Color::hex(0x1a1a1a));
        out.stroke_rect(button.rect, Color::hex(0x555555), 2.0);
        let color = match button.key {
            KeypadKey::Clear => Color::hex(0xff6600),
            KeypadKey::Enter => Color::hex(0x00cc00),
            KeypadKey::Digit(_) => Color::hex(0xaaaaaa),
        };
        out.text(
            button.key.label(),
            button.rect.center_x(),
            button.rect.center_y() + 6.0,
            Font::mono(18.0).bold(),
            color,
            Align::Center,
        );
    }

    let hint = Color::hex(0x666666);
    out.text(
        "Click or use keyboard",
        CODE_COLUMN_X,
        520.0,
        Font::mono(13.0),
        hint,
        Align::Center,
    );
    out.text(
        "Enter = submit | Backspace = delete",
        CODE_COLUMN_X,
        540.0,
        Font::mono(13.0),
        hint,
        Align::Center,
    );

    vignette(out);
    noise(out, 0.025, game.frame_count());
}

fn restart_button(out: &mut DrawList, fill: Color, stroke: Color, label: Color) {
    out.fill_rect(RESTART_BUTTON, fill);
    out.stroke_rect(RESTART_BUTTON, stroke, 2.0);
    out.text(
        "RESTART",
        CENTER_X,
        RESTART_BUTTON.y + 32.0,
        Font::mono(20.0).bold(),
        label,
        Align::Center,
    );
}

pub fn success(out: &mut DrawList, game: &Game) {
    out.fill_rect(full_screen(), Color::hex(0x001a00));
    out.fill_rect(
        full_screen(),
        Paint::Radial {
            center: Vec2::new(CENTER_X, CANVAS_HEIGHT / 2.0),
            inner: 0.0,
            outer: 300.0,
            stops: vec![
                (0.0, Color::rgba(0, 100, 0, 0.3)),
                (1.0, Color::rgba(0, 0, 0, 0.0)),
            ],
        },
    );

    out.save();
    out.shadow(Color::hex(0x00ff00), 30.0, 0.0);
    out.text(
        "SYSTEM RESET",
        CENTER_X,
        250.0,
        Font::sans(64.0).bold(),
        Color::hex(0x00ff00),
        Align::Center,
    );
    out.restore();

    out.text(
        "COUNTDOWN AVERTED",
        CENTER_X,
        320.0,
        Font::sans(32.0),
        Color::hex(0x00cc00),
        Align::Center,
    );
    out.text(
        format!("{:03}:00 RESTORED", game.settings().countdown_minutes),
        CENTER_X,
        380.0,
        Font::sans(24.0),
        Color::hex(0x008800),
        Align::Center,
    );

    restart_button(out, Color::hex(0x002200), Color::hex(0x00cc00), Color::hex(0x00ff00));
    vignette(out);
}

pub fn fail(out: &mut DrawList, game: &Game) {
    let flash = game.flash().sin() > 0.0;

    out.fill_rect(
        full_screen(),
        if flash { Color::hex(0x330000) } else { Color::hex(0x000000) },
    );
    if flash {
        for i in 0..10 {
            out.fill_rect(
                Rect::new(0.0, i as f32 * 60.0, CANVAS_WIDTH, 30.0),
                Color::hex(0x550000),
            );
        }
    }

    out.save();
    out.shadow(Color::hex(0xff0000), if flash { 50.0 } else { 20.0 }, 0.0);
    out.text(
        "SYSTEM FAILURE",
        CENTER_X,
        250.0,
        Font::sans(72.0).bold(),
        if flash { Color::hex(0xff0000) } else { Color::hex(0x880000) },
        Align::Center,
    );
    out.restore();

    out.text(
        "PROTOCOL NOT EXECUTED",
        CENTER_X,
        320.0,
        Font::sans(28.0),
        Color::hex(0xff4444),
        Align::Center,
    );

    restart_button(out, Color::hex(0x220000), Color::hex(0xcc0000), Color::hex(0xff0000));
    vignette(out);
}
