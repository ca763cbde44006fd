//! Canvas 2D rendering module
//!
//! Scenes emit a backend-neutral `DrawList`; on wasm32 the `canvas` backend
//! replays it onto a `CanvasRenderingContext2d`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw;
pub mod effects;
pub mod flip_clock;
pub mod scenes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use draw::{
    Align, Baseline, Color, DrawCmd, DrawList, Font, FontFamily, FontStyle, Paint, Shadow,
};
pub use flip_clock::ClockLayout;

use crate::assets::Assets;
use crate::game::Game;
use crate::sim::GamePhase;
use effects::DebugInfo;

/// Draw one whole frame: the loading screen until assets settle, otherwise
/// the scene for the current phase, then the debug overlay when enabled
pub fn render_frame(game: &Game, assets: &Assets, now: f64, remaining: f64, out: &mut DrawList) {
    if !assets.is_ready() {
        effects::loading_screen(out, assets.progress());
    } else {
        match game.phase() {
            GamePhase::Intro => scenes::intro(out, game, assets),
            GamePhase::Scroll => scenes::scroll(out, game, assets),
            GamePhase::Story => scenes::story(out, game, assets),
            GamePhase::Running => scenes::running(out, game, now, remaining),
            GamePhase::CodeWindow => scenes::code_window(out, game, remaining),
            GamePhase::Success => scenes::success(out, game),
            GamePhase::Fail => scenes::fail(out, game),
        }
    }

    if game.debug() {
        let clock = game.clock();
        effects::debug_overlay(
            out,
            &DebugInfo {
                phase: game.phase().as_str(),
                end_time: game.end_time(),
                remaining_ms: remaining,
                flipping: clock.flip_flags(),
                digits: clock.text(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageId;
    use crate::persistence::MemoryStorage;
    use crate::platform::NullSink;

    const T0: f64 = 1_700_000_000_000.0;

    fn game() -> Game {
        Game::new(Box::new(MemoryStorage::new()), Box::new(NullSink), T0, 1)
    }

    fn ready() -> Assets {
        let mut assets = Assets::new();
        for id in ImageId::ALL {
            assets.settle(id, None);
        }
        assets
    }

    fn render(game: &Game, assets: &Assets, remaining: f64) -> DrawList {
        let mut out = DrawList::new();
        render_frame(game, assets, T0, remaining, &mut out);
        out
    }

    #[test]
    fn test_loading_screen_until_ready() {
        let game = game();
        let out = render(&game, &Assets::new(), 0.0);
        assert!(out.contains_text("LOADING..."));
        assert!(!out.contains_text("[ Click to continue ]"));

        let out = render(&game, &ready(), 0.0);
        assert!(out.contains_text("[ Click to continue ]"));
    }

    #[test]
    fn test_debug_overlay_drawn_last_even_while_loading() {
        let mut game = game();
        game.toggle_debug();
        let out = render(&game, &Assets::new(), 0.0);
        assert_eq!(out.texts().last(), Some("Digits: 00600"));
        assert!(out.contains_text("State: INTRO"));
    }

    #[test]
    fn test_running_scene() {
        let mut game = game();
        game.start_run(T0);
        let out = render(&game, &ready(), 360_000.0);
        assert!(out.contains_text("SYSTEM COUNTDOWN"));
        assert!(out.contains_text("EXECUTE PROTOCOL"));
        assert!(!out.contains_text("PREPARE TO ENTER THE NUMBERS"));
        assert!(out.is_balanced());

        let out = render(&game, &ready(), 270_000.0);
        assert!(out.contains_text("PREPARE TO ENTER THE NUMBERS"));
    }

    #[test]
    fn test_code_window_scene() {
        let mut game = game();
        game.start_run(T0);
        game.update(T0 + 300_000.0);
        let out = render(&game, &ready(), 60_000.0);
        assert!(out.contains_text("001:00"));
        assert!(out.contains_text("_"));
        assert!(out.contains_text("CLR"));
        assert!(out.contains_text("EXE"));
        assert!(out.is_balanced());
    }

    #[test]
    fn test_terminal_scenes() {
        let mut game = game();
        game.start_run(T0);
        game.update(T0 + 400_000.0);
        let out = render(&game, &ready(), 0.0);
        assert!(out.contains_text("SYSTEM FAILURE"));
        assert!(out.contains_text("RESTART"));
        assert!(out.is_balanced());
    }
}
