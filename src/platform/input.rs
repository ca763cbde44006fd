//! Input events and routing to controller actions

use crate::game::Game;
use crate::sim::GamePhase;
use crate::ui::{KeypadKey, RESTART_BUTTON, keypad_hit};

/// A key press, decoded from a DOM `KeyboardEvent.key` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// `a` / `A`
    Admin,
    /// `d` / `D`
    Debug,
    /// `r` / `R`
    Reset,
    Escape,
    Digit(char),
    Enter,
    Backspace,
    Space,
    Other,
}

impl Key {
    pub fn from_dom(key: &str) -> Key {
        match key {
            "a" | "A" => Key::Admin,
            "d" | "D" => Key::Debug,
            "r" | "R" => Key::Reset,
            "Escape" => Key::Escape,
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            " " => Key::Space,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Key::Digit(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Click in logical canvas coordinates
    Click { x: f32, y: f32 },
    Key(Key),
    /// Admin form submitted with the raw field text
    AdminSave { countdown: String, keypad: String },
    AdminCancel,
}

/// Route one event to the controller. Returns true if it was consumed.
pub fn dispatch(game: &mut Game, event: InputEvent, now: f64) -> bool {
    match event {
        InputEvent::Click { x, y } => dispatch_click(game, x, y, now),
        InputEvent::Key(key) => dispatch_key(game, key),
        InputEvent::AdminSave { countdown, keypad } => {
            // Rejections are surfaced through the sink; the panel stays open
            let _ = game.save_admin(&countdown, &keypad);
            true
        }
        InputEvent::AdminCancel => {
            game.cancel_admin();
            true
        }
    }
}

fn dispatch_click(game: &mut Game, x: f32, y: f32, now: f64) -> bool {
    log::debug!("click ({:.0}, {:.0}) in {}", x, y, game.phase().as_str());
    match game.phase() {
        GamePhase::Intro | GamePhase::Scroll | GamePhase::Story => {
            game.primary_action(now);
            true
        }
        GamePhase::CodeWindow => match keypad_hit(x, y) {
            Some(key) => {
                game.press_keypad(key);
                true
            }
            None => false,
        },
        GamePhase::Success | GamePhase::Fail => {
            if RESTART_BUTTON.contains(x, y) {
                game.reset();
                true
            } else {
                false
            }
        }
        GamePhase::Running => false,
    }
}

fn dispatch_key(game: &mut Game, key: Key) -> bool {
    // The open panel swallows everything but its own toggles
    if game.admin_open() {
        if matches!(key, Key::Escape | Key::Admin) {
            game.toggle_admin();
        }
        return true;
    }

    match key {
        Key::Admin => {
            game.toggle_admin();
            return true;
        }
        Key::Debug => {
            game.toggle_debug();
            return true;
        }
        Key::Reset => {
            game.reset();
            return true;
        }
        _ => {}
    }

    if game.phase() != GamePhase::CodeWindow {
        return false;
    }
    log::debug!("code key {:?}", key);
    match key {
        Key::Digit(c) => game.press_keypad(KeypadKey::Digit(c)),
        Key::Enter => game.press_keypad(KeypadKey::Enter),
        Key::Backspace => game.backspace(),
        Key::Space => game.separator(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_dom("a"), Key::Admin);
        assert_eq!(Key::from_dom("D"), Key::Debug);
        assert_eq!(Key::from_dom("R"), Key::Reset);
        assert_eq!(Key::from_dom("7"), Key::Digit('7'));
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("Backspace"), Key::Backspace);
        assert_eq!(Key::from_dom("F5"), Key::Other);
        assert_eq!(Key::from_dom("x"), Key::Other);
        assert_eq!(Key::from_dom(""), Key::Other);
    }
}
