//! Screen-space button layout and hit-testing

/// Axis-aligned rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive on all edges
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }
}

/// RESTART button on the terminal screens
pub const RESTART_BUTTON: Rect = Rect::new(325.0, 450.0, 150.0, 50.0);

/// Keypad origin and spacing
const KEYPAD_X: f32 = 500.0;
const KEYPAD_Y: f32 = 200.0;
const KEY_SIZE: f32 = 60.0;
const KEY_GAP: f32 = 10.0;

/// A keypad key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadKey {
    Digit(char),
    Clear,
    Enter,
}

impl KeypadKey {
    pub fn label(&self) -> String {
        match self {
            KeypadKey::Digit(c) => c.to_string(),
            KeypadKey::Clear => "CLR".to_string(),
            KeypadKey::Enter => "EXE".to_string(),
        }
    }
}

/// Rows top to bottom
const KEYPAD_ROWS: [[KeypadKey; 3]; 4] = [
    [KeypadKey::Digit('1'), KeypadKey::Digit('2'), KeypadKey::Digit('3')],
    [KeypadKey::Digit('4'), KeypadKey::Digit('5'), KeypadKey::Digit('6')],
    [KeypadKey::Digit('7'), KeypadKey::Digit('8'), KeypadKey::Digit('9')],
    [KeypadKey::Clear, KeypadKey::Digit('0'), KeypadKey::Enter],
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeypadButton {
    pub key: KeypadKey,
    pub rect: Rect,
}

/// All twelve keypad buttons in row-major order
pub fn keypad_buttons() -> Vec<KeypadButton> {
    let mut buttons = Vec::with_capacity(12);
    for (row, keys) in KEYPAD_ROWS.iter().enumerate() {
        for (col, key) in keys.iter().enumerate() {
            buttons.push(KeypadButton {
                key: *key,
                rect: Rect::new(
                    KEYPAD_X + col as f32 * (KEY_SIZE + KEY_GAP),
                    KEYPAD_Y + row as f32 * (KEY_SIZE + KEY_GAP),
                    KEY_SIZE,
                    KEY_SIZE,
                ),
            });
        }
    }
    buttons
}

/// Key under a canvas point, if any
pub fn keypad_hit(x: f32, y: f32) -> Option<KeypadKey> {
    keypad_buttons()
        .into_iter()
        .find(|b| b.rect.contains(x, y))
        .map(|b| b.key)
}
