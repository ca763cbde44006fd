//! Code entry buffer
//!
//! The buffer is space-separated groups of at most two digits, built one key
//! at a time. No structured parser: a digit starts a new group once the last
//! one holds two characters.

/// The numbers
pub const CORRECT_CODE: &str = "4 8 15 16 23 42";

/// Characters per group before a separator is inserted automatically
const GROUP_LEN: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeEntry {
    buffer: String,
}

impl CodeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Append a digit, opening a new group if the last one is full
    pub fn push_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            return;
        }
        if !self.buffer.is_empty() && !self.buffer.ends_with(' ') {
            let last = self.buffer.rsplit(' ').next().unwrap_or("");
            if last.len() >= GROUP_LEN {
                self.buffer.push(' ');
            }
        }
        self.buffer.push(digit);
    }

    /// Close the current group early
    pub fn push_separator(&mut self) {
        if !self.buffer.is_empty() && !self.buffer.ends_with(' ') {
            self.buffer.push(' ');
        }
    }

    /// Drop the last character and any trailing separator it exposes
    pub fn backspace(&mut self) {
        self.buffer.pop();
        let trimmed = self.buffer.trim().len();
        self.buffer.truncate(trimmed);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Trimmed with internal whitespace collapsed to single spaces
    pub fn normalized(&self) -> String {
        self.buffer.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Exact match against the reference code after normalization
    pub fn matches(&self, code: &str) -> bool {
        self.normalized() == code
    }
}
