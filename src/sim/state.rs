//! Phase machine types and the lead-in choreography state

use crate::consts::*;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Logos over the rainy surface, waiting for a click
    Intro,
    /// Background scrolling down to the hatch
    Scroll,
    /// Orientation text typed out over the hatch
    Story,
    /// Deadline active, code not yet accepted
    Running,
    /// Final stretch; the keypad is live
    CodeWindow,
    /// Code accepted
    Success,
    /// Deadline passed
    Fail,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Intro => "INTRO",
            GamePhase::Scroll => "SCROLL",
            GamePhase::Story => "STORY",
            GamePhase::Running => "RUNNING",
            GamePhase::CodeWindow => "CODE_WINDOW",
            GamePhase::Success => "SUCCESS",
            GamePhase::Fail => "FAIL",
        }
    }

    /// Phases where remaining time is recomputed every frame
    pub fn is_timed(&self) -> bool {
        matches!(self, GamePhase::Running | GamePhase::CodeWindow)
    }

    /// The scripted lead-in before a deadline exists
    pub fn is_lead_in(&self) -> bool {
        matches!(self, GamePhase::Intro | GamePhase::Scroll | GamePhase::Story)
    }
}

/// Background scroll toward the hatch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    /// Pixels scrolled so far (only ever grows)
    pub offset: f32,
    /// Where the scroll stops, from the background's geometry
    pub target: f32,
    /// Current speed (px/s)
    pub speed: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            speed: SCROLL_START_SPEED,
        }
    }
}

impl ScrollState {
    /// Click-to-hurry
    pub fn boost(&mut self) {
        self.speed = (self.speed + SCROLL_CLICK_BOOST).min(SCROLL_MAX_SPEED);
    }

    /// Move toward the target. Returns true once arrived (offset snapped).
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.offset < self.target {
            self.offset += self.speed * dt;
            if self.target - self.offset < SCROLL_EASE_DISTANCE {
                // 5% slowdown per 60 Hz frame
                let decay = 0.95f32.powf(dt * 60.0);
                self.speed = (self.speed * decay).max(SCROLL_MIN_SPEED);
            }
        }
        if self.offset >= self.target - SCROLL_SNAP {
            self.offset = self.target;
            return true;
        }
        false
    }

    /// Logo opacity; logos are gone 200px into the scroll
    pub fn logo_fade(&self) -> f32 {
        (1.0 - self.offset / 200.0).max(0.0)
    }

    /// Rain opacity; the rain is gone three quarters of the way down
    pub fn rain_fade(&self) -> f32 {
        if self.target <= 0.0 {
            return 0.0;
        }
        (1.0 - self.offset / (self.target * 0.75)).max(0.0)
    }
}

/// Orientation text lines. The period follows the configured countdown.
pub fn story_lines(countdown_minutes: u32) -> Vec<String> {
    vec![
        "Welcome to Station 3: The Swan.".to_string(),
        String::new(),
        format!("Every {} minutes, you must enter", countdown_minutes),
        "the code into the computer.".to_string(),
        String::new(),
        "4  8  15  16  23  42".to_string(),
        String::new(),
        "This is your duty. This is your purpose.".to_string(),
        "Do not fail.".to_string(),
        String::new(),
        "[Click to begin your shift]".to_string(),
    ]
}

/// Characters in the script, counting one per line break
pub fn story_char_count(lines: &[String]) -> usize {
    let chars: usize = lines.iter().map(|l| l.chars().count()).sum();
    chars + lines.len().saturating_sub(1)
}

/// Typewriter state for the story screen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StoryState {
    /// Overlay opacity, eased in up to `STORY_MAX_ALPHA`
    pub alpha: f32,
    /// When the typewriter started (epoch ms)
    pub started_at: f64,
    /// Characters revealed so far
    pub revealed: usize,
    /// Reader clicked through the typing
    pub skipped: bool,
}

impl StoryState {
    pub fn begin(now: f64) -> Self {
        Self {
            started_at: now,
            ..Default::default()
        }
    }

    pub fn advance(&mut self, now: f64, dt: f32, total_chars: usize) {
        if self.alpha < STORY_MAX_ALPHA {
            self.alpha = (self.alpha + STORY_FADE_RATE * dt).min(STORY_MAX_ALPHA);
        }
        self.revealed = if self.skipped {
            total_chars
        } else {
            let elapsed = (now - self.started_at).max(0.0);
            ((elapsed * STORY_CHARS_PER_SEC / 1000.0).floor() as usize).min(total_chars)
        };
    }

    pub fn skip(&mut self, total_chars: usize) {
        self.skipped = true;
        self.revealed = total_chars;
    }

    pub fn is_complete(&self, total_chars: usize) -> bool {
        self.revealed >= total_chars
    }
}

/// Prefixes of each line visible after `revealed` characters
///
/// Stops at the first line not yet reached; a line break counts as one
/// character.
pub fn visible_lines(lines: &[String], revealed: usize) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut count = 0;
    for (i, line) in lines.iter().enumerate() {
        if count >= revealed {
            break;
        }
        let len = line.chars().count();
        let shown = len.min(revealed - count);
        out.push((i, line.chars().take(shown).collect()));
        count += len + 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(GamePhase::CodeWindow.as_str(), "CODE_WINDOW");
        assert!(GamePhase::Running.is_timed());
        assert!(!GamePhase::Story.is_timed());
        assert!(GamePhase::Scroll.is_lead_in());
    }

    #[test]
    fn test_scroll_reaches_target_monotonically() {
        let mut scroll = ScrollState {
            target: 1000.0,
            ..Default::default()
        };
        let mut last = scroll.offset;
        let mut arrived = false;
        for _ in 0..10_000 {
            arrived = scroll.advance(1.0 / 60.0);
            assert!(scroll.offset >= last);
            last = scroll.offset;
            if arrived {
                break;
            }
        }
        assert!(arrived);
        assert_eq!(scroll.offset, 1000.0);
    }

    #[test]
    fn test_scroll_without_background_arrives_immediately() {
        let mut scroll = ScrollState::default();
        assert!(scroll.advance(0.016));
        assert_eq!(scroll.rain_fade(), 0.0);
    }

    #[test]
    fn test_scroll_boost_caps() {
        let mut scroll = ScrollState::default();
        for _ in 0..10 {
            scroll.boost();
        }
        assert_eq!(scroll.speed, SCROLL_MAX_SPEED);
    }

    #[test]
    fn test_fades() {
        let scroll = ScrollState {
            offset: 100.0,
            target: 800.0,
            speed: 0.0,
        };
        assert!((scroll.logo_fade() - 0.5).abs() < 1e-6);
        assert!((scroll.rain_fade() - (1.0 - 100.0 / 600.0)).abs() < 1e-6);
    }

    #[test]
    fn test_story_typewriter_rate() {
        let lines = story_lines(6);
        let total = story_char_count(&lines);
        let mut story = StoryState::begin(1_000.0);
        story.advance(2_000.0, 1.0, total);
        assert_eq!(story.revealed, 30);
        assert!(!story.is_complete(total));
        assert!((story.alpha - STORY_FADE_RATE).abs() < 1e-6);

        story.advance(1_000_000.0, 1.0, total);
        assert!(story.is_complete(total));
        assert_eq!(story.alpha, STORY_MAX_ALPHA);
    }

    #[test]
    fn test_story_skip_sticks() {
        let lines = story_lines(6);
        let total = story_char_count(&lines);
        let mut story = StoryState::begin(0.0);
        story.skip(total);
        story.advance(10.0, 0.016, total);
        assert!(story.is_complete(total));
    }

    #[test]
    fn test_visible_lines() {
        let lines = vec!["abc".to_string(), String::new(), "de".to_string()];
        assert_eq!(story_char_count(&lines), 7);
        assert!(visible_lines(&lines, 0).is_empty());
        assert_eq!(visible_lines(&lines, 2), vec![(0, "ab".to_string())]);
        assert_eq!(
            visible_lines(&lines, 6),
            vec![(0, "abc".to_string()), (1, String::new()), (2, "d".to_string())]
        );
    }

    #[test]
    fn test_story_mentions_countdown() {
        assert!(story_lines(108)[2].contains("108 minutes"));
    }
}
