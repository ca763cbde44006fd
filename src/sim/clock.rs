//! Five-tile MMM:SS flip clock

use super::flip::FlipDigit;
use crate::consts::CLOCK_DIGITS;
use crate::minutes_seconds;

/// Digits shown for a remaining duration: minutes padded to 3, seconds to 2
pub fn countdown_digits(remaining_ms: f64) -> [char; CLOCK_DIGITS] {
    let (minutes, seconds) = minutes_seconds(remaining_ms);
    // Three tiles cap the minutes at 999
    let text = format!("{:03}{:02}", minutes.min(999), seconds);
    let mut out = ['0'; CLOCK_DIGITS];
    for (slot, c) in out.iter_mut().zip(text.chars()) {
        *slot = c;
    }
    out
}

/// `MMM:SS` text for a remaining duration
pub fn format_countdown(remaining_ms: f64) -> String {
    let (minutes, seconds) = minutes_seconds(remaining_ms);
    format!("{:03}:{:02}", minutes.min(999), seconds)
}

/// The clock's tiles
#[derive(Debug, Clone)]
pub struct FlipClock {
    pub digits: [FlipDigit; CLOCK_DIGITS],
}

impl FlipClock {
    /// Build a settled clock from a 5-character string such as `"00600"`
    pub fn from_digits(text: &str) -> Self {
        let mut digits: [FlipDigit; CLOCK_DIGITS] = Default::default();
        for (digit, c) in digits.iter_mut().zip(text.chars()) {
            *digit = FlipDigit::new(c);
        }
        Self { digits }
    }

    /// Build a settled clock already showing a remaining duration
    pub fn showing(remaining_ms: f64) -> Self {
        let text: String = countdown_digits(remaining_ms).iter().collect();
        Self::from_digits(&text)
    }

    /// Retarget every tile to a remaining duration, then advance the flips
    pub fn set_remaining(&mut self, remaining_ms: f64, now: f64) {
        for (digit, c) in self.digits.iter_mut().zip(countdown_digits(remaining_ms)) {
            digit.set_char(c, now);
        }
        self.update(now);
    }

    pub fn update(&mut self, now: f64) {
        for digit in &mut self.digits {
            digit.update(now);
        }
    }

    /// Settled characters, e.g. `"00542"`
    pub fn text(&self) -> String {
        self.digits.iter().map(|d| d.current()).collect()
    }

    /// One flag per tile, `1` while flipping
    pub fn flip_flags(&self) -> String {
        self.digits
            .iter()
            .map(|d| if d.is_flipping() { '1' } else { '0' })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_countdown_digits() {
        assert_eq!(countdown_digits(360_000.0), ['0', '0', '6', '0', '0']);
        assert_eq!(countdown_digits(61_500.0), ['0', '0', '1', '0', '2']);
        assert_eq!(countdown_digits(-1.0), ['0'; 5]);
        assert_eq!(format_countdown(6_480_000.0), "108:00");
        assert_eq!(format_countdown(4_000.5), "000:05");
    }

    #[test]
    fn test_clock_ticks_one_tile() {
        let mut clock = FlipClock::from_digits("00600");
        clock.set_remaining(359_000.0, 0.0);
        assert_eq!(clock.flip_flags(), "00111");
        assert_eq!(clock.text(), "00600");

        clock.update(300.0);
        assert_eq!(clock.flip_flags(), "00000");
        assert_eq!(clock.text(), "00559");
    }

    #[test]
    fn test_showing_is_settled() {
        let clock = FlipClock::showing(125_000.0);
        assert_eq!(clock.text(), "00205");
        assert_eq!(clock.flip_flags(), "00000");
    }

    proptest! {
        #[test]
        fn prop_digits_match_minutes_seconds(d in -1e7f64..5e7) {
            let digits: String = countdown_digits(d).iter().collect();
            let total = if d <= 0.0 { 0 } else { (d / 1000.0).ceil() as u64 };
            let expected = format!("{:03}{:02}", (total / 60).min(999), total % 60);
            prop_assert_eq!(digits, expected);
        }
    }
}
