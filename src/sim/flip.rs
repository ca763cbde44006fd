//! Flip tile animation primitive
//!
//! A tile never jumps to a new character once constructed. A change requested
//! mid-flip retargets the pending character instead of queueing, so a tile
//! ticking once per second never falls more than one transition behind.

use crate::consts::FLIP_DURATION_MS;

/// Which half of the flip is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlapPhase {
    /// Top flap of the old character folds down toward the seam
    Folding,
    /// Bottom flap of the new character unfolds from the seam
    Unfolding,
}

impl FlapPhase {
    pub fn for_progress(progress: f32) -> Self {
        if progress < 0.5 {
            FlapPhase::Folding
        } else {
            FlapPhase::Unfolding
        }
    }
}

/// Vertical scale of the rotating flap
///
/// `cos(p·π)` while folding, `cos((1-p)·π)` while unfolding. Both reach zero at
/// the seam crossing (p = 0.5).
#[inline]
pub fn flap_scale(progress: f32, phase: FlapPhase) -> f32 {
    use std::f32::consts::PI;
    match phase {
        FlapPhase::Folding => (progress * PI).cos(),
        FlapPhase::Unfolding => ((1.0 - progress) * PI).cos(),
    }
}

/// A single flip tile
#[derive(Debug, Clone, PartialEq)]
pub struct FlipDigit {
    current: char,
    next: char,
    anim_start: f64,
    flipping: bool,
}

impl FlipDigit {
    pub fn new(initial: char) -> Self {
        Self {
            current: initial,
            next: initial,
            anim_start: 0.0,
            flipping: false,
        }
    }

    /// Character fully shown (the old one while flipping)
    pub fn current(&self) -> char {
        self.current
    }

    /// Character being flipped to (equals `current` when idle)
    pub fn next(&self) -> char {
        self.next
    }

    pub fn is_flipping(&self) -> bool {
        self.flipping
    }

    /// Request a character
    pub fn set_char(&mut self, c: char, now: f64) {
        if !self.flipping {
            if c != self.current {
                self.next = c;
                self.anim_start = now;
                self.flipping = true;
            }
        } else if c != self.next {
            // Retarget; the half already played is not rewound
            self.next = c;
        }
    }

    /// Finish the flip once its duration has elapsed. Call once per frame.
    pub fn update(&mut self, now: f64) {
        if self.flipping && now - self.anim_start >= FLIP_DURATION_MS {
            self.current = self.next;
            self.flipping = false;
        }
    }

    /// Animation progress in [0, 1]; 1 when idle. For drawing only.
    pub fn progress(&self, now: f64) -> f32 {
        if !self.flipping {
            return 1.0;
        }
        ((now - self.anim_start) / FLIP_DURATION_MS).clamp(0.0, 1.0) as f32
    }
}

impl Default for FlipDigit {
    fn default() -> Self {
        Self::new('0')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flip_completes_after_duration() {
        let mut d = FlipDigit::new('5');
        d.set_char('4', 1000.0);
        assert!(d.is_flipping());
        assert_eq!(d.current(), '5');
        assert_eq!(d.next(), '4');

        d.update(1299.0);
        assert!(d.is_flipping());
        assert!((d.progress(1150.0) - 0.5).abs() < 1e-6);

        d.update(1300.0);
        assert!(!d.is_flipping());
        assert_eq!(d.current(), '4');
        assert_eq!(d.next(), '4');
        assert_eq!(d.progress(1300.0), 1.0);
    }

    #[test]
    fn test_same_char_is_noop() {
        let mut d = FlipDigit::new('7');
        d.set_char('7', 10.0);
        assert!(!d.is_flipping());
    }

    #[test]
    fn test_retarget_mid_flip_keeps_start() {
        let mut d = FlipDigit::new('9');
        d.set_char('8', 0.0);
        d.set_char('7', 200.0);
        assert_eq!(d.next(), '7');
        assert_eq!(d.current(), '9');
        // Original start time still governs completion
        d.update(300.0);
        assert_eq!(d.current(), '7');
        assert!(!d.is_flipping());
    }

    #[test]
    fn test_retarget_back_to_current() {
        let mut d = FlipDigit::new('1');
        d.set_char('2', 0.0);
        d.set_char('1', 50.0);
        assert!(d.is_flipping());
        assert_eq!(d.next(), '1');
        d.update(400.0);
        assert_eq!(d.current(), '1');
    }

    #[test]
    fn test_progress_clamped() {
        let mut d = FlipDigit::new('0');
        d.set_char('1', 100.0);
        assert_eq!(d.progress(50.0), 0.0);
        assert_eq!(d.progress(10_000.0), 1.0);
    }

    #[test]
    fn test_flap_scale_segments() {
        assert!((flap_scale(0.0, FlapPhase::Folding) - 1.0).abs() < 1e-6);
        assert!(flap_scale(0.5, FlapPhase::Folding).abs() < 1e-6);
        assert!(flap_scale(0.5, FlapPhase::Unfolding).abs() < 1e-6);
        assert!((flap_scale(1.0, FlapPhase::Unfolding) - 1.0).abs() < 1e-6);
        assert_eq!(FlapPhase::for_progress(0.49), FlapPhase::Folding);
        assert_eq!(FlapPhase::for_progress(0.5), FlapPhase::Unfolding);
    }

    proptest! {
        #[test]
        fn prop_repeated_set_char_is_idempotent(
            start in 0.0f64..1e6,
            later in 0.0f64..1000.0,
            c in proptest::char::range('0', '9'),
        ) {
            let mut d = FlipDigit::new('0');
            d.set_char(c, start);
            let snapshot = d.clone();
            d.set_char(c, start + later);
            prop_assert_eq!(d, snapshot);
        }

        #[test]
        fn prop_idle_means_settled(
            chars in proptest::collection::vec(proptest::char::range('0', '9'), 1..20),
            step in 1.0f64..500.0,
        ) {
            let mut d = FlipDigit::new('0');
            let mut now = 0.0;
            for c in chars {
                d.set_char(c, now);
                now += step;
                d.update(now);
                if !d.is_flipping() {
                    prop_assert_eq!(d.current(), d.next());
                }
            }
        }
    }
}
