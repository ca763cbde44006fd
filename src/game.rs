//! The session controller
//!
//! `Game` owns everything one browser tab needs: the phase machine, the
//! deadline, the code buffer, the flip clock, lead-in animation state and the
//! ambient particle systems. The frame loop calls `frame`; input handlers call
//! the action methods. All time queries take `now` in epoch milliseconds.

use crate::assets::Assets;
use crate::audio::Clip;
use crate::consts::MAX_FRAME_DT;
use crate::fx::Weather;
use crate::persistence::{Storage, clear_deadline, load_deadline, save_deadline};
use crate::platform::{Element, PresentationSink};
use crate::renderer::{self, DrawList};
use crate::settings::{Settings, SettingsError};
use crate::sim::{
    CORRECT_CODE, CodeEntry, FlipClock, GamePhase, ScrollState, StoryState, advance_phase,
    in_warning_window, remaining_ms, resume_phase, story_char_count, story_lines,
};
use crate::ui::KeypadKey;

/// Pulse rates (radians per second)
const INTRO_PULSE_RATE: f32 = 1.8;
const WARNING_PULSE_RATE: f32 = 6.0;
const CODE_PULSE_RATE: f32 = 9.0;
const FAIL_FLASH_RATE: f32 = 12.0;

/// Avatar opacity tracks the story overlay, reaching 1 a bit sooner
const AVATAR_OPACITY_GAIN: f32 = 1.5;

pub struct Game {
    phase: GamePhase,
    settings: Settings,
    /// Absolute deadline (epoch ms); `None` when no run is in progress
    end_time: Option<f64>,
    code: CodeEntry,
    clock: FlipClock,
    scroll: ScrollState,
    story: StoryState,
    story_lines: Vec<String>,
    /// Shared pulse phase for the intro prompt, warning text and code border
    flicker: f32,
    /// FAIL screen flash phase
    flash: f32,
    debug: bool,
    admin_open: bool,
    weather: Weather,
    last_frame: Option<f64>,
    frame_count: u64,
    storage: Box<dyn Storage>,
    sink: Box<dyn PresentationSink>,
}

impl Game {
    /// Start a session, resuming a persisted deadline if one exists
    pub fn new(
        storage: Box<dyn Storage>,
        sink: Box<dyn PresentationSink>,
        now: f64,
        seed: u64,
    ) -> Self {
        let settings = Settings::load(storage.as_ref());
        let mut game = Self {
            phase: GamePhase::Intro,
            settings,
            end_time: None,
            code: CodeEntry::new(),
            clock: FlipClock::from_digits(&settings.initial_digits()),
            scroll: ScrollState::default(),
            story: StoryState::default(),
            story_lines: story_lines(settings.countdown_minutes),
            flicker: 0.0,
            flash: 0.0,
            debug: false,
            admin_open: false,
            weather: Weather::new(seed),
            last_frame: None,
            frame_count: 0,
            storage,
            sink,
        };

        game.sink.show_element(Element::Avatar, false);
        game.sink.show_element(Element::AdminPanel, false);

        match load_deadline(game.storage.as_ref()) {
            Some(end) => {
                game.end_time = Some(end);
                let remaining = end - now;
                if remaining > 0.0 {
                    game.clock = FlipClock::showing(remaining);
                    log::info!("Resuming run with {:.0} ms remaining", remaining);
                } else {
                    log::info!("Stored deadline already passed");
                }
                let phase = resume_phase(remaining, game.settings.code_window_ms());
                game.enter(phase);
            }
            None => game.enter(GamePhase::Intro),
        }

        game
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    pub fn code(&self) -> &CodeEntry {
        &self.code
    }

    pub fn clock(&self) -> &FlipClock {
        &self.clock
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn story(&self) -> &StoryState {
        &self.story
    }

    pub fn story_lines(&self) -> &[String] {
        &self.story_lines
    }

    pub fn story_total(&self) -> usize {
        story_char_count(&self.story_lines)
    }

    pub fn flicker(&self) -> f32 {
        self.flicker
    }

    pub fn flash(&self) -> f32 {
        self.flash
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn admin_open(&self) -> bool {
        self.admin_open
    }

    pub fn weather(&self) -> &Weather {
        &self.weather
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Remaining time of the current run (0 outside RUNNING/CODE_WINDOW)
    pub fn remaining(&self, now: f64) -> f64 {
        if self.phase.is_timed() {
            remaining_ms(self.end_time, now)
        } else {
            0.0
        }
    }

    /// True during the minute before the code window
    pub fn in_warning(&self, remaining: f64) -> bool {
        self.phase == GamePhase::Running
            && in_warning_window(remaining, self.settings.code_window_ms())
    }

    // === Frame loop ===

    /// Apply deadline-driven transitions and return the remaining time
    pub fn update(&mut self, now: f64) -> f64 {
        if !self.phase.is_timed() {
            return 0.0;
        }
        let remaining = remaining_ms(self.end_time, now);
        let next = advance_phase(self.phase, remaining, self.settings.code_window_ms());
        if next != self.phase {
            self.enter(next);
        }
        if next == GamePhase::Fail { 0.0 } else { remaining }
    }

    /// Advance everything by one display frame and build its draw list
    pub fn frame(&mut self, now: f64, assets: &Assets) -> DrawList {
        let dt = self.frame_dt(now);
        let remaining = self.update(now);
        if assets.is_ready() {
            self.animate(now, dt, remaining, assets);
        }
        self.frame_count += 1;

        let mut out = DrawList::new();
        renderer::render_frame(self, assets, now, remaining, &mut out);
        out
    }

    /// Seconds since the previous frame, clamped so a backgrounded tab does not jump
    fn frame_dt(&mut self, now: f64) -> f32 {
        let dt = match self.last_frame {
            Some(last) => ((now - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_frame = Some(now);
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    fn animate(&mut self, now: f64, dt: f32, remaining: f64, assets: &Assets) {
        match self.phase {
            GamePhase::Intro => self.flicker += INTRO_PULSE_RATE * dt,
            GamePhase::Scroll => {
                self.scroll.target = assets.scroll_target();
                if self.scroll.advance(dt) {
                    self.story = StoryState::begin(now);
                    self.enter(GamePhase::Story);
                }
            }
            GamePhase::Story => {
                let total = self.story_total();
                self.story.advance(now, dt, total);
                let opacity = (self.story.alpha * AVATAR_OPACITY_GAIN).min(1.0);
                self.sink.set_opacity(Element::Avatar, opacity);
            }
            GamePhase::Running => {
                self.clock.set_remaining(remaining, now);
                if self.in_warning(remaining) {
                    self.flicker += WARNING_PULSE_RATE * dt;
                }
            }
            GamePhase::CodeWindow => {
                self.clock.set_remaining(remaining, now);
                self.flicker += CODE_PULSE_RATE * dt;
            }
            GamePhase::Fail => self.flash += FAIL_FLASH_RATE * dt,
            GamePhase::Success => {}
        }
        self.weather.update(dt, self.phase);
    }

    /// Switch phase and drive the page-level cues that belong to it
    fn enter(&mut self, phase: GamePhase) {
        if phase != self.phase {
            log::info!("{} -> {}", self.phase.as_str(), phase.as_str());
        }
        self.phase = phase;
        match phase {
            GamePhase::Intro | GamePhase::Scroll => self.sink.play_clip(Clip::Ambient),
            GamePhase::Story => {
                self.sink.fade_clip(Clip::Ambient);
                self.sink.play_clip(Clip::Theme);
                self.sink.set_opacity(Element::Avatar, 0.0);
                self.sink.show_element(Element::Avatar, true);
            }
            GamePhase::Running | GamePhase::CodeWindow => {
                self.sink.show_element(Element::Avatar, false);
                self.sink.fade_clip(Clip::Theme);
            }
            GamePhase::Success | GamePhase::Fail => {
                self.sink.show_element(Element::Avatar, false);
                for clip in Clip::ALL {
                    self.sink.stop_clip(clip);
                }
            }
        }
    }

    // === Actions ===

    /// A click anywhere during the lead-in
    pub fn primary_action(&mut self, now: f64) {
        match self.phase {
            GamePhase::Intro => {
                self.scroll = ScrollState::default();
                self.enter(GamePhase::Scroll);
            }
            GamePhase::Scroll => self.scroll.boost(),
            GamePhase::Story => {
                let total = self.story_total();
                if self.story.is_complete(total) {
                    self.start_run(now);
                } else {
                    self.story.skip(total);
                }
            }
            _ => {}
        }
    }

    /// Begin a run: persist a fresh deadline and show the full countdown
    pub fn start_run(&mut self, now: f64) {
        let end = now + self.settings.total_ms();
        self.end_time = Some(end);
        save_deadline(self.storage.as_ref(), end);
        self.code.clear();
        self.clock = FlipClock::from_digits(&self.settings.initial_digits());
        log::info!("Run started, deadline {:.0}", end);
        self.enter(GamePhase::Running);
    }

    pub fn press_keypad(&mut self, key: KeypadKey) {
        if self.phase != GamePhase::CodeWindow {
            return;
        }
        match key {
            KeypadKey::Digit(c) => self.code.push_digit(c),
            KeypadKey::Clear => self.code.clear(),
            KeypadKey::Enter => {
                self.check_code();
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.phase == GamePhase::CodeWindow {
            self.code.backspace();
        }
    }

    pub fn separator(&mut self) {
        if self.phase == GamePhase::CodeWindow {
            self.code.push_separator();
        }
    }

    /// Submit the buffer. A match ends the run; a miss clears the buffer.
    pub fn check_code(&mut self) -> bool {
        if self.phase != GamePhase::CodeWindow {
            return false;
        }
        if self.code.matches(CORRECT_CODE) {
            self.end_time = None;
            clear_deadline(self.storage.as_ref());
            self.enter(GamePhase::Success);
            true
        } else {
            log::info!("Rejected code \"{}\"", self.code.normalized());
            self.code.clear();
            false
        }
    }

    /// Abandon any run and return to the intro
    pub fn reset(&mut self) {
        clear_deadline(self.storage.as_ref());
        self.end_time = None;
        self.code.clear();
        self.flicker = 0.0;
        self.flash = 0.0;
        self.scroll = ScrollState::default();
        self.story = StoryState::default();
        self.story_lines = story_lines(self.settings.countdown_minutes);
        self.clock = FlipClock::from_digits(&self.settings.initial_digits());
        self.weather.reset();
        for clip in Clip::ALL {
            self.sink.stop_clip(clip);
        }
        self.sink.show_element(Element::Avatar, false);
        log::info!("Session reset");
        self.enter(GamePhase::Intro);
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
        log::info!("Debug overlay {}", if self.debug { "on" } else { "off" });
    }

    pub fn toggle_admin(&mut self) {
        self.admin_open = !self.admin_open;
        if self.admin_open {
            self.sink.fill_admin_form(&self.settings);
        }
        self.sink.show_element(Element::AdminPanel, self.admin_open);
    }

    /// Validate and apply the admin form. Valid input is persisted, closes the
    /// panel and resets the session; invalid input is reported and changes nothing.
    pub fn save_admin(&mut self, countdown: &str, keypad: &str) -> Result<(), SettingsError> {
        let settings = match Settings::from_form(countdown, keypad) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Admin settings rejected: {}", e);
                self.sink.notify(&e.to_string());
                return Err(e);
            }
        };
        self.settings = settings;
        settings.save(self.storage.as_ref());
        if self.admin_open {
            self.toggle_admin();
        }
        self.reset();
        Ok(())
    }

    pub fn cancel_admin(&mut self) {
        if self.admin_open {
            self.toggle_admin();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageId;
    use crate::persistence::{DEADLINE_KEY, MemoryStorage};
    use crate::platform::{InputEvent, Key, RecordingSink, SinkEvent, dispatch};

    const T0: f64 = 1_700_000_000_000.0;

    fn new_game(storage: &MemoryStorage, sink: &RecordingSink, now: f64) -> Game {
        Game::new(Box::new(storage.clone()), Box::new(sink.clone()), now, 7)
    }

    fn loaded() -> Assets {
        let mut assets = Assets::new();
        for id in ImageId::ALL {
            assets.settle(id, None);
        }
        assets
    }

    /// Drive frames at 60 Hz until `pred` holds or `secs` elapse; returns the time reached
    fn run_until(
        game: &mut Game,
        assets: &Assets,
        mut now: f64,
        secs: f64,
        pred: impl Fn(&Game) -> bool,
    ) -> f64 {
        let end = now + secs * 1000.0;
        while now < end {
            game.frame(now, assets);
            if pred(game) {
                return now;
            }
            now += 1000.0 / 60.0;
        }
        now
    }

    #[test]
    fn test_fresh_session_starts_at_intro() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let game = new_game(&storage, &sink, T0);
        assert_eq!(game.phase(), GamePhase::Intro);
        assert_eq!(game.end_time(), None);
        assert_eq!(game.clock().text(), "00600");
        assert!(sink.events().contains(&SinkEvent::Play(Clip::Ambient)));
    }

    #[test]
    fn test_resume_into_running_and_code_window() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        storage.set_item(DEADLINE_KEY, &((T0 + 300_000.0) as i64).to_string());
        let game = new_game(&storage, &sink, T0);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.clock().text(), "00500");

        storage.set_item(DEADLINE_KEY, &((T0 + 90_500.0) as i64).to_string());
        let game = new_game(&storage, &sink, T0);
        assert_eq!(game.phase(), GamePhase::CodeWindow);
        assert_eq!(game.clock().text(), "00131");
    }

    #[test]
    fn test_expired_deadline_resumes_as_fail() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        storage.set_item(DEADLINE_KEY, &((T0 - 1.0) as i64).to_string());
        let mut game = new_game(&storage, &sink, T0);
        assert_eq!(game.phase(), GamePhase::Fail);
        assert_eq!(game.update(T0), 0.0);
        // The key is not erased by failure
        assert!(storage.contains(DEADLINE_KEY));
    }

    #[test]
    fn test_lead_in_reaches_running() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let assets = loaded();
        let mut game = new_game(&storage, &sink, T0);

        game.primary_action(T0);
        assert_eq!(game.phase(), GamePhase::Scroll);
        // No background: the scroll arrives on the first animated frame
        let now = run_until(&mut game, &assets, T0, 1.0, |g| {
            g.phase() == GamePhase::Story
        });
        assert_eq!(game.phase(), GamePhase::Story);
        assert_eq!(sink.visible(Element::Avatar), Some(true));

        game.primary_action(now);
        assert!(game.story().is_complete(game.story_total()));
        assert_eq!(game.phase(), GamePhase::Story);

        game.primary_action(now);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.end_time(), Some(now + 360_000.0));
        assert!(storage.contains(DEADLINE_KEY));
        assert_eq!(sink.visible(Element::Avatar), Some(false));
    }

    #[test]
    fn test_story_typewriter_completes_on_its_own() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let assets = loaded();
        let mut game = new_game(&storage, &sink, T0);
        game.primary_action(T0);
        let now = run_until(&mut game, &assets, T0, 1.0, |g| {
            g.phase() == GamePhase::Story
        });

        let total = game.story_total();
        run_until(&mut game, &assets, now, 20.0, |g| g.story().is_complete(total));
        assert!(game.story().is_complete(total));
        assert!(game.story().alpha > 0.8);
    }

    #[test]
    fn test_running_enters_code_window_then_fails() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let mut game = new_game(&storage, &sink, T0);
        game.start_run(T0);

        assert_eq!(game.update(T0 + 1_000.0), 359_000.0);
        assert_eq!(game.phase(), GamePhase::Running);
        game.update(T0 + 120_000.0);
        assert_eq!(game.phase(), GamePhase::CodeWindow);
        assert_eq!(game.update(T0 + 360_000.0), 0.0);
        assert_eq!(game.phase(), GamePhase::Fail);
    }

    #[test]
    fn test_code_entry_success_clears_deadline() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let mut game = new_game(&storage, &sink, T0);
        game.start_run(T0);
        game.update(T0 + 200_000.0);
        assert_eq!(game.phase(), GamePhase::CodeWindow);

        for c in "4815162342".chars() {
            game.press_keypad(KeypadKey::Digit(c));
        }
        assert_eq!(game.code().as_str(), "48 15 16 23 42");
        assert!(!game.check_code());
        assert!(game.code().is_empty());

        for c in "4 8 15 16 23 42".chars() {
            if c == ' ' {
                game.separator();
            } else {
                game.press_keypad(KeypadKey::Digit(c));
            }
        }
        game.press_keypad(KeypadKey::Enter);
        assert_eq!(game.phase(), GamePhase::Success);
        assert_eq!(game.end_time(), None);
        assert!(!storage.contains(DEADLINE_KEY));
        // Terminal phases ignore time entirely
        assert_eq!(game.update(T0 + 10_000_000.0), 0.0);
        assert_eq!(game.phase(), GamePhase::Success);
    }

    #[test]
    fn test_keypad_ignored_outside_code_window() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let mut game = new_game(&storage, &sink, T0);
        game.start_run(T0);
        game.press_keypad(KeypadKey::Digit('4'));
        game.separator();
        assert!(game.code().is_empty());
        assert!(!game.check_code());
    }

    #[test]
    fn test_clock_flips_as_time_passes() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let assets = loaded();
        let mut game = new_game(&storage, &sink, T0);
        game.start_run(T0);

        game.frame(T0, &assets);
        assert_eq!(game.clock().text(), "00600");
        game.frame(T0 + 1_000.0, &assets);
        assert!(game.clock().digits.iter().any(|d| d.is_flipping()));
        game.frame(T0 + 1_400.0, &assets);
        assert_eq!(game.clock().text(), "00559");
    }

    #[test]
    fn test_reset_returns_to_intro() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let mut game = new_game(&storage, &sink, T0);
        game.start_run(T0);
        game.update(T0 + 400_000.0);
        assert_eq!(game.phase(), GamePhase::Fail);

        game.reset();
        assert_eq!(game.phase(), GamePhase::Intro);
        assert_eq!(game.end_time(), None);
        assert!(!storage.contains(DEADLINE_KEY));
        assert_eq!(game.flash(), 0.0);
        assert_eq!(game.clock().text(), "00600");
    }

    #[test]
    fn test_reset_during_story_stops_ambient_before_replaying_it() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let assets = loaded();
        let mut game = new_game(&storage, &sink, T0);
        game.primary_action(T0);
        let now = run_until(&mut game, &assets, T0, 1.0, |g| {
            g.phase() == GamePhase::Story
        });
        assert!(sink.events().contains(&SinkEvent::Fade(Clip::Ambient)));
        sink.clear();

        dispatch(&mut game, InputEvent::Key(Key::Reset), now + 500.0);
        assert_eq!(game.phase(), GamePhase::Intro);

        let events = sink.events();
        let stop = events.iter().position(|e| *e == SinkEvent::Stop(Clip::Ambient));
        let play = events.iter().position(|e| *e == SinkEvent::Play(Clip::Ambient));
        match (stop, play) {
            (Some(stop), Some(play)) => assert!(stop < play, "events: {:?}", events),
            _ => panic!("ambient not restarted cleanly: {:?}", events),
        }
        assert!(events.contains(&SinkEvent::Stop(Clip::Theme)));
    }

    #[test]
    fn test_admin_save_applies_and_resets() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let mut game = new_game(&storage, &sink, T0);
        game.start_run(T0);
        game.toggle_admin();
        assert!(sink.events().contains(&SinkEvent::FillAdmin(Settings::default())));

        assert!(game.save_admin("108", "4").is_ok());
        assert!(!game.admin_open());
        assert_eq!(game.phase(), GamePhase::Intro);
        assert_eq!(game.settings().countdown_minutes, 108);
        assert_eq!(game.clock().text(), "10800");
        assert!(game.story_lines()[2].contains("108"));
        assert!(storage.contains(Settings::STORAGE_KEY));
        assert!(!storage.contains(DEADLINE_KEY));
    }

    #[test]
    fn test_admin_rejects_invalid_input() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let mut game = new_game(&storage, &sink, T0);
        game.toggle_admin();

        let err = game.save_admin("5", "5").unwrap_err();
        assert!(matches!(err, SettingsError::KeypadNotShorter { .. }));
        assert!(game.admin_open());
        assert_eq!(*game.settings(), Settings::default());
        assert!(!storage.contains(Settings::STORAGE_KEY));
        assert_eq!(
            sink.notices(),
            vec!["Keypad window must be less than countdown time!".to_string()]
        );

        game.cancel_admin();
        assert!(!game.admin_open());
        assert_eq!(sink.visible(Element::AdminPanel), Some(false));
    }

    #[test]
    fn test_fail_screen_flashes_only_when_animating() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        storage.set_item(DEADLINE_KEY, "1");
        let mut game = new_game(&storage, &sink, T0);
        assert_eq!(game.phase(), GamePhase::Fail);

        let pending = Assets::new();
        game.frame(T0, &pending);
        game.frame(T0 + 50.0, &pending);
        assert_eq!(game.flash(), 0.0);

        let assets = loaded();
        game.frame(T0 + 100.0, &assets);
        assert!(game.flash() > 0.0);
        assert_eq!(game.frame_count(), 3);
    }

    #[test]
    fn test_frame_dt_is_clamped() {
        let storage = MemoryStorage::new();
        let sink = RecordingSink::new();
        let mut game = new_game(&storage, &sink, T0);
        assert_eq!(game.frame_dt(T0), 0.0);
        assert_eq!(game.frame_dt(T0 + 5_000.0), MAX_FRAME_DT);
        assert_eq!(game.frame_dt(T0 + 4_000.0), 0.0);
    }
}
