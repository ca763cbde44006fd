//! Audio cues using HTML media elements
//!
//! Two looping tracks accompany the lead-in. Fades step the element volume
//! down on a timer until silent, then pause it.

/// Audio tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clip {
    /// Wind and rain under the intro and scroll
    Ambient,
    /// Orientation theme under the story
    Theme,
}

impl Clip {
    pub const ALL: [Clip; 2] = [Clip::Ambient, Clip::Theme];

    pub fn file_name(&self) -> &'static str {
        match self {
            Clip::Ambient => "ambient.mp3",
            Clip::Theme => "theme.mp3",
        }
    }
}

/// Volume removed per fade tick
pub const FADE_STEP: f32 = 0.05;
/// Fade tick interval (ms)
pub const FADE_INTERVAL_MS: i32 = 100;

/// Linear volume ramp down to silence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeFade {
    volume: f32,
    step: f32,
}

impl VolumeFade {
    pub fn new(from: f32) -> Self {
        Self {
            volume: from.clamp(0.0, 1.0),
            step: FADE_STEP,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_silent(&self) -> bool {
        self.volume <= 0.0
    }

    /// Step once. Returns the new volume, or `None` once already silent.
    pub fn tick(&mut self) -> Option<f32> {
        if self.is_silent() {
            return None;
        }
        self.volume = (self.volume - self.step).max(0.0);
        Some(self.volume)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioCues;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{Clip, FADE_INTERVAL_MS, VolumeFade};

    /// One looping track and the interval of its fade, if one is running
    struct Track {
        el: HtmlAudioElement,
        fade: Rc<Cell<Option<i32>>>,
    }

    impl Track {
        /// Stop a running fade. Returns true if there was one.
        fn cancel_fade(&self) -> bool {
            let Some(id) = self.fade.take() else {
                return false;
            };
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(id);
            }
            true
        }
    }

    /// Browser audio for the lead-in tracks
    pub struct AudioCues {
        ambient: Option<Track>,
        theme: Option<Track>,
    }

    impl Default for AudioCues {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioCues {
        pub fn new() -> Self {
            Self {
                ambient: Self::load(Clip::Ambient),
                theme: Self::load(Clip::Theme),
            }
        }

        fn load(clip: Clip) -> Option<Track> {
            match HtmlAudioElement::new_with_src(clip.file_name()) {
                Ok(el) => {
                    el.set_loop(true);
                    Some(Track {
                        el,
                        fade: Rc::new(Cell::new(None)),
                    })
                }
                Err(_) => {
                    log::warn!("Failed to create audio element for {}", clip.file_name());
                    None
                }
            }
        }

        fn track(&self, clip: Clip) -> Option<&Track> {
            match clip {
                Clip::Ambient => self.ambient.as_ref(),
                Clip::Theme => self.theme.as_ref(),
            }
        }

        /// Start from the top at full volume. A playing clip keeps its position;
        /// a fade in progress is called off and the volume restored.
        pub fn play(&self, clip: Clip) {
            let Some(track) = self.track(clip) else { return };
            let was_fading = track.cancel_fade();
            let el = &track.el;
            el.set_volume(1.0);
            if !el.paused() {
                if was_fading {
                    log::debug!("Audio {} fade cancelled", clip.file_name());
                }
                return;
            }
            el.set_current_time(0.0);
            // Autoplay policies reject play() before the first user gesture
            match el.play() {
                Ok(promise) => {
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Err(e) = JsFuture::from(promise).await {
                            log::warn!(
                                "Audio {} did not start: {:?}",
                                clip.file_name(),
                                e
                            );
                        }
                    });
                }
                Err(e) => log::warn!("Audio {} failed: {:?}", clip.file_name(), e),
            }
        }

        pub fn stop(&self, clip: Clip) {
            let Some(track) = self.track(clip) else { return };
            track.cancel_fade();
            let _ = track.el.pause();
            track.el.set_current_time(0.0);
        }

        /// Ramp to silence, then pause
        pub fn fade(&self, clip: Clip) {
            let Some(track) = self.track(clip) else { return };
            track.cancel_fade();
            if track.el.paused() {
                return;
            }
            let Some(window) = web_sys::window() else { return };

            let el = track.el.clone();
            let mut fade = VolumeFade::new(el.volume() as f32);
            let handle = track.fade.clone();
            let window_inner = window.clone();

            let tick = Closure::wrap(Box::new(move || match fade.tick() {
                Some(v) if v > 0.0 => el.set_volume(v as f64),
                _ => {
                    el.set_volume(0.0);
                    let _ = el.pause();
                    if let Some(id) = handle.take() {
                        window_inner.clear_interval_with_handle(id);
                    }
                }
            }) as Box<dyn FnMut()>);

            match window.set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                FADE_INTERVAL_MS,
            ) {
                Ok(id) => track.fade.set(Some(id)),
                Err(e) => log::warn!("Failed to schedule audio fade: {:?}", e),
            }
            tick.forget();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_reaches_silence() {
        let mut fade = VolumeFade::new(1.0);
        let mut ticks = 0;
        while fade.tick().is_some() {
            ticks += 1;
            assert!(ticks <= 25);
        }
        assert!(fade.is_silent());
        assert_eq!(fade.tick(), None);
    }

    #[test]
    fn test_fade_is_monotonic() {
        let mut fade = VolumeFade::new(0.3);
        let mut last = fade.volume();
        while let Some(v) = fade.tick() {
            assert!(v < last);
            last = v;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_fade_clamps_start() {
        assert_eq!(VolumeFade::new(4.0).volume(), 1.0);
        assert!(VolumeFade::new(-1.0).is_silent());
    }
}
