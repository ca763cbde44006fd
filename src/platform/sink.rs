//! Side effects outside the canvas
//!
//! The controller never touches the DOM directly. Everything it needs beyond
//! drawing goes through a `PresentationSink`: the avatar overlay, the admin
//! panel, audio cues, and user-facing notices.

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::Clip;
use crate::settings::Settings;

/// Page elements the controller shows and hides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// Animated avatar over the story scene
    Avatar,
    AdminPanel,
}

pub trait PresentationSink {
    fn show_element(&mut self, element: Element, visible: bool);
    fn set_opacity(&mut self, element: Element, opacity: f32);
    fn play_clip(&mut self, clip: Clip);
    /// Fade to silence, then stop
    fn fade_clip(&mut self, clip: Clip);
    fn stop_clip(&mut self, clip: Clip);
    /// Pre-fill the admin inputs with the current values
    fn fill_admin_form(&mut self, settings: &Settings);
    /// Blocking user-facing message
    fn notify(&mut self, message: &str);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn show_element(&mut self, _element: Element, _visible: bool) {}
    fn set_opacity(&mut self, _element: Element, _opacity: f32) {}
    fn play_clip(&mut self, _clip: Clip) {}
    fn fade_clip(&mut self, _clip: Clip) {}
    fn stop_clip(&mut self, _clip: Clip) {}
    fn fill_admin_form(&mut self, _settings: &Settings) {}
    fn notify(&mut self, _message: &str) {}
}

/// One recorded sink call
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Show(Element, bool),
    Opacity(Element, f32),
    Play(Clip),
    Fade(Clip),
    Stop(Clip),
    FillAdmin(Settings),
    Notify(String),
}

/// Records every call; clones share the log
///
/// Used by the headless build and tests to observe what the page would do.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Messages passed to `notify`, oldest first
    pub fn notices(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Notify(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Last visibility set for an element, if any
    pub fn visible(&self, element: Element) -> Option<bool> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            SinkEvent::Show(el, visible) if *el == element => Some(*visible),
            _ => None,
        })
    }

    fn record(&self, event: SinkEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl PresentationSink for RecordingSink {
    fn show_element(&mut self, element: Element, visible: bool) {
        self.record(SinkEvent::Show(element, visible));
    }

    fn set_opacity(&mut self, element: Element, opacity: f32) {
        self.record(SinkEvent::Opacity(element, opacity));
    }

    fn play_clip(&mut self, clip: Clip) {
        self.record(SinkEvent::Play(clip));
    }

    fn fade_clip(&mut self, clip: Clip) {
        self.record(SinkEvent::Fade(clip));
    }

    fn stop_clip(&mut self, clip: Clip) {
        self.record(SinkEvent::Stop(clip));
    }

    fn fill_admin_form(&mut self, settings: &Settings) {
        self.record(SinkEvent::FillAdmin(*settings));
    }

    fn notify(&mut self, message: &str) {
        self.record(SinkEvent::Notify(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_shares_log() {
        let sink = RecordingSink::new();
        let mut handle = sink.clone();
        handle.show_element(Element::Avatar, true);
        handle.show_element(Element::Avatar, false);
        handle.notify("hello");

        assert_eq!(sink.visible(Element::Avatar), Some(false));
        assert_eq!(sink.visible(Element::AdminPanel), None);
        assert_eq!(sink.notices(), vec!["hello".to_string()]);

        sink.clear();
        assert!(sink.events().is_empty());
    }
}
