//! DOM-backed presentation sink

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement};

use super::sink::{Element, PresentationSink};
use crate::audio::{AudioCues, Clip};
use crate::settings::Settings;

pub const AVATAR_ID: &str = "avatar-gif";
pub const ADMIN_PANEL_ID: &str = "admin-panel";
pub const ADMIN_COUNTDOWN_ID: &str = "admin-countdown";
pub const ADMIN_KEYPAD_ID: &str = "admin-keypad";

fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
    let el = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    if el.is_none() {
        log::warn!("#{} missing from page", id);
    }
    el
}

fn input_element(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document
        .get_element_by_id(id)?
        .dyn_into::<HtmlInputElement>()
        .ok()
}

pub struct WebSink {
    avatar: Option<HtmlElement>,
    admin_panel: Option<HtmlElement>,
    countdown_input: Option<HtmlInputElement>,
    keypad_input: Option<HtmlInputElement>,
    audio: AudioCues,
}

impl WebSink {
    pub fn new(document: &Document) -> Self {
        Self {
            avatar: html_element(document, AVATAR_ID),
            admin_panel: html_element(document, ADMIN_PANEL_ID),
            countdown_input: input_element(document, ADMIN_COUNTDOWN_ID),
            keypad_input: input_element(document, ADMIN_KEYPAD_ID),
            audio: AudioCues::new(),
        }
    }

    fn element(&self, element: Element) -> Option<&HtmlElement> {
        match element {
            Element::Avatar => self.avatar.as_ref(),
            Element::AdminPanel => self.admin_panel.as_ref(),
        }
    }

    /// Raw text of the admin fields
    pub fn read_admin_form(document: &Document) -> (String, String) {
        let value = |id| {
            input_element(document, id)
                .map(|input| input.value())
                .unwrap_or_default()
        };
        (value(ADMIN_COUNTDOWN_ID), value(ADMIN_KEYPAD_ID))
    }
}

impl PresentationSink for WebSink {
    fn show_element(&mut self, element: Element, visible: bool) {
        let Some(el) = self.element(element) else { return };
        let display = if visible { "block" } else { "none" };
        let _ = el.style().set_property("display", display);
        if !visible && element == Element::Avatar {
            let _ = el.style().set_property("opacity", "0");
        }
    }

    fn set_opacity(&mut self, element: Element, opacity: f32) {
        let Some(el) = self.element(element) else { return };
        let _ = el
            .style()
            .set_property("opacity", &opacity.clamp(0.0, 1.0).to_string());
    }

    fn play_clip(&mut self, clip: Clip) {
        self.audio.play(clip);
    }

    fn fade_clip(&mut self, clip: Clip) {
        self.audio.fade(clip);
    }

    fn stop_clip(&mut self, clip: Clip) {
        self.audio.stop(clip);
    }

    fn fill_admin_form(&mut self, settings: &Settings) {
        if let Some(input) = &self.countdown_input {
            input.set_value(&settings.countdown_minutes.to_string());
        }
        if let Some(input) = &self.keypad_input {
            input.set_value(&settings.keypad_minutes.to_string());
        }
    }

    fn notify(&mut self, message: &str) {
        if let Some(window) = web_sys::window() {
            if window.alert_with_message(message).is_err() {
                log::warn!("Notice not shown: {}", message);
            }
        }
    }
}
