//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - DOM elements and audio driven by the controller (`sink`)
//! - Input events and their routing (`input`)
//! - The browser-backed sink (`web`, wasm32 only)

pub mod input;
pub mod sink;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputEvent, Key, dispatch};
pub use sink::{Element, NullSink, PresentationSink, RecordingSink, SinkEvent};
#[cfg(target_arch = "wasm32")]
pub use web::WebSink;
