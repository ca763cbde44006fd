//! Raster asset loading state
//!
//! Images load asynchronously in the browser. Each slot settles exactly once,
//! either with the decoded image size or as missing; a failed load still
//! counts toward readiness so the loading screen never stalls.

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// The images the scenes draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageId {
    /// Tall background scrolled from the surface down to the hatch
    Base,
    Logo,
    /// "The Swan" wordmark
    Logo2,
}

impl ImageId {
    pub const ALL: [ImageId; 3] = [ImageId::Base, ImageId::Logo, ImageId::Logo2];

    pub fn file_name(&self) -> &'static str {
        match self {
            ImageId::Base => "lost-base.png",
            ImageId::Logo => "lost-logo.png",
            ImageId::Logo2 => "lost-logo2.png",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ImageId::Base => 0,
            ImageId::Logo => 1,
            ImageId::Logo2 => 2,
        }
    }
}

/// Natural pixel size of a decoded image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    Pending,
    Ready(ImageSize),
    Missing,
}

#[derive(Debug, Clone)]
pub struct Assets {
    slots: [Slot; 3],
}

impl Default for Assets {
    fn default() -> Self {
        Self::new()
    }
}

impl Assets {
    pub fn new() -> Self {
        Self {
            slots: [Slot::Pending; 3],
        }
    }

    /// Every slot settled as missing (headless runs)
    pub fn none() -> Self {
        Self {
            slots: [Slot::Missing; 3],
        }
    }

    /// Record a load result. Slots settle once; later calls are ignored.
    pub fn settle(&mut self, id: ImageId, size: Option<ImageSize>) {
        let slot = &mut self.slots[id.index()];
        if *slot != Slot::Pending {
            return;
        }
        *slot = match size {
            Some(size) => Slot::Ready(size),
            None => {
                log::warn!("Image {} unavailable, drawing without it", id.file_name());
                Slot::Missing
            }
        };
    }

    /// Size of a loaded image; `None` if pending or missing
    pub fn get(&self, id: ImageId) -> Option<ImageSize> {
        match self.slots[id.index()] {
            Slot::Ready(size) => Some(size),
            _ => None,
        }
    }

    pub fn settled(&self) -> usize {
        self.slots.iter().filter(|s| **s != Slot::Pending).count()
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    /// Fraction settled in [0, 1]
    pub fn progress(&self) -> f32 {
        self.settled() as f32 / self.total() as f32
    }

    pub fn is_ready(&self) -> bool {
        self.settled() == self.total()
    }

    /// Canvas-space height of the background at full canvas width
    pub fn background_height(&self) -> Option<f32> {
        self.get(ImageId::Base)
            .filter(|b| b.width > 0.0)
            .map(|b| b.height * (CANVAS_WIDTH / b.width))
    }

    /// How far the lead-in scrolls: background bottom aligned to canvas bottom
    pub fn scroll_target(&self) -> f32 {
        self.background_height()
            .map(|h| (h - CANVAS_HEIGHT).max(0.0))
            .unwrap_or(0.0)
    }
}
