//! Session-scoped scroll offsets, one slot per view

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ScrollPositionStore {
    slots: HashMap<String, u32>,
}

impl ScrollPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites whatever was stored for `view_key`
    pub fn save(&mut self, view_key: &str, offset: u32) {
        log::debug!("Saving scroll offset {} for '{}'", offset, view_key);
        self.slots.insert(view_key.to_string(), offset);
    }

    pub fn restore(&self, view_key: &str) -> Option<u32> {
        self.slots.get(view_key).copied()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Convert a viewport offset reported by the UI into a stored offset
pub fn offset_from_pixels(y: f32) -> u32 {
    if y.is_finite() && y > 0.0 {
        y.round() as u32
    } else {
        0
    }
}
