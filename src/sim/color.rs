//! Player color selection

use serde::{Deserialize, Serialize};

/// Currently selected palette index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorState {
    index: usize,
    palette_size: usize,
}

impl ColorState {
    /// Start at color 0; a zero-sized palette is treated as one color
    pub fn new(palette_size: usize) -> Self {
        Self {
            index: 0,
            palette_size: palette_size.max(1),
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    /// Advance to the next color, wrapping
    pub fn cycle(&mut self) {
        self.index = (self.index + 1) % self.palette_size;
    }

    /// Cycle until `index` is selected (out-of-range indices wrap)
    pub fn select(&mut self, index: usize) {
        self.index = index % self.palette_size;
    }
}
