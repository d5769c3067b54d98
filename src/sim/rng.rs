//! Random source for obstacle colors
//!
//! Production draws from `Pcg32`, seeded from the clock by the hosts.
//! Tests script colors with `SequenceSource`.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Supplies a color index for each new obstacle
pub trait ColorSource {
    /// Uniform index in `[0, palette_size)`; `palette_size` is at least 1
    fn next_color(&mut self, palette_size: usize) -> usize;
}

impl ColorSource for Pcg32 {
    fn next_color(&mut self, palette_size: usize) -> usize {
        self.random_range(0..palette_size.max(1))
    }
}

/// Generator used by the hosts
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of colors, then repeats the last one
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    colors: VecDeque<usize>,
    last: usize,
}

impl SequenceSource {
    pub fn new(colors: impl IntoIterator<Item = usize>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
            last: 0,
        }
    }
}

impl ColorSource for SequenceSource {
    fn next_color(&mut self, palette_size: usize) -> usize {
        if let Some(c) = self.colors.pop_front() {
            self.last = c;
        }
        self.last % palette_size.max(1)
    }
}
