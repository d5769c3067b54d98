//! Obstacle entities and their spawn/cleanup policy

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::rng::ColorSource;
use super::viewport::Viewport;

/// One oncoming barrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge in simulation units
    pub x: f32,
    pub width: f32,
    pub height: f32,
    color_index: usize,
    passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, width: f32, height: f32, color_index: usize) -> Self {
        Self {
            x,
            width,
            height,
            color_index,
            passed: false,
        }
    }

    #[inline]
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Whether a matching collision has already been scored
    #[inline]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Mark as scored; returns true only on the first call
    pub fn mark_passed(&mut self) -> bool {
        !std::mem::replace(&mut self.passed, true)
    }

    /// Move left by `speed`
    #[inline]
    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// Trailing edge has crossed `threshold`
    #[inline]
    pub fn is_expired(&self, threshold: f32) -> bool {
        self.x + self.width < threshold
    }

    /// Bounds, vertically centered on `center_y`
    pub fn rect(&self, center_y: f32) -> Rect {
        Rect::new(self.x, center_y - self.height / 2.0, self.width, self.height)
    }
}

/// Live obstacles in spawn order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one obstacle just past the right edge
    pub fn spawn(
        &mut self,
        viewport: &Viewport,
        palette_size: usize,
        rng: &mut dyn ColorSource,
    ) -> &Obstacle {
        let (width, height) = viewport.obstacle_size();
        let color = rng.next_color(palette_size);
        log::debug!("Spawned obstacle color {} at x={:.1}", color, viewport.spawn_x());
        self.obstacles
            .push(Obstacle::new(viewport.spawn_x(), width, height, color));
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Pull obstacles that now sit beyond the spawn line back onto it
    ///
    /// Returns how many were moved.
    pub fn clamp_to_viewport(&mut self, viewport: &Viewport) -> usize {
        let limit = viewport.spawn_x();
        let mut moved = 0;
        for obstacle in &mut self.obstacles {
            if obstacle.x > limit {
                obstacle.x = limit;
                moved += 1;
            }
        }
        moved
    }

    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<Obstacle> {
        &mut self.obstacles
    }

    pub fn get(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ObstacleField {
    type Item = &'a Obstacle;
    type IntoIter = std::slice::Iter<'a, Obstacle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
