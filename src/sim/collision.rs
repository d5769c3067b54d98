//! Collision detection between the player disc and obstacle rectangles
//!
//! Pure geometry plus the color verdict. Resolution (score, termination) is
//! the tick's job.

use glam::Vec2;

/// Axis-aligned rectangle, `min` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Point of the rectangle nearest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max())
    }
}

/// Verdict for one obstacle against the player on one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    None,
    /// Overlap with the same color
    Match,
    /// Overlap with a different color
    Mismatch,
}

/// Circle/rectangle overlap; touching counts
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) <= radius * radius
}

/// Classify a player/obstacle pair
pub fn classify(
    center: Vec2,
    radius: f32,
    rect: &Rect,
    obstacle_color: usize,
    active_color: usize,
) -> Collision {
    if !circle_rect_overlap(center, radius, rect) {
        Collision::None
    } else if obstacle_color == active_color {
        Collision::Match
    } else {
        Collision::Mismatch
    }
}
