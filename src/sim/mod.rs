//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform and
//! rendering dependencies:
//! - One `tick` per frame, no wall-clock time
//! - Randomness only through `ColorSource`
//! - Stable iteration order (spawn order)

pub mod collision;
pub mod color;
pub mod difficulty;
pub mod obstacle;
pub mod rng;
pub mod state;
pub mod tick;
pub mod viewport;

pub use collision::{Collision, Rect, circle_rect_overlap, classify};
pub use color::ColorState;
pub use difficulty::{Difficulty, base_speed, speed};
pub use obstacle::{Obstacle, ObstacleField};
pub use rng::{ColorSource, SequenceSource};
pub use state::{Player, RunConfig, RunState, SpawnCadence};
pub use tick::{TickInput, TickOutcome, tick};
pub use viewport::Viewport;
