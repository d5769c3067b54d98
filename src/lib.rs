//! Color Dash - a color-matching reflex runner
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (obstacles, collisions, score)
//! - `run_loop`: Session driver that sequences ticks over a frame scheduler
//! - `platform`: Frame scheduling abstraction (manual and requestAnimationFrame)
//! - `settings`: Persisted player preferences
//! - `error`: Crate error type

pub mod error;
pub mod platform;
pub mod run_loop;
pub mod settings;
pub mod sim;

pub use error::CoreError;
pub use run_loop::RunLoop;
pub use settings::Settings;
pub use sim::Difficulty;

/// Game configuration constants
///
/// Distances are in simulation units at the reference layout unless noted;
/// the viewport rescales them to the current surface.
pub mod consts {
    /// Reference layout width (speeds are tuned against this)
    pub const REFERENCE_WIDTH: f32 = 600.0;
    /// Height / width of the play surface
    pub const ASPECT_RATIO: f32 = 2.0 / 3.0;
    /// Fallback width for zero, negative or non-finite surfaces
    pub const MIN_WIDTH: f32 = 320.0;
    /// Upper bound on the device pixel ratio used for the backing store
    pub const MAX_DENSITY: f32 = 2.0;

    /// Player center as fractions of the viewport
    pub const PLAYER_X_FRACTION: f32 = 1.0 / 6.0;
    pub const PLAYER_Y_FRACTION: f32 = 3.0 / 4.0;
    /// Player radius as a fraction of viewport height
    pub const PLAYER_RADIUS_FRACTION: f32 = 1.0 / 10.0;

    /// Obstacle size as fractions of the viewport (40x80 at reference size)
    pub const OBSTACLE_WIDTH_FRACTION: f32 = 1.0 / 15.0;
    pub const OBSTACLE_HEIGHT_FRACTION: f32 = 1.0 / 5.0;
    /// Spawn offset past the right edge, as a fraction of viewport width
    pub const SPAWN_MARGIN_FRACTION: f32 = 1.0 / 60.0;
    /// Cleanup line left of the viewport, as a fraction of viewport width
    pub const CLEANUP_MARGIN_FRACTION: f32 = 1.0 / 20.0;

    /// Frames between spawns
    pub const SPAWN_INTERVAL_FRAMES: u64 = 100;

    /// Obstacle speed in reference units per frame
    pub const BASE_SPEED: f32 = 4.0;
    /// Normal tier: added every `NORMAL_STEP_POINTS` points
    pub const NORMAL_STEP: f32 = 0.5;
    pub const NORMAL_STEP_POINTS: u32 = 5;
    /// Hard tier: added every point
    pub const HARD_STEP: f32 = 0.25;
    /// Horizontal overlap window: obstacle width + player diameter (120 at reference size)
    pub const PASS_WINDOW: f32 = REFERENCE_WIDTH * OBSTACLE_WIDTH_FRACTION
        + 2.0 * REFERENCE_WIDTH * ASPECT_RATIO * PLAYER_RADIUS_FRACTION;
    /// A frame's travel must stay inside the overlap window or an obstacle
    /// could jump past the player unseen
    pub const MAX_SPEED: f32 = PASS_WINDOW * 0.9;

    /// Number of selectable colors
    pub const PALETTE_SIZE: usize = 4;
}
