//! Run session state and configuration
//!
//! Everything a single play mutates lives in `RunState`. The run loop owns it;
//! hosts and renderers only ever see `&RunState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::ColorState;
use super::difficulty::Difficulty;
use super::obstacle::ObstacleField;
use super::viewport::Viewport;
use crate::consts::*;

/// Player disc geometry, derived from the viewport every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub center: Vec2,
    pub radius: f32,
}

impl Player {
    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            center: Vec2::new(
                viewport.width * PLAYER_X_FRACTION,
                viewport.height * PLAYER_Y_FRACTION,
            ),
            radius: viewport.height * PLAYER_RADIUS_FRACTION,
        }
    }
}

/// How often obstacles appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnCadence {
    /// Every `interval` frames regardless of score
    Constant { interval: u64 },
    /// Interval shrinks by `frames_per_point` per point, floored at `min_interval`
    ScoreScaled {
        interval: u64,
        min_interval: u64,
        frames_per_point: u64,
    },
}

impl Default for SpawnCadence {
    fn default() -> Self {
        SpawnCadence::Constant {
            interval: SPAWN_INTERVAL_FRAMES,
        }
    }
}

impl SpawnCadence {
    /// Frames between spawns at `score` (never zero)
    pub fn interval(&self, score: u32) -> u64 {
        match *self {
            SpawnCadence::Constant { interval } => interval.max(1),
            SpawnCadence::ScoreScaled {
                interval,
                min_interval,
                frames_per_point,
            } => interval
                .saturating_sub(frames_per_point.saturating_mul(score as u64))
                .max(min_interval)
                .max(1),
        }
    }

    /// Whether a spawn is due on `frame`
    #[inline]
    pub fn fires(&self, frame: u64, score: u32) -> bool {
        frame % self.interval(score) == 0
    }
}

/// Per-session settings, immutable once play starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub difficulty: Difficulty,
    pub palette_size: usize,
    pub spawn: SpawnCadence,
}

impl RunConfig {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            palette_size: PALETTE_SIZE,
            spawn: SpawnCadence::default(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

/// Mutable state of one play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub(crate) score: u32,
    pub(crate) frame_count: u64,
    pub(crate) running: bool,
    pub(crate) obstacles: ObstacleField,
    pub(crate) color: ColorState,
}

impl RunState {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            score: 0,
            frame_count: 0,
            running: true,
            obstacles: ObstacleField::new(),
            color: ColorState::new(config.palette_size),
        }
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    #[inline]
    pub fn active_color(&self) -> usize {
        self.color.index()
    }

    /// Mark the session over; returns false if it already was
    pub(crate) fn halt(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Pull off-screen obstacles back after a resize (no-op once halted)
    pub(crate) fn clamp_to_viewport(&mut self, viewport: &Viewport) -> usize {
        if !self.running {
            return 0;
        }
        self.obstacles.clamp_to_viewport(viewport)
    }

    /// Test setup: place an obstacle directly
    #[cfg(test)]
    pub(crate) fn push_obstacle(&mut self, obstacle: super::obstacle::Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Test setup: select a color directly
    #[cfg(test)]
    pub(crate) fn set_color(&mut self, index: usize) {
        self.color.select(index);
    }
}
