//! Difficulty tiers and the score-to-speed mapping

use serde::{Deserialize, Serialize};

use super::viewport::Viewport;
use crate::consts::*;

/// Difficulty tier, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Constant speed
    Easy,
    /// Speed steps up every few points
    #[default]
    Normal,
    /// Speed steps up every point
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Obstacle speed in reference units per frame
pub fn base_speed(score: u32, difficulty: Difficulty) -> f32 {
    let raw = match difficulty {
        Difficulty::Easy => return BASE_SPEED,
        Difficulty::Normal => BASE_SPEED + NORMAL_STEP * (score / NORMAL_STEP_POINTS) as f32,
        Difficulty::Hard => BASE_SPEED + HARD_STEP * score as f32,
    };
    raw.min(MAX_SPEED)
}

/// Obstacle speed in simulation units per frame for the given viewport
#[inline]
pub fn speed(score: u32, difficulty: Difficulty, viewport: &Viewport) -> f32 {
    base_speed(score, difficulty) * viewport.scale()
}
