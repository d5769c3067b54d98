//! Simulation coordinate space derived from the host surface
//!
//! The play field keeps a fixed aspect ratio. Its width follows the surface
//! width in CSS pixels, so every other distance in the simulation is expressed
//! as a fraction of the viewport and tracks resizes automatically.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::CoreError;

/// Current simulation dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in simulation units (CSS pixels)
    pub width: f32,
    /// Height in simulation units, always `width * ASPECT_RATIO`
    pub height: f32,
    /// Backing-store pixels per simulation unit, clamped to `[1, MAX_DENSITY]`
    pub density_factor: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_surface(REFERENCE_WIDTH, 1.0)
    }
}

impl Viewport {
    /// Derive dimensions, rejecting unusable widths
    pub fn try_from_surface(surface_width: f32, device_pixel_ratio: f32) -> Result<Self, CoreError> {
        if !surface_width.is_finite() || surface_width <= 0.0 {
            return Err(CoreError::InvalidSurfaceDimensions {
                width: surface_width,
            });
        }
        Ok(Self::build(surface_width, device_pixel_ratio))
    }

    /// Derive dimensions, falling back to `MIN_WIDTH` for unusable widths
    pub fn from_surface(surface_width: f32, device_pixel_ratio: f32) -> Self {
        Self::try_from_surface(surface_width, device_pixel_ratio).unwrap_or_else(|err| {
            log::warn!("{err}, falling back to {MIN_WIDTH}");
            Self::build(MIN_WIDTH, device_pixel_ratio)
        })
    }

    fn build(width: f32, device_pixel_ratio: f32) -> Self {
        let density_factor = if device_pixel_ratio.is_finite() {
            device_pixel_ratio.clamp(1.0, MAX_DENSITY)
        } else {
            1.0
        };
        Self {
            width,
            height: width * ASPECT_RATIO,
            density_factor,
        }
    }

    /// Backing-store size in device pixels
    pub fn buffer_size(&self) -> (u32, u32) {
        (
            (self.width * self.density_factor).round() as u32,
            (self.height * self.density_factor).round() as u32,
        )
    }

    /// Ratio of this viewport to the reference layout
    #[inline]
    pub fn scale(&self) -> f32 {
        self.width / REFERENCE_WIDTH
    }

    /// X coordinate at which new obstacles appear
    #[inline]
    pub fn spawn_x(&self) -> f32 {
        self.width + self.width * SPAWN_MARGIN_FRACTION
    }

    /// Obstacles whose right edge is left of this line are dropped
    #[inline]
    pub fn cleanup_threshold(&self) -> f32 {
        -self.width * CLEANUP_MARGIN_FRACTION
    }

    /// Size of an obstacle spawned in this viewport
    pub fn obstacle_size(&self) -> (f32, f32) {
        (
            self.width * OBSTACLE_WIDTH_FRACTION,
            self.height * OBSTACLE_HEIGHT_FRACTION,
        )
    }
}
