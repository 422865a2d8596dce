//! Viewport dimensions and pointer normalization

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{GeometryError, GeometryResult};

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> GeometryResult<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(GeometryError::DegenerateViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Pixel position (origin top-left, y down) to normalized device
    /// coordinates (origin center, y up, range -1..1).
    pub fn to_ndc(&self, pixel: Vec2) -> Vec2 {
        Vec2::new(
            (pixel.x / self.width) * 2.0 - 1.0,
            -((pixel.y / self.height) * 2.0 - 1.0),
        )
    }

    /// Inverse of [`Viewport::to_ndc`].
    pub fn to_pixel(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}
