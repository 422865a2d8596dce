//! Forma Core Data Structures
//!
//! Geometric primitives shared by every Forma crate:
//! - WorldPoint: a captured 3D coordinate
//! - Ray / Plane: ray casting and construction planes
//! - BoundingBox: axis-aligned bounds for picking and highlights
//! - Viewport: pixel to normalized device coordinate mapping

pub mod types;

pub use types::*;

use thiserror::Error;

/// Geometry-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Degenerate direction vector: {0}")]
    DegenerateDirection(glam::Vec3),

    #[error("Degenerate viewport: {width}x{height}")]
    DegenerateViewport { width: f32, height: f32 },
}

/// Result type for geometry operations
pub type GeometryResult<T> = Result<T, GeometryError>;
