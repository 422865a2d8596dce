//! Core type definitions

mod bounds;
mod ray;
mod viewport;

pub use bounds::*;
pub use ray::*;
pub use viewport::*;

/// A 3D world-space coordinate produced by pointer projection.
pub type WorldPoint = glam::Vec3;
