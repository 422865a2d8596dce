//! Mesh generation
//!
//! Builds triangle meshes in plane-local coordinates (`x`, `y` in the plane,
//! `z` along the normal) from closed outlines.

mod mesh;

pub use mesh::*;
