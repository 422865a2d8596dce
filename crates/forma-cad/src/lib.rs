//! Forma CAD
//!
//! Turns captured world points into committed solids:
//! - [`PlaneBasis`]: best-fit plane and in-plane axes for a point set
//! - [`Outline2D`]: closed planar outline in plane coordinates
//! - [`TessellatedMesh`]: triangle output for fills and extrusions
//! - [`SolidAssembler`]: the point-set to solid pipeline

pub mod assembler;
pub mod kernel;
pub mod sketch;

pub use assembler::*;
pub use kernel::*;
pub use sketch::*;
