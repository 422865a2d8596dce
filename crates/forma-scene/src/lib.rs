//! Forma Scene
//!
//! Headless scene services consumed by the geometry-authoring core.
//!
//! # Architecture
//!
//! - [`scene::Scene`] - Committed objects, transient overlays, and picking
//! - [`scene::SceneObject`] - A top-level placed object made of parts
//! - [`camera::Camera`] - Perspective camera with ray casting and projection
//! - [`controls::CameraControls`] - Navigation controller with an `enabled` flag
//!
//! # Example
//!
//! ```ignore
//! use forma_scene::{Camera, Scene};
//!
//! let camera = Camera::new(16.0 / 9.0);
//! let ray = camera.cast_ray(glam::Vec2::ZERO)?;
//! let hits = scene.intersect_objects(&ray, None);
//! ```

pub mod camera;
pub mod controls;
pub mod scene;

pub use camera::Camera;
pub use controls::CameraControls;
pub use scene::*;

use thiserror::Error;
use uuid::Uuid;

/// Scene-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("Object already in scene: {0}")]
    DuplicateObject(Uuid),

    #[error("Object not found: {0}")]
    ObjectNotFound(Uuid),

    #[error("Object has no solid profile: {0}")]
    NotASolid(Uuid),

    #[error("Assembly error: {0}")]
    Assembly(#[from] forma_cad::AssemblyError),
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
