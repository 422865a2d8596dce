//! Pointer projection
//!
//! Turns a pointer position into a world point. The first point of a shape
//! lands on scene geometry or on a construction plane in front of the camera;
//! later points land on a continuation plane through the previous point.

use forma_core::{Plane, Ray, Viewport, WorldPoint};
use forma_scene::{Camera, Scene};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ProjectionConfig;

/// Projection errors
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectionError {
    #[error("Pointer ray does not intersect anything")]
    NoIntersection,
}

/// Result type for projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Orientation of the plane through the last captured point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContinuationPlane {
    /// Perpendicular to the camera-to-point vector
    #[default]
    FreeForm,
    /// Perpendicular to the camera view direction
    CameraLocked,
    /// The horizontal plane through the point
    Horizontal,
}

impl ContinuationPlane {
    /// Plane of this orientation through `anchor`.
    pub fn plane(&self, camera: &Camera, anchor: WorldPoint) -> Plane {
        let normal = match self {
            ContinuationPlane::FreeForm => (anchor - camera.position).normalize_or_zero(),
            ContinuationPlane::CameraLocked => camera.forward(),
            ContinuationPlane::Horizontal => Vec3::Y,
        };
        let normal = if normal == Vec3::ZERO {
            camera.forward()
        } else {
            normal
        };
        Plane {
            origin: anchor,
            normal,
        }
    }
}

/// Where a projected point may land
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionTarget {
    /// Scene geometry, then the standoff construction plane
    Initial,
    /// Continuation plane through `anchor`
    Continue {
        anchor: WorldPoint,
        plane: ContinuationPlane,
        /// Limit the distance from `anchor` to the maximum segment length
        clamp: bool,
    },
}

/// Converts pointer positions into world points
#[derive(Debug, Clone, Default)]
pub struct PointerProjector {
    config: ProjectionConfig,
}

impl PointerProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project a pointer position in pixels.
    pub fn project(
        &self,
        pixel: Vec2,
        viewport: &Viewport,
        camera: &Camera,
        scene: &Scene,
        target: ProjectionTarget,
    ) -> ProjectionResult<WorldPoint> {
        let ray = camera.screen_to_ray(pixel, viewport).map_err(|e| {
            tracing::warn!("Cannot cast pointer ray: {}", e);
            ProjectionError::NoIntersection
        })?;

        match target {
            ProjectionTarget::Initial => self.project_initial(&ray, camera, scene),
            ProjectionTarget::Continue {
                anchor,
                plane,
                clamp,
            } => {
                let point = self.project_continuation(&ray, camera, anchor, plane)?;
                if clamp {
                    Ok(clamp_segment(anchor, point, self.config.max_segment_length))
                } else {
                    Ok(point)
                }
            }
        }
    }

    /// Nearest visible solid, else the standoff construction plane.
    pub fn project_initial(
        &self,
        ray: &Ray,
        camera: &Camera,
        scene: &Scene,
    ) -> ProjectionResult<WorldPoint> {
        if let Some(hit) = scene.intersect_objects(ray, None).first() {
            tracing::debug!("Pointer hit object {} at {:.3}", hit.object, hit.distance);
            return Ok(hit.point);
        }

        let forward = camera.forward();
        let plane = Plane {
            origin: camera.position + forward * self.config.standoff_distance,
            normal: -forward,
        };
        match ray.intersect_plane(&plane) {
            Some(point) => Ok(point),
            None => self.fallback(camera),
        }
    }

    /// Intersection with the continuation plane through `anchor`.
    pub fn project_continuation(
        &self,
        ray: &Ray,
        camera: &Camera,
        anchor: WorldPoint,
        plane: ContinuationPlane,
    ) -> ProjectionResult<WorldPoint> {
        match ray.intersect_plane(&plane.plane(camera, anchor)) {
            Some(point) => Ok(point),
            None => self.fallback(camera),
        }
    }

    /// Point at a fixed distance along the view direction.
    fn fallback(&self, camera: &Camera) -> ProjectionResult<WorldPoint> {
        let forward = camera.forward();
        if forward == Vec3::ZERO {
            return Err(ProjectionError::NoIntersection);
        }
        tracing::warn!("Plane intersection failed, using view direction fallback");
        Ok(camera.position + forward * self.config.fallback_distance)
    }
}

/// Pull `point` back toward `anchor` so they are at most `max_length` apart.
pub fn clamp_segment(anchor: WorldPoint, point: WorldPoint, max_length: f32) -> WorldPoint {
    let offset = point - anchor;
    let length = offset.length();
    if length > max_length && length > f32::EPSILON {
        anchor + offset / length * max_length
    } else {
        point
    }
}
