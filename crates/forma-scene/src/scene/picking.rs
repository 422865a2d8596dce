//! Ray picking against scene objects

use forma_core::Ray;
use glam::Vec3;
use uuid::Uuid;

use super::{ObjectId, SceneObject};

/// A ray hit on a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Top-level object that was hit
    pub object: ObjectId,
    /// Part of the object that was hit
    pub part: Uuid,
    /// Distance along the ray
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

/// Nearest hit of `ray` on the mesh parts of `object`.
///
/// Rejects objects whose world bounds the ray misses before testing
/// triangles.
pub fn pick_object(ray: &Ray, object: &SceneObject) -> Option<Hit> {
    if !object.visible {
        return None;
    }
    object.world_bounds().intersect_ray(ray)?;

    let mut closest: Option<(Uuid, f32)> = None;
    for (part, [v0, v1, v2]) in object.world_triangles() {
        if let Some(t) = ray.intersect_triangle(v0, v1, v2) {
            match closest {
                Some((_, current)) if current <= t => {}
                _ => closest = Some((part, t)),
            }
        }
    }

    closest.map(|(part, distance)| Hit {
        object: object.id,
        part,
        distance,
        point: ray.at(distance),
    })
}
