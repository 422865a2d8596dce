//! Ray and plane definitions

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{GeometryError, GeometryResult, WorldPoint};

/// Below this magnitude a ray and plane are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A half-line with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    /// Always normalized
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction.
    pub fn new(origin: Vec3, direction: Vec3) -> GeometryResult<Self> {
        let direction = direction
            .try_normalize()
            .ok_or(GeometryError::DegenerateDirection(direction))?;
        if !origin.is_finite() {
            return Err(GeometryError::DegenerateDirection(origin));
        }
        Ok(Self { origin, direction })
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> WorldPoint {
        self.origin + self.direction * t
    }

    /// Ray-plane intersection.
    ///
    /// Returns the parameter t such that `origin + direction * t` lies on the
    /// plane, or None if the ray is parallel to the plane or the hit is behind
    /// the origin.
    pub fn intersect_plane_distance(&self, plane: &Plane) -> Option<f32> {
        let denom = self.direction.dot(plane.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (plane.origin - self.origin).dot(plane.normal) / denom;
        if t < 0.0 || !t.is_finite() {
            return None;
        }
        Some(t)
    }

    /// Ray-plane intersection point.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<WorldPoint> {
        self.intersect_plane_distance(plane).map(|t| self.at(t))
    }

    /// Ray-triangle intersection using the Möller–Trumbore algorithm.
    /// Returns the distance to the hit, if any.
    pub fn intersect_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
        const EPSILON: f32 = 1e-6;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = self.direction.cross(edge2);
        let a = edge1.dot(h);

        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * self.direction.dot(q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);

        if t > EPSILON { Some(t) } else { None }
    }
}

/// An infinite plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Vec3,
    /// Always normalized
    pub normal: Vec3,
}

impl Plane {
    /// Horizontal ground plane (Y = 0)
    pub fn ground() -> Self {
        Self {
            origin: Vec3::ZERO,
            normal: Vec3::Y,
        }
    }

    /// Create a plane containing `point` with the given normal.
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> GeometryResult<Self> {
        let normal = normal
            .try_normalize()
            .ok_or(GeometryError::DegenerateDirection(normal))?;
        Ok(Self {
            origin: point,
            normal,
        })
    }

    /// Signed distance from the plane to a point.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.normal)
    }

    /// Orthogonal projection of a point onto the plane.
    pub fn project(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_rejects_zero_direction() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_err());
    }

    #[test]
    fn test_ray_plane_intersection() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y).unwrap();
        let hit = ray.intersect_plane(&Plane::ground()).unwrap();
        assert_relative_eq!(hit.y, 0.0);
        assert_relative_eq!(ray.intersect_plane_distance(&Plane::ground()).unwrap(), 10.0);
    }

    #[test]
    fn test_ray_plane_behind_and_parallel() {
        let up = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y).unwrap();
        assert!(up.intersect_plane(&Plane::ground()).is_none());

        let flat = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X).unwrap();
        assert!(flat.intersect_plane(&Plane::ground()).is_none());
    }

    #[test]
    fn test_ray_triangle() {
        let ray = Ray::new(Vec3::new(0.25, 5.0, 0.25), Vec3::NEG_Y).unwrap();
        let t = ray.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Z).unwrap();
        assert_relative_eq!(t, 5.0);

        let miss = Ray::new(Vec3::new(2.0, 5.0, 2.0), Vec3::NEG_Y).unwrap();
        assert!(miss.intersect_triangle(Vec3::ZERO, Vec3::X, Vec3::Z).is_none());
    }

    #[test]
    fn test_plane_projection() {
        let plane = Plane::from_normal_and_point(Vec3::Y * 3.0, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert_relative_eq!(plane.signed_distance(Vec3::new(1.0, 5.0, 1.0)), 3.0);
        assert_eq!(plane.project(Vec3::new(1.0, 5.0, 1.0)), Vec3::new(1.0, 2.0, 1.0));
    }
}
