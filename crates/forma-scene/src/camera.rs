//! Perspective camera

use forma_core::{GeometryResult, Ray, Viewport};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A perspective camera looking from `position` at `target`.
///
/// Normalized device coordinates follow the OpenGL convention: x and y in
/// -1..1 with y up, depth in -1 (near) .. 1 (far).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

impl Camera {
    /// Create a camera looking at the origin from above and to the side.
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(8.0, 6.0, 8.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 50.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Create a camera at `position` looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            ..Self::new(aspect)
        }
    }

    pub fn update_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Unit view direction (zero if position and target coincide)
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Up hint for the view basis. Falls back to -Z, then X, when the view
    /// direction is parallel to `up` (a plan view looking straight down).
    pub fn basis_up(&self) -> Vec3 {
        let forward = self.forward();
        [self.up, Vec3::NEG_Z, Vec3::X]
            .into_iter()
            .find(|up| forward.cross(*up).length_squared() > 1e-8)
            .unwrap_or(self.up)
    }

    /// Unit right vector of the view
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.basis_up()).normalize_or_zero()
    }

    /// Unit up vector of the view, orthogonal to `forward`
    pub fn view_up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.basis_up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the camera through a point in normalized device coordinates.
    pub fn cast_ray(&self, ndc: Vec2) -> GeometryResult<Ray> {
        let inverse = self.view_projection().inverse();
        let far_point = inverse.project_point3(ndc.extend(1.0));
        Ray::new(self.position, far_point - self.position)
    }

    /// Ray from the camera through a pixel position.
    pub fn screen_to_ray(&self, pixel: Vec2, viewport: &Viewport) -> GeometryResult<Ray> {
        self.cast_ray(viewport.to_ndc(pixel))
    }

    /// Project a world point to normalized device coordinates.
    ///
    /// Returns None for points behind the camera.
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// Move position and target together by a world-space offset.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.target += offset;
    }
}
