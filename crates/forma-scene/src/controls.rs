//! Camera navigation controls.

use forma_core::Viewport;
use glam::Vec2;

use crate::camera::Camera;

/// Navigation controller shared by the tools.
///
/// Tools that need the pointer for themselves switch navigation off through
/// the `enabled` flag and put the previous value back when they are done.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraControls {
    /// Whether pointer gestures move the camera
    pub enabled: bool,
    /// Pan distance per viewport height, relative to the target distance
    pub pan_speed: f32,
}

impl Default for CameraControls {
    fn default() -> Self {
        Self {
            enabled: true,
            pan_speed: 1.0,
        }
    }
}

impl CameraControls {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    /// Pan the camera by a pointer delta in pixels.
    ///
    /// Dragging right moves the scene right (the camera left). Returns false
    /// without moving the camera when navigation is disabled.
    pub fn pan(&self, camera: &mut Camera, delta: Vec2, viewport: &Viewport) -> bool {
        if !self.enabled {
            return false;
        }

        let distance = (camera.target - camera.position).length();
        let world_per_pixel =
            2.0 * distance * (camera.fov_y * 0.5).tan() / viewport.height * self.pan_speed;
        let offset = camera.right() * (-delta.x * world_per_pixel)
            + camera.view_up() * (delta.y * world_per_pixel);
        camera.translate(offset);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_disabled_controls_do_not_pan() {
        let controls = CameraControls::new(false);
        let mut camera = Camera::default();
        let before = camera;
        assert!(!controls.pan(&mut camera, Vec2::new(10.0, 0.0), &Viewport::default()));
        assert_eq!(camera, before);
    }

    #[test]
    fn test_pan_moves_position_and_target_together() {
        let controls = CameraControls::default();
        let mut camera = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 1.0);
        assert!(controls.pan(&mut camera, Vec2::new(100.0, 0.0), &Viewport::default()));
        assert!(camera.position.x < 0.0);
        assert_eq!(camera.position.x, camera.target.x);
        assert_eq!(camera.forward(), Vec3::NEG_Z);
    }
}
