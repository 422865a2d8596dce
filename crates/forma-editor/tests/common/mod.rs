//! Shared fixtures for editor session tests

#![allow(dead_code)]

use forma_editor::{ContinuationPlane, Editor, EditorConfig, InputEvent, Timestamp};
use forma_scene::Camera;
use glam::{Vec2, Vec3};

pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 10.0, 10.0);

/// Config whose initial projection plane passes through the origin and whose
/// continuation plane is horizontal, so points on the x axis land exactly.
pub fn config() -> EditorConfig {
    let mut config = EditorConfig::new();
    config.projection.standoff_distance = CAMERA_POSITION.length();
    config.projection.line_plane = ContinuationPlane::Horizontal;
    config.projection.rectangle_plane = ContinuationPlane::Horizontal;
    config
}

/// 100x100 editor looking at the origin from above and in front.
pub fn editor_with(config: EditorConfig) -> Editor {
    let mut editor = Editor::new(config);
    editor.handle_event(&InputEvent::Resize {
        width: 100.0,
        height: 100.0,
    });
    *editor.camera_mut() = Camera::looking_at(CAMERA_POSITION, Vec3::ZERO, 1.0);
    editor
}

pub fn editor() -> Editor {
    editor_with(config())
}

pub fn pixel(editor: &Editor, world: Vec3) -> Vec2 {
    let ndc = editor
        .camera()
        .project(world)
        .expect("point in front of the camera");
    editor.viewport().to_pixel(ndc.truncate())
}

pub fn click(editor: &mut Editor, world: Vec3, time: Timestamp) {
    let position = pixel(editor, world);
    editor.handle_event(&InputEvent::click(position, time));
    editor.handle_event(&InputEvent::release(position, time));
}

/// Press at `from`, move through the midpoint, release at `to`.
pub fn drag(editor: &mut Editor, from: Vec2, to: Vec2, time: Timestamp) {
    editor.handle_event(&InputEvent::click(from, time));
    editor.handle_event(&InputEvent::pointer_move((from + to) * 0.5, time + 10));
    editor.handle_event(&InputEvent::pointer_move(to, time + 20));
    editor.handle_event(&InputEvent::release(to, time + 30));
}

/// Drag a rectangle between two world points on the ground.
pub fn draw_rectangle(editor: &mut Editor, from: Vec3, to: Vec3, time: Timestamp) {
    let a = pixel(editor, from);
    let b = pixel(editor, to);
    drag(editor, a, b, time);
}
