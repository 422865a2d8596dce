//! History, selection and tool switching through the editor facade

mod common;

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use approx::assert_relative_eq;
use common::{click, drag, draw_rectangle, editor, editor_with, pixel};
use forma_editor::{Editor, InputEvent, Key, ToolKind};
use forma_scene::ObjectId;
use glam::{Vec2, Vec3};

fn ids(editor: &Editor) -> HashSet<ObjectId> {
    editor.scene().object_ids().into_iter().collect()
}

/// Two flat rectangles, left and right of the origin.
fn two_rectangles(editor: &mut Editor) {
    editor.activate_tool(ToolKind::Rectangle);
    draw_rectangle(editor, Vec3::new(-3.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 1.0), 0);
    draw_rectangle(editor, Vec3::new(1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 1.0), 100);
}

#[test]
fn test_undo_then_redo_restores_membership() {
    let mut editor = editor();
    two_rectangles(&mut editor);
    let before = ids(&editor);
    assert_eq!(before.len(), 2);
    assert_eq!(editor.history().cursor(), Some(1));

    assert!(editor.undo());
    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.history().cursor(), Some(0));
    assert!(editor.redo());
    assert_eq!(ids(&editor), before);
    assert!(!editor.redo());

    assert!(editor.undo());
    assert!(editor.undo());
    assert!(!editor.undo());
    assert!(editor.scene().is_empty());
    assert_eq!(editor.history().cursor(), None);
}

#[test]
fn test_commit_after_undo_discards_redo() {
    let mut editor = editor();
    two_rectangles(&mut editor);
    editor.undo();
    assert!(editor.history().can_redo());

    draw_rectangle(&mut editor, Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.5, 0.0, 2.0), 500);
    assert_eq!(editor.history().len(), 2);
    assert_eq!(editor.history().cursor(), Some(1));
    assert!(!editor.history().can_redo());
    assert!(!editor.redo());
    assert_eq!(editor.scene().len(), 2);
}

#[test]
fn test_undo_redo_keys() {
    let mut editor = editor();
    two_rectangles(&mut editor);
    let ctrl_z = |shift: bool, time| InputEvent::KeyDown {
        key: Key::Char('z'),
        modifiers: forma_editor::Modifiers {
            shift,
            ctrl: true,
            ..Default::default()
        },
        time,
    };

    editor.handle_event(&ctrl_z(false, 1000));
    assert_eq!(editor.scene().len(), 1);
    editor.handle_event(&ctrl_z(true, 1100));
    assert_eq!(editor.scene().len(), 2);
}

#[test]
fn test_switching_tools_restores_navigation() {
    let mut editor = editor();
    assert!(editor.controls().enabled);

    editor.activate_tool(ToolKind::Line);
    assert!(!editor.controls().enabled);
    editor.activate_tool(ToolKind::Select);
    assert!(!editor.controls().enabled);
    editor.activate_tool(ToolKind::Pan);
    assert!(editor.controls().enabled);
    editor.activate_tool(ToolKind::Extrude);
    assert!(!editor.controls().enabled);
    assert!(editor.deactivate_tool());
    assert!(editor.controls().enabled);
    assert_eq!(editor.active_tool(), None);
}

#[test]
fn test_switching_discards_session() {
    let mut editor = editor();
    editor.activate_tool(ToolKind::Line);
    click(&mut editor, Vec3::ZERO, 0);
    assert!(editor.scene().overlay_count() > 0);

    editor.activate_tool(ToolKind::Rectangle);
    assert_eq!(editor.scene().overlay_count(), 0);
    assert!(editor.history().is_empty());
}

#[test]
fn test_marquee_over_viewport_selects_everything() {
    let mut editor = editor();
    two_rectangles(&mut editor);
    let notified = Rc::new(RefCell::new(Vec::new()));
    let sink = notified.clone();
    editor.on_selection_changed(move |ids| sink.borrow_mut().push(ids.len()));

    editor.activate_tool(ToolKind::Select);
    drag(&mut editor, Vec2::new(1.0, 1.0), Vec2::new(99.0, 99.0), 1000);
    assert_eq!(editor.selected_objects().len(), 2);
    assert_eq!(notified.borrow().last(), Some(&2));

    // left half only
    drag(&mut editor, Vec2::new(1.0, 1.0), Vec2::new(49.0, 99.0), 2000);
    let selected = editor.selected_objects();
    assert_eq!(selected.len(), 1);
    let left = editor.scene().get(selected[0]).unwrap();
    assert!(left.world_position().x < 0.0);
    assert_eq!(editor.scene().overlay_count(), 1);
}

#[test]
fn test_click_selection_and_deactivate() {
    let mut editor = editor();
    two_rectangles(&mut editor);
    editor.activate_tool(ToolKind::Select);

    click(&mut editor, Vec3::new(-2.0, 0.0, 0.5), 1000);
    assert_eq!(editor.selected_objects().len(), 1);

    editor.activate_tool(ToolKind::Line);
    assert!(editor.selected_objects().is_empty());
    assert_eq!(editor.scene().overlay_count(), 0);
}

#[test]
fn test_undo_drops_undone_object_from_selection() {
    let mut editor = editor();
    two_rectangles(&mut editor);
    editor.activate_tool(ToolKind::Select);
    drag(&mut editor, Vec2::new(1.0, 1.0), Vec2::new(99.0, 99.0), 1000);
    assert_eq!(editor.selected_objects().len(), 2);

    editor.undo();
    assert_eq!(editor.selected_objects().len(), 1);
    assert_eq!(editor.scene().overlay_count(), 1);
}

#[test]
fn test_external_delete_keeps_history_consistent() {
    let mut editor = editor();
    two_rectangles(&mut editor);
    let first = editor.scene().object_ids()[0];

    assert!(editor.delete_object(first));
    assert!(!editor.delete_object(first));
    assert_eq!(editor.scene().len(), 1);

    // undo of the second shape still works, then the first entry's object is gone
    assert!(editor.undo());
    assert!(editor.undo());
    assert!(editor.scene().is_empty());
    assert_eq!(editor.history().cursor(), None);
}

#[test]
fn test_extrude_and_set_height() {
    let mut config = common::config();
    config.drawing.box_height = Some(1.0);
    let mut editor = editor_with(config);
    editor.activate_tool(ToolKind::Rectangle);
    draw_rectangle(&mut editor, Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0), 0);
    let id = editor.scene().object_ids()[0];

    editor.activate_tool(ToolKind::Extrude);
    let top = pixel(&editor, Vec3::new(0.0, 1.0, 0.5));
    drag(&mut editor, top, top - Vec2::new(0.0, 100.0), 1000);
    assert_relative_eq!(editor.scene().get(id).unwrap().height().unwrap(), 2.0, epsilon = 1e-4);
    assert!(editor.selected_objects().is_empty());

    assert!(editor.set_height(3.0));
    assert_relative_eq!(editor.scene().get(id).unwrap().height().unwrap(), 3.0);
    assert!(editor.set_height(-5.0));
    assert_relative_eq!(editor.scene().get(id).unwrap().height().unwrap(), 0.1);

    // resize edits are not history entries
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_extend_scales_footprint() {
    let mut config = common::config();
    config.drawing.box_height = Some(1.0);
    let mut editor = editor_with(config);
    editor.activate_tool(ToolKind::Rectangle);
    draw_rectangle(&mut editor, Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0), 0);
    let id = editor.scene().object_ids()[0];

    editor.activate_tool(ToolKind::Extend);
    assert!(!editor.set_scale(Vec3::splat(2.0)));

    let top = pixel(&editor, Vec3::new(0.0, 1.0, 0.5));
    drag(&mut editor, top, top + Vec2::new(40.0, 0.0), 1000);
    let scale = editor.scene().get(id).unwrap().scale;
    assert_relative_eq!(scale.x, 1.2, epsilon = 1e-4);
    assert!(!editor.set_height(2.0));

    editor.handle_event(&InputEvent::key(Key::ArrowLeft, 2000));
    let scale = editor.scene().get(id).unwrap().scale;
    assert_relative_eq!(scale.x, 1.1, epsilon = 1e-4);
}

#[test]
fn test_pan_moves_camera() {
    let mut editor = editor();
    editor.activate_tool(ToolKind::Pan);
    let before = editor.camera().position;
    drag(&mut editor, Vec2::new(50.0, 50.0), Vec2::new(20.0, 50.0), 0);
    assert!(editor.camera().position.x > before.x);
    assert!(editor.scene().is_empty());
}
