//! Selection engine
//!
//! Tracks the selected objects and keeps exactly one highlight decoration per
//! selected object.

use std::collections::HashMap;

use forma_core::Ray;
use forma_scene::{Camera, ObjectId, OverlayId, OverlayKind, Scene};
use glam::Vec2;

/// Selected objects and their highlight decorations
#[derive(Debug, Default)]
pub struct SelectionEngine {
    /// Selection order
    selected: Vec<ObjectId>,
    highlights: HashMap<ObjectId, OverlayId>,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the selected objects, in selection order.
    pub fn selected_objects(&self) -> Vec<ObjectId> {
        self.selected.clone()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.highlights.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Top-level object under the ray, nearest first.
    pub fn pick(&self, scene: &Scene, ray: &Ray) -> Option<ObjectId> {
        scene
            .intersect_objects(ray, None)
            .first()
            .and_then(|hit| scene.owner_of(hit.part))
    }

    /// Add an object. Returns false if it was already selected or is not in
    /// the scene.
    pub fn add(&mut self, scene: &mut Scene, id: ObjectId) -> bool {
        if self.contains(id) {
            return false;
        }
        let Some(object) = scene.get(id) else {
            return false;
        };
        let bounds = object.world_bounds();
        let overlay = scene.add_overlay(OverlayKind::Highlight { target: id, bounds });
        self.highlights.insert(id, overlay);
        self.selected.push(id);
        true
    }

    /// Remove an object. Returns false if it was not selected.
    pub fn remove(&mut self, scene: &mut Scene, id: ObjectId) -> bool {
        let Some(overlay) = self.highlights.remove(&id) else {
            return false;
        };
        scene.remove_overlay(overlay);
        self.selected.retain(|other| *other != id);
        true
    }

    /// Flip membership of an object.
    pub fn toggle(&mut self, scene: &mut Scene, id: ObjectId) -> bool {
        if self.contains(id) {
            self.remove(scene, id)
        } else {
            self.add(scene, id)
        }
    }

    /// Remove every decoration, then empty the set. Returns true if anything
    /// was selected.
    pub fn clear(&mut self, scene: &mut Scene) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        for (_, overlay) in self.highlights.drain() {
            scene.remove_overlay(overlay);
        }
        self.selected.clear();
        true
    }

    /// Single pick at a ray.
    ///
    /// Shift toggles the hit object. A plain click clears the selection and
    /// then toggles the hit object; a plain click on empty space only clears.
    /// Returns true if the selection changed.
    pub fn click(&mut self, scene: &mut Scene, ray: &Ray, additive: bool) -> bool {
        let hit = self.pick(scene, ray);
        let mut changed = false;
        if !additive {
            changed |= self.clear(scene);
        }
        if let Some(id) = hit {
            changed |= self.toggle(scene, id);
        }
        changed
    }

    /// Select every object whose projected world position lies inside the
    /// normalized device rectangle spanned by `corner1` and `corner2`.
    /// Returns true if the selection changed.
    pub fn select_in_marquee(
        &mut self,
        scene: &mut Scene,
        camera: &Camera,
        corner1: Vec2,
        corner2: Vec2,
        additive: bool,
    ) -> bool {
        let inside = objects_in_marquee(
            corner1,
            corner2,
            scene
                .objects()
                .filter(|object| object.visible)
                .filter_map(|object| {
                    camera
                        .project(object.world_position())
                        .map(|ndc| (object.id, ndc.truncate()))
                }),
        );

        let mut changed = false;
        if !additive {
            changed |= self.clear(scene);
        }
        for id in inside {
            changed |= self.add(scene, id);
        }
        changed
    }

    /// Drop members that are no longer in the scene. Returns true if any
    /// were dropped.
    pub fn retain_present(&mut self, scene: &mut Scene) -> bool {
        let missing: Vec<ObjectId> = self
            .selected
            .iter()
            .copied()
            .filter(|id| !scene.contains(*id))
            .collect();
        for id in &missing {
            self.remove(scene, *id);
        }
        !missing.is_empty()
    }

    /// Recompute highlight bounds after objects changed shape.
    pub fn refresh_highlights(&self, scene: &mut Scene) {
        for (&target, &overlay) in &self.highlights {
            if let Some(bounds) = scene.get(target).map(|o| o.world_bounds()) {
                scene.update_overlay(overlay, OverlayKind::Highlight { target, bounds });
            }
        }
    }
}

/// Ids whose normalized device position lies inside the rectangle spanned by
/// `corner1` and `corner2` (edges included).
pub fn objects_in_marquee(
    corner1: Vec2,
    corner2: Vec2,
    candidates: impl IntoIterator<Item = (ObjectId, Vec2)>,
) -> Vec<ObjectId> {
    let min = corner1.min(corner2);
    let max = corner1.max(corner2);
    candidates
        .into_iter()
        .filter(|(_, ndc)| ndc.cmpge(min).all() && ndc.cmple(max).all())
        .map(|(id, _)| id)
        .collect()
}
