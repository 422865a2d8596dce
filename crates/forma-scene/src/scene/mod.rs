//! Scene management for committed objects and transient overlays.
//!
//! The scene is the single source of truth for object state. Tools mutate it
//! through insert/remove; the history moves detached objects in and out.

mod object;
mod overlay;
mod picking;

pub use object::*;
pub use overlay::*;
pub use picking::*;

use std::collections::HashMap;

use forma_core::Ray;
use uuid::Uuid;

use crate::{SceneError, SceneResult};

/// Scene containing all committed objects and overlays.
#[derive(Debug, Default)]
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    /// Insertion order of top-level objects
    order: Vec<ObjectId>,
    /// Part id to top-level object id
    part_owner: HashMap<Uuid, ObjectId>,
    overlays: HashMap<OverlayId, Overlay>,
    overlay_order: Vec<OverlayId>,
}

impl Scene {
    /// Creates a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level object to the scene.
    pub fn insert(&mut self, object: SceneObject) -> SceneResult<ObjectId> {
        let id = object.id;
        if self.objects.contains_key(&id) {
            return Err(SceneError::DuplicateObject(id));
        }

        for part in &object.parts {
            self.part_owner.insert(part.id, id);
        }
        self.order.push(id);
        self.objects.insert(id, object);
        tracing::debug!("Inserted object {}", id);
        Ok(id)
    }

    /// Detaches an object from the scene, handing ownership to the caller.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let object = self.objects.remove(&id)?;
        for part in &object.parts {
            self.part_owner.remove(&part.id);
        }
        self.order.retain(|other| *other != id);
        tracing::debug!("Removed object {}", id);
        Some(object)
    }

    /// Gets an object by ID.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Gets a mutable reference to an object by ID.
    ///
    /// Parts must not be added or removed through this reference.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    /// Returns true if the scene contains an object with the given ID.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Returns the number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Clears all objects and overlays from the scene.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.order.clear();
        self.part_owner.clear();
        self.overlays.clear();
        self.overlay_order.clear();
    }

    /// Returns an iterator over all objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Ids of all objects in insertion order.
    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.order.clone()
    }

    /// Resolves an object or part id to its top-level object.
    pub fn owner_of(&self, id: Uuid) -> Option<ObjectId> {
        if self.objects.contains_key(&id) {
            return Some(id);
        }
        self.part_owner.get(&id).copied()
    }

    /// Rebuilds an object's geometry at a new height.
    pub fn set_object_height(&mut self, id: ObjectId, height: f32) -> SceneResult<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or(SceneError::ObjectNotFound(id))?;
        object.set_height(height)?;
        Ok(())
    }

    /// Sets an object's footprint and height scale.
    pub fn set_object_scale(&mut self, id: ObjectId, scale: glam::Vec3) -> SceneResult<()> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or(SceneError::ObjectNotFound(id))?;
        object.set_scale(scale);
        Ok(())
    }

    /// Intersects a ray with visible objects, nearest hit first.
    ///
    /// With `candidates`, only those objects are tested.
    pub fn intersect_objects(&self, ray: &Ray, candidates: Option<&[ObjectId]>) -> Vec<Hit> {
        let mut hits: Vec<Hit> = match candidates {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.objects.get(id))
                .filter_map(|object| pick_object(ray, object))
                .collect(),
            None => self
                .objects()
                .filter_map(|object| pick_object(ray, object))
                .collect(),
        };
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Adds a transient overlay.
    pub fn add_overlay(&mut self, kind: OverlayKind) -> OverlayId {
        let overlay = Overlay::new(kind);
        let id = overlay.id;
        self.overlays.insert(id, overlay);
        self.overlay_order.push(id);
        id
    }

    /// Replaces an overlay's geometry. Returns false if it does not exist.
    pub fn update_overlay(&mut self, id: OverlayId, kind: OverlayKind) -> bool {
        match self.overlays.get_mut(&id) {
            Some(overlay) => {
                overlay.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Removes an overlay.
    pub fn remove_overlay(&mut self, id: OverlayId) -> Option<Overlay> {
        let overlay = self.overlays.remove(&id)?;
        self.overlay_order.retain(|other| *other != id);
        Some(overlay)
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    /// Returns an iterator over all overlays in creation order.
    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlay_order
            .iter()
            .filter_map(|id| self.overlays.get(id))
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Number of highlight decorations attached to `target`.
    pub fn highlight_count(&self, target: ObjectId) -> usize {
        self.overlays
            .values()
            .filter(|o| o.kind.highlight_target() == Some(target))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forma_cad::{PlaneBasis, SolidAssembler};
    use glam::Vec3;

    fn box_at(x: f32) -> SceneObject {
        let shape = SolidAssembler::default()
            .assemble_rectangle(
                Vec3::new(x - 0.5, 0.0, -0.5),
                Vec3::new(x + 0.5, 0.0, 0.5),
                &PlaneBasis::horizontal(Vec3::ZERO),
                Some(1.0),
            )
            .unwrap();
        SceneObject::from_assembled(shape, &ShapeStyle::default())
    }

    #[test]
    fn test_insert_and_remove_keep_owner_index() {
        let mut scene = Scene::new();
        let object = box_at(0.0);
        let part = object.parts[1].id;
        let id = scene.insert(object).unwrap();

        assert_eq!(scene.owner_of(part), Some(id));
        assert_eq!(scene.owner_of(id), Some(id));

        let removed = scene.remove(id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(scene.owner_of(part), None);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut scene = Scene::new();
        let object = box_at(0.0);
        scene.insert(object.clone()).unwrap();
        assert_eq!(
            scene.insert(object.clone()),
            Err(SceneError::DuplicateObject(object.id))
        );
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_objects_in_insertion_order() {
        let mut scene = Scene::new();
        let ids: Vec<ObjectId> = (0..4)
            .map(|i| scene.insert(box_at(i as f32 * 2.0)).unwrap())
            .collect();
        scene.remove(ids[1]);
        let remaining: Vec<ObjectId> = scene.objects().map(|o| o.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
        assert_eq!(scene.object_ids(), remaining);
    }

    #[test]
    fn test_intersect_objects_sorted_by_distance() {
        let mut scene = Scene::new();
        let near = scene.insert(box_at(0.0)).unwrap();
        let far = scene.insert(box_at(3.0)).unwrap();

        let ray = Ray::new(Vec3::new(-5.0, 0.5, 0.0), Vec3::X).unwrap();
        let hits = scene.intersect_objects(&ray, None);
        assert!(hits.len() >= 2);
        assert_eq!(hits[0].object, near);
        assert!(hits.iter().any(|h| h.object == far));

        let only_far = scene.intersect_objects(&ray, Some(&[far]));
        assert!(only_far.iter().all(|h| h.object == far));
    }

    #[test]
    fn test_overlay_lifecycle() {
        let mut scene = Scene::new();
        let target = scene.insert(box_at(0.0)).unwrap();
        let bounds = scene.get(target).unwrap().world_bounds();

        let id = scene.add_overlay(OverlayKind::Highlight { target, bounds });
        assert_eq!(scene.highlight_count(target), 1);

        assert!(scene.update_overlay(
            id,
            OverlayKind::Segment {
                start: Vec3::ZERO,
                end: Vec3::ONE
            }
        ));
        assert_eq!(scene.highlight_count(target), 0);

        assert!(scene.remove_overlay(id).is_some());
        assert_eq!(scene.overlay_count(), 0);
        assert!(!scene.update_overlay(id, OverlayKind::Polyline { points: vec![] }));
    }

    #[test]
    fn test_set_height_through_scene() {
        let mut scene = Scene::new();
        let id = scene.insert(box_at(0.0)).unwrap();
        scene.set_object_height(id, 2.5).unwrap();
        assert_eq!(scene.get(id).unwrap().height(), Some(2.5));
        assert!(matches!(
            scene.set_object_height(Uuid::new_v4(), 1.0),
            Err(SceneError::ObjectNotFound(_))
        ));
    }
}
