//! In-progress shapes
//!
//! A [`ShapeBuilder`] owns the captured points of one drawing session and the
//! overlays that show them: the polyline through the captured points (plus a
//! trailing slot that follows the pointer) and the preview segment from the
//! last captured point to the pointer.

use forma_core::WorldPoint;
use forma_scene::{OverlayId, OverlayKind, Scene};

/// Captured points with an explicit capacity.
///
/// Pushing past the capacity doubles it.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<WorldPoint>,
    capacity: usize,
}

impl Polyline {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point. Returns true if the buffer had to grow.
    pub fn push(&mut self, point: WorldPoint) -> bool {
        let grew = self.points.len() == self.capacity;
        if grew {
            self.capacity *= 2;
            self.points.reserve_exact(self.capacity - self.points.len());
            tracing::debug!("Polyline buffer grown to {} points", self.capacity);
        }
        self.points.push(point);
        grew
    }

    pub fn points(&self) -> &[WorldPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first(&self) -> Option<WorldPoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<WorldPoint> {
        self.points.last().copied()
    }

    pub fn into_points(self) -> Vec<WorldPoint> {
        self.points
    }
}

/// One drawing session: captured points plus their overlays
#[derive(Debug)]
pub struct ShapeBuilder {
    polyline: Polyline,
    /// Pointer position shown in the trailing slot
    cursor: WorldPoint,
    polyline_overlay: OverlayId,
    preview_overlay: OverlayId,
}

impl ShapeBuilder {
    /// Start a session at `first` and create its overlays.
    pub fn start(scene: &mut Scene, first: WorldPoint, capacity: usize) -> Self {
        let mut polyline = Polyline::with_capacity(capacity);
        polyline.push(first);

        let polyline_overlay = scene.add_overlay(OverlayKind::Polyline {
            points: vec![first, first],
        });
        let preview_overlay = scene.add_overlay(OverlayKind::Segment {
            start: first,
            end: first,
        });
        tracing::debug!("Drawing session started at {:?}", first);

        Self {
            polyline,
            cursor: first,
            polyline_overlay,
            preview_overlay,
        }
    }

    /// Capture another point and regenerate the overlays.
    pub fn push(&mut self, scene: &mut Scene, point: WorldPoint) {
        self.polyline.push(point);
        self.cursor = point;
        self.refresh(scene);
    }

    /// Move the trailing slot and the preview end to the pointer.
    ///
    /// The captured points are not touched.
    pub fn preview(&mut self, scene: &mut Scene, cursor: WorldPoint) {
        self.cursor = cursor;
        self.refresh(scene);
    }

    fn refresh(&self, scene: &mut Scene) {
        let mut points = Vec::with_capacity(self.polyline.len() + 1);
        points.extend_from_slice(self.polyline.points());
        points.push(self.cursor);
        scene.update_overlay(self.polyline_overlay, OverlayKind::Polyline { points });

        if let Some(last) = self.polyline.last() {
            scene.update_overlay(
                self.preview_overlay,
                OverlayKind::Segment {
                    start: last,
                    end: self.cursor,
                },
            );
        }
    }

    pub fn points(&self) -> &[WorldPoint] {
        self.polyline.points()
    }

    pub fn len(&self) -> usize {
        self.polyline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polyline.is_empty()
    }

    pub fn last(&self) -> Option<WorldPoint> {
        self.polyline.last()
    }

    pub fn cursor(&self) -> WorldPoint {
        self.cursor
    }

    pub fn overlays(&self) -> [OverlayId; 2] {
        [self.polyline_overlay, self.preview_overlay]
    }

    /// End the session, removing its overlays, and hand back the points.
    pub fn finish(self, scene: &mut Scene) -> Vec<WorldPoint> {
        scene.remove_overlay(self.polyline_overlay);
        scene.remove_overlay(self.preview_overlay);
        self.polyline.into_points()
    }
}
