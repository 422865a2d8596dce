//! Transient overlays: previews, highlights and the marquee rectangle.
//!
//! Overlays are drawn on top of the scene but never take part in picking
//! or history.

use forma_core::BoundingBox;
use glam::{Vec2, Vec3};
use uuid::Uuid;

use super::ObjectId;

/// Identifier of a transient overlay.
pub type OverlayId = Uuid;

/// Overlay geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayKind {
    /// In-progress polyline through the captured points
    Polyline { points: Vec<Vec3> },
    /// Preview segment from the last captured point to the pointer
    Segment { start: Vec3, end: Vec3 },
    /// Bounding-box decoration around a selected object
    Highlight { target: ObjectId, bounds: BoundingBox },
    /// Screen-space drag rectangle in normalized device coordinates
    Marquee { min: Vec2, max: Vec2 },
}

impl OverlayKind {
    pub fn name(&self) -> &'static str {
        match self {
            OverlayKind::Polyline { .. } => "Polyline",
            OverlayKind::Segment { .. } => "Segment",
            OverlayKind::Highlight { .. } => "Highlight",
            OverlayKind::Marquee { .. } => "Marquee",
        }
    }

    /// Object decorated by this overlay, for highlights.
    pub fn highlight_target(&self) -> Option<ObjectId> {
        match self {
            OverlayKind::Highlight { target, .. } => Some(*target),
            _ => None,
        }
    }
}

/// A transient overlay in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    pub kind: OverlayKind,
    /// Line color (RGBA)
    pub color: [f32; 4],
}

impl Overlay {
    pub fn new(kind: OverlayKind) -> Self {
        let color = match kind {
            OverlayKind::Highlight { .. } => [1.0, 0.8, 0.0, 1.0],
            OverlayKind::Marquee { .. } => [0.3, 0.6, 1.0, 0.8],
            _ => [0.9, 0.9, 0.9, 1.0],
        };
        Self {
            id: Uuid::new_v4(),
            kind,
            color,
        }
    }
}
