//! Parametric solid profiles

use forma_core::BoundingBox;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{AssemblyError, AssemblyResult};
use crate::kernel::TessellatedMesh;
use crate::sketch::Outline2D;

/// Kind of committed shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Flat filled polygon with a border
    Fill,
    /// Polygon extruded along its plane normal
    Extrusion,
    /// Rectangle extruded along its plane normal
    Box,
}

impl ShapeKind {
    /// Get the display name of the shape kind
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Fill => "Fill",
            ShapeKind::Extrusion => "Extrusion",
            ShapeKind::Box => "Box",
        }
    }

    /// Check if this shape has a height
    pub fn is_volumetric(&self) -> bool {
        matches!(self, ShapeKind::Extrusion | ShapeKind::Box)
    }
}

/// Everything needed to regenerate a solid's geometry in plane-local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidProfile {
    pub kind: ShapeKind,
    /// Closed outline, relative to the shape's centroid
    pub outline: Outline2D,
    /// Captured points in local `(x, y, height)` coordinates, not projected
    pub border: Vec<Vec3>,
    /// Extrusion height (zero for fills)
    pub height: f32,
    /// Distance the border is lifted off the surface
    pub border_offset: f32,
}

impl SolidProfile {
    /// Tessellate the profile's surface
    pub fn tessellate(&self) -> TessellatedMesh {
        match self.kind {
            ShapeKind::Fill => TessellatedMesh::planar_fill(&self.outline),
            ShapeKind::Extrusion | ShapeKind::Box => {
                TessellatedMesh::extrusion(&self.outline, self.height)
            }
        }
    }

    /// Closed border loop through the captured points.
    ///
    /// Fills lift the border above the surface; solids push it below the
    /// bottom cap so it stays visible from outside.
    pub fn border_loop(&self) -> Vec<Vec3> {
        let offset = if self.kind.is_volumetric() {
            -self.border_offset
        } else {
            self.border_offset
        };
        let mut points: Vec<Vec3> = self
            .border
            .iter()
            .map(|p| *p + Vec3::Z * offset)
            .collect();
        if let Some(&first) = points.first() {
            points.push(first);
        }
        points
    }

    /// Copy of this profile with a new extrusion height
    pub fn with_height(&self, height: f32) -> AssemblyResult<Self> {
        if !self.kind.is_volumetric() {
            return Err(AssemblyError::InvalidHeight(height));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(AssemblyError::InvalidHeight(height));
        }
        Ok(Self {
            height,
            ..self.clone()
        })
    }

    /// Local bounds of the surface and border together
    pub fn local_bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::from_points(self.border.iter());
        for p in self.outline.ring() {
            bounds.expand(p.extend(0.0));
            bounds.expand(p.extend(self.height));
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn square_profile(kind: ShapeKind, height: f32) -> SolidProfile {
        let ring = vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        SolidProfile {
            kind,
            border: ring.iter().map(|p| p.extend(0.0)).collect(),
            outline: Outline2D::closed(ring),
            height,
            border_offset: 0.01,
        }
    }

    #[test]
    fn test_border_offset_direction() {
        let fill = square_profile(ShapeKind::Fill, 0.0);
        assert!(fill.border_loop().iter().all(|p| p.z > 0.0));

        let solid = square_profile(ShapeKind::Extrusion, 1.0);
        assert!(solid.border_loop().iter().all(|p| p.z < 0.0));
    }

    #[test]
    fn test_border_loop_is_closed() {
        let loop_points = square_profile(ShapeKind::Fill, 0.0).border_loop();
        assert_eq!(loop_points.len(), 5);
        assert_eq!(loop_points.first(), loop_points.last());
    }

    #[test]
    fn test_with_height_only_for_volumes() {
        assert!(square_profile(ShapeKind::Fill, 0.0).with_height(2.0).is_err());
        let raised = square_profile(ShapeKind::Box, 1.0).with_height(2.0).unwrap();
        assert_eq!(raised.height, 2.0);
        assert_eq!(raised.tessellate().bounds().max.z, 2.0);
        assert_eq!(raised.local_bounds().max.z, 2.0);
    }
}
