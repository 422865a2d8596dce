//! Solid assembly
//!
//! Converts a finished set of captured world points into a committed solid:
//! a planar fill with a border, an extruded prism, or an axis-aligned box.
//! Geometry is produced in plane-local coordinates; the returned
//! [`PlaneBasis`] places it in the world.

mod profile;

pub use profile::*;

use forma_core::WorldPoint;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kernel::TessellatedMesh;
use crate::sketch::{COINCIDENT_EPSILON, Outline2D, PlaneBasis, PlaneFit};

/// Assembly-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    #[error("Insufficient points: {required} required, {actual} captured")]
    InsufficientPoints { required: usize, actual: usize },

    #[error("Degenerate outline: {0}")]
    DegenerateOutline(String),

    #[error("Invalid height: {0}")]
    InvalidHeight(f32),
}

/// Result type for assembly operations
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Assembly settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssemblyOptions {
    /// How the plane of a free-form point set is chosen
    pub plane_fit: PlaneFit,
    /// Distance the border is lifted off the fill along the plane normal
    pub border_offset: f32,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            plane_fit: PlaneFit::BestFit,
            border_offset: 0.002,
        }
    }
}

/// A solid ready to be inserted into the scene
#[derive(Debug, Clone)]
pub struct AssembledShape {
    /// Placement of the plane-local geometry in the world
    pub frame: PlaneBasis,
    /// Parametric description used to rebuild the mesh on resize
    pub profile: SolidProfile,
    /// Tessellated surface (plane-local)
    pub fill: TessellatedMesh,
    /// The captured points, in capture order
    pub source_points: Vec<WorldPoint>,
}

/// Point-set to solid pipeline
#[derive(Debug, Clone, Default)]
pub struct SolidAssembler {
    options: AssemblyOptions,
}

impl SolidAssembler {
    /// Minimum distinct points for a flat, bordered fill
    pub const MIN_FILL_POINTS: usize = 2;
    /// Minimum distinct points for an extruded volume
    pub const MIN_EXTRUSION_POINTS: usize = 3;

    pub fn new(options: AssemblyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Flat, double-sided fill bordered by the captured points.
    ///
    /// Two points produce a border-only shape with an empty fill.
    pub fn assemble_fill(&self, points: &[WorldPoint]) -> AssemblyResult<AssembledShape> {
        let points = distinct_points(points);
        require_points(&points, Self::MIN_FILL_POINTS)?;
        let frame = PlaneBasis::fit(&points, self.options.plane_fit).upward();
        Ok(self.build(points, frame, ShapeKind::Fill, 0.0))
    }

    /// Prism extruded along the best-fit plane normal.
    pub fn assemble_extrusion(
        &self,
        points: &[WorldPoint],
        height: f32,
    ) -> AssemblyResult<AssembledShape> {
        validate_height(height)?;
        let points = distinct_points(points);
        require_points(&points, Self::MIN_EXTRUSION_POINTS)?;
        let frame = PlaneBasis::fit(&points, self.options.plane_fit).upward();
        let shape = self.build(points, frame, ShapeKind::Extrusion, height);
        if shape.profile.outline.is_degenerate() {
            return Err(AssemblyError::DegenerateOutline(
                "points are collinear".into(),
            ));
        }
        Ok(shape)
    }

    /// Rectangle spanned by two opposite corners in `plane`.
    ///
    /// With a height the rectangle becomes a box aligned with the plane axes.
    pub fn assemble_rectangle(
        &self,
        corner1: WorldPoint,
        corner2: WorldPoint,
        plane: &PlaneBasis,
        height: Option<f32>,
    ) -> AssemblyResult<AssembledShape> {
        if let Some(height) = height {
            validate_height(height)?;
        }
        let corners = rectangle_corners(corner1, corner2, plane);
        let centroid = corners.iter().copied().sum::<Vec3>() / 4.0;
        let frame = plane.with_origin(centroid).upward();
        let (kind, height) = match height {
            Some(h) => (ShapeKind::Box, h),
            None => (ShapeKind::Fill, 0.0),
        };
        let shape = self.build(corners.to_vec(), frame, kind, height);
        if shape.profile.outline.is_degenerate() {
            return Err(AssemblyError::DegenerateOutline(
                "rectangle has zero area".into(),
            ));
        }
        Ok(shape)
    }

    fn build(
        &self,
        points: Vec<WorldPoint>,
        frame: PlaneBasis,
        kind: ShapeKind,
        height: f32,
    ) -> AssembledShape {
        let outline = Outline2D::closed(points.iter().map(|p| frame.to_local(*p)).collect());
        let border = points.iter().map(|p| frame.to_local_3d(*p)).collect();
        let profile = SolidProfile {
            kind,
            outline,
            border,
            height,
            border_offset: self.options.border_offset,
        };
        let fill = profile.tessellate();

        tracing::debug!(
            "Assembled {} from {} points ({} triangles)",
            kind.name(),
            points.len(),
            fill.triangle_count()
        );

        AssembledShape {
            frame,
            profile,
            fill,
            source_points: points,
        }
    }
}

/// The four corners of the rectangle spanned by `corner1` and `corner2`,
/// measured along the plane's axes and anchored at `corner1`.
pub fn rectangle_corners(corner1: Vec3, corner2: Vec3, plane: &PlaneBasis) -> [Vec3; 4] {
    let delta = corner2 - corner1;
    let du = plane.x_axis * delta.dot(plane.x_axis);
    let dv = plane.y_axis * delta.dot(plane.y_axis);
    [corner1, corner1 + du, corner1 + du + dv, corner1 + dv]
}

/// Drop consecutive duplicates and a trailing repetition of the first point.
fn distinct_points(points: &[WorldPoint]) -> Vec<WorldPoint> {
    let mut distinct: Vec<WorldPoint> = Vec::with_capacity(points.len());
    for p in points {
        if distinct
            .last()
            .is_none_or(|last| last.distance(*p) > COINCIDENT_EPSILON)
        {
            distinct.push(*p);
        }
    }
    if distinct.len() > 1
        && let (Some(first), Some(last)) = (distinct.first(), distinct.last())
        && first.distance(*last) <= COINCIDENT_EPSILON
    {
        distinct.pop();
    }
    distinct
}

fn require_points(points: &[WorldPoint], required: usize) -> AssemblyResult<()> {
    if points.len() < required {
        return Err(AssemblyError::InsufficientPoints {
            required,
            actual: points.len(),
        });
    }
    Ok(())
}

fn validate_height(height: f32) -> AssemblyResult<()> {
    if height.is_finite() && height > 0.0 {
        Ok(())
    } else {
        Err(AssemblyError::InvalidHeight(height))
    }
}
