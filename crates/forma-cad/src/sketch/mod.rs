//! Planar sketch support
//!
//! Provides the plane a captured point set lives on:
//! - Plane fitting (first-three-points cross product, Newell fallback)
//! - In-plane basis vectors for 2D projection
//! - Closed outlines and their triangulation

mod outline;
mod triangulate;

pub use outline::*;
pub use triangulate::*;

use forma_core::{GeometryError, GeometryResult, WorldPoint};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Relative cross-product magnitude below which three points count as collinear.
const COLLINEAR_EPSILON: f32 = 1e-6;

/// How the plane of a point set is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaneFit {
    /// Normal from the first three points
    #[default]
    BestFit,
    /// Always the horizontal plane through the centroid
    Horizontal,
}

/// A plane with an orthonormal in-plane basis.
///
/// Local coordinates are `(x_axis, y_axis, normal)`; a solid's height runs
/// along the normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlaneBasis {
    /// Origin of the plane in 3D space
    pub origin: Vec3,
    /// Normal vector of the plane
    pub normal: Vec3,
    /// X axis of the plane (for 2D to 3D mapping)
    pub x_axis: Vec3,
    /// Y axis of the plane (for 2D to 3D mapping)
    pub y_axis: Vec3,
}

impl Default for PlaneBasis {
    fn default() -> Self {
        Self::horizontal(Vec3::ZERO)
    }
}

impl PlaneBasis {
    /// Horizontal plane (normal +Y) through `origin`
    pub fn horizontal(origin: Vec3) -> Self {
        Self {
            origin,
            normal: Vec3::Y,
            x_axis: Vec3::X,
            y_axis: Vec3::Y.cross(Vec3::X),
        }
    }

    /// Create a custom plane
    pub fn new(origin: Vec3, normal: Vec3, x_axis: Vec3) -> Self {
        let normal = normal.normalize();
        let x_axis = x_axis.normalize();
        let y_axis = normal.cross(x_axis).normalize();
        Self {
            origin,
            normal,
            x_axis,
            y_axis,
        }
    }

    /// Create a plane from a normal, picking in-plane axes that do not depend
    /// on which world axis is "up".
    pub fn from_normal(origin: Vec3, normal: Vec3) -> GeometryResult<Self> {
        let normal = normal
            .try_normalize()
            .ok_or(GeometryError::DegenerateDirection(normal))?;
        let helper = if normal.y.abs() > 0.9 { Vec3::X } else { Vec3::Y };
        let x_axis = (helper - normal * helper.dot(normal)).normalize();
        Ok(Self::new(origin, normal, x_axis))
    }

    /// Fit a plane to a point set, centered on the points' centroid.
    ///
    /// Never produces NaN: collinear or coincident input falls back to a
    /// basis derived from the first edge, then to the horizontal plane.
    pub fn fit(points: &[WorldPoint], fit: PlaneFit) -> Self {
        let centroid = centroid(points);
        match fit {
            PlaneFit::Horizontal => Self::horizontal(centroid),
            PlaneFit::BestFit => match fit_normal(points) {
                Some(normal) => Self::from_normal(centroid, normal)
                    .unwrap_or_else(|_| Self::horizontal(centroid)),
                None => {
                    tracing::debug!("Point set has no plane, using edge-derived basis");
                    edge_basis(centroid, points).unwrap_or_else(|| Self::horizontal(centroid))
                }
            },
        }
    }

    /// Copy of this basis flipped so the normal does not point downward.
    ///
    /// Solids extrude along the normal; a point set captured clockwise when
    /// seen from above would otherwise extrude into the ground.
    pub fn upward(self) -> Self {
        if self.normal.y < -1e-6 {
            Self::new(self.origin, -self.normal, self.x_axis)
        } else {
            self
        }
    }

    /// Copy of this basis moved to a new origin
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Convert a 2D point on the plane to 3D world coordinates
    pub fn to_world(&self, point: Vec2) -> Vec3 {
        self.origin + self.x_axis * point.x + self.y_axis * point.y
    }

    /// Convert a 3D world point to 2D plane coordinates
    pub fn to_local(&self, point: Vec3) -> Vec2 {
        let local = point - self.origin;
        Vec2::new(local.dot(self.x_axis), local.dot(self.y_axis))
    }

    /// Convert a 3D world point to local `(x, y, height)` coordinates
    pub fn to_local_3d(&self, point: Vec3) -> Vec3 {
        let local = point - self.origin;
        Vec3::new(
            local.dot(self.x_axis),
            local.dot(self.y_axis),
            local.dot(self.normal),
        )
    }

    /// Get the transform matrix from plane space to world space
    pub fn transform(&self) -> Mat4 {
        Mat4::from_cols(
            self.x_axis.extend(0.0),
            self.y_axis.extend(0.0),
            self.normal.extend(0.0),
            self.origin.extend(1.0),
        )
    }
}

/// Mean of a point set (zero for an empty set)
pub fn centroid(points: &[WorldPoint]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    points.iter().copied().sum::<Vec3>() / points.len() as f32
}

/// Plane normal for a point set.
///
/// Uses the cross product of the first two edges; if those are collinear,
/// falls back to Newell's method over the whole set.
fn fit_normal(points: &[WorldPoint]) -> Option<Vec3> {
    if points.len() < 3 {
        return None;
    }

    let e1 = points[1] - points[0];
    let e2 = points[2] - points[0];
    let cross = e1.cross(e2);
    let scale = e1.length() * e2.length();
    if scale > 0.0 && cross.length() > COLLINEAR_EPSILON * scale {
        return cross.try_normalize();
    }

    let mut newell = Vec3::ZERO;
    for (i, current) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        newell.x += (current.y - next.y) * (current.z + next.z);
        newell.y += (current.z - next.z) * (current.x + next.x);
        newell.z += (current.x - next.x) * (current.y + next.y);
    }
    let extent = points
        .iter()
        .map(|p| (*p - points[0]).length_squared())
        .fold(0.0_f32, f32::max);
    if newell.length() > COLLINEAR_EPSILON * extent.max(f32::MIN_POSITIVE) {
        newell.try_normalize()
    } else {
        None
    }
}

/// Basis whose x axis follows the first non-zero edge of a collinear set.
fn edge_basis(origin: Vec3, points: &[WorldPoint]) -> Option<PlaneBasis> {
    let first = *points.first()?;
    let edge = points.iter().map(|p| *p - first).find(|e| e.length() > 1e-6)?;
    let x_axis = edge.normalize();
    let helper = if x_axis.y.abs() > 0.9 { Vec3::X } else { Vec3::Y };
    let normal = x_axis.cross(helper).try_normalize()?;
    Some(PlaneBasis::new(origin, normal, x_axis))
}
