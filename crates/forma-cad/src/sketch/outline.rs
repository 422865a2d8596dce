//! Closed planar outlines

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Distance below which two outline points are the same point.
pub const COINCIDENT_EPSILON: f32 = 1e-5;

/// A 2D outline in plane coordinates.
///
/// A closed outline repeats its first point at the end; [`Outline2D::ring`]
/// returns the distinct vertices without that repetition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline2D {
    /// Points defining the outline (in order)
    pub points: Vec<Vec2>,
    /// Whether the outline is closed
    pub closed: bool,
}

impl Outline2D {
    /// Create an open outline from points
    pub fn new(points: Vec<Vec2>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// Create a closed outline from points
    pub fn closed(points: Vec<Vec2>) -> Self {
        let mut outline = Self::new(points);
        outline.close();
        outline
    }

    /// Create a rectangle outline from two opposite corners
    pub fn rectangle(corner1: Vec2, corner2: Vec2) -> Self {
        Self::closed(vec![
            corner1,
            Vec2::new(corner2.x, corner1.y),
            corner2,
            Vec2::new(corner1.x, corner2.y),
        ])
    }

    /// Close the outline, appending the first point unless the last point
    /// already coincides with it.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if let (Some(&first), Some(&last)) = (self.points.first(), self.points.last())
            && self.points.len() > 1
            && first.distance(last) > COINCIDENT_EPSILON
        {
            self.points.push(first);
        }
        self.closed = true;
    }

    /// Distinct vertices, without the closing repetition.
    pub fn ring(&self) -> &[Vec2] {
        let n = self.points.len();
        if self.closed && n > 1 && self.points[0].distance(self.points[n - 1]) <= COINCIDENT_EPSILON
        {
            &self.points[..n - 1]
        } else {
            &self.points
        }
    }

    /// Number of distinct vertices
    pub fn vertex_count(&self) -> usize {
        self.ring().len()
    }

    /// Shoelace area; positive for counter-clockwise outlines
    pub fn signed_area(&self) -> f32 {
        let ring = self.ring();
        if ring.len() < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for (i, a) in ring.iter().enumerate() {
            let b = ring[(i + 1) % ring.len()];
            twice_area += a.perp_dot(b);
        }
        twice_area * 0.5
    }

    /// Returns true if the outline encloses no area
    pub fn is_degenerate(&self) -> bool {
        self.signed_area().abs() <= COINCIDENT_EPSILON
    }

    /// Consecutive edges of the ring, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let ring = self.ring();
        let n = ring.len();
        (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_close_appends_first_point() {
        let outline = Outline2D::closed(vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
        assert_eq!(outline.points.len(), 4);
        assert_eq!(outline.points[3], Vec2::ZERO);
        assert_eq!(outline.vertex_count(), 3);
    }

    #[test]
    fn test_close_keeps_existing_closure() {
        let outline = Outline2D::closed(vec![Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ZERO]);
        assert_eq!(outline.points.len(), 4);
        assert_eq!(outline.vertex_count(), 3);
    }

    #[test]
    fn test_rectangle_area() {
        let outline = Outline2D::rectangle(Vec2::ZERO, Vec2::new(10.0, 5.0));
        assert_eq!(outline.vertex_count(), 4);
        assert_relative_eq!(outline.signed_area(), 50.0);
        assert_eq!(outline.edges().count(), 4);
    }

    #[test]
    fn test_collinear_outline_is_degenerate() {
        let outline = Outline2D::closed(vec![Vec2::ZERO, Vec2::X, Vec2::X * 2.0]);
        assert!(outline.is_degenerate());
    }
}
