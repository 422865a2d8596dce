//! Tessellated meshes for fills and extrusions

use forma_core::BoundingBox;
use glam::{Vec2, Vec3};

use crate::sketch::{Outline2D, triangulate};

/// A tessellated mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TessellatedMesh {
    /// Vertex positions (3 floats per vertex)
    pub vertices: Vec<[f32; 3]>,
    /// Vertex normals (3 floats per vertex)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl TessellatedMesh {
    /// Create an empty tessellated mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex position triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                Vec3::from(self.vertices[tri[0] as usize]),
                Vec3::from(self.vertices[tri[1] as usize]),
                Vec3::from(self.vertices[tri[2] as usize]),
            ]
        })
    }

    /// Local bounding box of all vertices
    pub fn bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::empty();
        for v in &self.vertices {
            bounds.expand(Vec3::from(*v));
        }
        bounds
    }

    /// Double-sided planar fill of a closed outline at `z = 0`.
    ///
    /// The front face points along +z; the back face repeats the vertices with
    /// reversed winding and -z normals.
    pub fn planar_fill(outline: &Outline2D) -> Self {
        let ring = outline.ring();
        let triangles = triangulate(ring);
        let mut mesh = Self::new();
        if triangles.is_empty() {
            return mesh;
        }

        mesh.push_cap(ring, &triangles, 0.0, false);
        mesh.push_cap(ring, &triangles, 0.0, true);
        mesh
    }

    /// Closed prism: bottom cap at `z = 0`, top cap at `z = height`, and one
    /// quad per outline edge.
    pub fn extrusion(outline: &Outline2D, height: f32) -> Self {
        let ring = outline.ring();
        let triangles = triangulate(ring);
        let mut mesh = Self::new();
        if triangles.is_empty() {
            return mesh;
        }

        mesh.push_cap(ring, &triangles, 0.0, true);
        mesh.push_cap(ring, &triangles, height, false);

        // Outward side normals depend on the ring's winding
        let winding = if outline.signed_area() >= 0.0 { 1.0 } else { -1.0 };
        for (a, b) in outline.edges() {
            let edge = b - a;
            let Some(side) = Vec2::new(edge.y, -edge.x).try_normalize() else {
                continue;
            };
            let normal = (side * winding).extend(0.0).to_array();
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend([
                [a.x, a.y, 0.0],
                [b.x, b.y, 0.0],
                [b.x, b.y, height],
                [a.x, a.y, height],
            ]);
            mesh.normals.extend([normal; 4]);
            if winding > 0.0 {
                mesh.indices
                    .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
            } else {
                mesh.indices
                    .extend([base, base + 2, base + 1, base, base + 3, base + 2]);
            }
        }
        mesh
    }

    fn push_cap(&mut self, ring: &[Vec2], triangles: &[[u32; 3]], z: f32, flipped: bool) {
        let base = self.vertices.len() as u32;
        let normal = if flipped { [0.0, 0.0, -1.0] } else { [0.0, 0.0, 1.0] };
        for p in ring {
            self.vertices.push([p.x, p.y, z]);
            self.normals.push(normal);
        }
        for tri in triangles {
            if flipped {
                self.indices
                    .extend([base + tri[0], base + tri[2], base + tri[1]]);
            } else {
                self.indices
                    .extend([base + tri[0], base + tri[1], base + tri[2]]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_planar_fill_is_double_sided() {
        let outline = Outline2D::closed(vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
        let mesh = TessellatedMesh::planar_fill(&outline);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.normals[3], [0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_extruded_square() {
        let outline = Outline2D::rectangle(Vec2::ZERO, Vec2::ONE);
        let mesh = TessellatedMesh::extrusion(&outline, 2.0);
        // 2 caps x 2 triangles + 4 sides x 2 triangles
        assert_eq!(mesh.triangle_count(), 12);
        let bounds = mesh.bounds();
        assert_relative_eq!(bounds.max.z, 2.0);
        assert_relative_eq!(bounds.min.z, 0.0);
    }

    #[test]
    fn test_side_normals_point_outward_for_clockwise_ring() {
        let outline = Outline2D::closed(vec![Vec2::ZERO, Vec2::Y, Vec2::ONE, Vec2::X]);
        let mesh = TessellatedMesh::extrusion(&outline, 1.0);
        // First side quad follows the caps (4 + 4 vertices); edge (0,0)->(0,1)
        // lies on x = 0, so its outward normal is -x.
        assert_eq!(mesh.normals[8], [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_degenerate_outline_yields_empty_mesh() {
        let outline = Outline2D::closed(vec![Vec2::ZERO, Vec2::X]);
        assert!(TessellatedMesh::planar_fill(&outline).is_empty());
        assert!(TessellatedMesh::extrusion(&outline, 1.0).is_empty());
    }
}
