//! Ear-clipping triangulation of simple polygons

use glam::Vec2;

const AREA_EPSILON: f32 = 1e-9;

/// Triangulate a simple polygon given as a ring of distinct vertices.
///
/// Returned triangles index into `ring` and are counter-clockwise regardless
/// of the ring's winding. Degenerate rings produce no triangles.
pub fn triangulate(ring: &[Vec2]) -> Vec<[u32; 3]> {
    let n = ring.len();
    if n < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    if ring_area(ring) < 0.0 {
        remaining.reverse();
    } else if ring_area(ring).abs() <= AREA_EPSILON {
        return Vec::new();
    }

    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let count = remaining.len();
        let ear = (0..count).find(|&i| {
            let prev = remaining[(i + count - 1) % count];
            let cur = remaining[i];
            let next = remaining[(i + 1) % count];
            is_ear(ring, &remaining, prev, cur, next)
        });

        match ear {
            Some(i) => {
                let prev = remaining[(i + count - 1) % count];
                let next = remaining[(i + 1) % count];
                triangles.push([prev as u32, remaining[i] as u32, next as u32]);
                remaining.remove(i);
            }
            None => {
                // Drop a collinear vertex if there is one, otherwise fan out
                // what is left (self-intersecting input).
                let flat = (0..count).find(|&i| {
                    let prev = ring[remaining[(i + count - 1) % count]];
                    let cur = ring[remaining[i]];
                    let next = ring[remaining[(i + 1) % count]];
                    (cur - prev).perp_dot(next - cur).abs() <= AREA_EPSILON
                });
                if let Some(i) = flat {
                    remaining.remove(i);
                    continue;
                }
                tracing::warn!("Polygon has no ear, fanning {} vertices", count);
                for i in 1..count - 1 {
                    triangles.push([
                        remaining[0] as u32,
                        remaining[i] as u32,
                        remaining[i + 1] as u32,
                    ]);
                }
                return triangles;
            }
        }
    }

    let (a, b, c) = (remaining[0], remaining[1], remaining[2]);
    if (ring[b] - ring[a]).perp_dot(ring[c] - ring[a]).abs() > AREA_EPSILON {
        triangles.push([a as u32, b as u32, c as u32]);
    }
    triangles
}

fn ring_area(ring: &[Vec2]) -> f32 {
    let mut twice_area = 0.0;
    for (i, a) in ring.iter().enumerate() {
        twice_area += a.perp_dot(ring[(i + 1) % ring.len()]);
    }
    twice_area * 0.5
}

fn is_ear(ring: &[Vec2], remaining: &[usize], prev: usize, cur: usize, next: usize) -> bool {
    let (a, b, c) = (ring[prev], ring[cur], ring[next]);
    if (b - a).perp_dot(c - b) <= AREA_EPSILON {
        return false;
    }
    !remaining.iter().any(|&idx| {
        idx != prev && idx != cur && idx != next && point_in_triangle(ring[idx], a, b, c)
    })
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_of(ring: &[Vec2], triangles: &[[u32; 3]]) -> f32 {
        triangles
            .iter()
            .map(|t| {
                let (a, b, c) = (ring[t[0] as usize], ring[t[1] as usize], ring[t[2] as usize]);
                (b - a).perp_dot(c - a) * 0.5
            })
            .sum()
    }

    #[test]
    fn test_triangle() {
        let ring = [Vec2::ZERO, Vec2::X, Vec2::Y];
        assert_eq!(triangulate(&ring).len(), 1);
    }

    #[test]
    fn test_square_either_winding() {
        let ccw = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        let tris = triangulate(&ccw);
        assert_eq!(tris.len(), 2);
        assert!((area_of(&ccw, &tris) - 1.0).abs() < 1e-6);

        let cw = [Vec2::ZERO, Vec2::Y, Vec2::ONE, Vec2::X];
        let tris = triangulate(&cw);
        assert_eq!(tris.len(), 2);
        assert!((area_of(&cw, &tris) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_concave_l_shape() {
        let ring = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let tris = triangulate(&ring);
        assert_eq!(tris.len(), 4);
        assert!((area_of(&ring, &tris) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_collinear_ring_has_no_triangles() {
        let ring = [Vec2::ZERO, Vec2::X, Vec2::X * 2.0];
        assert!(triangulate(&ring).is_empty());
    }
}
