use crate::geom::Triangle;
use crate::math::Point;
use crate::{Index, Winding};

use alloc::vec::Vec;

/// A vertex of the working ring. `index` is the position in the input
/// slice, stable across removals; `prev`/`next` link the ring together.
#[derive(Copy, Clone, Debug)]
struct RingVertex {
    position: Point,
    index: Index,
    prev: usize,
    next: usize,
    is_convex: bool,
    active: bool,
}

/// Ear-clipping triangulator for simple polygons.
///
/// The triangulator can be reused for several polygons; its internal ring
/// storage is recycled across runs.
///
/// # Example
///
/// ```
/// use roadmark_tessellation::{Triangulator, Winding};
/// use roadmark_tessellation::math::point;
///
/// let mut triangulator = Triangulator::new();
/// let indices = triangulator.triangulate(
///     &[
///         point(0.0, 0.0),
///         point(4.0, 0.0),
///         point(4.0, 4.0),
///         point(0.0, 4.0),
///     ],
///     Winding::Clockwise,
/// );
/// assert_eq!(indices.map(|i| i.len()), Some(6));
/// ```
pub struct Triangulator {
    ring: Vec<RingVertex>,
    log: bool,
}

impl Default for Triangulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Triangulator {
    pub fn new() -> Self {
        Triangulator {
            ring: Vec::new(),
            log: false,
        }
    }

    /// Enable some verbose logging when debug assertions are enabled.
    pub fn set_logging(&mut self, is_enabled: bool) {
        self.log = is_enabled;
    }

    /// Triangulate a simple polygon given as its boundary ring, in the
    /// winding direction the ring is wound in.
    ///
    /// Returns three indices into `points` per triangle, wound the same
    /// way as the input, or `None` when the clipping gets stuck (which is
    /// how degenerate and self-intersecting boundaries show up). The
    /// boundary must not self-intersect; this is a precondition, not a
    /// checked error, and non-simple input produces `None` or an
    /// arbitrary triangulation.
    ///
    /// When several ears are available the one with the lowest original
    /// index is clipped, so the output is deterministic.
    pub fn triangulate(&mut self, points: &[Point], winding: Winding) -> Option<Vec<Index>> {
        let n = points.len();
        if n < 3 {
            return None;
        }

        self.ring.clear();
        self.ring.reserve(n);
        for (i, &position) in points.iter().enumerate() {
            self.ring.push(RingVertex {
                position,
                index: i as Index,
                prev: (i + n - 1) % n,
                next: (i + 1) % n,
                is_convex: false,
                active: true,
            });
        }
        for i in 0..n {
            let is_convex = self.compute_convexity(i, winding);
            self.ring[i].is_convex = is_convex;
        }

        let mut indices = Vec::with_capacity((n - 2) * 3);
        let mut remaining = n;

        while remaining >= 3 {
            let ear = match self.find_ear() {
                Some(ear) => ear,
                None => {
                    tess_log!(
                        self,
                        "No ear found with {} vertices remaining.",
                        remaining
                    );
                    return None;
                }
            };

            let prev = self.ring[ear].prev;
            let next = self.ring[ear].next;

            indices.push(self.ring[prev].index);
            indices.push(self.ring[ear].index);
            indices.push(self.ring[next].index);

            // Unlink the apex and refresh its neighbors: their convexity
            // can flip now that they face each other.
            self.ring[ear].active = false;
            self.ring[prev].next = next;
            self.ring[next].prev = prev;
            remaining -= 1;

            let prev_convex = self.compute_convexity(prev, winding);
            self.ring[prev].is_convex = prev_convex;
            let next_convex = self.compute_convexity(next, winding);
            self.ring[next].is_convex = next_convex;
        }

        Some(indices)
    }

    /// A vertex is convex when the turn it makes agrees with the ring's
    /// winding direction. Collinear vertices count as convex so that they
    /// can be clipped away as zero-area ears.
    fn compute_convexity(&self, v: usize, winding: Winding) -> bool {
        let vertex = &self.ring[v];
        let a = vertex.position - self.ring[vertex.prev].position;
        let b = self.ring[vertex.next].position - vertex.position;
        let cross = a.cross(b);

        match winding {
            Winding::Clockwise => cross >= 0.0,
            Winding::CounterClockwise => cross <= 0.0,
        }
    }

    /// The active convex vertex with the lowest original index whose
    /// clipping triangle contains no other active vertex.
    fn find_ear(&self) -> Option<usize> {
        (0..self.ring.len())
            .find(|&v| self.ring[v].active && self.ring[v].is_convex && self.is_ear(v))
    }

    fn is_ear(&self, v: usize) -> bool {
        let vertex = &self.ring[v];
        let triangle = Triangle {
            a: self.ring[vertex.prev].position,
            b: vertex.position,
            c: self.ring[vertex.next].position,
        };

        for (u, other) in self.ring.iter().enumerate() {
            if !other.active || u == v || u == vertex.prev || u == vertex.next {
                continue;
            }
            // Convex vertices cannot sit inside an ear of a simple polygon.
            if other.is_convex {
                continue;
            }
            if triangle.contains_point(other.position) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;
    use crate::signed_area;

    fn triangle_area_sum(points: &[Point], indices: &[Index]) -> f32 {
        indices
            .chunks(3)
            .map(|tri| {
                signed_area(&[
                    points[tri[0] as usize],
                    points[tri[1] as usize],
                    points[tri[2] as usize],
                ])
            })
            .sum()
    }

    fn assert_valid_triangulation(points: &[Point], indices: &[Index], winding: Winding) {
        assert_eq!(indices.len(), (points.len() - 2) * 3);

        let mut used = alloc::vec![false; points.len()];
        for tri in indices.chunks(3) {
            let area = signed_area(&[
                points[tri[0] as usize],
                points[tri[1] as usize],
                points[tri[2] as usize],
            ]);
            match winding {
                Winding::Clockwise => assert!(area >= 0.0),
                Winding::CounterClockwise => assert!(area <= 0.0),
            }
            for &i in tri {
                used[i as usize] = true;
            }
        }
        assert!(used.iter().all(|&u| u));

        let total = triangle_area_sum(points, indices);
        let expected = signed_area(points);
        assert!(
            (total - expected).abs() < 0.001,
            "covered area {} does not match polygon area {}",
            total,
            expected
        );
    }

    #[test]
    fn square() {
        let points = [
            point(0.0, 0.0),
            point(4.0, 0.0),
            point(4.0, 4.0),
            point(0.0, 4.0),
        ];

        let indices = Triangulator::new()
            .triangulate(&points, Winding::Clockwise)
            .unwrap();

        assert_valid_triangulation(&points, &indices, Winding::Clockwise);
        assert_eq!(indices.len(), 6);
        assert!((triangle_area_sum(&points, &indices) - 16.0).abs() < 0.001);

        // Two triangles of a quad share exactly one diagonal: both contain
        // the same pair of opposite vertices.
        let t1 = &indices[0..3];
        let t2 = &indices[3..6];
        let shared: alloc::vec::Vec<_> = t1.iter().filter(|i| t2.contains(i)).collect();
        assert_eq!(shared.len(), 2);
    }

    #[test]
    fn counter_clockwise_square() {
        let points = [
            point(0.0, 0.0),
            point(0.0, 4.0),
            point(4.0, 4.0),
            point(4.0, 0.0),
        ];

        let indices = Triangulator::new()
            .triangulate(&points, Winding::CounterClockwise)
            .unwrap();

        assert_valid_triangulation(&points, &indices, Winding::CounterClockwise);
    }

    #[test]
    fn l_shape() {
        // Clockwise (y down) L-shaped hexagon with a concave notch around
        // (2, 2)..(5, 5).
        let points = [
            point(0.0, 0.0),
            point(5.0, 0.0),
            point(5.0, 2.0),
            point(2.0, 2.0),
            point(2.0, 5.0),
            point(0.0, 5.0),
        ];

        let indices = Triangulator::new()
            .triangulate(&points, Winding::Clockwise)
            .unwrap();

        assert_valid_triangulation(&points, &indices, Winding::Clockwise);
        assert_eq!(indices.len(), 4 * 3);

        // The notch interior must stay uncovered.
        let notch = point(4.0, 4.0);
        for tri in indices.chunks(3) {
            let triangle = crate::geom::Triangle {
                a: points[tri[0] as usize],
                b: points[tri[1] as usize],
                c: points[tri[2] as usize],
            };
            assert!(!triangle.contains_point(notch));
        }
    }

    #[test]
    fn convex_fan() {
        // A convex octagon-ish ring.
        let points = [
            point(2.0, 0.0),
            point(5.0, 0.0),
            point(7.0, 2.0),
            point(7.0, 5.0),
            point(5.0, 7.0),
            point(2.0, 7.0),
            point(0.0, 5.0),
            point(0.0, 2.0),
        ];

        let indices = Triangulator::new()
            .triangulate(&points, Winding::Clockwise)
            .unwrap();

        assert_valid_triangulation(&points, &indices, Winding::Clockwise);
    }

    #[test]
    fn bowtie_fails() {
        // Self-intersecting quadrilateral; the clipping must give up
        // rather than emit nonsense.
        let points = [
            point(0.0, 0.0),
            point(4.0, 4.0),
            point(4.0, 0.0),
            point(0.0, 4.0),
        ];

        assert_eq!(
            Triangulator::new().triangulate(&points, Winding::Clockwise),
            None
        );
    }

    #[test]
    fn too_few_points() {
        let mut triangulator = Triangulator::new();
        assert_eq!(triangulator.triangulate(&[], Winding::Clockwise), None);
        assert_eq!(
            triangulator.triangulate(&[point(0.0, 0.0), point(1.0, 0.0)], Winding::Clockwise),
            None
        );
    }

    #[test]
    fn reuse_across_runs() {
        let mut triangulator = Triangulator::new();

        let square = [
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(1.0, 1.0),
            point(0.0, 1.0),
        ];
        let triangle = [point(0.0, 0.0), point(2.0, 0.0), point(2.0, 2.0)];

        assert_eq!(
            triangulator
                .triangulate(&square, Winding::Clockwise)
                .map(|i| i.len()),
            Some(6)
        );
        assert_eq!(
            triangulator
                .triangulate(&triangle, Winding::Clockwise)
                .map(|i| i.len()),
            Some(3)
        );
    }
}
