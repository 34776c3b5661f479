use crate::geom::Trajectory;
use crate::math::{Box2D, Point};
use crate::math_utils::polygon_winding;
use crate::Winding;

use alloc::vec::Vec;

/// Host-assigned classification of a contour edge, selecting which of a
/// pair of offset distances or corner radii applies to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum EdgeRole {
    /// The edge follows a marking line.
    Lane,
    /// The edge borders a median.
    Median,
}

/// One edge of a closed filler contour.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ContourEdge {
    pub trajectory: Trajectory<f32>,
    pub role: EdgeRole,
    /// Set on the short arc edges inserted by corner rounding, so that
    /// they are never rounded again.
    pub corner: bool,
}

impl ContourEdge {
    #[inline]
    pub fn new(trajectory: Trajectory<f32>, role: EdgeRole) -> Self {
        ContourEdge {
            trajectory,
            role,
            corner: false,
        }
    }

    #[inline]
    pub fn corner(trajectory: Trajectory<f32>, role: EdgeRole) -> Self {
        ContourEdge {
            trajectory,
            role,
            corner: true,
        }
    }

    /// The same edge travelled in the opposite direction.
    #[inline]
    pub fn flip(&self) -> Self {
        ContourEdge {
            trajectory: self.trajectory.flip(),
            ..*self
        }
    }
}

/// A closed loop of curve edges describing a filler boundary.
///
/// The edges form a ring: the end of edge `i` touches the start of edge
/// `i + 1` modulo the edge count.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Contour {
    edges: Vec<ContourEdge>,
}

impl Contour {
    pub fn new(edges: Vec<ContourEdge>) -> Self {
        Contour { edges }
    }

    /// Build a contour of straight edges from a ring of points, all edges
    /// sharing one role.
    pub fn from_points(points: &[Point], role: EdgeRole) -> Self {
        let mut edges = Vec::with_capacity(points.len());
        for i in 0..points.len() {
            let j = (i + 1) % points.len();
            edges.push(ContourEdge::new(Trajectory::line(points[i], points[j]), role));
        }

        Contour { edges }
    }

    #[inline]
    pub fn edges(&self) -> &[ContourEdge] {
        &self.edges
    }

    #[inline]
    pub fn into_edges(self) -> Vec<ContourEdge> {
        self.edges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Whether each edge's end touches the next edge's start, within a
    /// distance tolerance.
    pub fn is_closed(&self, tolerance: f32) -> bool {
        let n = self.edges.len();
        if n == 0 {
            return false;
        }

        for i in 0..n {
            let end = self.edges[i].trajectory.to();
            let start = self.edges[(i + 1) % n].trajectory.from();
            if (end - start).length() > tolerance {
                return false;
            }
        }

        true
    }

    /// Points the contour travels through, sampling curve edges at a few
    /// interior positions so that winding and area estimates account for
    /// their bulge.
    pub fn sample_points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.edges.len() * 2);
        for edge in &self.edges {
            match edge.trajectory {
                Trajectory::Line(_) => points.push(edge.trajectory.from()),
                Trajectory::Bezier(_) => {
                    points.push(edge.trajectory.from());
                    points.push(edge.trajectory.sample(0.25));
                    points.push(edge.trajectory.sample(0.5));
                    points.push(edge.trajectory.sample(0.75));
                }
            }
        }

        points
    }

    /// Orientation of the contour, or `None` when it encloses no area.
    pub fn winding(&self) -> Option<Winding> {
        polygon_winding(&self.sample_points())
    }

    /// Reverse the contour in place if its winding differs from the
    /// requested one. Contours with no detectable winding are left alone.
    pub fn normalize(&mut self, winding: Winding) {
        if self.winding() == Some(winding.opposite()) {
            self.edges.reverse();
            for edge in &mut self.edges {
                *edge = edge.flip();
            }
        }
    }

    pub fn bounding_box(&self) -> Box2D {
        let mut edges = self.edges.iter();
        let mut b = match edges.next() {
            Some(edge) => edge.trajectory.bounding_box(),
            None => return Box2D::zero(),
        };
        for edge in edges {
            let eb = edge.trajectory.bounding_box();
            b.min.x = b.min.x.min(eb.min.x);
            b.min.y = b.min.y.min(eb.min.y);
            b.max.x = b.max.x.max(eb.max.x);
            b.max.y = b.max.y.max(eb.max.y);
        }

        b
    }
}

/// The closed rings produced by offsetting one contour. Possibly empty
/// (the offset consumed the whole shape), possibly more than one ring
/// (the offset pinched the shape apart). Rings are independent; no
/// nesting relationship is tracked.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ContourGroup {
    pub contours: Vec<Contour>,
}

impl ContourGroup {
    pub fn new() -> Self {
        ContourGroup {
            contours: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    #[inline]
    pub fn push(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Contour> {
        self.contours.iter()
    }
}

impl IntoIterator for ContourGroup {
    type Item = Contour;
    type IntoIter = alloc::vec::IntoIter<Contour>;

    fn into_iter(self) -> Self::IntoIter {
        self.contours.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    fn square() -> Contour {
        Contour::from_points(
            &[
                point(0.0, 0.0),
                point(4.0, 0.0),
                point(4.0, 4.0),
                point(0.0, 4.0),
            ],
            EdgeRole::Lane,
        )
    }

    #[test]
    fn from_points_is_closed() {
        let c = square();
        assert_eq!(c.len(), 4);
        assert!(c.is_closed(0.0001));
        assert_eq!(c.winding(), Some(Winding::Clockwise));
    }

    #[test]
    fn normalize_reverses_winding() {
        let mut c = square();
        c.normalize(Winding::CounterClockwise);
        assert_eq!(c.winding(), Some(Winding::CounterClockwise));
        assert!(c.is_closed(0.0001));

        // Already matching: no-op.
        let before = c.clone();
        c.normalize(Winding::CounterClockwise);
        assert_eq!(c, before);
    }

    #[test]
    fn bounding_box_covers_edges() {
        let b = square().bounding_box();
        assert_eq!(b.min, point(0.0, 0.0));
        assert_eq!(b.max, point(4.0, 4.0));
    }
}
