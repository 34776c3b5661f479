use crate::scalar::Scalar;
use crate::segment::Segment;
use crate::utils::{min_max, normalized_tangent};
use crate::{point, Box2D, Point, Vector};

use core::ops::Range;

/// A line segment defined by its `from` and `to` end points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment<S> {
    pub from: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> LineSegment<S> {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.from.lerp(self.to, t)
    }

    /// Sample the x coordinate of the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn x(&self, t: S) -> S {
        self.from.x * (S::ONE - t) + self.to.x * t
    }

    /// Sample the y coordinate of the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn y(&self, t: S) -> S {
        self.from.y * (S::ONE - t) + self.to.y * t
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.to
    }

    /// Returns an inverted version of this segment where the beginning and the end
    /// points are swapped.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// Return the sub-segment inside a given range of t.
    ///
    /// This is equivalent to splitting at the range's end points.
    #[inline]
    pub fn split_range(&self, t_range: Range<S>) -> Self {
        LineSegment {
            from: self.from.lerp(self.to, t_range.start),
            to: self.from.lerp(self.to, t_range.end),
        }
    }

    /// Split this curve into two sub-segments.
    #[inline]
    pub fn split(&self, t: S) -> (Self, Self) {
        let split_point = self.sample(t);

        (
            LineSegment {
                from: self.from,
                to: split_point,
            },
            LineSegment {
                from: split_point,
                to: self.to,
            },
        )
    }

    /// Return the segment before the split point.
    #[inline]
    pub fn before_split(&self, t: S) -> Self {
        LineSegment {
            from: self.from,
            to: self.sample(t),
        }
    }

    /// Return the segment after the split point.
    #[inline]
    pub fn after_split(&self, t: S) -> Self {
        LineSegment {
            from: self.sample(t),
            to: self.to,
        }
    }

    pub fn bounding_box(&self) -> Box2D<S> {
        let (min_x, max_x) = self.bounding_range_x();
        let (min_y, max_y) = self.bounding_range_y();

        Box2D {
            min: point(min_x, min_y),
            max: point(max_x, max_y),
        }
    }

    #[inline]
    fn bounding_range_x(&self) -> (S, S) {
        min_max(self.from.x, self.to.x)
    }

    #[inline]
    fn bounding_range_y(&self) -> (S, S) {
        min_max(self.from.y, self.to.y)
    }

    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector<S> {
        self.to - self.from
    }

    /// Returns the line containing this segment.
    #[inline]
    pub fn to_line(&self) -> Line<S> {
        Line {
            point: self.from,
            vector: self.to - self.from,
        }
    }

    /// Computes the length of this segment.
    #[inline]
    pub fn length(&self) -> S {
        self.to_vector().length()
    }

    #[inline]
    pub fn square_length(&self) -> S {
        self.to_vector().square_length()
    }

    /// Sample the segment's derivative (constant over the segment).
    #[inline]
    pub fn derivative(&self, _t: S) -> Vector<S> {
        self.to_vector()
    }

    #[inline]
    pub fn mid_point(&self) -> Point<S> {
        self.sample(S::HALF)
    }

    #[inline]
    pub fn translated(&self, by: Vector<S>) -> Self {
        LineSegment {
            from: self.from + by,
            to: self.to + by,
        }
    }

    /// Displace the segment perpendicular to its direction of travel.
    ///
    /// Positive distances displace towards the left normal (the direction
    /// `to_vector()` rotated 90° counter-clockwise). Degenerate segments are
    /// returned unchanged since they have no normal.
    pub fn offset(&self, d: S) -> Self {
        let v = self.to_vector();
        if v.square_length() < S::EPSILON * S::EPSILON {
            return *self;
        }

        self.translated(normalized_tangent(v) * d)
    }

    pub fn square_distance_to_point(&self, p: Point<S>) -> S {
        (self.closest_point(p) - p).square_length()
    }

    pub fn distance_to_point(&self, p: Point<S>) -> S {
        self.square_distance_to_point(p).sqrt()
    }

    pub fn closest_point(&self, p: Point<S>) -> Point<S> {
        let v1 = self.to_vector();
        let v2 = p - self.from;
        let t = S::min(S::max(v2.dot(v1) / v1.dot(v1), S::ZERO), S::ONE);

        self.sample(t)
    }

    /// Computes the intersection (if any) between this segment and another one.
    ///
    /// The result is provided in the form of the `t` parameter of each
    /// segment. To get the intersection point, sample one of the segments
    /// at the corresponding value. Segments sharing an end point are not
    /// considered intersecting.
    #[allow(clippy::suspicious_operation_groupings)]
    pub fn intersection_t(&self, other: &Self) -> Option<(S, S)> {
        if self.to == other.to
            || self.from == other.from
            || self.from == other.to
            || self.to == other.from
        {
            return None;
        }

        let v1 = self.to_vector();
        let v2 = other.to_vector();

        let v1_cross_v2 = v1.cross(v2);

        if v1_cross_v2 == S::ZERO {
            // The segments are parallel
            return None;
        }

        let sign_v1_cross_v2 = S::signum(v1_cross_v2);
        let abs_v1_cross_v2 = S::abs(v1_cross_v2);

        let v3 = other.from - self.from;

        // t and u should be divided by v1_cross_v2, but we postpone that to not
        // lose precision. We have to respect the sign of v1_cross_v2 (and
        // therefore t and u) so we apply it now and will use the absolute value
        // of v1_cross_v2 afterwards.
        let t = v3.cross(v2) * sign_v1_cross_v2;
        let u = v3.cross(v1) * sign_v1_cross_v2;

        if t < S::ZERO || t > abs_v1_cross_v2 || u < S::ZERO || u > abs_v1_cross_v2 {
            return None;
        }

        Some((t / abs_v1_cross_v2, u / abs_v1_cross_v2))
    }

    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Point<S>> {
        self.intersection_t(other).map(|(t, _)| self.sample(t))
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersection_t(other).is_some()
    }

    /// Compute the length of the segment; the tolerance is unused since a
    /// line segment's exact length is known.
    #[inline]
    pub fn approximate_length(&self, _tolerance: S) -> S {
        self.length()
    }
}

impl<S: Scalar> Segment for LineSegment<S> {
    impl_segment!(S);
}

/// An infinite line defined by a point and a direction vector.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Line<S> {
    pub point: Point<S>,
    pub vector: Vector<S>,
}

impl<S: Scalar> Line<S> {
    pub fn intersection(&self, other: &Self) -> Option<Point<S>> {
        let det = self.vector.cross(other.vector);
        if S::abs(det) <= S::EPSILON {
            // The lines are very close to parallel
            return None;
        }
        let inv_det = S::ONE / det;
        let self_p2 = self.point + self.vector;
        let other_p2 = other.point + other.vector;
        let a = self.point.to_vector().cross(self_p2.to_vector());
        let b = other.point.to_vector().cross(other_p2.to_vector());

        Some(point(
            (b * self.vector.x - a * other.vector.x) * inv_det,
            (b * self.vector.y - a * other.vector.y) * inv_det,
        ))
    }

    pub fn signed_distance_to_point(&self, p: &Point<S>) -> S {
        let v1 = self.vector;
        let v2 = *p - self.point;

        (v1.cross(v2)) / v1.length()
    }

    #[inline]
    pub fn distance_to_point(&self, p: &Point<S>) -> S {
        S::abs(self.signed_distance_to_point(p))
    }
}

#[cfg(test)]
fn fuzzy_eq_f32(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

#[cfg(test)]
fn fuzzy_eq_point(a: Point<f32>, b: Point<f32>, epsilon: f32) -> bool {
    fuzzy_eq_f32(a.x, b.x, epsilon) && fuzzy_eq_f32(a.y, b.y, epsilon)
}

#[test]
fn intersection_simple() {
    let l1 = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    };
    let l2 = LineSegment {
        from: point(5.0, -5.0),
        to: point(5.0, 5.0),
    };

    let (t1, t2) = l1.intersection_t(&l2).unwrap();
    assert!(fuzzy_eq_f32(t1, 0.5, 0.0001));
    assert!(fuzzy_eq_f32(t2, 0.5, 0.0001));
    assert!(fuzzy_eq_point(
        l1.sample(t1),
        point(5.0, 0.0),
        0.0001
    ));
}

#[test]
fn intersection_touching() {
    let l1 = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 10.0),
    };
    let l2 = LineSegment {
        from: point(10.0, 10.0),
        to: point(10.0, 0.0),
    };

    assert!(!l1.intersects(&l2));
}

#[test]
fn intersection_overlap() {
    // It's hard to define the intersection points of two segments that overlap,
    // (would be a region rather than a point) so we choose to treat
    // overlapping segments as not intersecting.
    let l1 = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    };
    let l2 = LineSegment {
        from: point(5.0, 0.0),
        to: point(15.0, 0.0),
    };

    assert!(!l1.intersects(&l2));
}

#[test]
fn offset_left_normal() {
    let l = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    };

    let o = l.offset(2.0);
    assert!(fuzzy_eq_point(o.from, point(0.0, 2.0), 0.0001));
    assert!(fuzzy_eq_point(o.to, point(10.0, 2.0), 0.0001));

    // Degenerate segments have no normal to displace along.
    let d = LineSegment {
        from: point(1.0f32, 1.0),
        to: point(1.0, 1.0),
    };
    assert_eq!(d.offset(2.0), d);
}

#[test]
fn split_range_midsection() {
    let l = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    };

    let s = l.split_range(0.2..0.7);
    assert!(fuzzy_eq_point(s.from, point(2.0, 0.0), 0.0001));
    assert!(fuzzy_eq_point(s.to, point(7.0, 0.0), 0.0001));
}

#[test]
fn line_signed_distance() {
    let l = Line {
        point: point(0.0f32, 0.0),
        vector: crate::vector(10.0, 0.0),
    };

    assert!(fuzzy_eq_f32(
        l.signed_distance_to_point(&point(3.0, 4.0)),
        4.0,
        0.0001
    ));
    assert!(fuzzy_eq_f32(
        l.signed_distance_to_point(&point(3.0, -4.0)),
        -4.0,
        0.0001
    ));
}
