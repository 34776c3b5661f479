use crate::scalar::Scalar;
use crate::segment::Segment;
use crate::utils::{min_max, normalized_tangent, quadratic_roots};
use crate::{point, Box2D, Line, LineSegment, Point, Vector};

use arrayvec::ArrayVec;
use core::ops::Range;

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * (1 - t) * t² * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * S::THREE * one_t2 * t
            + self.ctrl2.to_vector() * S::THREE * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Sample the x coordinate of the curve at t (expecting t between 0 and 1).
    pub fn x(&self, t: S) -> S {
        self.sample(t).x
    }

    /// Sample the y coordinate of the curve at t (expecting t between 0 and 1).
    pub fn y(&self, t: S) -> S {
        self.sample(t).y
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.to
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    pub fn derivative(&self, t: S) -> Vector<S> {
        let one_t = S::ONE - t;

        (self.ctrl1 - self.from) * S::THREE * one_t * one_t
            + (self.ctrl2 - self.ctrl1) * S::value(6.0) * one_t * t
            + (self.to - self.ctrl2) * S::THREE * t * t
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        CubicBezierSegment {
            from: self.to,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            to: self.from,
        }
    }

    /// Split this curve into two sub-curves.
    pub fn split(&self, t: S) -> (CubicBezierSegment<S>, CubicBezierSegment<S>) {
        let ctrl1a = self.from.lerp(self.ctrl1, t);
        let ctrl2a = self.ctrl1.lerp(self.ctrl2, t);
        let ctrl1aa = ctrl1a.lerp(ctrl2a, t);
        let ctrl3a = self.ctrl2.lerp(self.to, t);
        let ctrl2aa = ctrl2a.lerp(ctrl3a, t);
        let ctrl1aaa = ctrl1aa.lerp(ctrl2aa, t);

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ctrl1a,
                ctrl2: ctrl1aa,
                to: ctrl1aaa,
            },
            CubicBezierSegment {
                from: ctrl1aaa,
                ctrl1: ctrl2aa,
                ctrl2: ctrl3a,
                to: self.to,
            },
        )
    }

    /// Return the curve before the split point.
    pub fn before_split(&self, t: S) -> CubicBezierSegment<S> {
        let ctrl1a = self.from.lerp(self.ctrl1, t);
        let ctrl2a = self.ctrl1.lerp(self.ctrl2, t);
        let ctrl1aa = ctrl1a.lerp(ctrl2a, t);
        let ctrl3a = self.ctrl2.lerp(self.to, t);
        let ctrl2aa = ctrl2a.lerp(ctrl3a, t);

        CubicBezierSegment {
            from: self.from,
            ctrl1: ctrl1a,
            ctrl2: ctrl1aa,
            to: ctrl1aa.lerp(ctrl2aa, t),
        }
    }

    /// Return the curve after the split point.
    pub fn after_split(&self, t: S) -> CubicBezierSegment<S> {
        let ctrl1a = self.from.lerp(self.ctrl1, t);
        let ctrl2a = self.ctrl1.lerp(self.ctrl2, t);
        let ctrl1aa = ctrl1a.lerp(ctrl2a, t);
        let ctrl3a = self.ctrl2.lerp(self.to, t);
        let ctrl2aa = ctrl2a.lerp(ctrl3a, t);

        CubicBezierSegment {
            from: ctrl1aa.lerp(ctrl2aa, t),
            ctrl1: ctrl2aa,
            ctrl2: ctrl3a,
            to: self.to,
        }
    }

    /// Return the sub-curve inside a given range of t.
    ///
    /// This is equivalent to splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<S>) -> Self {
        let t0 = t_range.start;
        let t1 = t_range.end;

        let curve = if t0 > S::ZERO {
            self.after_split(t0)
        } else {
            *self
        };

        if t1 < S::ONE && t0 < S::ONE {
            curve.before_split((t1 - t0) / (S::ONE - t0))
        } else {
            curve
        }
    }

    #[inline]
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Returns true if the curve can be approximated with a single line segment, given
    /// a tolerance threshold.
    pub fn is_linear(&self, tolerance: S) -> bool {
        let baseline = self.to - self.from;
        if baseline.square_length() < S::EPSILON * S::EPSILON {
            return (self.ctrl1 - self.from).square_length() < tolerance * tolerance
                && (self.ctrl2 - self.to).square_length() < tolerance * tolerance;
        }

        let line = Line {
            point: self.from,
            vector: baseline,
        };

        line.distance_to_point(&self.ctrl1) <= tolerance
            && line.distance_to_point(&self.ctrl2) <= tolerance
    }

    /// Compute the length of the segment using a flattened approximation.
    pub fn approximate_length(&self, tolerance: S) -> S {
        fn length_rec<S: Scalar>(curve: &CubicBezierSegment<S>, tolerance: S, depth: u32) -> S {
            if depth == 0 || curve.is_linear(tolerance) {
                return curve.baseline().length();
            }
            let (a, b) = curve.split(S::HALF);

            length_rec(&a, tolerance, depth - 1) + length_rec(&b, tolerance, depth - 1)
        }

        length_rec(self, tolerance, 8)
    }

    /// Displace the curve perpendicular to its direction of travel using the
    /// control-net construction: each leg of the control polygon is displaced
    /// along its normal and the control points are recovered by intersecting
    /// the displaced legs.
    ///
    /// This is an approximation; the error stays well below the displacement
    /// distance for the short, shallow curves road markings are built from.
    /// Positive distances displace towards the left normal.
    pub fn offset(&self, d: S) -> Self {
        let v1 = self.ctrl1 - self.from;
        let v2 = self.ctrl2 - self.ctrl1;
        let v3 = self.to - self.ctrl2;
        let baseline = self.to - self.from;

        let min_leg = S::EPSILON * S::EPSILON;
        if baseline.square_length() < min_leg
            && v1.square_length() < min_leg
            && v3.square_length() < min_leg
        {
            return *self;
        }

        // Degenerate legs borrow the direction of a neighbor so that the
        // normals stay defined.
        let d1 = if v1.square_length() < min_leg { baseline } else { v1 };
        let d3 = if v3.square_length() < min_leg { baseline } else { v3 };
        let d2 = if v2.square_length() < min_leg { d1 } else { v2 };

        let n1 = normalized_tangent(d1) * d;
        let n2 = normalized_tangent(d2) * d;
        let n3 = normalized_tangent(d3) * d;

        let from = self.from + n1;
        let to = self.to + n3;

        let l1 = Line {
            point: from,
            vector: d1,
        };
        let l2 = Line {
            point: self.ctrl1 + n2,
            vector: d2,
        };
        let l3 = Line {
            point: to,
            vector: d3,
        };

        let ctrl1 = l1.intersection(&l2).unwrap_or(self.ctrl1 + n1);
        let ctrl2 = l2.intersection(&l3).unwrap_or(self.ctrl2 + n3);

        CubicBezierSegment {
            from,
            ctrl1,
            ctrl2,
            to,
        }
    }

    /// Parameters at which the curve's x component reaches a local extremum,
    /// if any lie strictly inside the curve.
    pub fn local_x_extrema(&self) -> ArrayVec<S, 2> {
        Self::component_extrema(self.from.x, self.ctrl1.x, self.ctrl2.x, self.to.x)
    }

    /// Parameters at which the curve's y component reaches a local extremum,
    /// if any lie strictly inside the curve.
    pub fn local_y_extrema(&self) -> ArrayVec<S, 2> {
        Self::component_extrema(self.from.y, self.ctrl1.y, self.ctrl2.y, self.to.y)
    }

    // Roots of the derivative's component: 3(c1-p0)(1-t)² + 6(c2-c1)(1-t)t + 3(p3-c2)t².
    fn component_extrema(p0: S, c1: S, c2: S, p3: S) -> ArrayVec<S, 2> {
        let a = S::THREE * (p3 - S::THREE * c2 + S::THREE * c1 - p0);
        let b = S::value(6.0) * (c2 - S::TWO * c1 + p0);
        let c = S::THREE * (c1 - p0);

        let mut result = ArrayVec::new();
        for root in quadratic_roots(a, b, c) {
            if root > S::ZERO && root < S::ONE {
                result.push(root);
            }
        }

        result
    }

    pub fn bounding_range_x(&self) -> (S, S) {
        let (mut min_x, mut max_x) = min_max(self.from.x, self.to.x);
        for t in self.local_x_extrema() {
            let x = self.x(t);
            min_x = S::min(min_x, x);
            max_x = S::max(max_x, x);
        }

        (min_x, max_x)
    }

    pub fn bounding_range_y(&self) -> (S, S) {
        let (mut min_y, mut max_y) = min_max(self.from.y, self.to.y);
        for t in self.local_y_extrema() {
            let y = self.y(t);
            min_y = S::min(min_y, y);
            max_y = S::max(max_y, y);
        }

        (min_y, max_y)
    }

    /// Returns the smallest rectangle the curve is contained in.
    pub fn bounding_box(&self) -> Box2D<S> {
        let (min_x, max_x) = self.bounding_range_x();
        let (min_y, max_y) = self.bounding_range_y();

        Box2D {
            min: point(min_x, min_y),
            max: point(max_x, max_y),
        }
    }
}

impl<S: Scalar> Segment for CubicBezierSegment<S> {
    impl_segment!(S);
}

#[cfg(test)]
fn fuzzy_eq_point(a: Point<f32>, b: Point<f32>, epsilon: f32) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}

#[test]
fn length_straight_line() {
    // Sanity check: aligned points so the curve is a straight line going
    // from (0.0, 0.0) to (2.0, 0.0).
    let len = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 0.0),
        ctrl2: point(1.0, 0.0),
        to: point(2.0, 0.0),
    }
    .approximate_length(0.01);

    assert!((len - 2.0).abs() < 0.001);
}

#[test]
fn split_is_continuous() {
    let c = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 2.0),
        ctrl2: point(3.0, 2.0),
        to: point(4.0, 0.0),
    };

    let (a, b) = c.split(0.3);
    assert!(fuzzy_eq_point(a.to, b.from, 0.0001));
    assert!(fuzzy_eq_point(a.to, c.sample(0.3), 0.0001));
    assert!(fuzzy_eq_point(a.from, c.from, 0.0001));
    assert!(fuzzy_eq_point(b.to, c.to, 0.0001));
}

#[test]
fn split_range_matches_samples() {
    let c = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 2.0),
        ctrl2: point(3.0, 2.0),
        to: point(4.0, 0.0),
    };

    let s = c.split_range(0.25..0.75);
    assert!(fuzzy_eq_point(s.from, c.sample(0.25), 0.0001));
    assert!(fuzzy_eq_point(s.to, c.sample(0.75), 0.0001));
    assert!(fuzzy_eq_point(s.sample(0.5), c.sample(0.5), 0.01));
}

#[test]
fn bounding_box_arch() {
    let c = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 2.0),
        ctrl2: point(3.0, 2.0),
        to: point(4.0, 0.0),
    };

    let bb = c.bounding_box();
    assert!(bb.min.x >= -0.0001 && bb.max.x <= 4.0001);
    // The arch rises above its end points but stays below the control points.
    assert!(bb.max.y > 1.0 && bb.max.y < 2.0);
    assert!(bb.min.y >= -0.0001);
}

#[test]
fn offset_straight_curve() {
    let c = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 0.0),
        ctrl2: point(3.0, 0.0),
        to: point(4.0, 0.0),
    };

    let o = c.offset(1.0);
    assert!(fuzzy_eq_point(o.from, point(0.0, 1.0), 0.0001));
    assert!(fuzzy_eq_point(o.to, point(4.0, 1.0), 0.0001));
    assert!(fuzzy_eq_point(o.sample(0.5), point(2.0, 1.0), 0.01));
}

#[test]
fn is_linear_tolerance() {
    let flat = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 0.01),
        ctrl2: point(3.0, 0.01),
        to: point(4.0, 0.0),
    };
    assert!(flat.is_linear(0.1));
    assert!(!flat.is_linear(0.001));
}
