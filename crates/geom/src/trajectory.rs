use crate::scalar::Scalar;
use crate::segment::Segment;
use crate::{Box2D, CubicBezierSegment, LineSegment, Point, Vector};

use core::ops::Range;

/// A curve a road-marking contour edge travels along: either a straight
/// line segment or a cubic bézier.
///
/// The set of variants is closed; both payloads expose the same sampling
/// and splitting operations so trajectories dispatch by matching rather
/// than through trait objects.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Trajectory<S> {
    Line(LineSegment<S>),
    Bezier(CubicBezierSegment<S>),
}

impl<S: Scalar> Trajectory<S> {
    /// Straight trajectory between two points.
    #[inline]
    pub fn line(from: Point<S>, to: Point<S>) -> Self {
        Trajectory::Line(LineSegment { from, to })
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        match self {
            Trajectory::Line(line) => line.from,
            Trajectory::Bezier(curve) => curve.from,
        }
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        match self {
            Trajectory::Line(line) => line.to,
            Trajectory::Bezier(curve) => curve.to,
        }
    }

    /// Sample the trajectory at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        match self {
            Trajectory::Line(line) => line.sample(t),
            Trajectory::Bezier(curve) => curve.sample(t),
        }
    }

    /// Sample the trajectory's derivative at t (expecting t between 0 and 1).
    #[inline]
    pub fn derivative(&self, t: S) -> Vector<S> {
        match self {
            Trajectory::Line(line) => line.derivative(t),
            Trajectory::Bezier(curve) => curve.derivative(t),
        }
    }

    /// Split this trajectory into two sub-trajectories.
    pub fn split(&self, t: S) -> (Self, Self) {
        match self {
            Trajectory::Line(line) => {
                let (a, b) = line.split(t);
                (Trajectory::Line(a), Trajectory::Line(b))
            }
            Trajectory::Bezier(curve) => {
                let (a, b) = curve.split(t);
                (Trajectory::Bezier(a), Trajectory::Bezier(b))
            }
        }
    }

    /// Return the trajectory before the split point.
    pub fn before_split(&self, t: S) -> Self {
        match self {
            Trajectory::Line(line) => Trajectory::Line(line.before_split(t)),
            Trajectory::Bezier(curve) => Trajectory::Bezier(curve.before_split(t)),
        }
    }

    /// Return the trajectory after the split point.
    pub fn after_split(&self, t: S) -> Self {
        match self {
            Trajectory::Line(line) => Trajectory::Line(line.after_split(t)),
            Trajectory::Bezier(curve) => Trajectory::Bezier(curve.after_split(t)),
        }
    }

    /// Return the sub-trajectory inside a given range of t.
    pub fn split_range(&self, t_range: Range<S>) -> Self {
        match self {
            Trajectory::Line(line) => Trajectory::Line(line.split_range(t_range)),
            Trajectory::Bezier(curve) => Trajectory::Bezier(curve.split_range(t_range)),
        }
    }

    /// Swap the direction of travel.
    pub fn flip(&self) -> Self {
        match self {
            Trajectory::Line(line) => Trajectory::Line(line.flip()),
            Trajectory::Bezier(curve) => Trajectory::Bezier(curve.flip()),
        }
    }

    /// Compute the length of the trajectory, approximating curves within the
    /// given tolerance.
    pub fn approximate_length(&self, tolerance: S) -> S {
        match self {
            Trajectory::Line(line) => line.length(),
            Trajectory::Bezier(curve) => curve.approximate_length(tolerance),
        }
    }

    /// Displace the trajectory perpendicular to its direction of travel.
    ///
    /// Positive distances displace towards the left normal.
    pub fn offset(&self, d: S) -> Self {
        match self {
            Trajectory::Line(line) => Trajectory::Line(line.offset(d)),
            Trajectory::Bezier(curve) => Trajectory::Bezier(curve.offset(d)),
        }
    }

    /// The straight segment between the trajectory's end points.
    #[inline]
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from(),
            to: self.to(),
        }
    }

    pub fn bounding_box(&self) -> Box2D<S> {
        match self {
            Trajectory::Line(line) => line.bounding_box(),
            Trajectory::Bezier(curve) => curve.bounding_box(),
        }
    }

    /// Whether the trajectory is too short to be worth keeping, within the
    /// given tolerance.
    pub fn is_degenerate(&self, tolerance: S) -> bool {
        self.approximate_length(tolerance) <= tolerance
    }

    /// Move only the start point, leaving the rest of the control net in
    /// place. Intended for reconnecting nearly-touching trajectories.
    pub fn with_start(&self, start: Point<S>) -> Self {
        match *self {
            Trajectory::Line(line) => Trajectory::Line(LineSegment {
                from: start,
                to: line.to,
            }),
            Trajectory::Bezier(curve) => Trajectory::Bezier(CubicBezierSegment {
                from: start,
                ..curve
            }),
        }
    }

    /// Move only the end point, leaving the rest of the control net in place.
    pub fn with_end(&self, end: Point<S>) -> Self {
        match *self {
            Trajectory::Line(line) => Trajectory::Line(LineSegment {
                from: line.from,
                to: end,
            }),
            Trajectory::Bezier(curve) => Trajectory::Bezier(CubicBezierSegment {
                to: end,
                ..curve
            }),
        }
    }
}

impl<S: Scalar> Segment for Trajectory<S> {
    impl_segment!(S);
}

impl<S> From<LineSegment<S>> for Trajectory<S> {
    fn from(line: LineSegment<S>) -> Self {
        Trajectory::Line(line)
    }
}

impl<S> From<CubicBezierSegment<S>> for Trajectory<S> {
    fn from(curve: CubicBezierSegment<S>) -> Self {
        Trajectory::Bezier(curve)
    }
}

#[cfg(test)]
use crate::point;

#[test]
fn line_trajectory_basics() {
    let t = Trajectory::line(point(0.0f32, 0.0), point(4.0, 0.0));

    assert_eq!(t.from(), point(0.0, 0.0));
    assert_eq!(t.to(), point(4.0, 0.0));
    assert_eq!(t.sample(0.5), point(2.0, 0.0));
    assert!((t.approximate_length(0.01) - 4.0).abs() < 0.0001);

    let f = t.flip();
    assert_eq!(f.from(), point(4.0, 0.0));
    assert_eq!(f.to(), point(0.0, 0.0));
}

#[test]
fn bezier_trajectory_cut() {
    let t = Trajectory::Bezier(CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(1.0, 2.0),
        ctrl2: point(3.0, 2.0),
        to: point(4.0, 0.0),
    });

    let cut = t.split_range(0.25..0.75);
    assert!((cut.from() - t.sample(0.25)).length() < 0.0001);
    assert!((cut.to() - t.sample(0.75)).length() < 0.0001);
}

#[test]
fn degenerate_trajectory() {
    let t = Trajectory::line(point(1.0f32, 1.0), point(1.0, 1.0));
    assert!(t.is_degenerate(0.001));

    let t = Trajectory::line(point(0.0f32, 0.0), point(1.0, 0.0));
    assert!(!t.is_degenerate(0.001));
}
