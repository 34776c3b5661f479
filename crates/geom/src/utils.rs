//! Various math tools that are mostly useful for the tessellation crate.

use crate::scalar::{Scalar, Trig};
use crate::{vector, Vector};
use arrayvec::ArrayVec;

#[inline]
pub fn min_max<S: Scalar>(a: S, b: S) -> (S, S) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Rotate the vector by 90 degrees counter-clockwise (the left normal of a
/// direction of travel, in a y-up coordinate system).
#[inline]
pub fn tangent<S: Scalar>(v: Vector<S>) -> Vector<S> {
    vector(-v.y, v.x)
}

#[inline]
pub fn normalized_tangent<S: Scalar>(v: Vector<S>) -> Vector<S> {
    tangent(v).normalize()
}

/// Angle between vectors v1 and v2 (oriented clockwise assuming y points
/// downwards). The result is a number between 0 and 2*PI.
#[inline]
pub fn directed_angle<S: Scalar>(v1: Vector<S>, v2: Vector<S>) -> S {
    let angle = S::fast_atan2(v2.y, v2.x) - S::fast_atan2(v1.y, v1.x);
    if angle < S::ZERO {
        angle + S::TWO * S::PI()
    } else {
        angle
    }
}

/// Real roots of `a*t² + b*t + c`, in no particular order.
pub fn quadratic_roots<S: Scalar>(a: S, b: S, c: S) -> ArrayVec<S, 2> {
    let mut result = ArrayVec::new();

    if S::abs(a) < S::value(1e-8) {
        if S::abs(b) < S::value(1e-8) {
            return result;
        }
        result.push(-c / b);
        return result;
    }

    let delta = b * b - S::FOUR * a * c;
    if delta > S::ZERO {
        let sqrt_delta = delta.sqrt();
        result.push((-b - sqrt_delta) / (S::TWO * a));
        result.push((-b + sqrt_delta) / (S::TWO * a));
    } else if delta == S::ZERO {
        result.push(-b / (S::TWO * a));
    }

    result
}

#[test]
fn quadratic_roots_simple() {
    // t² - 3t + 2 = (t - 1)(t - 2)
    let roots = quadratic_roots(1.0f32, -3.0, 2.0);
    assert_eq!(roots.len(), 2);
    let (min, max) = min_max(roots[0], roots[1]);
    assert!((min - 1.0).abs() < 1e-5);
    assert!((max - 2.0).abs() < 1e-5);

    // degenerate to linear: 2t - 4
    let roots = quadratic_roots(0.0f32, 2.0, -4.0);
    assert_eq!(roots.len(), 1);
    assert!((roots[0] - 2.0).abs() < 1e-5);

    // no real roots: t² + 1
    assert!(quadratic_roots(1.0f32, 0.0, 1.0).is_empty());
}
