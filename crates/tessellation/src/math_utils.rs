use crate::math::Point;
use crate::Winding;

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Shoelace sum of a closed ring of points, divided by two.
///
/// With y pointing downwards, clockwise rings have a positive area.
pub fn signed_area(points: &[Point]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut prev = points[points.len() - 1];
    for &p in points {
        sum += prev.x * p.y - p.x * prev.y;
        prev = p;
    }

    sum * 0.5
}

/// Orientation of a closed ring of points, or `None` if the ring encloses
/// no area worth speaking of.
pub fn polygon_winding(points: &[Point]) -> Option<Winding> {
    let area = signed_area(points);
    if area.abs() <= f32::EPSILON {
        return None;
    }

    if area > 0.0 {
        Some(Winding::Clockwise)
    } else {
        Some(Winding::CounterClockwise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    #[test]
    fn square_area_and_winding() {
        let cw = [
            point(0.0, 0.0),
            point(4.0, 0.0),
            point(4.0, 4.0),
            point(0.0, 4.0),
        ];

        assert_eq!(signed_area(&cw), 16.0);
        assert_eq!(polygon_winding(&cw), Some(Winding::Clockwise));

        let ccw = [
            point(0.0, 0.0),
            point(0.0, 4.0),
            point(4.0, 4.0),
            point(4.0, 0.0),
        ];

        assert_eq!(signed_area(&ccw), -16.0);
        assert_eq!(polygon_winding(&ccw), Some(Winding::CounterClockwise));
    }

    #[test]
    fn degenerate_ring() {
        let flat = [point(0.0, 0.0), point(4.0, 0.0), point(8.0, 0.0)];
        assert_eq!(polygon_winding(&flat), None);
        assert_eq!(polygon_winding(&flat[..2]), None);
    }
}
