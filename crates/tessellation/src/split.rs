use crate::geom::{LineSegment, Trajectory};
use crate::SplitParams;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Subdivision never recurses deeper than this; 2^10 parts per edge is
/// already far beyond rendering needs.
const MAX_DEPTH: u32 = 10;

/// Lengths below this are treated as a degenerate trajectory.
const LENGTH_TOLERANCE: f32 = 1e-4;

/// Cut a trajectory into parametric ranges short and straight enough for
/// flat triangulation.
///
/// Each returned `(start, end)` pair is a range of the trajectory's `t`
/// parameter; the ranges are ordered and cover `[0, 1]` exactly. A range
/// is subdivided at its midpoint while its chord strays further than
/// `max_height` from the curve, its chord is longer than `max_length`, or
/// the tangent turns by more than `min_angle` degrees across it, but
/// never below `min_length` chords and never past a fixed recursion
/// depth. Degenerate trajectories yield the single trivial range.
pub fn split_trajectory(trajectory: &Trajectory<f32>, params: &SplitParams) -> Vec<(f32, f32)> {
    let mut ranges = Vec::new();

    if trajectory.approximate_length(LENGTH_TOLERANCE) <= LENGTH_TOLERANCE.max(params.min_length) {
        ranges.push((0.0, 1.0));
        return ranges;
    }

    subdivide(trajectory, params, 0.0, 1.0, MAX_DEPTH, &mut ranges);

    ranges
}

fn subdivide(
    trajectory: &Trajectory<f32>,
    params: &SplitParams,
    t0: f32,
    t1: f32,
    depth: u32,
    ranges: &mut Vec<(f32, f32)>,
) {
    let chord = LineSegment {
        from: trajectory.sample(t0),
        to: trajectory.sample(t1),
    };
    let length = chord.length();

    let too_long = length > params.max_length;
    let too_high = deviation(trajectory, &chord, t0, t1) > params.max_height;
    let too_bent = turn_degrees(trajectory, t0, t1) > params.min_angle;

    if (too_long || too_high || too_bent)
        && depth > 0
        && length >= 2.0 * params.min_length
    {
        let mid = (t0 + t1) * 0.5;
        subdivide(trajectory, params, t0, mid, depth - 1, ranges);
        subdivide(trajectory, params, mid, t1, depth - 1, ranges);
        return;
    }

    ranges.push((t0, t1));
}

/// Largest sampled distance between the curve and the chord across the
/// range.
fn deviation(trajectory: &Trajectory<f32>, chord: &LineSegment<f32>, t0: f32, t1: f32) -> f32 {
    match trajectory {
        Trajectory::Line(_) => 0.0,
        Trajectory::Bezier(_) => {
            let mut max = 0.0f32;
            for i in 1..4 {
                let t = t0 + (t1 - t0) * (i as f32) * 0.25;
                max = max.max(chord.distance_to_point(trajectory.sample(t)));
            }
            max
        }
    }
}

/// Angle in degrees between the tangents at both ends of the range.
fn turn_degrees(trajectory: &Trajectory<f32>, t0: f32, t1: f32) -> f32 {
    match trajectory {
        Trajectory::Line(_) => 0.0,
        Trajectory::Bezier(_) => {
            let a = trajectory.derivative(t0);
            let b = trajectory.derivative(t1);
            let len = a.length() * b.length();
            if len <= f32::EPSILON {
                return 0.0;
            }
            let cos = (a.dot(b) / len).max(-1.0).min(1.0);

            cos.acos().to_degrees()
        }
    }
}

/// Cut a trajectory into straight parts, one chord per range produced by
/// [`split_trajectory`].
pub fn split_into_parts(
    trajectory: &Trajectory<f32>,
    params: &SplitParams,
) -> Vec<LineSegment<f32>> {
    split_trajectory(trajectory, params)
        .into_iter()
        .map(|(t0, t1)| {
            let cut = trajectory.split_range(t0..t1);
            LineSegment {
                from: cut.from(),
                to: cut.to(),
            }
        })
        .collect()
}
