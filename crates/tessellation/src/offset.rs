use crate::contour::{Contour, ContourEdge, ContourGroup, EdgeRole};
use crate::geom::utils::directed_angle;
use crate::geom::{CubicBezierSegment, Line, Trajectory};
use crate::math_utils::signed_area;
use crate::Winding;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Distance under which two edge end points are considered the same joint.
const JOIN_TOLERANCE: f32 = 1e-3;

/// Rings enclosing less area than this are offset debris and are dropped.
const AREA_TOLERANCE: f32 = 1e-4;

/// Joint intersections further away than this many gap lengths are treated
/// as runaway miters and bridged with a straight connector instead.
const MITER_LIMIT: f32 = 4.0;

/// Turns sharper or straighter than this (radians) are left unrounded.
const MIN_TURN: f32 = 0.017;

/// Pinch splitting gives up past this recursion depth and keeps the ring
/// as it stands.
const MAX_PINCH_DEPTH: usize = 8;

/// Displace every edge of a closed contour perpendicular to its
/// trajectory, by `lane_offset` or `median_offset` depending on the
/// edge's role, and stitch the result back into closed rings.
///
/// Positive distances displace along the left normal, which shrinks
/// clockwise contours. Joints are reconnected by trimming or extending
/// both edges to their tangent intersection, or bridged with a straight
/// connector when the tangents do not meet nearby. Offsets that pinch the
/// contour split it into several rings; rings whose winding inverted or
/// whose area vanished are dropped, so an offset that consumes the whole
/// shape yields an empty group.
pub fn set_offset(contour: &Contour, lane_offset: f32, median_offset: f32) -> ContourGroup {
    let mut group = ContourGroup::new();
    if contour.is_empty() {
        return group;
    }

    if lane_offset.abs() <= f32::EPSILON && median_offset.abs() <= f32::EPSILON {
        group.push(contour.clone());
        return group;
    }

    let winding = match contour.winding() {
        Some(winding) => winding,
        None => return group,
    };

    let mut edges: Vec<ContourEdge> = contour
        .edges()
        .iter()
        .map(|edge| {
            let d = match edge.role {
                EdgeRole::Lane => lane_offset,
                EdgeRole::Median => median_offset,
            };
            ContourEdge {
                trajectory: edge.trajectory.offset(d),
                ..*edge
            }
        })
        .collect();

    // The direction each displaced edge travels in before any joint
    // trimming. Trimming that reverses an edge against this reference
    // means the offset consumed it; such edges are removed and the ring
    // is stitched again without them.
    let mut reference: Vec<_> = edges
        .iter()
        .map(|edge| edge.trajectory.baseline().to_vector())
        .collect();

    let mut iterations = 0;
    let connectors = loop {
        let connectors = reconnect_joints(&mut edges);

        let mut removed = false;
        let mut k = 0;
        while k < edges.len() {
            if edges[k]
                .trajectory
                .baseline()
                .to_vector()
                .dot(reference[k])
                <= 0.0
            {
                edges.remove(k);
                reference.remove(k);
                removed = true;
            } else {
                k += 1;
            }
        }

        if edges.len() < 2 {
            return group;
        }
        if !removed {
            break connectors;
        }
        if iterations >= edges.len() {
            // Safety valve: stitch what is left and stop removing.
            break reconnect_joints(&mut edges);
        }
        iterations += 1;
    };

    let mut ring = Vec::with_capacity(edges.len() + connectors.len());
    for (edge, connector) in edges.into_iter().zip(connectors) {
        ring.push(edge);
        if let Some(connector) = connector {
            ring.push(connector);
        }
    }

    collect_rings(ring, winding, MAX_PINCH_DEPTH, &mut group);

    group
}

/// Close the gaps the per-edge displacement opened at each joint.
///
/// Returns one optional straight connector per joint, to be inserted
/// after the corresponding edge.
fn reconnect_joints(edges: &mut [ContourEdge]) -> Vec<Option<ContourEdge>> {
    let n = edges.len();
    let mut connectors = Vec::with_capacity(n);

    for i in 0..n {
        let j = (i + 1) % n;
        let end = edges[i].trajectory.to();
        let start = edges[j].trajectory.from();
        let gap = (start - end).length();

        if gap <= JOIN_TOLERANCE {
            edges[j].trajectory = edges[j].trajectory.with_start(end);
            connectors.push(None);
            continue;
        }

        let end_tangent = Line {
            point: end,
            vector: edges[i].trajectory.derivative(1.0),
        };
        let start_tangent = Line {
            point: start,
            vector: edges[j].trajectory.derivative(0.0),
        };

        let miter = end_tangent.intersection(&start_tangent).filter(|&x| {
            let reach = gap * MITER_LIMIT + JOIN_TOLERANCE;
            (x - end).length() <= reach && (x - start).length() <= reach
        });

        match miter {
            Some(x) => {
                edges[i].trajectory = edges[i].trajectory.with_end(x);
                edges[j].trajectory = edges[j].trajectory.with_start(x);
                connectors.push(None);
            }
            None => {
                connectors.push(Some(ContourEdge::new(
                    Trajectory::line(end, start),
                    edges[i].role,
                )));
            }
        }
    }

    connectors
}

/// Split a stitched ring wherever two non-adjacent edges cross (the
/// pinch an aggressive offset introduces) and keep the pieces whose
/// orientation still matches the input contour.
pub(crate) fn collect_rings(
    edges: Vec<ContourEdge>,
    winding: Winding,
    depth: usize,
    out: &mut ContourGroup,
) {
    if edges.len() < 2 {
        return;
    }

    let n = edges.len();
    if depth > 0 {
        for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                let crossing = edges[i]
                    .trajectory
                    .baseline()
                    .intersection_t(&edges[j].trajectory.baseline());
                let (ta, tb) = match crossing {
                    Some(ts) => ts,
                    None => continue,
                };

                let x = edges[i].trajectory.baseline().sample(ta);

                let before_i = edges[i].trajectory.before_split(ta).with_end(x);
                let after_i = edges[i].trajectory.after_split(ta).with_start(x);
                let before_j = edges[j].trajectory.before_split(tb).with_end(x);
                let after_j = edges[j].trajectory.after_split(tb).with_start(x);

                let mut first = Vec::with_capacity(j - i + 1);
                first.push(ContourEdge {
                    trajectory: after_i,
                    ..edges[i]
                });
                first.extend_from_slice(&edges[i + 1..j]);
                first.push(ContourEdge {
                    trajectory: before_j,
                    ..edges[j]
                });

                let mut second = Vec::with_capacity(n - (j - i) + 1);
                second.push(ContourEdge {
                    trajectory: after_j,
                    ..edges[j]
                });
                second.extend_from_slice(&edges[j + 1..]);
                second.extend_from_slice(&edges[..i]);
                second.push(ContourEdge {
                    trajectory: before_i,
                    ..edges[i]
                });

                collect_rings(first, winding, depth - 1, out);
                collect_rings(second, winding, depth - 1, out);
                return;
            }
        }
    }

    let contour = Contour::new(edges);
    let area = signed_area(&contour.sample_points());
    let ring_winding = if area > AREA_TOLERANCE {
        Winding::Clockwise
    } else if area < -AREA_TOLERANCE {
        Winding::CounterClockwise
    } else {
        // Flattened to nothing by the offset.
        return;
    };
    if ring_winding != winding {
        // The offset turned this ring inside out; there is no area left
        // to fill here.
        return;
    }

    out.push(contour);
}

/// Replace the sharp joints of a contour with short arc edges.
///
/// The radius comes from `median_radius` when either edge at the joint
/// borders a median, from `lane_radius` otherwise; a non-positive radius
/// leaves the joint sharp. The tangent trim is clamped to half the
/// shorter adjacent edge, so an oversized radius degrades to the largest
/// arc that still fits instead of overshooting. Arc edges produced by an
/// earlier rounding pass are left untouched.
pub fn set_corner_radius(contour: &Contour, lane_radius: f32, median_radius: f32) -> Contour {
    let n = contour.len();
    if n < 2 || (lane_radius <= 0.0 && median_radius <= 0.0) {
        return contour.clone();
    }

    struct Joint {
        trim: f32,
        radius: f32,
        turn: f32,
        role: EdgeRole,
    }

    let edges = contour.edges();
    let lengths: Vec<f32> = edges
        .iter()
        .map(|edge| edge.trajectory.approximate_length(0.01))
        .collect();

    let mut joints: Vec<Option<Joint>> = Vec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        if edges[i].corner || edges[j].corner {
            joints.push(None);
            continue;
        }

        let role = if edges[i].role == EdgeRole::Median || edges[j].role == EdgeRole::Median {
            EdgeRole::Median
        } else {
            EdgeRole::Lane
        };
        let radius = match role {
            EdgeRole::Lane => lane_radius,
            EdgeRole::Median => median_radius,
        };
        if radius <= 0.0 || lengths[i] <= JOIN_TOLERANCE || lengths[j] <= JOIN_TOLERANCE {
            joints.push(None);
            continue;
        }

        let out_dir = edges[i].trajectory.derivative(1.0);
        let in_dir = edges[j].trajectory.derivative(0.0);
        if out_dir.square_length() <= f32::EPSILON || in_dir.square_length() <= f32::EPSILON {
            joints.push(None);
            continue;
        }

        // Fold the oriented angle between the tangents into the unsigned
        // turn magnitude; the arc construction below is side-agnostic.
        let angle = directed_angle(out_dir, in_dir);
        let turn = if angle > core::f32::consts::PI {
            2.0 * core::f32::consts::PI - angle
        } else {
            angle
        };
        if turn < MIN_TURN || turn > core::f32::consts::PI - MIN_TURN {
            // Straight enough to leave alone, or a reversal no arc fits.
            joints.push(None);
            continue;
        }

        let mut trim = radius * (turn * 0.5).tan();
        let mut radius = radius;
        let max_trim = lengths[i].min(lengths[j]) * 0.5;
        if trim > max_trim {
            trim = max_trim;
            radius = trim / (turn * 0.5).tan();
        }

        joints.push(Some(Joint {
            trim,
            radius,
            turn,
            role,
        }));
    }

    let mut result = Vec::with_capacity(n * 2);
    for i in 0..n {
        let prev_joint = &joints[(i + n - 1) % n];
        let trim_start = prev_joint.as_ref().map_or(0.0, |joint| joint.trim);
        let trim_end = joints[i].as_ref().map_or(0.0, |joint| joint.trim);

        let t0 = trim_start / lengths[i];
        let t1 = 1.0 - trim_end / lengths[i];
        let trimmed = ContourEdge {
            trajectory: edges[i].trajectory.split_range(t0..t1),
            ..edges[i]
        };
        if !trimmed.trajectory.is_degenerate(JOIN_TOLERANCE) {
            result.push(trimmed);
        }

        if let Some(joint) = &joints[i] {
            let j = (i + 1) % n;
            let from = edges[i].trajectory.sample(1.0 - joint.trim / lengths[i]);
            let to = edges[j].trajectory.sample(joint.trim / lengths[j]);
            let out_dir = edges[i].trajectory.derivative(1.0).normalize();
            let in_dir = edges[j].trajectory.derivative(0.0).normalize();

            // Circular arc approximated by one cubic.
            let handle = (4.0 / 3.0) * (joint.turn * 0.25).tan() * joint.radius;
            result.push(ContourEdge::corner(
                Trajectory::Bezier(CubicBezierSegment {
                    from,
                    ctrl1: from + out_dir * handle,
                    ctrl2: to - in_dir * handle,
                    to,
                }),
                joint.role,
            ));
        }
    }

    Contour::new(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{point, Point};

    fn square(side: f32) -> Contour {
        Contour::from_points(
            &[
                point(0.0, 0.0),
                point(side, 0.0),
                point(side, side),
                point(0.0, side),
            ],
            EdgeRole::Lane,
        )
    }

    #[test]
    fn zero_offset_is_identity() {
        let contour = square(10.0);
        let group = set_offset(&contour, 0.0, 0.0);

        assert_eq!(group.len(), 1);
        assert_eq!(group.contours[0], contour);
    }

    #[test]
    fn inward_offset_shrinks() {
        let group = set_offset(&square(10.0), 1.0, 1.0);

        assert_eq!(group.len(), 1);
        let contour = &group.contours[0];
        assert!(contour.is_closed(0.001));
        assert_eq!(contour.winding(), Some(Winding::Clockwise));

        let b = contour.bounding_box();
        assert!((b.min.x - 1.0).abs() < 0.01);
        assert!((b.min.y - 1.0).abs() < 0.01);
        assert!((b.max.x - 9.0).abs() < 0.01);
        assert!((b.max.y - 9.0).abs() < 0.01);
    }

    #[test]
    fn consuming_offset_yields_empty_group() {
        // The square is 10 across; pushing every edge 6 inwards turns it
        // inside out.
        let group = set_offset(&square(10.0), 6.0, 6.0);
        assert!(group.is_empty());
    }

    #[test]
    fn median_edges_use_their_own_offset() {
        let points = [
            point(0.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
            point(0.0, 10.0),
        ];
        let mut edges = Contour::from_points(&points, EdgeRole::Lane).into_edges();
        // The left edge (x = 0) borders the median.
        edges[3].role = EdgeRole::Median;

        let group = set_offset(&Contour::new(edges), 1.0, 2.0);
        assert_eq!(group.len(), 1);

        let b = group.contours[0].bounding_box();
        assert!((b.min.x - 2.0).abs() < 0.01);
        assert!((b.min.y - 1.0).abs() < 0.01);
        assert!((b.max.x - 9.0).abs() < 0.01);
        assert!((b.max.y - 9.0).abs() < 0.01);
    }

    #[test]
    fn crossing_ring_splits_and_keeps_matching_winding() {
        // A bowtie ring: the halves wind in opposite directions, only the
        // clockwise one survives.
        let edges = alloc::vec![
            ContourEdge::new(Trajectory::line(point(0.0, 0.0), point(4.0, 4.0)), EdgeRole::Lane),
            ContourEdge::new(Trajectory::line(point(4.0, 4.0), point(4.0, 0.0)), EdgeRole::Lane),
            ContourEdge::new(Trajectory::line(point(4.0, 0.0), point(0.0, 4.0)), EdgeRole::Lane),
            ContourEdge::new(Trajectory::line(point(0.0, 4.0), point(0.0, 0.0)), EdgeRole::Lane),
        ];

        let mut group = ContourGroup::new();
        collect_rings(edges, Winding::Clockwise, 4, &mut group);

        assert_eq!(group.len(), 1);
        let ring = &group.contours[0];
        assert!(ring.is_closed(0.001));
        assert_eq!(ring.winding(), Some(Winding::Clockwise));
        // The surviving half is the triangle around (0, 4)-(0, 0)-(2, 2).
        let b = ring.bounding_box();
        assert!(b.max.x <= 2.001);
    }

    #[test]
    fn offset_keeps_every_ring_closed() {
        // A dumbbell: two 8x10 rooms joined by a 4-wide corridor. A large
        // inward offset consumes the corridor; whatever rings come out
        // must still be closed and clockwise.
        let points = [
            point(0.0, 0.0),
            point(8.0, 0.0),
            point(8.0, 3.0),
            point(12.0, 3.0),
            point(12.0, 0.0),
            point(20.0, 0.0),
            point(20.0, 10.0),
            point(12.0, 10.0),
            point(12.0, 7.0),
            point(8.0, 7.0),
            point(8.0, 10.0),
            point(0.0, 10.0),
        ];
        let contour = Contour::from_points(&points, EdgeRole::Lane);
        assert_eq!(contour.winding(), Some(Winding::Clockwise));

        let group = set_offset(&contour, 2.5, 2.5);
        for ring in group.iter() {
            assert!(ring.is_closed(0.01));
            assert_eq!(ring.winding(), Some(Winding::Clockwise));
        }
    }

    fn corner_edges(contour: &Contour) -> usize {
        contour.edges().iter().filter(|edge| edge.corner).count()
    }

    #[test]
    fn corner_radius_rounds_joints() {
        let rounded = set_corner_radius(&square(10.0), 2.0, 0.0);

        assert_eq!(corner_edges(&rounded), 4);
        assert_eq!(rounded.len(), 8);
        assert!(rounded.is_closed(0.001));

        // 90 degree turns trim r*tan(45°) = r off each side of the joint.
        let first = &rounded.edges()[0];
        assert!(!first.corner);
        assert!((first.trajectory.from() - point(2.0, 0.0)).length() < 0.01);
        assert!((first.trajectory.to() - point(8.0, 0.0)).length() < 0.01);
    }

    #[test]
    fn zero_radius_is_identity() {
        let contour = square(10.0);
        assert_eq!(set_corner_radius(&contour, 0.0, 0.0), contour);
    }

    #[test]
    fn oversized_radius_clamps_to_half_edges() {
        let rounded = set_corner_radius(&square(10.0), 100.0, 0.0);

        // The straight runs are consumed entirely; only the arcs remain,
        // meeting at the edge midpoints.
        assert!(rounded.is_closed(0.01));
        assert_eq!(corner_edges(&rounded), 4);
        for edge in rounded.edges() {
            assert!(edge.corner);
            let b = edge.trajectory.bounding_box();
            assert!(b.min.x >= -0.01 && b.max.x <= 10.01);
            assert!(b.min.y >= -0.01 && b.max.y <= 10.01);
        }
    }

    #[test]
    fn rounding_skips_straight_joints() {
        // Two collinear edges meet at (5, 0): no arc is inserted there.
        let points = [
            point(0.0, 0.0),
            point(5.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
            point(0.0, 10.0),
        ];
        let contour = Contour::from_points(&points, EdgeRole::Lane);
        let rounded = set_corner_radius(&contour, 1.0, 0.0);

        assert_eq!(corner_edges(&rounded), 4);
        assert!(rounded.is_closed(0.001));
    }

    #[test]
    fn corner_arcs_stay_near_the_joint() {
        let rounded = set_corner_radius(&square(10.0), 2.0, 0.0);

        for edge in rounded.edges() {
            if !edge.corner {
                continue;
            }
            // Arc mid points stay inside the square: the arc bends towards
            // the interior rather than overshooting the corner.
            let mid: Point = edge.trajectory.sample(0.5);
            assert!(mid.x > -0.001 && mid.x < 10.001);
            assert!(mid.y > -0.001 && mid.y < 10.001);
        }
    }
}
