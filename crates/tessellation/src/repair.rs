use crate::geom::LineSegment;

use alloc::vec::Vec;

/// Parts shorter than this count as collapsed.
const LENGTH_TOLERANCE: f32 = 1e-3;

/// The two walk directions of the repair. Each pass pairs every
/// edge-group with its cyclic successor and scans the pair from opposite
/// ends, so a crossing missed by one nesting order is caught by the
/// other.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Pass {
    Forward,
    Backward,
}

/// Repair the crossings that offsetting introduces between the straight
/// parts of cyclically-adjacent edge-groups.
///
/// `groups` holds one list of straight parts per contour edge, in ring
/// order. For each adjacent pair the first crossing found is resolved by
/// cutting both parts at the intersection and discarding the parts
/// beyond the cut, which closes the overlap a concave joint's offset
/// opened. Pairs without crossings are left untouched; this is a single
/// local pass per pair and direction, not a polygon clipping operation.
///
/// A group collapsed to one near-zero part is removed entirely (when
/// more than three groups remain) and the scan retries against the
/// following group, so tiny offset leftovers cannot pinch the ring into
/// zero-area slivers.
pub fn resolve_intersections(groups: &mut Vec<Vec<LineSegment<f32>>>) {
    resolve_pass(groups, Pass::Forward);
    resolve_pass(groups, Pass::Backward);
}

fn resolve_pass(groups: &mut Vec<Vec<LineSegment<f32>>>, pass: Pass) {
    let mut i = 0;
    while i < groups.len() && groups.len() >= 2 {
        // One-edge lookahead: a degenerate successor is dropped and the
        // scan moves on to the group after it.
        let next = (i + 1) % groups.len();
        if is_collapsed(&groups[next]) && groups.len() > 3 {
            groups.remove(next);
            if next < i {
                // Removing the wrapped-around head shifts our own index.
                i -= 1;
            }
            if groups.len() < 2 {
                return;
            }
        }

        let a = i;
        let b = (i + 1) % groups.len();
        if a != b {
            let (first, second) = take_pair(groups, a, b);
            resolve_pair(first, second, pass);
        }

        i += 1;
    }
}

/// Find and cut the first crossing between the parts of two adjacent
/// groups. The scan order depends on the pass: forward scans A from its
/// far end inward and B from its near end outward, backward mirrors it.
/// Either way A keeps its head up to the crossing and B keeps its tail
/// from the crossing on.
fn resolve_pair(a: &mut Vec<LineSegment<f32>>, b: &mut Vec<LineSegment<f32>>, pass: Pass) {
    let a_indices = 0..a.len();
    let b_indices = 0..b.len();

    let found = match pass {
        Pass::Forward => a_indices
            .rev()
            .find_map(|ai| find_crossing(&a[ai], b, ai, b_indices.clone())),
        Pass::Backward => b_indices
            .rev()
            .map(|bi| (bi, b[bi]))
            .find_map(|(bi, part)| {
                a_indices
                    .clone()
                    .find_map(|ai| a[ai].intersection_t(&part).map(|(ta, tb)| (ai, bi, ta, tb)))
            }),
    };

    if let Some((ai, bi, ta, _)) = found {
        let x = a[ai].sample(ta);
        a[ai].to = x;
        a.truncate(ai + 1);
        b[bi].from = x;
        b.drain(..bi);
    }
}

fn find_crossing(
    part: &LineSegment<f32>,
    b: &[LineSegment<f32>],
    ai: usize,
    b_indices: core::ops::Range<usize>,
) -> Option<(usize, usize, f32, f32)> {
    for bi in b_indices {
        if let Some((ta, tb)) = part.intersection_t(&b[bi]) {
            return Some((ai, bi, ta, tb));
        }
    }

    None
}

fn is_collapsed(group: &[LineSegment<f32>]) -> bool {
    match group {
        [] => true,
        [part] => part.length() <= LENGTH_TOLERANCE,
        _ => false,
    }
}

/// Mutable references to two distinct groups at once.
fn take_pair(
    groups: &mut [Vec<LineSegment<f32>>],
    a: usize,
    b: usize,
) -> (&mut Vec<LineSegment<f32>>, &mut Vec<LineSegment<f32>>) {
    debug_assert!(a != b);
    if a < b {
        let (head, tail) = groups.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = groups.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    fn seg(x0: f32, y0: f32, x1: f32, y1: f32) -> LineSegment<f32> {
        LineSegment {
            from: point(x0, y0),
            to: point(x1, y1),
        }
    }

    #[test]
    fn crossing_pair_is_trimmed() {
        // Group A runs right along y = 0, group B cuts down through it.
        let mut groups = alloc::vec![
            alloc::vec![seg(0.0, 0.0, 5.0, 0.0), seg(5.0, 0.0, 10.0, 0.0)],
            alloc::vec![seg(7.0, -2.0, 7.0, 5.0), seg(7.0, 5.0, 0.0, 5.0)],
            alloc::vec![seg(0.0, 5.0, 0.0, 0.0)],
        ];

        resolve_intersections(&mut groups);

        // A's second part now ends at the crossing (7, 0); B starts there.
        let a = &groups[0];
        let b = &groups[1];
        assert!((a[a.len() - 1].to - point(7.0, 0.0)).length() < 0.001);
        assert!((b[0].from - point(7.0, 0.0)).length() < 0.001);
        // The dangling stub of B below y = 0 is gone.
        assert!(b[0].to.y >= 0.0);
    }

    #[test]
    fn non_crossing_groups_pass_through() {
        let original = alloc::vec![
            alloc::vec![seg(0.0, 0.0, 4.0, 0.0)],
            alloc::vec![seg(4.0, 0.0, 4.0, 4.0)],
            alloc::vec![seg(4.0, 4.0, 0.0, 4.0)],
            alloc::vec![seg(0.0, 4.0, 0.0, 0.0)],
        ];
        let mut groups = original.clone();

        resolve_intersections(&mut groups);

        assert_eq!(groups, original);
    }

    #[test]
    fn collapsed_group_is_removed() {
        let mut groups = alloc::vec![
            alloc::vec![seg(0.0, 0.0, 4.0, 0.0)],
            alloc::vec![seg(4.0, 0.0, 4.0, 0.0005)],
            alloc::vec![seg(4.0, 0.0, 4.0, 4.0)],
            alloc::vec![seg(4.0, 4.0, 0.0, 4.0)],
            alloc::vec![seg(0.0, 4.0, 0.0, 0.0)],
        ];

        resolve_intersections(&mut groups);

        assert_eq!(groups.len(), 4);
        for group in &groups {
            assert!(!is_collapsed(group));
        }
    }

    #[test]
    fn collapsed_group_is_kept_in_small_rings() {
        // With only three groups the degenerate one must survive, since
        // removing it could not leave a triangulatable ring anyway.
        let mut groups = alloc::vec![
            alloc::vec![seg(0.0, 0.0, 4.0, 0.0)],
            alloc::vec![seg(4.0, 0.0, 4.0, 0.0005)],
            alloc::vec![seg(4.0, 0.0, 0.0, 0.0)],
        ];

        resolve_intersections(&mut groups);

        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn overlap_across_parts_is_closed() {
        // The crossing sits between A's only part and B's second part;
        // resolving it must discard B's first part entirely and leave the
        // joint watertight.
        let mut groups = alloc::vec![
            alloc::vec![seg(0.0, 2.0, 6.0, 2.0)],
            alloc::vec![seg(8.0, 4.0, 3.0, 4.0), seg(3.0, 4.0, 3.0, 0.0)],
        ];

        resolve_intersections(&mut groups);

        let a = &groups[0];
        let b = &groups[1];
        let a_end = a[a.len() - 1].to;
        let b_start = b[0].from;
        assert!((a_end - b_start).length() < 0.001);
        assert!((a_end - point(3.0, 2.0)).length() < 0.001);
    }
}
