use crate::contour::Contour;
use crate::geom::LineSegment;
use crate::math::Point;
use crate::offset::{set_corner_radius, set_offset};
use crate::repair::resolve_intersections;
use crate::split::split_into_parts;
use crate::triangulator::Triangulator;
use crate::{FillerOptions, Index, Winding};

use alloc::vec::Vec;

/// Mesh data for one closed ring of a filler.
///
/// `group_sizes[i]` is the number of consecutive entries of `points`
/// contributed by the ring's i-th edge; callers rely on this grouping to
/// extrude side walls per original edge. `indices` is absent when the
/// ring could not be triangulated, which means "skip rendering this
/// ring", not that the whole filler failed.
#[derive(Clone, Debug, PartialEq)]
pub struct FillerGeometry {
    pub points: Vec<Point>,
    pub group_sizes: Vec<u32>,
    pub indices: Option<Vec<Index>>,
}

/// Builds filler geometry out of contours.
///
/// The builder drives the whole pipeline: contour normalization, edge
/// offsetting, corner rounding, curvature-bounded splitting into straight
/// parts, repair of the self-intersections offsetting introduces, and
/// ear-clipping triangulation. It can be reused across fillers; the
/// triangulator's internal storage is recycled.
pub struct FillerBuilder {
    triangulator: Triangulator,
    log: bool,
}

impl Default for FillerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FillerBuilder {
    pub fn new() -> Self {
        FillerBuilder {
            triangulator: Triangulator::new(),
            log: false,
        }
    }

    /// Enable some verbose logging when debug assertions are enabled.
    pub fn set_logging(&mut self, is_enabled: bool) {
        self.log = is_enabled;
    }

    /// Build the mesh data for every ring the options produce out of the
    /// contour.
    ///
    /// An offset that consumes the whole contour yields an empty vector;
    /// a ring that defeats the triangulator yields its geometry with
    /// `indices` absent. Neither is an error.
    pub fn build(&mut self, contour: &Contour, options: &FillerOptions) -> Vec<FillerGeometry> {
        let mut contour = contour.clone();
        contour.normalize(Winding::Clockwise);

        let rings = set_offset(&contour, options.lane_offset, options.median_offset);
        let mut result = Vec::with_capacity(rings.len());

        for ring in rings.iter() {
            let ring = set_corner_radius(
                ring,
                options.lane_corner_radius,
                options.median_corner_radius,
            );

            let mut groups: Vec<Vec<LineSegment<f32>>> = ring
                .edges()
                .iter()
                .map(|edge| split_into_parts(&edge.trajectory, &options.split))
                .collect();

            resolve_intersections(&mut groups);
            groups.retain(|group| !group.is_empty());
            if groups.is_empty() {
                continue;
            }

            let mut points = Vec::new();
            let mut group_sizes = Vec::with_capacity(groups.len());
            for group in &groups {
                for part in group {
                    points.push(part.from);
                }
                group_sizes.push(group.len() as u32);
            }

            let indices = self.triangulator.triangulate(&points, Winding::Clockwise);
            if indices.is_none() {
                tess_log!(
                    self,
                    "Skipping a filler ring of {} points that failed to triangulate.",
                    points.len()
                );
            }

            result.push(FillerGeometry {
                points,
                group_sizes,
                indices,
            });
        }

        result
    }
}
