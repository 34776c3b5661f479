use crate::contour::{Contour, ContourEdge, EdgeRole};
use crate::geom::Trajectory;
use crate::math::{point, Point};
use crate::math_utils::signed_area;
use crate::{FillerBuilder, FillerGeometry, FillerOptions, Index, SplitParams};

use alloc::vec::Vec;

fn triangle_area_sum(geometry: &FillerGeometry) -> f32 {
    let indices: &[Index] = geometry.indices.as_ref().unwrap();
    indices
        .chunks(3)
        .map(|tri| {
            signed_area(&[
                geometry.points[tri[0] as usize],
                geometry.points[tri[1] as usize],
                geometry.points[tri[2] as usize],
            ])
        })
        .sum()
}

fn assert_grouping_consistent(geometry: &FillerGeometry) {
    let total: u32 = geometry.group_sizes.iter().sum();
    assert_eq!(total as usize, geometry.points.len());
    assert!(geometry.group_sizes.iter().all(|&size| size > 0));
}

fn rectangle(width: f32, height: f32) -> Contour {
    Contour::from_points(
        &[
            point(0.0, 0.0),
            point(width, 0.0),
            point(width, height),
            point(0.0, height),
        ],
        EdgeRole::Lane,
    )
}

#[test]
fn rectangle_end_to_end() {
    let mut builder = FillerBuilder::new();
    let result = builder.build(&rectangle(10.0, 4.0), &FillerOptions::DEFAULT);

    assert_eq!(result.len(), 1);
    let geometry = &result[0];
    assert_grouping_consistent(geometry);
    assert_eq!(geometry.points.len(), 4);
    assert_eq!(geometry.group_sizes, alloc::vec![1, 1, 1, 1]);
    assert_eq!(geometry.indices.as_ref().map(|i| i.len()), Some(6));
    assert!((triangle_area_sum(geometry) - 40.0).abs() < 0.001);
}

#[test]
fn split_params_control_part_counts() {
    let options = FillerOptions::DEFAULT.with_split(SplitParams::DEFAULT.with_max_length(3.0));

    let mut builder = FillerBuilder::new();
    let result = builder.build(&rectangle(10.0, 4.0), &options);

    assert_eq!(result.len(), 1);
    let geometry = &result[0];
    assert_grouping_consistent(geometry);
    assert_eq!(geometry.group_sizes, alloc::vec![4, 2, 4, 2]);
    assert_eq!(
        geometry.indices.as_ref().map(|i| i.len()),
        Some((geometry.points.len() - 2) * 3)
    );
    assert!((triangle_area_sum(geometry) - 40.0).abs() < 0.001);
}

#[test]
fn offset_and_rounding_pipeline() {
    // Shrink a 10x10 square by 1 on every side, then round the four
    // corners with radius 1: an 8x8 square minus the corner squares plus
    // quarter discs.
    let options = FillerOptions::DEFAULT
        .with_offsets(1.0, 1.0)
        .with_corner_radii(1.0, 1.0);

    let mut builder = FillerBuilder::new();
    let result = builder.build(
        &Contour::from_points(
            &[
                point(0.0, 0.0),
                point(10.0, 0.0),
                point(10.0, 10.0),
                point(0.0, 10.0),
            ],
            EdgeRole::Lane,
        ),
        &options,
    );

    assert_eq!(result.len(), 1);
    let geometry = &result[0];
    assert_grouping_consistent(geometry);
    // Four straight runs and four corner arcs.
    assert_eq!(geometry.group_sizes.len(), 8);
    assert!(geometry.indices.is_some());

    let expected = 64.0 - (4.0 - core::f32::consts::PI);
    assert!(
        (triangle_area_sum(geometry) - expected).abs() < 0.2,
        "covered {} expected {}",
        triangle_area_sum(geometry),
        expected
    );

    // All of it stays inside the offset square.
    for p in &geometry.points {
        assert!(p.x > 0.99 && p.x < 9.01 && p.y > 0.99 && p.y < 9.01);
    }
}

#[test]
fn consuming_offset_builds_nothing() {
    let options = FillerOptions::DEFAULT.with_offsets(6.0, 6.0);

    let mut builder = FillerBuilder::new();
    let result = builder.build(&rectangle(10.0, 10.0), &options);

    assert!(result.is_empty());
}

#[test]
fn counter_clockwise_input_is_normalized() {
    let ccw = Contour::from_points(
        &[
            point(0.0, 0.0),
            point(0.0, 4.0),
            point(10.0, 4.0),
            point(10.0, 0.0),
        ],
        EdgeRole::Lane,
    );

    let mut builder = FillerBuilder::new();
    let result = builder.build(&ccw, &FillerOptions::DEFAULT);

    assert_eq!(result.len(), 1);
    let geometry = &result[0];
    assert!(geometry.indices.is_some());
    // Clockwise triangles: positive area sum.
    assert!((triangle_area_sum(geometry) - 40.0).abs() < 0.001);
}

#[test]
fn untriangulatable_ring_is_reported_as_absent_indices() {
    // A bowtie ring crosses between non-adjacent edges, which the local
    // joint repair leaves alone by design; the triangulator then refuses
    // it. The ring's points still come out for the caller to decide what
    // to do with.
    let bowtie = Contour::new(alloc::vec![
        ContourEdge::new(
            Trajectory::line(point(0.0, 0.0), point(4.0, 4.0)),
            EdgeRole::Lane
        ),
        ContourEdge::new(
            Trajectory::line(point(4.0, 4.0), point(4.0, 0.0)),
            EdgeRole::Lane
        ),
        ContourEdge::new(
            Trajectory::line(point(4.0, 0.0), point(0.0, 4.0)),
            EdgeRole::Lane
        ),
        ContourEdge::new(
            Trajectory::line(point(0.0, 4.0), point(0.0, 0.0)),
            EdgeRole::Lane
        ),
    ]);

    let mut builder = FillerBuilder::new();
    let result = builder.build(&bowtie, &FillerOptions::DEFAULT);

    assert_eq!(result.len(), 1);
    let geometry = &result[0];
    assert_eq!(geometry.indices, None);
    assert_eq!(geometry.points.len(), 4);
    assert_grouping_consistent(geometry);
}

#[test]
fn median_geometry_respects_both_offsets() {
    let mut edges = rectangle(10.0, 10.0).into_edges();
    edges[3].role = EdgeRole::Median;
    let contour = Contour::new(edges);

    let options = FillerOptions::DEFAULT.with_offsets(1.0, 2.0);
    let mut builder = FillerBuilder::new();
    let result = builder.build(&contour, &options);

    assert_eq!(result.len(), 1);
    let geometry = &result[0];
    assert!(geometry.indices.is_some());

    let min_x = geometry.points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
    let max_x = geometry.points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
    assert!((min_x - 2.0).abs() < 0.01);
    assert!((max_x - 9.0).abs() < 0.01);

    // 7 by 8 after the asymmetric shrink.
    assert!((triangle_area_sum(geometry) - 56.0).abs() < 0.01);
}

#[test]
fn builder_is_reusable() {
    let mut builder = FillerBuilder::new();

    let first = builder.build(&rectangle(10.0, 4.0), &FillerOptions::DEFAULT);
    let second = builder.build(&rectangle(6.0, 6.0), &FillerOptions::DEFAULT);

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert!((triangle_area_sum(&second[0]) - 36.0).abs() < 0.001);
}

#[test]
fn points_form_the_offset_ring_in_order() {
    let options = FillerOptions::DEFAULT.with_offsets(1.0, 1.0);
    let mut builder = FillerBuilder::new();
    let result = builder.build(&rectangle(10.0, 10.0), &options);

    assert_eq!(result.len(), 1);
    let points: &Vec<Point> = &result[0].points;

    // Consecutive ring points stay close: no jumps across the shape.
    let n = points.len();
    for i in 0..n {
        let gap = (points[(i + 1) % n] - points[i]).length();
        assert!(gap <= 10.0);
    }
}
