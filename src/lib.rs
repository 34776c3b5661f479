//! Geometry core for rendering road-surface markings as triangulated meshes.
//!
//! This crate re-exports the two member crates:
//!
//! - [`geom`](https://docs.rs/roadmark_geom/) - 2D line segment and bézier
//!   curve math on top of euclid.
//! - [`tessellation`](https://docs.rs/roadmark_tessellation/) - contour
//!   offsetting, corner rounding, curvature-bounded edge splitting and
//!   ear-clipping triangulation of filler polygons.

pub extern crate roadmark_tessellation;

pub use roadmark_tessellation as tessellation;
pub use tessellation::geom;
pub use tessellation::math;

pub use tessellation::{
    Contour, ContourEdge, ContourGroup, EdgeRole, FillerBuilder, FillerGeometry, FillerOptions,
    SplitParams, Triangulator, Winding,
};
