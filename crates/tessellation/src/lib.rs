#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![no_std]

//! Triangulated geometry for road-marking fillers.
//!
//! A filler is a road-surface area (a median fill, a crosswalk background,
//! a painted island) described by a closed contour of curve edges and
//! rendered as a flat triangle mesh. This crate turns such a contour into
//! mesh data in five steps:
//!
//! 1. **Offset** - every edge is displaced perpendicular to its trajectory
//!    by a per-role distance, shrinking or growing the filled area
//!    ([`set_offset`]). Aggressive offsets may split the contour into
//!    several rings or consume it entirely.
//! 2. **Corner rounding** - sharp joints are replaced by short arc edges
//!    with a per-role radius ([`set_corner_radius`]).
//! 3. **Edge splitting** - each curve edge is cut into straight parts
//!    bounded by chord deviation, length and tangent turn
//!    ([`split_trajectory`]), so the surface can be triangulated flat.
//! 4. **Self-intersection repair** - offsetting concave joints makes
//!    adjacent edges' parts cross; the crossings are detected and trimmed
//!    ([`resolve_intersections`]).
//! 5. **Triangulation** - the resulting ring of points is ear-clipped into
//!    a flat index buffer ([`Triangulator`]).
//!
//! [`FillerBuilder`] chains all five steps; the individual stages are
//! exported for callers that drive them separately.
//!
//! Failure to triangulate a ring (degenerate or self-intersecting input)
//! is reported as an absent index buffer, never as an error: a single bad
//! ring must not abort the rest of a filler's geometry.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use roadmark_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod math {
    //! f32 versions of the roadmark_geom types used everywhere.

    use crate::geom::euclid;

    /// Alias for `euclid::default::Point2D<f32>`.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for `euclid::default::Vector2D<f32>`.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Alias for `euclid::default::Box2D<f32>`.
    pub type Box2D = euclid::default::Box2D<f32>;

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }
}

#[cfg(all(debug_assertions, feature = "std"))]
macro_rules! tess_log {
    ($obj:ident, $fmt:expr) => (
        if $obj.log {
            std::println!($fmt);
        }
    );
    ($obj:ident, $fmt:expr, $($arg:tt)*) => (
        if $obj.log {
            std::println!($fmt, $($arg)*);
        }
    );
}

#[cfg(not(all(debug_assertions, feature = "std")))]
macro_rules! tess_log {
    ($obj:ident, $fmt:expr) => {};
    ($obj:ident, $fmt:expr, $($arg:tt)*) => {};
}

mod contour;
mod filler;
mod math_utils;
mod offset;
mod repair;
mod split;
mod triangulator;

#[cfg(test)]
mod filler_tests;

#[doc(inline)]
pub use crate::contour::{Contour, ContourEdge, ContourGroup, EdgeRole};
#[doc(inline)]
pub use crate::filler::{FillerBuilder, FillerGeometry};
#[doc(inline)]
pub use crate::math_utils::{polygon_winding, signed_area};
#[doc(inline)]
pub use crate::offset::{set_corner_radius, set_offset};
#[doc(inline)]
pub use crate::repair::resolve_intersections;
#[doc(inline)]
pub use crate::split::{split_into_parts, split_trajectory};
#[doc(inline)]
pub use crate::triangulator::Triangulator;

/// Vertex index type emitted by the triangulator.
pub type Index = u32;

/// The two possible orientations for a closed ring of points.
///
/// The names assume y points downwards (screen or map coordinates): a ring
/// with a positive shoelace sum reads as clockwise on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    pub fn opposite(self) -> Self {
        match self {
            Winding::Clockwise => Winding::CounterClockwise,
            Winding::CounterClockwise => Winding::Clockwise,
        }
    }
}

/// Parameters bounding how a curve edge is cut into straight parts.
///
/// A part is accepted once its chord deviates from the curve by less than
/// `max_height`, its length fits below `max_length` and the tangent turns
/// by less than `min_angle` across it; parts are never cut shorter than
/// `min_length`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct SplitParams {
    /// Maximum tangent turn across a single part, in degrees.
    ///
    /// Default value: `SplitParams::DEFAULT_MIN_ANGLE`.
    pub min_angle: f32,

    /// Minimum part length, in meters. Subdivision stops rather than
    /// produce parts shorter than this.
    ///
    /// Default value: `SplitParams::DEFAULT_MIN_LENGTH`.
    pub min_length: f32,

    /// Maximum part length, in meters.
    ///
    /// Default value: `SplitParams::DEFAULT_MAX_LENGTH`.
    pub max_length: f32,

    /// Maximum allowed distance between a part's chord and the curve, in
    /// meters.
    ///
    /// Default value: `SplitParams::DEFAULT_MAX_HEIGHT`.
    pub max_height: f32,
}

impl SplitParams {
    pub const DEFAULT_MIN_ANGLE: f32 = 5.0;
    pub const DEFAULT_MIN_LENGTH: f32 = 0.05;
    pub const DEFAULT_MAX_LENGTH: f32 = 10.0;
    pub const DEFAULT_MAX_HEIGHT: f32 = 0.03;

    pub const DEFAULT: Self = SplitParams {
        min_angle: Self::DEFAULT_MIN_ANGLE,
        min_length: Self::DEFAULT_MIN_LENGTH,
        max_length: Self::DEFAULT_MAX_LENGTH,
        max_height: Self::DEFAULT_MAX_HEIGHT,
    };

    #[inline]
    pub const fn with_min_angle(mut self, degrees: f32) -> Self {
        self.min_angle = degrees;
        self
    }

    #[inline]
    pub const fn with_min_length(mut self, meters: f32) -> Self {
        self.min_length = meters;
        self
    }

    #[inline]
    pub const fn with_max_length(mut self, meters: f32) -> Self {
        self.max_length = meters;
        self
    }

    #[inline]
    pub const fn with_max_height(mut self, meters: f32) -> Self {
        self.max_height = meters;
        self
    }
}

impl Default for SplitParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters for building filler geometry out of a contour.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct FillerOptions {
    /// Perpendicular displacement applied to lane edges, in meters.
    /// Positive values shrink the filled area.
    ///
    /// Default value: `0.0`.
    pub lane_offset: f32,

    /// Perpendicular displacement applied to median edges, in meters.
    ///
    /// Default value: `0.0`.
    pub median_offset: f32,

    /// Corner radius applied at lane joints, in meters. Zero or negative
    /// leaves joints sharp.
    ///
    /// Default value: `0.0`.
    pub lane_corner_radius: f32,

    /// Corner radius applied at median joints, in meters.
    ///
    /// Default value: `0.0`.
    pub median_corner_radius: f32,

    /// How finely curve edges are cut into straight parts.
    ///
    /// Default value: `SplitParams::DEFAULT`.
    pub split: SplitParams,
}

impl FillerOptions {
    pub const DEFAULT: Self = FillerOptions {
        lane_offset: 0.0,
        median_offset: 0.0,
        lane_corner_radius: 0.0,
        median_corner_radius: 0.0,
        split: SplitParams::DEFAULT,
    };

    #[inline]
    pub const fn with_offsets(mut self, lane: f32, median: f32) -> Self {
        self.lane_offset = lane;
        self.median_offset = median;
        self
    }

    #[inline]
    pub const fn with_corner_radii(mut self, lane: f32, median: f32) -> Self {
        self.lane_corner_radius = lane;
        self.median_corner_radius = median;
        self
    }

    #[inline]
    pub const fn with_split(mut self, split: SplitParams) -> Self {
        self.split = split;
        self
    }
}

impl Default for FillerOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
