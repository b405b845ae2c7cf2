#![deny(unsafe_code)]
//! Polygon data model and geometric predicates for the cartoflow projection
//! engine.
//!
//! Provides [`Ring`], [`PolygonWithHoles`], and [`GeoDiv`] (the serde-facing
//! map model), and the predicates module: point-in-region classification
//! ([`Side`]), orientation, quadrilateral convexity, and line intersection.

pub mod predicates;
pub mod ring;

pub use predicates::{
    is_convex_quad, line_intersection, orient2d, point_in_ring, point_in_triangle,
    point_on_segment, Side,
};
pub use ring::{GeoDiv, PolygonWithHoles, Ring};
