//! Coordinate types and the numeric hygiene helpers shared by densification
//! and projection.
//!
//! [`Point`] is the externally visible geometry representation: it carries
//! the serde wire format (a two-element `[x, y]` array) and is what polygon
//! rings are made of. Internal arithmetic uses [`glam::DVec2`]; the two are
//! numerically identical and converted at the crate boundary.
//!
//! Raw floating-point intersections computed in different graticule cells
//! can differ in the 15th digit, which would create duplicate near-equal
//! points with different bit patterns downstream. Two measures keep point
//! sets stable: fixed-decimal rounding ([`rounded_to_decimal`]) applied to
//! every computed intersection and projection result, and magnitude-scaled
//! epsilon equality ([`almost_equal`]) used when collapsing near-duplicates.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Reciprocal of the fixed decimal precision used when rounding computed
/// coordinates. See DESIGN.md for the choice of scale.
pub const ROUND_SCALE: f64 = 1e10;

/// An (x, y) map coordinate. Serializes as a `[x, y]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point from raw coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point with both coordinates rounded to the fixed decimal
    /// precision.
    pub fn rounded(self) -> Self {
        Self {
            x: rounded_to_decimal(self.x),
            y: rounded_to_decimal(self.y),
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

/// Whether two doubles are indistinguishable at a tolerance scaled to their
/// combined magnitude (`|a - b| <= eps * |a + b| * 2`).
pub fn almost_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON * (a + b).abs() * 2.0
}

/// Whether two points are indistinguishable coordinate-wise.
pub fn points_almost_equal(a: Point, b: Point) -> bool {
    almost_equal(a.x, b.x) && almost_equal(a.y, b.y)
}

/// Whether two internal vectors are indistinguishable coordinate-wise.
pub fn vecs_almost_equal(a: DVec2, b: DVec2) -> bool {
    almost_equal(a.x, b.x) && almost_equal(a.y, b.y)
}

/// Rounds `d` to the fixed decimal precision given by [`ROUND_SCALE`].
pub fn rounded_to_decimal(d: f64) -> f64 {
    (d * ROUND_SCALE).round() / ROUND_SCALE
}

/// Rounds an internal vector to the fixed decimal precision.
pub fn rounded_vec(v: DVec2) -> DVec2 {
    DVec2::new(rounded_to_decimal(v.x), rounded_to_decimal(v.y))
}
