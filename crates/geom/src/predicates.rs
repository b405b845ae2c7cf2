//! Compact geometric predicates: orientation, point-in-region
//! classification, quadrilateral convexity, and line intersection.
//!
//! These replace the computational-geometry library predicates the rest of
//! the engine leans on. Tie-breaking policy: a point on a region's boundary
//! is classified [`Side::OnBoundary`], and the projection stages count
//! boundary as "located" while the diagonal choice requires strict
//! interiority.

use glam::DVec2;

/// Classification of a point against a closed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Inside,
    OnBoundary,
    Outside,
}

/// Twice the signed area of triangle `(a, b, c)`.
///
/// Positive when the triangle winds counter-clockwise, zero when the three
/// points are collinear.
pub fn orient2d(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Whether `p` lies on the closed segment from `a` to `b`.
pub fn point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> bool {
    if orient2d(a, b, p) != 0.0 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Classifies `p` against the closed ring `ring` (vertices in order, no
/// closing duplicate) by boundary test plus even-odd ray casting.
pub fn point_in_ring(p: DVec2, ring: &[DVec2]) -> Side {
    let n = ring.len();
    if n < 3 {
        return Side::Outside;
    }
    for k in 0..n {
        if point_on_segment(p, ring[k], ring[(k + 1) % n]) {
            return Side::OnBoundary;
        }
    }
    let mut inside = false;
    for k in 0..n {
        let a = ring[k];
        let b = ring[(k + 1) % n];
        if (a.y > p.y) != (b.y > p.y) {
            let t = (p.y - a.y) / (b.y - a.y);
            let x = a.x + t * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    if inside {
        Side::Inside
    } else {
        Side::Outside
    }
}

/// Classifies `p` against triangle `(a, b, c)` by orientation signs.
///
/// Works for either winding; a zero orientation against an edge whose other
/// two orientations agree in sign (or are zero) classifies as boundary.
pub fn point_in_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> Side {
    let d1 = orient2d(a, b, p);
    let d2 = orient2d(b, c, p);
    let d3 = orient2d(c, a, p);
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    if has_pos && has_neg {
        Side::Outside
    } else if d1 == 0.0 || d2 == 0.0 || d3 == 0.0 {
        Side::OnBoundary
    } else {
        Side::Inside
    }
}

/// Whether the quadrilateral `(q[0], q[1], q[2], q[3])` is convex.
///
/// Collinear consecutive corners count as (weakly) convex. Winding order
/// does not matter.
pub fn is_convex_quad(q: &[DVec2; 4]) -> bool {
    let mut has_pos = false;
    let mut has_neg = false;
    for k in 0..4 {
        let cross = orient2d(q[k], q[(k + 1) % 4], q[(k + 2) % 4]);
        if cross > 0.0 {
            has_pos = true;
        } else if cross < 0.0 {
            has_neg = true;
        }
    }
    !(has_pos && has_neg)
}

/// Intersection of the infinite line through `(a1, a2)` with the infinite
/// line through `(b1, b2)`, computed from slope/intercept form.
///
/// Returns `None` when the lines are parallel or coincident (including the
/// degenerate case of a zero-length defining segment); callers filter the
/// returned point against their segment's bounding box.
pub fn line_intersection(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> Option<DVec2> {
    let a = (a1.y - a2.y) / (a1.x - a2.x);
    let a_intercept = a1.y - a1.x * a;
    let b = (b1.y - b2.y) / (b1.x - b2.x);
    let b_intercept = b1.y - b1.x * b;
    if a.is_finite() && b.is_finite() && a != b {
        // Neither line is vertical
        let x = (b_intercept - a_intercept) / (a - b);
        Some(DVec2::new(x, a * x + a_intercept))
    } else if a.is_finite() && b.is_infinite() {
        // Only (b1, b2) is vertical
        Some(DVec2::new(b1.x, a * b1.x + a_intercept))
    } else if b.is_finite() && a.is_infinite() {
        // Only (a1, a2) is vertical
        Some(DVec2::new(a1.x, b * a1.x + b_intercept))
    } else {
        None
    }
}
