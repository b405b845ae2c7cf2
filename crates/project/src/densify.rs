//! Boundary densification: inserting vertices where polygon edges cross
//! graticule lines and cell diagonals.
//!
//! After densification every edge is local to a single graticule cell, so
//! the projection stages only ever classify short, cell-local segments. For
//! a segment the output contains, in order: the first endpoint, every
//! crossing with a half-integer-offset grid line, every crossing with the
//! diagonal of a unit graticule cell the segment passes through, and the
//! second endpoint.
//!
//! Floating-point hygiene: the segment direction is canonicalized
//! (lexicographically smaller endpoint first) so results are
//! order-independent, every computed crossing is rounded to the fixed
//! decimal precision, and almost-equal neighbours are collapsed after
//! sorting.

use cartoflow_core::{points_almost_equal, rounded_vec, vecs_almost_equal, GridDims, Point};
use cartoflow_geom::{line_intersection, GeoDiv, PolygonWithHoles, Ring};
use glam::DVec2;

/// Returns the ordered points of the segment from `pt1` to `pt2` after
/// densification against the graticule of `dims`.
///
/// The output begins at `pt1`, ends at `pt2`, is non-decreasing along the
/// segment's parametrization, contains no two almost-equal consecutive
/// points, and lies entirely within the segment's bounding box. Degenerate
/// (zero-length) segments are a caller contract violation; see
/// [`densify_ring`] for how rings avoid them.
pub fn densification_points(pt1: Point, pt2: Point, dims: GridDims) -> Vec<Point> {
    // Canonicalize direction: `a` is the lexicographically smaller endpoint.
    // Flipping the order of a and b does not describe a different segment,
    // but without canonicalization the computed crossings could differ in
    // the last float digits between the two orders.
    let flipped = (pt1.x > pt2.x) || (pt1.x == pt2.x && pt1.y > pt2.y);
    let (a, b): (DVec2, DVec2) = if flipped {
        (pt2.into(), pt1.into())
    } else {
        (pt1.into(), pt2.into())
    };

    let mut candidates: Vec<DVec2> = vec![a, b];
    collect_crossings(a, b, dims, &mut candidates);

    // Total order: first by x, then by y. With `a` canonicalized this is
    // exactly the order along the segment.
    candidates.sort_by(|p, q| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)));

    // Collapse almost-equal neighbours into one point.
    let mut points: Vec<Point> = Vec::with_capacity(candidates.len());
    points.push(candidates[0].into());
    for pair in candidates.windows(2) {
        if !vecs_almost_equal(pair[0], pair[1]) {
            points.push(pair[1].into());
        }
    }

    if flipped {
        points.reverse();
    }
    points
}

/// Collects grid-line and cell-diagonal crossings of the segment `(a, b)`
/// into `candidates`, rounded to the fixed decimal precision.
fn collect_crossings(a: DVec2, b: DVec2, dims: GridDims, candidates: &mut Vec<DVec2>) {
    let lx = dims.lx();
    let ly = dims.ly();
    if lx < 2 || ly < 2 {
        // No unit cell exists on a degenerate lattice.
        return;
    }

    // Bottom-left corners of the unit graticule cells containing the two
    // endpoints, clamped into the vertex lattice so points in the outer
    // half-band sweep their nearest cell.
    let cell_origin = |p: f64, l: usize| ((p + 0.5).floor() - 0.5).clamp(0.5, l as f64 - 1.5);
    let av0 = DVec2::new(cell_origin(a.x, lx), cell_origin(a.y, ly));
    let bv0 = DVec2::new(cell_origin(b.x, lx), cell_origin(b.y, ly));

    // Cell rectangle spanned by the segment: `a` is leftmost, but either
    // endpoint may be the lower one.
    let start = DVec2::new(av0.x, av0.y.min(bv0.y));
    let end = DVec2::new(bv0.x, av0.y.max(bv0.y));
    let dist_x = (end.x - start.x).round() as usize;
    let dist_y = (end.y - start.y).round() as usize;

    let in_segment_bbox = |p: DVec2| {
        ((a.x <= p.x && p.x <= b.x) || (b.x <= p.x && p.x <= a.x))
            && ((a.y <= p.y && p.y <= b.y) || (b.y <= p.y && p.y <= a.y))
    };

    for row in 0..=dist_y {
        for col in 0..=dist_x {
            // Current cell, corners in winding order: bottom-left,
            // bottom-right, top-right, top-left.
            let v0 = start + DVec2::new(col as f64, row as f64);
            let v1 = v0 + DVec2::X;
            let v2 = v0 + DVec2::ONE;
            let v3 = v0 + DVec2::Y;

            // Cell edges lie on grid lines, which extend across the whole
            // map: any intersection inside the segment's bounding box is a
            // genuine grid-line crossing.
            let edges = [
                line_intersection(a, b, v0, v1), // bottom
                line_intersection(a, b, v0, v3), // left
                line_intersection(a, b, v1, v2), // right
                line_intersection(a, b, v3, v2), // top
            ];
            for inter in edges.into_iter().flatten() {
                if in_segment_bbox(inter) {
                    candidates.push(rounded_vec(inter));
                }
            }

            // Diagonals exist only within their cell: the intersection must
            // also fall inside this cell's rectangle.
            let in_cell =
                |p: DVec2| v0.x <= p.x && p.x <= v2.x && v0.y <= p.y && p.y <= v2.y;
            let diagonals = [
                line_intersection(a, b, v0, v2),
                line_intersection(a, b, v3, v1),
            ];
            for inter in diagonals.into_iter().flatten() {
                if in_segment_bbox(inter) && in_cell(inter) {
                    candidates.push(rounded_vec(inter));
                }
            }
        }
    }
}

/// Densifies every edge of a ring, including the closing edge from the last
/// vertex back to the first.
///
/// Consecutive almost-equal vertices are collapsed rather than densified, so
/// no zero-length segment ever reaches [`densification_points`]. The ring's
/// winding and starting vertex are preserved.
pub fn densify_ring(ring: &Ring, dims: GridDims) -> Ring {
    let pts = ring.points();
    let n = pts.len();
    if n < 2 {
        return ring.clone();
    }
    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let p1 = pts[k];
        let p2 = pts[(k + 1) % n];
        if points_almost_equal(p1, p2) {
            continue;
        }
        let seg = densification_points(p1, p2, dims);
        // The closing point of each edge opens the next one.
        out.extend_from_slice(&seg[..seg.len() - 1]);
    }
    Ring::new(out)
}

/// Densifies the outer ring and every hole of a polygon.
pub fn densify_polygon(pwh: &PolygonWithHoles, dims: GridDims) -> PolygonWithHoles {
    PolygonWithHoles {
        exterior: densify_ring(&pwh.exterior, dims),
        holes: pwh.holes.iter().map(|h| densify_ring(h, dims)).collect(),
    }
}

/// Densifies every polygon of every region, producing a replacement region
/// set.
pub fn densify_geo_divs(geo_divs: &[GeoDiv], dims: GridDims) -> Vec<GeoDiv> {
    geo_divs
        .iter()
        .map(|gd| GeoDiv {
            id: gd.id.clone(),
            polygons: gd
                .polygons
                .iter()
                .map(|pwh| densify_polygon(pwh, dims))
                .collect(),
        })
        .collect()
}
