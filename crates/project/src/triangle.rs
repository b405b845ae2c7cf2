//! Projection by triangulated affine recovery.
//!
//! Each point is located in its graticule cell, the cell's recorded
//! diagonal choice reproduces the same topological split that was applied
//! to the displaced geometry, and the unique affine transform taking the
//! containing original triangle onto its displaced counterpart carries the
//! point across. Boundary counts as located, and the candidate triangles
//! are always tested in the same order, so the pass is deterministic.

use cartoflow_core::{rounded_vec, GridDims, ProjectError};
use cartoflow_geom::{point_in_triangle, GeoDiv, Side};
use glam::{DMat3, DVec2};

use crate::displacement::DisplacementGrid;
use crate::graticule::{Diagonal, DiagonalGrid};

/// Corners of the graticule cell containing `(x, y)`, in winding order:
/// bottom-left, bottom-right, top-right, top-left.
///
/// The cell is located via `floor(coord + 0.5) - 0.5`; for points within
/// half a cell of the map border the conceptual corners extend past the
/// vertex lattice.
pub fn cell_corners(x: f64, y: f64) -> [DVec2; 4] {
    let v0 = DVec2::new((x + 0.5).floor() - 0.5, (y + 0.5).floor() - 0.5);
    [v0, v0 + DVec2::X, v0 + DVec2::ONE, v0 + DVec2::Y]
}

/// Cell index of the cell whose bottom-left corner is `v0`, clamped so
/// conceptual outer-band cells use the nearest real cell's diagonal.
pub(crate) fn cell_index(v0: DVec2, dims: GridDims) -> (usize, usize) {
    let i = (v0.x.max(0.0) as usize).min(dims.lx().saturating_sub(2));
    let j = (v0.y.max(0.0) as usize).min(dims.ly().saturating_sub(2));
    (i, j)
}

/// Finds the original (pre-displacement) triangle containing `(x, y)`.
///
/// The cell's two candidate triangles follow the diagonal recorded for the
/// cell; they are tested in a fixed order with boundary counting as inside.
/// Fails with `PointOutsideGrid` if `(x, y)` leaves `[0, lx] x [0, ly]`, and
/// with `PointNotInCell` if the point is in neither candidate, which is
/// geometrically impossible for a cell-respecting point and signals an
/// upstream densification bug.
pub fn find_triangle(
    x: f64,
    y: f64,
    dims: GridDims,
    diagonals: &DiagonalGrid,
) -> Result<[DVec2; 3], ProjectError> {
    if !dims.contains(x, y) {
        return Err(ProjectError::PointOutsideGrid {
            x,
            y,
            lx: dims.lx(),
            ly: dims.ly(),
        });
    }
    let [v0, v1, v2, v3] = cell_corners(x, y);
    let (ci, cj) = cell_index(v0, dims);
    let (tri1, tri2) = match diagonals.choice(ci, cj) {
        Diagonal::Main => ([v0, v1, v2], [v0, v2, v3]),
        Diagonal::Anti => ([v0, v1, v3], [v1, v2, v3]),
    };

    let p = DVec2::new(x, y);
    if point_in_triangle(p, tri1[0], tri1[1], tri1[2]) != Side::Outside {
        Ok(tri1)
    } else if point_in_triangle(p, tri2[0], tri2[1], tri2[2]) != Side::Outside {
        Ok(tri2)
    } else {
        Err(ProjectError::PointNotInCell { x, y, i: ci, j: cj })
    }
}

/// The unique affine transform taking one triangle onto another.
///
/// With `A` and `P` the homogeneous coordinate matrices of the source and
/// destination triangles (corner coordinates as columns, third row all
/// ones), the transform satisfying `T(a) = p`, `T(b) = q`, `T(c) = r` is
/// `T = P * A^{-1}`. `A` is invertible whenever the source corners are not
/// collinear, which always holds for the grid's unit-cell split.
#[derive(Debug, Clone, Copy)]
pub struct AffineMap {
    t: DMat3,
}

impl AffineMap {
    /// Recovers the affine transform taking `src` onto `dst` corner by
    /// corner.
    pub fn from_triangles(src: [DVec2; 3], dst: [DVec2; 3]) -> Self {
        let a = DMat3::from_cols(src[0].extend(1.0), src[1].extend(1.0), src[2].extend(1.0));
        let p = DMat3::from_cols(dst[0].extend(1.0), dst[1].extend(1.0), dst[2].extend(1.0));
        Self { t: p * a.inverse() }
    }

    /// Applies the transform to a point.
    pub fn apply(&self, point: DVec2) -> DVec2 {
        (self.t * point.extend(1.0)).truncate()
    }
}

/// Projects a single point through the triangulated displacement, rounding
/// the result to the fixed decimal precision used by densification.
pub fn project_point(
    x: f64,
    y: f64,
    proj: &DisplacementGrid,
    diagonals: &DiagonalGrid,
) -> Result<DVec2, ProjectError> {
    let tri = find_triangle(x, y, proj.dims(), diagonals)?;
    let displaced = [
        proj.displaced_corner(tri[0]),
        proj.displaced_corner(tri[1]),
        proj.displaced_corner(tri[2]),
    ];
    let map = AffineMap::from_triangles(tri, displaced);
    Ok(rounded_vec(map.apply(DVec2::new(x, y))))
}

/// Projects every vertex of every ring of every region, producing a
/// replacement region set.
///
/// Ring winding and hole/outer structure are preserved and no vertices are
/// added or removed; densify beforehand if finer resolution is needed.
pub fn project_with_triangulation(
    geo_divs: &[GeoDiv],
    proj: &DisplacementGrid,
    diagonals: &DiagonalGrid,
) -> Result<Vec<GeoDiv>, ProjectError> {
    let mut new_divs = Vec::with_capacity(geo_divs.len());
    for gd in geo_divs {
        let mut new_gd = GeoDiv::new(gd.id.clone());
        for pwh in &gd.polygons {
            let exterior = pwh
                .exterior
                .try_map_points(|p| project_point(p.x, p.y, proj, diagonals).map(Into::into))?;
            let mut holes = Vec::with_capacity(pwh.holes.len());
            for hole in &pwh.holes {
                holes.push(
                    hole.try_map_points(|p| {
                        project_point(p.x, p.y, proj, diagonals).map(Into::into)
                    })?,
                );
            }
            new_gd.push(cartoflow_geom::PolygonWithHoles::new(exterior, holes));
        }
        new_divs.push(new_gd);
    }
    Ok(new_divs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graticule::choose_diagonals;
    use crate::source::RadialBulge;
    use cartoflow_geom::{PolygonWithHoles, Ring};
    use cartoflow_core::Point;

    fn dims(lx: usize, ly: usize) -> GridDims {
        GridDims::new(lx, ly).unwrap()
    }

    fn bulged(lx: usize, ly: usize) -> DisplacementGrid {
        DisplacementGrid::from_source(
            dims(lx, ly),
            &RadialBulge {
                x: lx as f64 / 2.0,
                y: ly as f64 / 2.0,
                strength: 0.2,
                radius: lx as f64 / 2.0,
            },
        )
    }

    // ---- cell_corners / find_triangle ----

    #[test]
    fn cell_corners_follow_the_half_integer_lattice() {
        let [v0, v1, v2, v3] = cell_corners(1.7, 2.2);
        assert_eq!(v0, DVec2::new(1.5, 1.5));
        assert_eq!(v1, DVec2::new(2.5, 1.5));
        assert_eq!(v2, DVec2::new(2.5, 2.5));
        assert_eq!(v3, DVec2::new(1.5, 2.5));
    }

    #[test]
    fn cell_corners_extend_into_the_outer_band() {
        let [v0, ..] = cell_corners(0.2, 0.2);
        assert_eq!(v0, DVec2::new(-0.5, -0.5));
    }

    #[test]
    fn find_triangle_picks_lower_triangle_below_main_diagonal() {
        let proj = DisplacementGrid::identity(dims(4, 4));
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        let tri = find_triangle(2.2, 1.7, dims(4, 4), &diagonals).unwrap();
        // Below the main diagonal of cell (1, 1): triangle (v0, v1, v2).
        assert_eq!(tri, [
            DVec2::new(1.5, 1.5),
            DVec2::new(2.5, 1.5),
            DVec2::new(2.5, 2.5),
        ]);
    }

    #[test]
    fn find_triangle_picks_upper_triangle_above_main_diagonal() {
        let proj = DisplacementGrid::identity(dims(4, 4));
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        let tri = find_triangle(1.7, 2.2, dims(4, 4), &diagonals).unwrap();
        assert_eq!(tri, [
            DVec2::new(1.5, 1.5),
            DVec2::new(2.5, 2.5),
            DVec2::new(1.5, 2.5),
        ]);
    }

    #[test]
    fn find_triangle_rejects_out_of_bounds_points() {
        let proj = DisplacementGrid::identity(dims(4, 4));
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        for (x, y) in [(-0.1, 2.0), (4.1, 2.0), (2.0, -0.1), (2.0, 4.1)] {
            assert!(matches!(
                find_triangle(x, y, dims(4, 4), &diagonals),
                Err(ProjectError::PointOutsideGrid { .. })
            ));
        }
    }

    #[test]
    fn find_triangle_accepts_the_whole_closed_range() {
        let proj = DisplacementGrid::identity(dims(4, 4));
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        for (x, y) in [(0.0, 0.0), (4.0, 4.0), (0.0, 4.0), (2.0, 0.0)] {
            assert!(find_triangle(x, y, dims(4, 4), &diagonals).is_ok());
        }
    }

    // ---- AffineMap ----

    #[test]
    fn affine_map_carries_corners_onto_corners() {
        let src = [
            DVec2::new(0.5, 0.5),
            DVec2::new(1.5, 0.5),
            DVec2::new(1.5, 1.5),
        ];
        let dst = [
            DVec2::new(2.0, 1.0),
            DVec2::new(4.5, 0.5),
            DVec2::new(3.0, 3.25),
        ];
        let map = AffineMap::from_triangles(src, dst);
        for (s, d) in src.iter().zip(dst.iter()) {
            let image = map.apply(*s);
            assert!((image - *d).length() < 1e-9, "corner {s:?} mapped to {image:?}");
        }
    }

    #[test]
    fn affine_map_preserves_barycentric_combinations() {
        let src = [
            DVec2::new(0.5, 0.5),
            DVec2::new(1.5, 0.5),
            DVec2::new(0.5, 1.5),
        ];
        let dst = [
            DVec2::new(1.0, 0.0),
            DVec2::new(3.0, 1.0),
            DVec2::new(0.5, 2.5),
        ];
        let map = AffineMap::from_triangles(src, dst);
        let centroid_src = (src[0] + src[1] + src[2]) / 3.0;
        let centroid_dst = (dst[0] + dst[1] + dst[2]) / 3.0;
        assert!((map.apply(centroid_src) - centroid_dst).length() < 1e-9);
    }

    #[test]
    fn identity_triangles_give_identity_map() {
        let tri = [
            DVec2::new(0.5, 0.5),
            DVec2::new(1.5, 0.5),
            DVec2::new(1.5, 1.5),
        ];
        let map = AffineMap::from_triangles(tri, tri);
        let p = DVec2::new(1.2, 0.9);
        assert!((map.apply(p) - p).length() < 1e-12);
    }

    // ---- project_point ----

    #[test]
    fn identity_projection_fixes_cell_boundary_corner_point() {
        // 2x2 grid, identity displacement: the single cell's center point
        // (1, 1) sits exactly on the diagonal and must come back unchanged.
        let proj = DisplacementGrid::identity(dims(2, 2));
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        let out = project_point(1.0, 1.0, &proj, &diagonals).unwrap();
        assert_eq!(out, DVec2::new(1.0, 1.0));
    }

    #[test]
    fn identity_projection_fixes_interior_points() {
        let proj = DisplacementGrid::identity(dims(8, 8));
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        // All sample points stay half a cell away from the map border;
        // projection inside the outer band collapses onto the border
        // column/row by the clamped corner lookup.
        for (x, y) in [(0.7, 0.7), (3.3, 5.9), (6.5, 1.5), (0.9, 7.1)] {
            let out = project_point(x, y, &proj, &diagonals).unwrap();
            assert!((out - DVec2::new(x, y)).length() < 1e-9, "({x}, {y}) moved to {out:?}");
        }
    }

    #[test]
    fn projection_is_exact_on_grid_vertices() {
        let proj = bulged(8, 8);
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        for (i, j) in [(0, 0), (3, 4), (7, 7), (0, 7), (5, 1)] {
            let out = project_point(i as f64 + 0.5, j as f64 + 0.5, &proj, &diagonals).unwrap();
            let expected = rounded_vec(proj.position(i, j));
            assert!(
                (out - expected).length() < 1e-9,
                "vertex ({i}, {j}) projected to {out:?}, expected {expected:?}"
            );
        }
    }

    #[test]
    fn projected_centroid_stays_in_displaced_triangle_hull() {
        let proj = bulged(8, 8);
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        for (x, y) in [(2.1, 2.9), (5.6, 4.4), (1.5, 6.2)] {
            let tri = find_triangle(x, y, dims(8, 8), &diagonals).unwrap();
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            let out = project_point(centroid.x, centroid.y, &proj, &diagonals).unwrap();
            let displaced = [
                proj.displaced_corner(tri[0]),
                proj.displaced_corner(tri[1]),
                proj.displaced_corner(tri[2]),
            ];
            assert_ne!(
                point_in_triangle(out, displaced[0], displaced[1], displaced[2]),
                Side::Outside,
                "centroid image {out:?} escaped its displaced triangle"
            );
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let proj = bulged(8, 8);
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        let a = project_point(3.7, 2.2, &proj, &diagonals).unwrap();
        let b = project_point(3.7, 2.2, &proj, &diagonals).unwrap();
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }

    // ---- project_with_triangulation ----

    fn sample_divs() -> Vec<GeoDiv> {
        vec![GeoDiv {
            id: "A".into(),
            polygons: vec![PolygonWithHoles::new(
                Ring::new(vec![
                    Point::new(2.0, 2.0),
                    Point::new(5.0, 2.0),
                    Point::new(5.0, 5.0),
                    Point::new(2.0, 5.0),
                ]),
                vec![Ring::new(vec![
                    Point::new(3.0, 3.0),
                    Point::new(3.0, 4.0),
                    Point::new(4.0, 4.0),
                ])],
            )],
        }]
    }

    #[test]
    fn ring_structure_and_vertex_counts_survive() {
        let proj = bulged(8, 8);
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        let out = project_with_triangulation(&sample_divs(), &proj, &diagonals).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "A");
        assert_eq!(out[0].polygons.len(), 1);
        assert_eq!(out[0].polygons[0].exterior.len(), 4);
        assert_eq!(out[0].polygons[0].holes.len(), 1);
        assert_eq!(out[0].polygons[0].holes[0].len(), 3);
    }

    #[test]
    fn identity_projection_returns_equal_geometry() {
        let proj = DisplacementGrid::identity(dims(8, 8));
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        let divs = sample_divs();
        let out = project_with_triangulation(&divs, &proj, &diagonals).unwrap();
        assert_eq!(out, divs);
    }

    #[test]
    fn winding_orientation_is_preserved_under_gentle_deformation() {
        let proj = bulged(8, 8);
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        let divs = sample_divs();
        let out = project_with_triangulation(&divs, &proj, &diagonals).unwrap();
        let before = divs[0].polygons[0].exterior.signed_area();
        let after = out[0].polygons[0].exterior.signed_area();
        assert_eq!(before > 0.0, after > 0.0, "winding flipped");
    }

    #[test]
    fn out_of_bounds_vertex_aborts_the_pass() {
        let proj = DisplacementGrid::identity(dims(4, 4));
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        let divs = vec![GeoDiv {
            id: "bad".into(),
            polygons: vec![PolygonWithHoles::new(
                Ring::new(vec![
                    Point::new(1.0, 1.0),
                    Point::new(5.0, 1.0),
                    Point::new(1.0, 3.0),
                ]),
                vec![],
            )],
        }];
        assert!(matches!(
            project_with_triangulation(&divs, &proj, &diagonals),
            Err(ProjectError::PointOutsideGrid { .. })
        ));
    }
}
