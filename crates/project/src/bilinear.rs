//! Bilinear projection: the fast path without triangulation.
//!
//! The displacement field is treated as a bilinearly-interpolable vector
//! field: each vertex is moved by the interpolated displacement delta at its
//! own coordinates. There is no diagonal lookup and no topology guarantee
//! (rings may self-intersect if the displacement field is not smooth
//! enough), but when the grid resolution is fine relative to feature size
//! this is considerably cheaper than affine recovery.

use cartoflow_core::{Grid, GridDims, Point};
use cartoflow_geom::{GeoDiv, PolygonWithHoles, Ring};

use crate::displacement::DisplacementGrid;

/// Which displacement component a delta grid holds. Determines the border
/// policy during interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Bilinearly interpolates `grid` at `(x, y)` under the graticule
/// convention: the value at `(i, j)` sits at map coordinate
/// `(i + 0.5, j + 0.5)`.
///
/// Border policy: the displacement component normal to a map border
/// vanishes on that border (the integrator's boundary condition), while the
/// tangential component copies the nearest vertex. Sampling positions in
/// the outer half-band therefore blend toward zero normal displacement.
pub fn interpolate_bilinearly(
    x: f64,
    y: f64,
    grid: &Grid<f64>,
    axis: Axis,
    dims: GridDims,
) -> f64 {
    let lx = dims.lx() as f64;
    let ly = dims.ly() as f64;

    // Conceptual coordinates of the four surrounding vertices, clamped to
    // the map borders in the outer half-band.
    let x0 = ((x + 0.5).floor() - 0.5).max(0.0);
    let x1 = ((x + 0.5).floor() + 0.5).min(lx);
    let y0 = ((y + 0.5).floor() - 0.5).max(0.0);
    let y1 = ((y + 0.5).floor() + 0.5).min(ly);
    let delta_x = (x - x0) / (x1 - x0);
    let delta_y = (y - y0) / (y1 - y0);

    let fx0y0 = corner_value(grid, x0, y0, axis, dims);
    let fx0y1 = corner_value(grid, x0, y1, axis, dims);
    let fx1y0 = corner_value(grid, x1, y0, axis, dims);
    let fx1y1 = corner_value(grid, x1, y1, axis, dims);

    (1.0 - delta_x) * (1.0 - delta_y) * fx0y0
        + (1.0 - delta_x) * delta_y * fx0y1
        + delta_x * (1.0 - delta_y) * fx1y0
        + delta_x * delta_y * fx1y1
}

/// Value of the delta grid at the conceptual corner `(cx, cy)`.
///
/// Corners on a map border carry zero for the border-normal component;
/// every other lookup snaps to the nearest real vertex.
fn corner_value(grid: &Grid<f64>, cx: f64, cy: f64, axis: Axis, dims: GridDims) -> f64 {
    let lx = dims.lx();
    let ly = dims.ly();
    let on_x_border = cx == 0.0 || cx == lx as f64;
    let on_y_border = cy == 0.0 || cy == ly as f64;
    match axis {
        Axis::X if on_x_border => 0.0,
        Axis::Y if on_y_border => 0.0,
        _ => {
            let i = (cx.max(0.0) as usize).min(lx - 1);
            let j = (cy.max(0.0) as usize).min(ly - 1);
            *grid.get(i, j)
        }
    }
}

/// Projects every vertex of every region by adding the bilinearly
/// interpolated displacement delta, producing a replacement region set.
///
/// Coordinates are left unrounded; apply the rounding pass separately if
/// downstream comparisons need the fixed decimal precision.
pub fn project_bilinear(geo_divs: &[GeoDiv], proj: &DisplacementGrid) -> Vec<GeoDiv> {
    let dims = proj.dims();
    let (xdisp, ydisp) = proj.deltas();
    let project = |p: Point| {
        Point::new(
            p.x + interpolate_bilinearly(p.x, p.y, &xdisp, Axis::X, dims),
            p.y + interpolate_bilinearly(p.x, p.y, &ydisp, Axis::Y, dims),
        )
    };

    geo_divs
        .iter()
        .map(|gd| GeoDiv {
            id: gd.id.clone(),
            polygons: gd
                .polygons
                .iter()
                .map(|pwh| PolygonWithHoles {
                    exterior: Ring::new(pwh.exterior.points().iter().copied().map(project).collect()),
                    holes: pwh
                        .holes
                        .iter()
                        .map(|h| Ring::new(h.points().iter().copied().map(project).collect()))
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RadialBulge;
    use glam::DVec2;

    fn dims(lx: usize, ly: usize) -> GridDims {
        GridDims::new(lx, ly).unwrap()
    }

    /// A displacement grid where every vertex moved by a constant shift.
    fn shifted(lx: usize, ly: usize, shift: DVec2) -> DisplacementGrid {
        let mut proj = DisplacementGrid::identity(dims(lx, ly));
        for j in 0..ly {
            for i in 0..lx {
                let p = proj.position(i, j);
                proj.set_position(i, j, p + shift);
            }
        }
        proj
    }

    // ---- interpolate_bilinearly ----

    #[test]
    fn interpolation_is_exact_on_vertices() {
        let proj = shifted(8, 8, DVec2::new(0.25, 0.0));
        let (xdisp, _) = proj.deltas();
        for (i, j) in [(1, 1), (4, 6), (6, 3)] {
            let v = interpolate_bilinearly(
                i as f64 + 0.5,
                j as f64 + 0.5,
                &xdisp,
                Axis::X,
                dims(8, 8),
            );
            assert!((v - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn interpolation_averages_between_vertices() {
        let mut proj = DisplacementGrid::identity(dims(4, 4));
        proj.set_position(1, 1, DVec2::new(1.5 + 0.2, 1.5));
        proj.set_position(2, 1, DVec2::new(2.5 + 0.6, 1.5));
        let (xdisp, _) = proj.deltas();
        // Midway between vertices (1, 1) and (2, 1).
        let v = interpolate_bilinearly(2.0, 1.5, &xdisp, Axis::X, dims(4, 4));
        assert!((v - 0.4).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn normal_component_vanishes_on_the_border() {
        let proj = shifted(4, 4, DVec2::new(0.3, -0.2));
        let (xdisp, ydisp) = proj.deltas();
        let d = dims(4, 4);
        // On the left border the x component is fully suppressed.
        assert_eq!(interpolate_bilinearly(0.0, 2.0, &xdisp, Axis::X, d), 0.0);
        // On the bottom border the y component is fully suppressed.
        assert_eq!(interpolate_bilinearly(2.0, 0.0, &ydisp, Axis::Y, d), 0.0);
        // The tangential component survives at full strength.
        assert!((interpolate_bilinearly(0.0, 2.0, &ydisp, Axis::Y, d) + 0.2).abs() < 1e-12);
        assert!((interpolate_bilinearly(2.0, 0.0, &xdisp, Axis::X, d) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn outer_band_blends_toward_zero_normal_displacement() {
        let proj = shifted(4, 4, DVec2::new(0.4, 0.0));
        let (xdisp, _) = proj.deltas();
        let d = dims(4, 4);
        // Halfway into the left band: halfway between border (0) and the
        // first vertex column (0.4).
        let v = interpolate_bilinearly(0.25, 2.0, &xdisp, Axis::X, d);
        assert!((v - 0.2).abs() < 1e-12, "got {v}");
    }

    // ---- project_bilinear ----

    fn square_div() -> Vec<GeoDiv> {
        vec![GeoDiv {
            id: "sq".into(),
            polygons: vec![PolygonWithHoles::new(
                Ring::new(vec![
                    Point::new(2.0, 2.0),
                    Point::new(5.5, 2.0),
                    Point::new(5.5, 5.5),
                    Point::new(2.0, 5.5),
                ]),
                vec![],
            )],
        }]
    }

    #[test]
    fn identity_displacement_changes_nothing() {
        let proj = DisplacementGrid::identity(dims(8, 8));
        let divs = square_div();
        assert_eq!(project_bilinear(&divs, &proj), divs);
    }

    #[test]
    fn constant_shift_translates_interior_geometry() {
        let proj = shifted(8, 8, DVec2::new(0.25, -0.5));
        let out = project_bilinear(&square_div(), &proj);
        let pts = out[0].polygons[0].exterior.points();
        assert!((pts[0].x - 2.25).abs() < 1e-12);
        assert!((pts[0].y - 1.5).abs() < 1e-12);
        assert!((pts[2].x - 5.75).abs() < 1e-12);
        assert!((pts[2].y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn agrees_with_triangulation_for_constant_shift() {
        use crate::graticule::choose_diagonals;
        use crate::triangle::project_with_triangulation;
        let proj = shifted(8, 8, DVec2::new(0.125, 0.25));
        let (diagonals, _) = choose_diagonals(&proj).unwrap();
        let divs = square_div();
        let tri = project_with_triangulation(&divs, &proj, &diagonals).unwrap();
        let bil = project_bilinear(&divs, &proj);
        for (a, b) in tri[0].polygons[0]
            .exterior
            .points()
            .iter()
            .zip(bil[0].polygons[0].exterior.points())
        {
            assert!((a.x - b.x).abs() < 1e-9, "{a:?} vs {b:?}");
            assert!((a.y - b.y).abs() < 1e-9, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn structure_is_preserved() {
        let proj = DisplacementGrid::from_source(
            dims(8, 8),
            &RadialBulge {
                x: 4.0,
                y: 4.0,
                strength: 0.3,
                radius: 3.0,
            },
        );
        let divs = square_div();
        let out = project_bilinear(&divs, &proj);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "sq");
        assert_eq!(out[0].polygons[0].exterior.len(), 4);
    }

    // ---- Property-based tests ----

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn interpolation_stays_within_corner_value_hull(
                x in 0.5_f64..7.5,
                y in 0.5_f64..7.5,
                deltas in prop::collection::vec(-0.5_f64..0.5, 64),
            ) {
                let d = GridDims::new(8, 8).unwrap();
                let grid = Grid::from_data(8, 8, deltas).unwrap();
                let v = interpolate_bilinearly(x, y, &grid, Axis::X, d);
                let min = grid.data().iter().cloned().fold(f64::INFINITY, f64::min);
                let max = grid.data().iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(v >= min - 1e-12 && v <= max + 1e-12);
            }

            #[test]
            fn interpolation_is_continuous_across_vertices(
                i in 1_usize..7,
                j in 1_usize..7,
                deltas in prop::collection::vec(-0.5_f64..0.5, 64),
            ) {
                let d = GridDims::new(8, 8).unwrap();
                let grid = Grid::from_data(8, 8, deltas).unwrap();
                let x = i as f64 + 0.5;
                let y = j as f64 + 0.5;
                let at = interpolate_bilinearly(x, y, &grid, Axis::X, d);
                let left = interpolate_bilinearly(x - 1e-9, y, &grid, Axis::X, d);
                let right = interpolate_bilinearly(x + 1e-9, y, &grid, Axis::X, d);
                prop_assert!((at - left).abs() < 1e-6);
                prop_assert!((at - right).abs() < 1e-6);
            }
        }
    }
}
