//! Per-cell diagonal choice for the deformed graticule.
//!
//! Every graticule cell is split into two triangles along one of its
//! diagonals before projection. After deformation only one split may remain
//! valid: a diagonal is usable when its midpoint lies strictly inside the
//! displaced quadrilateral. Cells where neither midpoint qualifies have been
//! folded onto themselves by the displacement field, which is a fatal data
//! error rather than a recoverable condition.

use cartoflow_core::{Grid, GridDims, ProjectError};
use cartoflow_geom::{is_convex_quad, point_in_ring, Side};

use crate::displacement::DisplacementGrid;

/// Which diagonal splits a graticule cell into two triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Diagonal {
    /// From the bottom-left corner to the top-right corner.
    #[default]
    Main,
    /// From the bottom-right corner to the top-left corner.
    Anti,
}

/// The chosen diagonal for every graticule cell.
///
/// Sized `(lx - 1) x (ly - 1)` for a vertex grid of `lx x ly`. Rebuilt once
/// per deformation pass, immediately after the displacement grid, and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct DiagonalGrid {
    choices: Grid<Diagonal>,
}

impl DiagonalGrid {
    /// The chosen diagonal for cell `(i, j)`. Panics if out of range.
    pub fn choice(&self, i: usize, j: usize) -> Diagonal {
        *self.choices.get(i, j)
    }

    /// Number of cell columns (`lx - 1`).
    pub fn width(&self) -> usize {
        self.choices.width()
    }

    /// Number of cell rows (`ly - 1`).
    pub fn height(&self) -> usize {
        self.choices.height()
    }
}

/// Diagnostics from a diagonal-choice pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraticuleStats {
    /// Number of displaced cells that are no longer convex. Non-convexity is
    /// expected under strong deformation and is not an error by itself.
    pub concave_cells: usize,
}

/// Chooses a diagonal for every graticule cell of the displaced grid.
///
/// Selection rule: diagonal [`Diagonal::Main`] is chosen if its midpoint
/// lies strictly inside the displaced quadrilateral; otherwise
/// [`Diagonal::Anti`] if *its* midpoint does; otherwise the cell is
/// degenerate and `ProjectError::DegenerateCell` is returned. For an
/// undisplaced cell both diagonals qualify, so the rule deterministically
/// prefers `Main`.
pub fn choose_diagonals(
    proj: &DisplacementGrid,
) -> Result<(DiagonalGrid, GraticuleStats), ProjectError> {
    let dims: GridDims = proj.dims();
    let lx = dims.lx();
    let ly = dims.ly();
    if lx < 2 || ly < 2 {
        return Err(ProjectError::InvalidDimensions { lx, ly });
    }
    let mut choices = Grid::filled(lx - 1, ly - 1, Diagonal::Main)?;
    let mut concave_cells = 0;

    for j in 0..ly - 1 {
        for i in 0..lx - 1 {
            // Displaced cell corners in winding order: bottom-left,
            // bottom-right, top-right, top-left.
            let quad = [
                proj.position(i, j),
                proj.position(i + 1, j),
                proj.position(i + 1, j + 1),
                proj.position(i, j + 1),
            ];
            let mid_main = (quad[0] + quad[2]) / 2.0;
            let mid_anti = (quad[1] + quad[3]) / 2.0;

            let choice = if point_in_ring(mid_main, &quad) == Side::Inside {
                Diagonal::Main
            } else if point_in_ring(mid_anti, &quad) == Side::Inside {
                Diagonal::Anti
            } else {
                return Err(ProjectError::DegenerateCell { i, j });
            };
            choices.set(i, j, choice);

            if !is_convex_quad(&quad) {
                concave_cells += 1;
            }
        }
    }

    Ok((DiagonalGrid { choices }, GraticuleStats { concave_cells }))
}
