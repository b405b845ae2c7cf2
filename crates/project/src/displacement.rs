//! The displacement grid: where every grid vertex sits after deformation.
//!
//! Vertex `(i, j)` of the undeformed grid sits at continuous map coordinate
//! `(i + 0.5, j + 0.5)` (the graticule convention); the displacement grid
//! records its position after deformation. The grid is produced once per
//! diffusion iteration by the velocity-field integrator (or a synthetic
//! [`DisplacementSource`](crate::source::DisplacementSource)) and is
//! read-only to every projection stage.

use cartoflow_core::{Grid, GridDims, ProjectError};
use glam::DVec2;

use crate::source::DisplacementSource;

/// Per-vertex deformed positions for a grid of [`GridDims`] vertices.
#[derive(Debug, Clone)]
pub struct DisplacementGrid {
    dims: GridDims,
    positions: Grid<DVec2>,
}

impl DisplacementGrid {
    /// The identity deformation: vertex `(i, j)` stays at
    /// `(i + 0.5, j + 0.5)`.
    pub fn identity(dims: GridDims) -> Self {
        Self::from_source(dims, &crate::source::Identity)
    }

    /// Builds a grid by sampling `source` at every undisplaced vertex
    /// position and adding the sampled displacement.
    pub fn from_source(dims: GridDims, source: &dyn DisplacementSource) -> Self {
        let mut data = Vec::with_capacity(dims.lx() * dims.ly());
        for j in 0..dims.ly() {
            for i in 0..dims.lx() {
                let x = i as f64 + 0.5;
                let y = j as f64 + 0.5;
                let (dx, dy) = source.sample(x, y);
                data.push(DVec2::new(x + dx, y + dy));
            }
        }
        // Length matches by construction.
        let positions = Grid::from_data(dims.lx(), dims.ly(), data)
            .expect("vertex count matches dims by construction");
        Self { dims, positions }
    }

    /// Builds a grid from pre-computed vertex positions in row-major order
    /// (row = constant `j`), validating the vertex count.
    pub fn from_positions(dims: GridDims, positions: Vec<DVec2>) -> Result<Self, ProjectError> {
        let positions = Grid::from_data(dims.lx(), dims.ly(), positions)?;
        Ok(Self { dims, positions })
    }

    /// The vertex-grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Deformed position of vertex `(i, j)`. Panics if out of range.
    pub fn position(&self, i: usize, j: usize) -> DVec2 {
        *self.positions.get(i, j)
    }

    /// Overwrites the deformed position of vertex `(i, j)`.
    pub fn set_position(&mut self, i: usize, j: usize, position: DVec2) {
        self.positions.set(i, j, position);
    }

    /// Deformed position of the vertex whose undisplaced position is
    /// `corner` (a half-integer conceptual coordinate).
    ///
    /// Conceptual corners in the outer half-band of the map (coordinates
    /// below 0.5 or above `l - 0.5`) have no vertex of their own; the lookup
    /// clamps to the nearest real vertex.
    pub fn displaced_corner(&self, corner: DVec2) -> DVec2 {
        let i = (corner.x.max(0.0) as usize).min(self.dims.lx() - 1);
        let j = (corner.y.max(0.0) as usize).min(self.dims.ly() - 1);
        self.position(i, j)
    }

    /// Splits the deformation into per-vertex displacement deltas
    /// `(dx[i][j], dy[i][j]) = position(i, j) - (i + 0.5, j + 0.5)`.
    pub fn deltas(&self) -> (Grid<f64>, Grid<f64>) {
        let lx = self.dims.lx();
        let ly = self.dims.ly();
        let mut dx = Vec::with_capacity(lx * ly);
        let mut dy = Vec::with_capacity(lx * ly);
        for j in 0..ly {
            for i in 0..lx {
                let p = self.position(i, j);
                dx.push(p.x - i as f64 - 0.5);
                dy.push(p.y - j as f64 - 0.5);
            }
        }
        (
            Grid::from_data(lx, ly, dx).expect("delta count matches dims by construction"),
            Grid::from_data(lx, ly, dy).expect("delta count matches dims by construction"),
        )
    }
}
