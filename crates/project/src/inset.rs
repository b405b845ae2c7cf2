//! Owned map state for one deformation pass.
//!
//! An [`Inset`] owns the grids and the region set of one map inset: the
//! spatial density, its frequency-domain transform, the displacement grid,
//! the per-cell diagonal choices, and the polygons. Ownership rules: a
//! region owns its polygons, the inset owns its regions and grids, and no
//! mutable grid state is ever aliased across passes. Polygons are replaced
//! wholesale (build the new set, then swap), so the previous iteration's
//! geometry stays intact until the pass commits.
//!
//! The number of finished integrations is explicit state here, threaded
//! through diagnostics, rather than an ambient global.

use cartoflow_core::{Complex, Grid, GridDims, ProjectError};
use cartoflow_geom::GeoDiv;

use crate::bilinear::project_bilinear;
use crate::blur::blur_density;
use crate::densify::densify_geo_divs;
use crate::displacement::DisplacementGrid;
use crate::graticule::{choose_diagonals, DiagonalGrid, GraticuleStats};
use crate::strategy::Strategy;
use crate::transform::SpectralTransform;
use crate::triangle::project_with_triangulation;

/// Map state for a single inset: grids plus regions.
#[derive(Debug)]
pub struct Inset {
    dims: GridDims,
    density: Grid<f64>,
    rho_ft: Grid<Complex>,
    proj: DisplacementGrid,
    diagonals: Option<DiagonalGrid>,
    geo_divs: Vec<GeoDiv>,
    finished_integrations: u32,
}

impl Inset {
    /// Creates an inset with zero density, identity displacement, and no
    /// regions.
    pub fn new(dims: GridDims) -> Self {
        let density = Grid::filled(dims.lx(), dims.ly(), 0.0)
            .expect("validated dims are non-zero");
        let rho_ft = Grid::filled(dims.lx(), dims.ly(), Complex::ZERO)
            .expect("validated dims are non-zero");
        Self {
            dims,
            density,
            rho_ft,
            proj: DisplacementGrid::identity(dims),
            diagonals: None,
            geo_divs: Vec::new(),
            finished_integrations: 0,
        }
    }

    /// Grid dimensions of this inset.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// The regions of this inset.
    pub fn geo_divs(&self) -> &[GeoDiv] {
        &self.geo_divs
    }

    /// Replaces the whole region set at once.
    pub fn set_geo_divs(&mut self, geo_divs: Vec<GeoDiv>) {
        self.geo_divs = geo_divs;
    }

    /// The spatial density field.
    pub fn density(&self) -> &Grid<f64> {
        &self.density
    }

    /// Mutable access to the spatial density field (single writer; callers
    /// must not hold other views while mutating).
    pub fn density_mut(&mut self) -> &mut Grid<f64> {
        &mut self.density
    }

    /// The frequency-domain density field.
    pub fn rho_ft(&self) -> &Grid<Complex> {
        &self.rho_ft
    }

    /// Mutable access to the frequency-domain density field.
    pub fn rho_ft_mut(&mut self) -> &mut Grid<Complex> {
        &mut self.rho_ft
    }

    /// The displacement grid of the current pass.
    pub fn proj(&self) -> &DisplacementGrid {
        &self.proj
    }

    /// Installs a new displacement grid, invalidating the diagonal choices
    /// of the previous pass.
    pub fn set_proj(&mut self, proj: DisplacementGrid) -> Result<(), ProjectError> {
        if proj.dims() != self.dims {
            return Err(ProjectError::DimensionMismatch {
                lhs_w: self.dims.lx(),
                lhs_h: self.dims.ly(),
                rhs_w: proj.dims().lx(),
                rhs_h: proj.dims().ly(),
            });
        }
        self.proj = proj;
        self.diagonals = None;
        Ok(())
    }

    /// The diagonal choices of the current pass, if already computed.
    pub fn diagonals(&self) -> Option<&DiagonalGrid> {
        self.diagonals.as_ref()
    }

    /// Number of diffusion integrations finished so far.
    pub fn finished_integrations(&self) -> u32 {
        self.finished_integrations
    }

    /// Records that one more integration finished.
    pub fn integration_finished(&mut self) {
        self.finished_integrations += 1;
    }

    /// Applies the spectral blur to the frequency-domain density and runs
    /// the external inverse transform so the filtered field is available in
    /// the spatial domain for the next diffusion step.
    pub fn blur_density(&mut self, blur_width: f64, transform: &dyn SpectralTransform) {
        blur_density(&mut self.rho_ft, blur_width);
        self.density = transform.inverse(&self.rho_ft);
    }

    /// Chooses the diagonal for every graticule cell of the current
    /// displacement grid. Must complete before any triangulated projection
    /// of the pass begins; the composed projection calls it on demand.
    pub fn choose_diagonals(&mut self) -> Result<GraticuleStats, ProjectError> {
        let (diagonals, stats) = choose_diagonals(&self.proj)?;
        self.diagonals = Some(diagonals);
        Ok(stats)
    }

    /// Densifies every region boundary against the graticule, replacing the
    /// region set.
    pub fn densify(&mut self) {
        self.geo_divs = densify_geo_divs(&self.geo_divs, self.dims);
    }

    /// Projects every region vertex with the chosen strategy, replacing the
    /// region set wholesale on success.
    pub fn project(&mut self, strategy: Strategy) -> Result<(), ProjectError> {
        match strategy {
            Strategy::Bilinear => {
                self.geo_divs = project_bilinear(&self.geo_divs, &self.proj);
                Ok(())
            }
            Strategy::Triangulation => {
                if self.diagonals.is_none() {
                    self.choose_diagonals()?;
                }
                let diagonals = self
                    .diagonals
                    .as_ref()
                    .expect("diagonals computed just above");
                self.geo_divs =
                    project_with_triangulation(&self.geo_divs, &self.proj, diagonals)?;
                Ok(())
            }
        }
    }

    /// Rounds every region coordinate to the fixed decimal precision.
    pub fn round_geo_divs(&mut self) {
        self.geo_divs = self.geo_divs.iter().map(GeoDiv::rounded).collect();
    }
}
