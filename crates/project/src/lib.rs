#![deny(unsafe_code)]
//! The cartoflow projection engine: from a density field and a displacement
//! grid to a deformed polygon set.
//!
//! Pipeline, in pass order: [`blur::blur_density`] smooths the
//! frequency-domain density so the induced flow stays numerically stable;
//! the external integrator (behind [`source::DisplacementSource`]) turns the
//! density into a [`displacement::DisplacementGrid`];
//! [`graticule::choose_diagonals`] records which diagonal still validly
//! splits each deformed cell; [`densify`] refines polygon boundaries to
//! grid-cell-local segments; and [`triangle`] or [`bilinear`] carries every
//! vertex into the deformed grid. [`inset::Inset`] owns the state of one
//! such pass and swaps polygon sets wholesale.

pub mod bilinear;
pub mod blur;
pub mod densify;
pub mod displacement;
pub mod graticule;
pub mod inset;
pub mod search;
pub mod source;
pub mod strategy;
pub mod transform;
pub mod triangle;

pub use bilinear::{interpolate_bilinearly, project_bilinear, Axis};
pub use blur::blur_density;
pub use densify::{densification_points, densify_geo_divs, densify_polygon, densify_ring};
pub use displacement::DisplacementGrid;
pub use graticule::{choose_diagonals, Diagonal, DiagonalGrid, GraticuleStats};
pub use inset::Inset;
pub use search::{point_search, SearchRect};
pub use source::{DisplacementSource, Identity, PerlinWarp, RadialBulge};
pub use strategy::Strategy;
pub use transform::SpectralTransform;
pub use triangle::{
    cell_corners, find_triangle, project_point, project_with_triangulation, AffineMap,
};
