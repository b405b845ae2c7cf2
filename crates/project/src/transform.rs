//! The frequency-transform seam.
//!
//! The projection engine never computes a Fourier transform itself: the
//! forward/backward transforms that move the density field between spatial
//! and frequency domains are supplied by an external engine behind this
//! trait. The spectral blur multiplies coefficients in place and divides by
//! `4 * lx * ly`, which is expected to undo the forward transform's
//! normalization when the pair below round-trips.

use cartoflow_core::{Complex, Grid};

/// A forward/backward frequency transform over density grids.
///
/// This trait is **object-safe**: pass `&dyn SpectralTransform` to the
/// blur-and-restore pass. Implementations are external; tests use doubles.
pub trait SpectralTransform {
    /// Transforms a spatial density grid into frequency-domain coefficients.
    fn forward(&self, spatial: &Grid<f64>) -> Grid<Complex>;

    /// Transforms frequency-domain coefficients back into a spatial grid.
    fn inverse(&self, spectral: &Grid<Complex>) -> Grid<f64>;
}
