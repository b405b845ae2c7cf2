//! Gaussian low-pass filter applied to the frequency-domain density field.
//!
//! Smoothing the density before integrating the flow keeps the induced
//! velocity field numerically stable: high-frequency density components
//! would otherwise produce displacement fields that fold graticule cells.

use cartoflow_core::{Complex, Grid};
use std::f64::consts::PI;

/// Multiplies every frequency-domain coefficient `(i, j)` by
/// `exp(-0.5 * w^2 * pi^2 * ((i/lx)^2 + (j/ly)^2)) / (4 * lx * ly)`.
///
/// Frequencies are normalized to the grid, not to physical units. The
/// constant `1 / (4 * lx * ly)` also undoes the forward transform's
/// normalization, so `blur_width = 0` is a pure renormalization pass with no
/// smoothing. Mutates the grid in place; purely numeric, no error paths.
pub fn blur_density(rho_ft: &mut Grid<Complex>, blur_width: f64) {
    let lx = rho_ft.width();
    let ly = rho_ft.height();
    let prefactor = -0.5 * blur_width * blur_width * PI * PI;
    let scale = 1.0 / (4 * lx * ly) as f64;
    for j in 0..ly {
        let scaled_j = j as f64 / ly as f64;
        let scaled_j_squared = scaled_j * scaled_j;
        for i in 0..lx {
            let scaled_i = i as f64 / lx as f64;
            let scaled_i_squared = scaled_i * scaled_i;
            let factor = (prefactor * (scaled_i_squared + scaled_j_squared)).exp() * scale;
            let cell = rho_ft.get_mut(i, j);
            *cell = *cell * factor;
        }
    }
}
