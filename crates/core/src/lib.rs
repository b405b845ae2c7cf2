#![deny(unsafe_code)]
//! Core types for the cartoflow projection engine.
//!
//! Provides the dense [`Grid`] arena and validated [`GridDims`], the
//! [`Point`] coordinate type with fixed-precision rounding and
//! epsilon-aware equality, the [`Complex`] spectral coefficient, and the
//! shared [`ProjectError`] taxonomy.

pub mod complex;
pub mod error;
pub mod grid;
pub mod point;

pub use complex::Complex;
pub use error::ProjectError;
pub use grid::{Grid, GridDims};
pub use point::{
    almost_equal, points_almost_equal, rounded_to_decimal, rounded_vec, vecs_almost_equal, Point,
    ROUND_SCALE,
};
