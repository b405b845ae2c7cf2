//! Error types shared by the cartoflow crates.
//!
//! Every variant represents an invariant violation that is fatal for the
//! running pass: callers propagate with `?` and terminate, there are no
//! retries. Transient numerical noise (near-duplicate points, rounding
//! jitter) is handled proactively by the rounding and epsilon helpers in
//! [`crate::point`] and never surfaces as an error.

use thiserror::Error;

/// Errors produced by grid construction and projection passes.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Grid dimensions were zero, overflowed, or were not powers of two.
    #[error("invalid grid dimensions {lx}x{ly}: both sides must be non-zero powers of two")]
    InvalidDimensions { lx: usize, ly: usize },

    /// Two grids had incompatible dimensions for a combined operation.
    #[error("grid dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// The displacement field folded a graticule cell onto itself: neither
    /// diagonal midpoint lies strictly inside the displaced quadrilateral.
    #[error("degenerate graticule cell ({i}, {j}): displaced quadrilateral is not a simple polygon")]
    DegenerateCell { i: usize, j: usize },

    /// A polygon vertex escaped the expected coordinate range `[0, lx] x [0, ly]`.
    #[error("point ({x}, {y}) outside grid bounds [0, {lx}] x [0, {ly}]")]
    PointOutsideGrid {
        x: f64,
        y: f64,
        lx: usize,
        ly: usize,
    },

    /// A point fell in neither candidate triangle of its graticule cell,
    /// which signals an inconsistency between the diagonal grid and the
    /// point's claimed cell.
    #[error("point ({x}, {y}) not inside either triangle of graticule cell ({i}, {j})")]
    PointNotInCell { x: f64, y: f64, i: usize, j: usize },

    /// A requested projection strategy name was not recognized.
    #[error("unknown projection strategy: {0}")]
    UnknownStrategy(String),

    /// An I/O failure while reading or writing map data.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_mentions_both_sides() {
        let err = ProjectError::InvalidDimensions { lx: 3, ly: 8 };
        let msg = format!("{err}");
        assert!(msg.contains('3') && msg.contains('8'), "got: {msg}");
        assert!(msg.contains("powers of two"), "got: {msg}");
    }

    #[test]
    fn dimension_mismatch_includes_all_dimensions() {
        let err = ProjectError::DimensionMismatch {
            lhs_w: 10,
            lhs_h: 20,
            rhs_w: 30,
            rhs_h: 40,
        };
        let msg = format!("{err}");
        for d in ["10", "20", "30", "40"] {
            assert!(msg.contains(d), "missing {d} in: {msg}");
        }
    }

    #[test]
    fn degenerate_cell_includes_cell_coordinates() {
        let err = ProjectError::DegenerateCell { i: 5, j: 7 };
        let msg = format!("{err}");
        assert!(msg.contains("(5, 7)"), "got: {msg}");
    }

    #[test]
    fn point_outside_grid_includes_point_and_bounds() {
        let err = ProjectError::PointOutsideGrid {
            x: -0.25,
            y: 9.5,
            lx: 8,
            ly: 8,
        };
        let msg = format!("{err}");
        assert!(msg.contains("-0.25") && msg.contains("9.5"), "got: {msg}");
        assert!(msg.contains("[0, 8]"), "got: {msg}");
    }

    #[test]
    fn point_not_in_cell_includes_point_and_cell() {
        let err = ProjectError::PointNotInCell {
            x: 1.5,
            y: 2.5,
            i: 1,
            j: 2,
        };
        let msg = format!("{err}");
        assert!(msg.contains("(1.5, 2.5)"), "got: {msg}");
        assert!(msg.contains("(1, 2)"), "got: {msg}");
    }

    #[test]
    fn unknown_strategy_includes_name() {
        let err = ProjectError::UnknownStrategy("conformal".into());
        assert!(format!("{err}").contains("conformal"));
    }

    #[test]
    fn project_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProjectError>();
    }

    #[test]
    fn project_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<ProjectError>();
    }
}
