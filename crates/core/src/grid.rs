//! Dense two-dimensional grid storage.
//!
//! A [`Grid`] stores `width * height` values of any `Clone` type in a flat
//! row-major `Vec` (row = constant `j`), addressed by integer coordinates
//! `(i, j)` with `0 <= i < width`, `0 <= j < height`. There is no per-cell
//! heap allocation and no pointer graph between cells; all addressing is
//! index-based.
//!
//! [`GridDims`] describes the vertex grid overlaid on a map. Its sides must
//! be non-zero powers of two, which the frequency-domain blur relies on.
//! Auxiliary grids (e.g. the per-cell diagonal grid, sized one less on each
//! side) use [`Grid`] directly with their own dimensions.

use crate::error::ProjectError;

/// Vertex-grid dimensions of a map, `lx` columns by `ly` rows.
///
/// Both sides are validated as non-zero integer powers of two at
/// construction. Vertex `(i, j)` of a grid with these dimensions sits at
/// continuous map coordinate `(i + 0.5, j + 0.5)` before displacement, so
/// the map itself spans `[0, lx] x [0, ly]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    lx: usize,
    ly: usize,
}

impl GridDims {
    /// Creates validated grid dimensions.
    ///
    /// Returns `ProjectError::InvalidDimensions` unless both `lx` and `ly`
    /// are non-zero powers of two whose product fits in `usize`.
    pub fn new(lx: usize, ly: usize) -> Result<Self, ProjectError> {
        if !lx.is_power_of_two() || !ly.is_power_of_two() || lx.checked_mul(ly).is_none() {
            return Err(ProjectError::InvalidDimensions { lx, ly });
        }
        Ok(Self { lx, ly })
    }

    /// Number of vertex columns.
    pub fn lx(self) -> usize {
        self.lx
    }

    /// Number of vertex rows.
    pub fn ly(self) -> usize {
        self.ly
    }

    /// Whether `(x, y)` lies within the map bounds `[0, lx] x [0, ly]`.
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= 0.0 && x <= self.lx as f64 && y >= 0.0 && y <= self.ly as f64
    }
}

/// A dense 2D grid of values addressed by `(i, j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid filled with clones of `value`.
    ///
    /// Returns `ProjectError::InvalidDimensions` if either dimension is zero
    /// or `width * height` overflows `usize`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, ProjectError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    /// Creates a grid from a pre-built data vector, validating that
    /// `data.len() == width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<T>) -> Result<Self, ProjectError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(ProjectError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a grid filled with `T::default()`.
    pub fn new(width: usize, height: usize) -> Result<Self, ProjectError> {
        Self::filled(width, height, T::default())
    }
}

impl<T> Grid<T> {
    /// Grid width (number of `i` values).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (number of `j` values).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Flat row-major index of `(i, j)`. Panics if out of range.
    fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.width && j < self.height,
            "grid index ({i}, {j}) out of range for {}x{} grid",
            self.width,
            self.height
        );
        j * self.width + i
    }

    /// Reference to the value at `(i, j)`. Panics if out of range.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[self.index(i, j)]
    }

    /// Mutable reference to the value at `(i, j)`. Panics if out of range.
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut T {
        let idx = self.index(i, j);
        &mut self.data[idx]
    }

    /// Overwrites the value at `(i, j)`. Panics if out of range.
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let idx = self.index(i, j);
        self.data[idx] = value;
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable access to the underlying row-major data.
    ///
    /// Hot loops that manage their own invariants can use this to avoid
    /// per-access bounds arithmetic.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over all cells yielding `(i, j, &value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.data.iter().enumerate().map(|(idx, v)| {
            let i = idx % self.width;
            let j = idx / self.width;
            (i, j, v)
        })
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, ProjectError> {
    if width == 0 || height == 0 {
        return Err(ProjectError::InvalidDimensions {
            lx: width,
            ly: height,
        });
    }
    width
        .checked_mul(height)
        .ok_or(ProjectError::InvalidDimensions {
            lx: width,
            ly: height,
        })
}
