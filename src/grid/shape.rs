//! Grid storage layout
//!
//! Grid states are stored flat in a `DVector<f64>`:
//!
//! - **Line(n)**: 1D state, index `i`
//! - **Rect(nx, ny)**: 2D state, column-major like `nalgebra::DMatrix`, so
//!   point `(i, j)` lives at `i + j·nx`
//!
//! Keeping one flat storage for both dimensionalities is what lets the time
//! steppers stay agnostic to 1D vs 2D: they only ever see vectors.

use nalgebra::{DMatrix, DVector};
use num::integer::div_rem;
use std::fmt;

/// Layout of a flat grid state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridShape {
    /// 1D grid of `n` points
    Line(usize),

    /// 2D grid of `nx × ny` points, column-major
    Rect(usize, usize),
}

impl GridShape {
    /// Spatial dimension (1 or 2)
    pub fn ndim(&self) -> usize {
        match self {
            GridShape::Line(_) => 1,
            GridShape::Rect(..) => 2,
        }
    }

    /// Shape as a vector
    pub fn shape(&self) -> Vec<usize> {
        match self {
            GridShape::Line(n) => vec![*n],
            GridShape::Rect(nx, ny) => vec![*nx, *ny],
        }
    }

    /// Total number of points
    pub fn len(&self) -> usize {
        match self {
            GridShape::Line(n) => *n,
            GridShape::Rect(nx, ny) => nx * ny,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of `(i, j)` (`j` is ignored for lines)
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        match self {
            GridShape::Line(_) => i,
            GridShape::Rect(nx, _) => i + j * nx,
        }
    }

    /// `(i, j)` of a flat index
    #[inline]
    pub fn coordinates(&self, index: usize) -> (usize, usize) {
        match self {
            GridShape::Line(_) => (index, 0),
            GridShape::Rect(nx, _) => {
                let (j, i) = div_rem(index, *nx);
                (i, j)
            }
        }
    }

    /// Whether the flat index is strictly inside the domain
    pub fn is_interior(&self, index: usize) -> bool {
        match self {
            GridShape::Line(n) => index > 0 && index + 1 < *n,
            GridShape::Rect(nx, ny) => {
                let (i, j) = self.coordinates(index);
                i > 0 && i + 1 < *nx && j > 0 && j + 1 < *ny
            }
        }
    }

    /// Flat indices of every interior point, in storage order
    pub fn interior_indices(&self) -> Vec<usize> {
        (0..self.len()).filter(|&index| self.is_interior(index)).collect()
    }

    /// Flatten a 2D field (column-major copy)
    pub fn flatten(matrix: &DMatrix<f64>) -> DVector<f64> {
        DVector::from_column_slice(matrix.as_slice())
    }

    /// Restore a 2D field from flat storage
    ///
    /// Returns `None` for line shapes or a length mismatch.
    pub fn unflatten(&self, values: &DVector<f64>) -> Option<DMatrix<f64>> {
        match self {
            GridShape::Rect(nx, ny) if values.len() == nx * ny => {
                Some(DMatrix::from_column_slice(*nx, *ny, values.as_slice()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridShape::Line(n) => write!(f, "Line [{}]", n),
            GridShape::Rect(nx, ny) => write!(f, "Rect [{} * {}]", nx, ny),
        }
    }
}
