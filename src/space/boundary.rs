//! Boundary applier
//!
//! Overwrites the edge values of a flat state so they satisfy the configured
//! conditions. Interior values are never touched.
//!
//! # Rules (one axis of `N` points, spacings `h_left = x₁ - x₀`, `h_right = x_{N-1} - x_{N-2}`)
//!
//! | Condition | Left edge                 | Right edge                          |
//! |-----------|---------------------------|-------------------------------------|
//! | Dirichlet | `u₀ = value`              | `u_{N-1} = value`                   |
//! | Neumann   | `u₀ = u₁ - value·h_left`  | `u_{N-1} = u_{N-2} + value·h_right` |
//! | Periodic  | `u₀ = u_{N-2}`            | `u_{N-1} = u₁`                      |
//!
//! Periodic edges are ghost points: `x₀` mirrors `x_{N-2}` and `x_{N-1}`
//! mirrors `x₁`, so the left edge takes the last interior value and the right
//! edge takes the first. The two edges generally hold different values. The
//! wrap is only consistent when `x₁ - x₀ == x_{N-1} - x_{N-2}`, which input
//! validation enforces.
//!
//! # 2D corner rule
//!
//! The x-axis edges (left/right) are applied first along every column of the
//! field, corners included. The y-axis edges (down/up) are applied afterwards
//! along every row, so the y-axis conditions own the four corners.

use nalgebra::DVector;

use crate::config::{BoundaryCondition, BoundaryCondition1D, BoundaryCondition2D, BoundaryConditionType};
use crate::grid::GridShape;

/// One axis of edges: conditions plus the edge spacings
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisEdges {
    conditions: BoundaryCondition1D,
    h_left: f64,
    h_right: f64,
}

impl AxisEdges {
    fn new(conditions: BoundaryCondition1D, grid: &[f64]) -> Self {
        let n = grid.len();
        Self {
            conditions,
            h_left: grid[1] - grid[0],
            h_right: grid[n - 1] - grid[n - 2],
        }
    }

    /// Apply along a line of `n` points starting at `offset` with `stride`
    fn apply(&self, state: &mut DVector<f64>, offset: usize, stride: usize, n: usize) {
        let first = offset;
        let second = offset + stride;
        let before_last = offset + (n - 2) * stride;
        let last = offset + (n - 1) * stride;

        // read before writing: periodic copies from the opposite interior point
        let left = edge_value(&self.conditions.left, state[second], state[before_last], -self.h_left);
        let right = edge_value(&self.conditions.right, state[before_last], state[second], self.h_right);

        if let Some(value) = left {
            state[first] = value;
        }
        if let Some(value) = right {
            state[last] = value;
        }
    }
}

/// New edge value, `None` leaves the edge untouched (Null)
fn edge_value(
    condition: &BoundaryCondition,
    neighbour: f64,
    opposite: f64,
    signed_spacing: f64,
) -> Option<f64> {
    match condition.kind {
        BoundaryConditionType::Dirichlet => Some(condition.value),
        BoundaryConditionType::Neumann => Some(neighbour + condition.value * signed_spacing),
        BoundaryConditionType::Periodic => Some(opposite),
        BoundaryConditionType::Null => None,
    }
}

/// Edge writer for a 1D or 2D problem
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryApplier {
    shape: GridShape,
    x: AxisEdges,
    y: Option<AxisEdges>,
}

impl BoundaryApplier {
    pub fn new_1d(conditions: BoundaryCondition1D, grid: &[f64]) -> Self {
        Self {
            shape: GridShape::Line(grid.len()),
            x: AxisEdges::new(conditions, grid),
            y: None,
        }
    }

    pub fn new_2d(conditions: BoundaryCondition2D, x_grid: &[f64], y_grid: &[f64]) -> Self {
        Self {
            shape: GridShape::Rect(x_grid.len(), y_grid.len()),
            x: AxisEdges::new(conditions.x, x_grid),
            y: Some(AxisEdges::new(conditions.y, y_grid)),
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Overwrite the edges of `state` in place
    ///
    /// # Panics
    ///
    /// Panics when `state` does not have the grid's length.
    pub fn apply(&self, state: &mut DVector<f64>) {
        assert_eq!(state.len(), self.shape.len(), "State length must match grid");

        match self.shape {
            GridShape::Line(n) => self.x.apply(state, 0, 1, n),
            GridShape::Rect(nx, ny) => {
                // x edges on every column j (rows i = 0 and nx-1)
                for j in 0..ny {
                    self.x.apply(state, j * nx, 1, nx);
                }
                // then y edges on every row i, corners end up here
                if let Some(y) = &self.y {
                    for i in 0..nx {
                        y.apply(state, i, nx, ny);
                    }
                }
            }
        }
    }

    /// Copy of `state` with the edges applied
    pub fn applied(&self, state: &DVector<f64>) -> DVector<f64> {
        let mut out = state.clone();
        self.apply(&mut out);
        out
    }
}
