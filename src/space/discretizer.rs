//! Space discretizer
//!
//! # Mathematical Background
//!
//! The spatial operator of the advection-diffusion equation is
//!
//! ```text
//! F(u) = -v·∂u/∂x + D·∂²u/∂x²                      (1D)
//! F(u) = -vx·∂u/∂x - vy·∂u/∂y + D·(∂²u/∂x² + ∂²u/∂y²)   (2D)
//! ```
//!
//! On a possibly non-uniform grid, with `h₋ = xᵢ - xᵢ₋₁` and `h₊ = xᵢ₊₁ - xᵢ`,
//! the three-point derivative weights on `(uᵢ₋₁, uᵢ, uᵢ₊₁)` are:
//!
//! ```text
//! ∂u/∂x   (centered) : ( -h₊/(h₋(h₋+h₊)), (h₊-h₋)/(h₋h₊), h₋/(h₊(h₋+h₊)) )
//! ∂u/∂x   (backward) : ( -1/h₋, 1/h₋, 0 )
//! ∂u/∂x   (forward)  : ( 0, -1/h₊, 1/h₊ )
//! ∂²u/∂x²            : ( 2/(h₋(h₋+h₊)), -2/(h₋h₊), 2/(h₊(h₋+h₊)) )
//! ```
//!
//! # Stencils
//!
//! | Style       | First derivative                         | Second derivative |
//! |-------------|------------------------------------------|-------------------|
//! | Centered    | centered                                 | D                 |
//! | Upwind      | backward if v ≥ 0, forward otherwise     | D                 |
//! | LaxWendroff | centered                                 | D + dt·v²/2       |
//!
//! Since the coefficients are fixed for a problem, the weights are computed
//! once and every evaluation is a sparse three-point (1D) or five-point (2D)
//! product over the interior points. Edge points are left at zero; they
//! belong to the boundary applier.

use nalgebra::DVector;

use crate::config::{FiniteDifferenceInput1D, FiniteDifferenceInput2D, SpaceDiscretizerType};
use crate::error::{FdError, FdResult};
use crate::grid::{GridShape, ops};

// =================================================================================================
// Three-point weights
// =================================================================================================

/// Weights applied to `(uᵢ₋₁, uᵢ, uᵢ₊₁)` along one axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stencil3 {
    pub minus: f64,
    pub center: f64,
    pub plus: f64,
}

impl Stencil3 {
    pub fn new(minus: f64, center: f64, plus: f64) -> Self {
        Self { minus, center, plus }
    }

    fn scaled(self, factor: f64) -> Self {
        Self::new(self.minus * factor, self.center * factor, self.plus * factor)
    }

    fn add(self, other: Self) -> Self {
        Self::new(
            self.minus + other.minus,
            self.center + other.center,
            self.plus + other.plus,
        )
    }

    /// Sum of weights (zero for any consistent derivative stencil)
    pub fn sum(&self) -> f64 {
        self.minus + self.center + self.plus
    }
}

fn centered_first(h_minus: f64, h_plus: f64) -> Stencil3 {
    Stencil3::new(
        -h_plus / (h_minus * (h_minus + h_plus)),
        (h_plus - h_minus) / (h_minus * h_plus),
        h_minus / (h_plus * (h_minus + h_plus)),
    )
}

fn upwind_first(h_minus: f64, h_plus: f64, velocity: f64) -> Stencil3 {
    if velocity >= 0.0 {
        Stencil3::new(-1.0 / h_minus, 1.0 / h_minus, 0.0)
    } else {
        Stencil3::new(0.0, -1.0 / h_plus, 1.0 / h_plus)
    }
}

fn second(h_minus: f64, h_plus: f64) -> Stencil3 {
    Stencil3::new(
        2.0 / (h_minus * (h_minus + h_plus)),
        -2.0 / (h_minus * h_plus),
        2.0 / (h_plus * (h_minus + h_plus)),
    )
}

/// Weights of `-v·∂u/∂x + D·∂²u/∂x²` at interior point `i` of `grid`
///
/// # Errors
///
/// [`FdError::InvalidDiscretization`] for [`SpaceDiscretizerType::Null`].
pub fn axis_weights(
    kind: SpaceDiscretizerType,
    grid: &[f64],
    i: usize,
    velocity: f64,
    diffusion: f64,
    dt: f64,
) -> FdResult<Stencil3> {
    let h_minus = grid[i] - grid[i - 1];
    let h_plus = grid[i + 1] - grid[i];

    let (first, effective_diffusion) = match kind {
        SpaceDiscretizerType::Null => {
            return Err(FdError::InvalidDiscretization(
                "Null space discretizer cannot be evaluated".to_string(),
            ));
        }
        SpaceDiscretizerType::Centered => (centered_first(h_minus, h_plus), diffusion),
        SpaceDiscretizerType::Upwind => (upwind_first(h_minus, h_plus, velocity), diffusion),
        SpaceDiscretizerType::LaxWendroff => (
            centered_first(h_minus, h_plus),
            diffusion + 0.5 * dt * velocity * velocity,
        ),
    };

    Ok(first
        .scaled(-velocity)
        .add(second(h_minus, h_plus).scaled(effective_diffusion)))
}

// =================================================================================================
// Space Discretizer
// =================================================================================================

/// Precomputed spatial operator of one problem
///
/// Evaluates `F(u)` at interior points of a flat state (see [`GridShape`]).
///
/// # Example
///
/// ```rust
/// use advdiff_rs::config::{
///     BoundaryCondition1D, FiniteDifferenceInput1D, SolverType, SpaceDiscretizerType,
/// };
/// use advdiff_rs::space::SpaceDiscretizer;
/// use nalgebra::DVector;
///
/// let input = FiniteDifferenceInput1D::new(
///     0.1,
///     DVector::from_vec(vec![0.0, 1.0, 2.0]),
///     DVector::zeros(3),
///     DVector::from_element(3, 1.0),
///     SolverType::ExplicitEuler,
///     SpaceDiscretizerType::Centered,
///     BoundaryCondition1D::default(),
/// ).unwrap();
///
/// let discretizer = SpaceDiscretizer::from_input_1d(&input).unwrap();
/// let rate = discretizer.evaluate(&DVector::from_vec(vec![0.0, 1.0, 0.0]));
/// assert_eq!(rate.as_slice(), &[0.0, -2.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct SpaceDiscretizer {
    kind: SpaceDiscretizerType,
    shape: GridShape,
    interior: Vec<usize>,
    /// x-direction weights per flat index (zero on edges)
    x_weights: Vec<Stencil3>,
    /// y-direction weights per flat index, 2D only
    y_weights: Option<Vec<Stencil3>>,
}

impl SpaceDiscretizer {
    /// Build the operator of a 1D problem
    pub fn from_input_1d(input: &FiniteDifferenceInput1D) -> FdResult<Self> {
        let kind = input.space_discretizer_type();
        let grid = input.grid().as_slice();
        let shape = GridShape::Line(grid.len());
        let interior = shape.interior_indices();

        let mut x_weights = vec![Stencil3::default(); shape.len()];
        for &i in &interior {
            x_weights[i] = axis_weights(
                kind,
                grid,
                i,
                input.velocity()[i],
                input.diffusion()[i],
                input.dt(),
            )?;
        }

        Ok(Self {
            kind,
            shape,
            interior,
            x_weights,
            y_weights: None,
        })
    }

    /// Build the operator of a 2D problem
    pub fn from_input_2d(input: &FiniteDifferenceInput2D) -> FdResult<Self> {
        let kind = input.space_discretizer_type();
        let (nx, ny) = input.shape();
        let shape = GridShape::Rect(nx, ny);
        let interior = shape.interior_indices();
        let x_grid = input.x_grid().as_slice();
        let y_grid = input.y_grid().as_slice();

        let mut x_weights = vec![Stencil3::default(); shape.len()];
        let mut y_weights = vec![Stencil3::default(); shape.len()];

        for &index in &interior {
            let (i, j) = shape.coordinates(index);
            let diffusion = input.diffusion()[(i, j)];

            x_weights[index] = axis_weights(
                kind,
                x_grid,
                i,
                input.x_velocity()[(i, j)],
                diffusion,
                input.dt(),
            )?;
            y_weights[index] = axis_weights(
                kind,
                y_grid,
                j,
                input.y_velocity()[(i, j)],
                diffusion,
                input.dt(),
            )?;
        }

        Ok(Self {
            kind,
            shape,
            interior,
            x_weights,
            y_weights: Some(y_weights),
        })
    }

    pub fn kind(&self) -> SpaceDiscretizerType {
        self.kind
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Flat indices of the interior points
    pub fn interior(&self) -> &[usize] {
        &self.interior
    }

    /// x-direction weights at a flat index
    pub fn x_weights(&self, index: usize) -> Stencil3 {
        self.x_weights[index]
    }

    /// `F(u)` at interior points, zero on edges
    ///
    /// # Panics
    ///
    /// Panics when `state` does not have the grid's length.
    pub fn evaluate(&self, state: &DVector<f64>) -> DVector<f64> {
        assert_eq!(state.len(), self.shape.len(), "State length must match grid");

        let y_stride = match self.shape {
            GridShape::Line(_) => 0,
            GridShape::Rect(nx, _) => nx,
        };

        ops::map_points(self.shape.len(), &self.interior, |k| {
            let wx = self.x_weights[k];
            let mut rate = wx.minus * state[k - 1] + wx.center * state[k] + wx.plus * state[k + 1];

            if let Some(y_weights) = &self.y_weights {
                let wy = y_weights[k];
                rate += wy.minus * state[k - y_stride]
                    + wy.center * state[k]
                    + wy.plus * state[k + y_stride];
            }
            rate
        })
    }
}

// =================================================================================================
// Tests
// =================================================================================================
