//! Spatial operator seen by the time steppers
//!
//! # Design
//!
//! Time steppers only need three things from a problem: evaluate `F(u)`,
//! enforce the edge conditions, and know which points are unknowns. The
//! [`SpatialOperator`] trait captures exactly that, so every method in
//! [`solver::methods`](crate::solver) is written once for both dimensions.
//!
//! ```text
//!  FiniteDifferenceInput1D ──► Operator1D ─┐
//!                                          ├──► SpatialOperator ──► TimeStepper
//!  FiniteDifferenceInput2D ──► Operator2D ─┘
//! ```
//!
//! # Interior unknowns
//!
//! Implicit methods solve for interior values only. [`SpatialOperator::gather`]
//! extracts them; [`SpatialOperator::scatter`] writes them back into a full
//! state and re-derives the edges, so Neumann and periodic couplings between
//! edges and interior are part of the implicit system.

use nalgebra::{DMatrix, DVector};

use crate::config::{FiniteDifferenceInput1D, FiniteDifferenceInput2D, SolverType};
use crate::error::{ConfigurationError, FdResult};
use crate::grid::GridShape;
use crate::space::{BoundaryApplier, SpaceDiscretizer};

/// Spatial operator `F` plus edge conditions of one problem
pub trait SpatialOperator: Send + Sync {
    /// Storage layout of states
    fn shape(&self) -> GridShape;

    /// Flat indices of the interior points
    fn interior(&self) -> &[usize];

    /// Configured time step
    fn dt(&self) -> f64;

    /// Configured time-integration method
    fn solver_type(&self) -> SolverType;

    /// `F(u)` at interior points, zero on edges
    fn evaluate(&self, state: &DVector<f64>) -> DVector<f64>;

    /// Overwrite the edges of `state`
    fn apply_boundaries(&self, state: &mut DVector<f64>);

    /// Number of points in a state
    fn len(&self) -> usize {
        self.shape().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interior values of a full state
    fn gather(&self, state: &DVector<f64>) -> DVector<f64> {
        let interior = self.interior();
        DVector::from_iterator(interior.len(), interior.iter().map(|&index| state[index]))
    }

    /// Full state from interior values, edges derived from the conditions
    ///
    /// Dirichlet edges do not depend on `template`; Neumann and periodic edges
    /// are rebuilt from the scattered interior.
    fn scatter(&self, template: &DVector<f64>, interior_values: &[f64]) -> DVector<f64> {
        let mut state = template.clone();
        for (&index, &value) in self.interior().iter().zip(interior_values) {
            state[index] = value;
        }
        self.apply_boundaries(&mut state);
        state
    }

    /// Check that a caller state fits the grid
    fn check_state(&self, state: &DVector<f64>) -> Result<(), ConfigurationError> {
        if state.len() != self.len() {
            return Err(ConfigurationError::StateShapeMismatch {
                expected: self.len(),
                actual: state.len(),
            });
        }
        Ok(())
    }
}

// =================================================================================================
// 1D
// =================================================================================================

/// Operator of a [`FiniteDifferenceInput1D`]
#[derive(Debug, Clone)]
pub struct Operator1D {
    input: FiniteDifferenceInput1D,
    discretizer: SpaceDiscretizer,
    boundaries: BoundaryApplier,
}

impl Operator1D {
    pub fn new(input: FiniteDifferenceInput1D) -> FdResult<Self> {
        let discretizer = SpaceDiscretizer::from_input_1d(&input)?;
        let boundaries =
            BoundaryApplier::new_1d(*input.boundary_conditions(), input.grid().as_slice());

        Ok(Self {
            input,
            discretizer,
            boundaries,
        })
    }

    pub fn input(&self) -> &FiniteDifferenceInput1D {
        &self.input
    }

    pub fn discretizer(&self) -> &SpaceDiscretizer {
        &self.discretizer
    }
}

impl SpatialOperator for Operator1D {
    fn shape(&self) -> GridShape {
        self.discretizer.shape()
    }

    fn interior(&self) -> &[usize] {
        self.discretizer.interior()
    }

    fn dt(&self) -> f64 {
        self.input.dt()
    }

    fn solver_type(&self) -> SolverType {
        self.input.solver_type()
    }

    fn evaluate(&self, state: &DVector<f64>) -> DVector<f64> {
        self.discretizer.evaluate(state)
    }

    fn apply_boundaries(&self, state: &mut DVector<f64>) {
        self.boundaries.apply(state);
    }
}

// =================================================================================================
// 2D
// =================================================================================================

/// Operator of a [`FiniteDifferenceInput2D`]
///
/// States are flat column-major copies of `nx × ny` fields; see
/// [`Operator2D::flatten`] and [`Operator2D::unflatten`].
#[derive(Debug, Clone)]
pub struct Operator2D {
    input: FiniteDifferenceInput2D,
    discretizer: SpaceDiscretizer,
    boundaries: BoundaryApplier,
}

impl Operator2D {
    pub fn new(input: FiniteDifferenceInput2D) -> FdResult<Self> {
        let discretizer = SpaceDiscretizer::from_input_2d(&input)?;
        let boundaries = BoundaryApplier::new_2d(
            *input.boundary_conditions(),
            input.x_grid().as_slice(),
            input.y_grid().as_slice(),
        );

        Ok(Self {
            input,
            discretizer,
            boundaries,
        })
    }

    pub fn input(&self) -> &FiniteDifferenceInput2D {
        &self.input
    }

    pub fn discretizer(&self) -> &SpaceDiscretizer {
        &self.discretizer
    }

    /// Flat state of an `nx × ny` field
    pub fn flatten(&self, field: &DMatrix<f64>) -> Result<DVector<f64>, ConfigurationError> {
        let (nx, ny) = self.input.shape();
        if field.shape() != (nx, ny) {
            return Err(ConfigurationError::StateShapeMismatch {
                expected: nx * ny,
                actual: field.len(),
            });
        }
        Ok(GridShape::flatten(field))
    }

    /// `nx × ny` field of a flat state
    pub fn unflatten(&self, state: &DVector<f64>) -> Result<DMatrix<f64>, ConfigurationError> {
        self.shape()
            .unflatten(state)
            .ok_or(ConfigurationError::StateShapeMismatch {
                expected: self.len(),
                actual: state.len(),
            })
    }
}

impl SpatialOperator for Operator2D {
    fn shape(&self) -> GridShape {
        self.discretizer.shape()
    }

    fn interior(&self) -> &[usize] {
        self.discretizer.interior()
    }

    fn dt(&self) -> f64 {
        self.input.dt()
    }

    fn solver_type(&self) -> SolverType {
        self.input.solver_type()
    }

    fn evaluate(&self, state: &DVector<f64>) -> DVector<f64> {
        self.discretizer.evaluate(state)
    }

    fn apply_boundaries(&self, state: &mut DVector<f64>) {
        self.boundaries.apply(state);
    }
}
