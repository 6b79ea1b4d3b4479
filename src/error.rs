//! Error types
//!
//! Every fallible operation of the crate returns [`FdResult`]. Errors are split
//! in two families:
//!
//! - [`ConfigurationError`]: data-model invariants violated while building a
//!   [`FiniteDifferenceInput1D`](crate::config::FiniteDifferenceInput1D) or its 2D
//!   counterpart. Always raised at construction time, never at step time.
//! - [`FdError`]: everything that can go wrong while dispatching a step.
//!
//! No error is swallowed: a failed step leaves the caller's state and the
//! stepper history exactly as they were before the call.

use thiserror::Error;

/// Result alias used throughout the crate
pub type FdResult<T> = Result<T, FdError>;

// =================================================================================================
// Configuration errors
// =================================================================================================

/// Reason why a problem configuration was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Fewer than three points along an axis (one interior + two edges)
    #[error("grid '{axis}' has {len} points, at least 3 are required")]
    GridTooShort { axis: &'static str, len: usize },

    /// A coefficient field is not aligned with the grid
    #[error("field '{field}' has length {actual}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// dt is zero, negative or NaN
    #[error("time step must be strictly positive, got {0}")]
    NonPositiveTimeStep(f64),

    /// A grid coordinate or coefficient is NaN or infinite
    #[error("field '{field}' holds a non-finite value at index {index}")]
    NonFiniteValue { field: &'static str, index: usize },

    /// Grid coordinates are not strictly increasing
    #[error("grid '{axis}' is not strictly increasing at index {index}")]
    GridNotIncreasing { axis: &'static str, index: usize },

    /// Periodic on one side of an axis only
    #[error("periodic boundary on axis '{axis}' must be set on both sides")]
    AsymmetricPeriodic { axis: &'static str },

    /// Periodic axis whose first and last spacings differ
    #[error("periodic axis '{axis}' wraps with spacing {left} on the left and {right} on the right")]
    PeriodicSpacingMismatch { axis: &'static str, left: f64, right: f64 },

    /// Null solver type in a configuration
    #[error("solver type is Null")]
    NullSolver,

    /// Null space discretizer type in a configuration
    #[error("space discretizer type is Null")]
    NullDiscretizer,

    /// Null boundary type on one edge
    #[error("boundary condition '{side}' is Null")]
    NullBoundary { side: &'static str },

    /// State handed to a stepper does not match the configured grid
    #[error("state has {actual} values, grid expects {expected}")]
    StateShapeMismatch { expected: usize, actual: usize },
}

// =================================================================================================
// Stepping errors
// =================================================================================================

/// Errors raised by the solver dispatcher
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FdError {
    /// Construction-time invariant violation
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),

    /// Null or sentinel solver type reached the dispatcher
    #[error("unsupported solver type: {0}")]
    UnsupportedSolver(String),

    /// Null space discretizer reached the stencil evaluation
    #[error("invalid space discretization: {0}")]
    InvalidDiscretization(String),

    /// Multistep method without enough retained states under a strict startup policy
    #[error("insufficient history: {required} states required, {available} available")]
    InsufficientHistory { required: usize, available: usize },

    /// The linear-solve collaborator failed
    #[error("implicit solve did not converge after {iterations} iterations (residual {residual:e})")]
    SolveDidNotConverge { iterations: usize, residual: f64 },

    /// NaN or infinity produced by a step
    #[error("non-finite value at index {index} after step {step}, try reducing dt")]
    NumericalInstability { step: usize, index: usize },
}
