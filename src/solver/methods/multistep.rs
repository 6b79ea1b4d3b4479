//! Two-step Adams methods
//!
//! # Mathematical Background
//!
//! With `Fₙ = F(uₙ)` and `Fₙ₋₁ = F(uₙ₋₁)` from the history ring:
//!
//! ```text
//! AB2:  uₙ₊₁ = uₙ + dt·(3/2·Fₙ - 1/2·Fₙ₋₁)
//! AM2:  uₙ₊₁ - 5/12·dt·F(uₙ₊₁) = uₙ + dt·(8/12·Fₙ - 1/12·Fₙ₋₁)
//! ```
//!
//! Neither formula can run before one prior state is committed; the
//! dispatcher decides between a self-starting fallback and
//! [`FdError::InsufficientHistory`](crate::error::FdError::InsufficientHistory).

use nalgebra::DVector;

use crate::error::FdResult;
use crate::grid::ops;
use crate::solver::linear::LinearSolver;
use crate::solver::methods::implicit::implicit_solve;
use crate::space::SpatialOperator;

/// Adams-Bashforth 2 update
pub fn adams_bashforth2(
    state: &DVector<f64>,
    rate: &DVector<f64>,
    previous_rate: &DVector<f64>,
    dt: f64,
) -> DVector<f64> {
    ops::linear_combination(state, &[(1.5 * dt, rate), (-0.5 * dt, previous_rate)])
}

/// Adams-Moulton 2 update
pub fn adams_moulton2<O>(
    operator: &O,
    solver: &dyn LinearSolver,
    state: &DVector<f64>,
    rate: &DVector<f64>,
    previous_rate: &DVector<f64>,
    dt: f64,
) -> FdResult<DVector<f64>>
where
    O: SpatialOperator + ?Sized,
{
    let rhs = ops::linear_combination(
        state,
        &[(8.0 / 12.0 * dt, rate), (-1.0 / 12.0 * dt, previous_rate)],
    );
    implicit_solve(operator, solver, state, 5.0 / 12.0 * dt, &rhs)
}
