//! Implicit methods
//!
//! # Mathematical Background
//!
//! ## θ-scheme
//!
//! ```text
//! uₙ₊₁ - θ·dt·F(uₙ₊₁) = uₙ + (1-θ)·dt·F(uₙ)
//! ```
//!
//! | θ   | Method          | Order | Stability             |
//! |-----|-----------------|-------|-----------------------|
//! | 1   | Implicit Euler  | 1     | L-stable              |
//! | 1/2 | Crank-Nicolson  | 2     | A-stable              |
//!
//! Adams-Moulton 2 shares the same left-hand side with `θ·dt = 5/12·dt`,
//! see [`implicit_solve`].
//!
//! ## Gauss-Legendre (2 stages, order 4)
//!
//! ```text
//! Yᵢ = uₙ + dt·Σⱼ aᵢⱼ·F(Yⱼ)          i = 1, 2
//! uₙ₊₁ = uₙ + dt·(F(Y₁) + F(Y₂))/2
//!
//!       │ 1/4          1/4 - √3/6
//!   A = │
//!       │ 1/4 + √3/6   1/4
//! ```
//!
//! Both stages are solved together as one coupled system of twice the
//! interior size.
//!
//! # Unknowns
//!
//! All systems are posed on interior values only: an iterate is scattered
//! into a full state (edges re-derived by the boundary applier), evaluated,
//! and gathered back. See [`AffineSystem`].

use nalgebra::DVector;

use crate::error::FdResult;
use crate::grid::ops;
use crate::solver::linear::{AffineSystem, LinearSolver};
use crate::space::SpatialOperator;

/// Off-diagonal term of the Gauss-Legendre matrix, `√3/6`
const GL_OFFSET: f64 = 0.288_675_134_594_812_9;

/// Gauss-Legendre coefficient matrix
pub const GAUSS_LEGENDRE_A: [[f64; 2]; 2] = [[0.25, 0.25 - GL_OFFSET], [0.25 + GL_OFFSET, 0.25]];

/// Gauss-Legendre weights
pub const GAUSS_LEGENDRE_B: [f64; 2] = [0.5, 0.5];

/// Solve `Y - c·F(Y) = rhs` for a full state `Y`
///
/// `template` supplies the layout and the starting guess; only its interior
/// values are used as the guess.
pub fn implicit_solve<O>(
    operator: &O,
    solver: &dyn LinearSolver,
    template: &DVector<f64>,
    coefficient: f64,
    rhs: &DVector<f64>,
) -> FdResult<DVector<f64>>
where
    O: SpatialOperator + ?Sized,
{
    let system = AffineSystem::new(operator.interior().len(), |interior: &DVector<f64>| {
        let full = operator.scatter(template, interior.as_slice());
        let rate = operator.gather(&operator.evaluate(&full));
        interior - rate * coefficient
    });

    let solution = system.solve(solver, &operator.gather(rhs), &operator.gather(template))?;
    Ok(operator.scatter(template, solution.as_slice()))
}

/// One θ-scheme step (`rate` is `F(state)`)
pub fn theta_step<O>(
    operator: &O,
    solver: &dyn LinearSolver,
    state: &DVector<f64>,
    rate: &DVector<f64>,
    dt: f64,
    theta: f64,
) -> FdResult<DVector<f64>>
where
    O: SpatialOperator + ?Sized,
{
    let rhs = ops::linear_combination(state, &[((1.0 - theta) * dt, rate)]);
    implicit_solve(operator, solver, state, theta * dt, &rhs)
}

/// One two-stage Gauss-Legendre step
pub fn gauss_legendre<O>(
    operator: &O,
    solver: &dyn LinearSolver,
    state: &DVector<f64>,
    dt: f64,
) -> FdResult<DVector<f64>>
where
    O: SpatialOperator + ?Sized,
{
    let m = operator.interior().len();
    let a = GAUSS_LEGENDRE_A;

    // unknowns: [y₁; y₂], each m interior values
    let stage_rates = |stacked: &DVector<f64>| -> (DVector<f64>, DVector<f64>) {
        let first = operator.scatter(state, &stacked.as_slice()[..m]);
        let second = operator.scatter(state, &stacked.as_slice()[m..]);
        (
            operator.gather(&operator.evaluate(&first)),
            operator.gather(&operator.evaluate(&second)),
        )
    };

    let system = AffineSystem::new(2 * m, |stacked: &DVector<f64>| {
        let (k1, k2) = stage_rates(stacked);
        let mut out = stacked.clone();
        for index in 0..m {
            out[index] -= dt * (a[0][0] * k1[index] + a[0][1] * k2[index]);
            out[m + index] -= dt * (a[1][0] * k1[index] + a[1][1] * k2[index]);
        }
        out
    });

    let interior = operator.gather(state);
    let mut stacked_state = DVector::zeros(2 * m);
    stacked_state.rows_mut(0, m).copy_from(&interior);
    stacked_state.rows_mut(m, m).copy_from(&interior);

    let stages = system.solve(solver, &stacked_state, &stacked_state)?;

    let first = operator.scatter(state, &stages.as_slice()[..m]);
    let second = operator.scatter(state, &stages.as_slice()[m..]);
    let k1 = operator.evaluate(&first);
    let k2 = operator.evaluate(&second);

    Ok(ops::linear_combination(
        state,
        &[
            (dt * GAUSS_LEGENDRE_B[0], &k1),
            (dt * GAUSS_LEGENDRE_B[1], &k2),
        ],
    ))
}
