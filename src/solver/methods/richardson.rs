//! Richardson extrapolation over explicit Euler
//!
//! # Mathematical Background
//!
//! Let `A(h)` be the state reached from `uₙ` after `dt/h` Euler sub-steps of
//! size `h`. Its error expands as `c₁·h + c₂·h² + …`, so combining runs at
//! `dt`, `dt/2` and `dt/4` cancels the leading terms:
//!
//! ```text
//! RE2:  uₙ₊₁ = 2·A(dt/2) - A(dt)                          (order 2)
//! RE3:  uₙ₊₁ = (8·A(dt/4) - 6·A(dt/2) + A(dt)) / 3        (order 3)
//! ```
//!
//! Every sub-step ends with the boundary applier. The first sub-step of each
//! run starts from `uₙ`, so `F(uₙ)` is evaluated once and shared.

use nalgebra::DVector;

use crate::grid::ops;
use crate::solver::methods::explicit::euler;
use crate::space::SpatialOperator;

/// `A(dt / substeps)`
fn euler_run<O>(
    operator: &O,
    state: &DVector<f64>,
    rate: &DVector<f64>,
    dt: f64,
    substeps: usize,
) -> DVector<f64>
where
    O: SpatialOperator + ?Sized,
{
    let h = dt / substeps as f64;

    let mut current = euler(state, rate, h);
    operator.apply_boundaries(&mut current);

    for _ in 1..substeps {
        let next_rate = operator.evaluate(&current);
        current = euler(&current, &next_rate, h);
        operator.apply_boundaries(&mut current);
    }
    current
}

/// Second-order extrapolation (`rate` is `F(state)`)
pub fn richardson2<O>(
    operator: &O,
    state: &DVector<f64>,
    rate: &DVector<f64>,
    dt: f64,
) -> DVector<f64>
where
    O: SpatialOperator + ?Sized,
{
    let full = euler_run(operator, state, rate, dt, 1);
    let half = euler_run(operator, state, rate, dt, 2);

    ops::weighted_sum(state.len(), &[(2.0, &half), (-1.0, &full)])
}

/// Third-order extrapolation (`rate` is `F(state)`)
pub fn richardson3<O>(
    operator: &O,
    state: &DVector<f64>,
    rate: &DVector<f64>,
    dt: f64,
) -> DVector<f64>
where
    O: SpatialOperator + ?Sized,
{
    let full = euler_run(operator, state, rate, dt, 1);
    let half = euler_run(operator, state, rate, dt, 2);
    let quarter = euler_run(operator, state, rate, dt, 4);

    ops::weighted_sum(
        state.len(),
        &[(8.0 / 3.0, &quarter), (-2.0, &half), (1.0 / 3.0, &full)],
    )
}
