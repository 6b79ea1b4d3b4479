//! Explicit Runge-Kutta family
//!
//! # Mathematical Background
//!
//! For the semi-discrete system `du/dt = F(u)`, an explicit `s`-stage
//! Runge-Kutta method computes
//!
//! ```text
//! k₁ = F(uₙ)
//! kᵢ = F(uₙ + dt·Σⱼ<ᵢ aᵢⱼ·kⱼ)        i = 2..s
//!
//! uₙ₊₁ = uₙ + dt·Σᵢ bᵢ·kᵢ
//! ```
//!
//! The coefficients form the strictly lower triangular Butcher tableau. Since
//! `F` does not depend on time, the `c` column is not needed.
//!
//! # Methods
//!
//! | Method            | Order | Stages | Tableau |
//! |-------------------|-------|--------|---------|
//! | Explicit Euler    | 1     | 1      | b = (1) |
//! | Ralston           | 2     | 2      | a₂₁ = 2/3, b = (1/4, 3/4) |
//! | Kutta RK3         | 3     | 3      | a = (1/2), (-1, 2), b = (1/6, 2/3, 1/6) |
//! | Classical RK4     | 4     | 4      | a = (1/2), (0, 1/2), (0, 0, 1), b = (1/6, 1/3, 1/3, 1/6) |
//! | 3/8 rule          | 4     | 4      | a = (1/3), (-1/3, 1), (1, -1, 1), b = (1/8, 3/8, 3/8, 1/8) |
//!
//! # Stage states
//!
//! Every intermediate state `uₙ + dt·Σ aᵢⱼ·kⱼ` goes through the boundary
//! applier before it is evaluated, so derivative and periodic edges follow the
//! stage interior. Stages are evaluated one after the other: stage `i` only
//! reads stages `j < i`, and each evaluation is itself a parallel map over
//! interior points.

use nalgebra::DVector;

use crate::grid::ops;
use crate::space::SpatialOperator;

/// Explicit Butcher tableau (rows of `a` below the diagonal, weights `b`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButcherTableau {
    /// `a[i - 1]` holds the coefficients of stage `i + 1` (0-based rows)
    pub a: &'static [&'static [f64]],
    pub b: &'static [f64],
}

impl ButcherTableau {
    pub fn stages(&self) -> usize {
        self.b.len()
    }
}

pub const EULER: ButcherTableau = ButcherTableau {
    a: &[],
    b: &[1.0],
};

pub const RALSTON: ButcherTableau = ButcherTableau {
    a: &[&[2.0 / 3.0]],
    b: &[0.25, 0.75],
};

pub const RK3: ButcherTableau = ButcherTableau {
    a: &[&[0.5], &[-1.0, 2.0]],
    b: &[1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0],
};

pub const RK4: ButcherTableau = ButcherTableau {
    a: &[&[0.5], &[0.0, 0.5], &[0.0, 0.0, 1.0]],
    b: &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
};

pub const THREE_EIGHT: ButcherTableau = ButcherTableau {
    a: &[&[1.0 / 3.0], &[-1.0 / 3.0, 1.0], &[1.0, -1.0, 1.0]],
    b: &[0.125, 0.375, 0.375, 0.125],
};

/// One explicit Runge-Kutta step
///
/// `rate` is `F(state)`, the first stage, computed once by the caller. The
/// returned state has not been through the boundary applier.
pub fn runge_kutta<O>(
    operator: &O,
    tableau: &ButcherTableau,
    state: &DVector<f64>,
    rate: &DVector<f64>,
    dt: f64,
) -> DVector<f64>
where
    O: SpatialOperator + ?Sized,
{
    let mut stages: Vec<DVector<f64>> = Vec::with_capacity(tableau.stages());
    stages.push(rate.clone());

    for row in tableau.a {
        let terms: Vec<(f64, &DVector<f64>)> = row
            .iter()
            .zip(&stages)
            .filter(|(coefficient, _)| **coefficient != 0.0)
            .map(|(coefficient, stage)| (dt * coefficient, stage))
            .collect();

        let mut stage_state = ops::linear_combination(state, &terms);
        operator.apply_boundaries(&mut stage_state);
        stages.push(operator.evaluate(&stage_state));
    }

    let terms: Vec<(f64, &DVector<f64>)> = tableau
        .b
        .iter()
        .zip(&stages)
        .map(|(weight, stage)| (dt * weight, stage))
        .collect();

    ops::linear_combination(state, &terms)
}

/// `state + dt·rate`
pub fn euler(state: &DVector<f64>, rate: &DVector<f64>, dt: f64) -> DVector<f64> {
    ops::linear_combination(state, &[(dt, rate)])
}
