//! Linear-solve collaborator for implicit methods
//!
//! # Mathematical Background
//!
//! Every implicit step in this crate reduces to a system over the interior
//! unknowns `Y` of the form
//!
//! ```text
//! A(Y) = Y - c·F(scatter(Y)) = rhs
//! ```
//!
//! `F` is linear and `scatter` (embed interior values, then apply the edge
//! conditions) is affine, so `A` is affine: `A(Y) = L·Y + A(0)`. The solve is
//! therefore the linear problem
//!
//! ```text
//! L·Y = rhs - A(0),   with   L·x = A(x) - A(0)
//! ```
//!
//! [`AffineSystem`] performs that split and exposes `L` as a matrix-free
//! [`LinearOperator`]. A [`LinearSolver`] never sees the PDE.
//!
//! # Solvers
//!
//! | Solver       | Kind                      | Cost                         |
//! |--------------|---------------------------|------------------------------|
//! | [`BiCgStab`] | Krylov, matrix-free       | 2 operator products per iteration |
//! | [`DenseLu`]  | direct, assembles `L`     | `n` products + O(n³) factorisation |
//!
//! `BiCgStab` is the default; `DenseLu` is a reference for small grids.

use log::{trace, warn};
use nalgebra::{DMatrix, DVector};
use std::fmt::Debug;

use crate::error::{FdError, FdResult};

// =================================================================================================
// Traits
// =================================================================================================

/// Matrix-free linear map on interior vectors
pub trait LinearOperator {
    /// Dimension of the (square) system
    fn dim(&self) -> usize;

    /// `L·x`
    fn apply(&self, x: &DVector<f64>) -> DVector<f64>;
}

/// `Solve(operator, rhs) → solution`
///
/// Implementations must fail with [`FdError::SolveDidNotConverge`] rather
/// than return an inaccurate solution.
pub trait LinearSolver: Debug + Send + Sync {
    /// Solve `L·x = rhs`, starting from `guess`
    fn solve(
        &self,
        operator: &dyn LinearOperator,
        rhs: &DVector<f64>,
        guess: &DVector<f64>,
    ) -> FdResult<DVector<f64>>;

    /// Solver name (used in logs and result metadata)
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Affine system
// =================================================================================================

/// Affine map `A` split into its linear part and offset
pub struct AffineSystem<F>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    map: F,
    offset: DVector<f64>,
}

impl<F> AffineSystem<F>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    /// Wrap an affine map on vectors of length `dim`
    pub fn new(dim: usize, map: F) -> Self {
        let offset = map(&DVector::zeros(dim));
        Self { map, offset }
    }

    /// `A(0)`
    pub fn offset(&self) -> &DVector<f64> {
        &self.offset
    }

    /// Solve `A(Y) = rhs`
    pub fn solve(
        &self,
        solver: &dyn LinearSolver,
        rhs: &DVector<f64>,
        guess: &DVector<f64>,
    ) -> FdResult<DVector<f64>> {
        let shifted = rhs - &self.offset;
        solver.solve(self, &shifted, guess)
    }
}

impl<F> LinearOperator for AffineSystem<F>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    fn dim(&self) -> usize {
        self.offset.len()
    }

    fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        (self.map)(x) - &self.offset
    }
}

// =================================================================================================
// BiCGSTAB
// =================================================================================================

/// Stabilised bi-conjugate gradient (van der Vorst)
///
/// Converged when `‖r‖ ≤ max(absolute_tolerance, tolerance·‖rhs‖)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiCgStab {
    /// Relative tolerance on the residual
    pub tolerance: f64,
    /// Absolute floor on the residual
    pub absolute_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BiCgStab {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            absolute_tolerance: 1e-14,
            max_iterations: 1000,
        }
    }
}

impl BiCgStab {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    fn failure(&self, iterations: usize, residual: f64, reason: &str) -> FdError {
        warn!(
            "BiCGSTAB stopped after {} iterations ({}), residual {:e}",
            iterations, reason, residual
        );
        FdError::SolveDidNotConverge {
            iterations,
            residual,
        }
    }
}

impl LinearSolver for BiCgStab {
    fn solve(
        &self,
        operator: &dyn LinearOperator,
        rhs: &DVector<f64>,
        guess: &DVector<f64>,
    ) -> FdResult<DVector<f64>> {
        let threshold = self.absolute_tolerance.max(self.tolerance * rhs.norm());

        let mut x = guess.clone();
        let mut r = rhs - operator.apply(&x);
        let mut residual = r.norm();
        if residual <= threshold {
            return Ok(x);
        }

        let r_hat = r.clone();
        let (mut rho, mut alpha, mut omega) = (1.0, 1.0, 1.0);
        let mut v = DVector::zeros(rhs.len());
        let mut p = DVector::zeros(rhs.len());

        for iteration in 1..=self.max_iterations {
            let rho_next = r_hat.dot(&r);
            if rho_next == 0.0 || !rho_next.is_finite() {
                return Err(self.failure(iteration, residual, "rho breakdown"));
            }

            let beta = (rho_next / rho) * (alpha / omega);
            p = &r + beta * (&p - omega * &v);
            v = operator.apply(&p);

            let denominator = r_hat.dot(&v);
            if denominator == 0.0 || !denominator.is_finite() {
                return Err(self.failure(iteration, residual, "alpha breakdown"));
            }
            alpha = rho_next / denominator;

            let s = &r - alpha * &v;
            if s.norm() <= threshold {
                x += alpha * &p;
                trace!("BiCGSTAB converged in {} iterations (half step)", iteration);
                return Ok(x);
            }

            let t = operator.apply(&s);
            let t_norm_squared = t.dot(&t);
            if t_norm_squared == 0.0 {
                return Err(self.failure(iteration, residual, "omega breakdown"));
            }
            omega = t.dot(&s) / t_norm_squared;

            x += alpha * &p + omega * &s;
            r = s - omega * t;
            residual = r.norm();
            trace!("BiCGSTAB iteration {}: residual {:e}", iteration, residual);

            if !residual.is_finite() {
                return Err(self.failure(iteration, residual, "non-finite residual"));
            }
            if residual <= threshold {
                return Ok(x);
            }
            if omega == 0.0 {
                return Err(self.failure(iteration, residual, "stagnation"));
            }
            rho = rho_next;
        }

        Err(self.failure(self.max_iterations, residual, "iteration limit"))
    }

    fn name(&self) -> &'static str {
        "BiCGSTAB"
    }
}

// =================================================================================================
// Dense LU
// =================================================================================================

/// Assemble `L` column by column and factorise it with `nalgebra`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DenseLu;

impl DenseLu {
    /// Dense matrix of a linear operator
    pub fn assemble(operator: &dyn LinearOperator) -> DMatrix<f64> {
        let n = operator.dim();
        let mut matrix = DMatrix::zeros(n, n);
        let mut unit = DVector::zeros(n);

        for k in 0..n {
            unit[k] = 1.0;
            matrix.set_column(k, &operator.apply(&unit));
            unit[k] = 0.0;
        }
        matrix
    }
}

impl LinearSolver for DenseLu {
    fn solve(
        &self,
        operator: &dyn LinearOperator,
        rhs: &DVector<f64>,
        _guess: &DVector<f64>,
    ) -> FdResult<DVector<f64>> {
        let matrix = Self::assemble(operator);

        match matrix.lu().solve(rhs) {
            Some(solution) if solution.iter().all(|value| value.is_finite()) => Ok(solution),
            _ => {
                warn!("LU factorisation failed on a {}x{} system", rhs.len(), rhs.len());
                Err(FdError::SolveDidNotConverge {
                    iterations: 0,
                    residual: f64::INFINITY,
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "Dense LU"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
