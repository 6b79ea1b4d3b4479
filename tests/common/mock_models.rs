//! Mock problems for testing
//!
//! These problems have known solutions of the semi-discrete system
//! `du/dt = F(u)`, so time-integration errors can be measured exactly,
//! without any spatial error in the way.

use std::f64::consts::PI;

use advdiff_rs::config::{
    BoundaryCondition, BoundaryCondition1D, FiniteDifferenceInput1D, SolverType,
    SpaceDiscretizerType,
};
use nalgebra::DVector;

// =================================================================================================
// Periodic diffusion mode: u = sin(2πx)
// =================================================================================================

/// One Fourier mode of periodic diffusion on `[0, 1]`
///
/// With `cells` distinct points (`h = 1/cells`), the grid holds `cells + 2`
/// points: index 0 mirrors index `cells` and index `cells + 1` mirrors
/// index 1. `sin(2πx)` is an eigenvector of the centered operator:
///
/// ```text
/// F(u) = λ·u,    λ = D·(2cos(2πh) - 2)/h²
/// ```
///
/// so the semi-discrete solution is `exp(λt)·u₀`.
pub struct PeriodicDiffusionMode {
    pub cells: usize,
    pub diffusion: f64,
}

impl PeriodicDiffusionMode {
    pub fn new(cells: usize, diffusion: f64) -> Self {
        Self { cells, diffusion }
    }

    pub fn h(&self) -> f64 {
        1.0 / self.cells as f64
    }

    pub fn points(&self) -> usize {
        self.cells + 2
    }

    pub fn grid(&self) -> DVector<f64> {
        let h = self.h();
        DVector::from_fn(self.points(), |i, _| i as f64 * h)
    }

    /// Eigenvalue of the mode
    pub fn eigenvalue(&self) -> f64 {
        let h = self.h();
        self.diffusion * (2.0 * (2.0 * PI * h).cos() - 2.0) / (h * h)
    }

    pub fn input(&self, solver_type: SolverType, dt: f64) -> FiniteDifferenceInput1D {
        let n = self.points();
        FiniteDifferenceInput1D::new(
            dt,
            self.grid(),
            DVector::zeros(n),
            DVector::from_element(n, self.diffusion),
            solver_type,
            SpaceDiscretizerType::Centered,
            BoundaryCondition1D::periodic(),
        )
        .unwrap()
    }

    pub fn initial(&self) -> DVector<f64> {
        self.grid().map(|x| (2.0 * PI * x).sin())
    }

    /// Semi-discrete solution at time t
    pub fn analytical_solution(&self, t: f64) -> DVector<f64> {
        self.initial() * (self.eigenvalue() * t).exp()
    }
}

// =================================================================================================
// Heat pulse: the 5-point Dirichlet problem
// =================================================================================================

/// grid [0, 4], D = 1, v = 0, dt = 0.1, Dirichlet(0), u₀ = [0, 1, 0, 1, 0]
///
/// One explicit Euler step gives `[0, 0.8, 0.2, 0.8, 0]`.
pub struct HeatPulse;

impl HeatPulse {
    pub fn input(solver_type: SolverType) -> FiniteDifferenceInput1D {
        FiniteDifferenceInput1D::new(
            0.1,
            DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0]),
            DVector::zeros(5),
            DVector::from_element(5, 1.0),
            solver_type,
            SpaceDiscretizerType::Centered,
            BoundaryCondition1D::uniform(BoundaryCondition::dirichlet(0.0)),
        )
        .unwrap()
    }

    pub fn initial() -> DVector<f64> {
        DVector::from_vec(vec![0.0, 1.0, 0.0, 1.0, 0.0])
    }

    pub fn after_one_euler_step() -> DVector<f64> {
        DVector::from_vec(vec![0.0, 0.8, 0.2, 0.8, 0.0])
    }
}

// =================================================================================================
// Advected bump on a non-uniform grid
// =================================================================================================

/// Advection-diffusion of a Gaussian bump, stretched grid, mixed edges
///
/// No closed form; used for cross-checks between solvers.
pub struct AdvectedBump {
    pub points: usize,
    pub velocity: f64,
    pub diffusion: f64,
}

impl AdvectedBump {
    pub fn new(points: usize, velocity: f64, diffusion: f64) -> Self {
        Self {
            points,
            velocity,
            diffusion,
        }
    }

    /// Points clustered toward the left edge
    pub fn grid(&self) -> DVector<f64> {
        let last = (self.points - 1) as f64;
        DVector::from_fn(self.points, |i, _| {
            let s = i as f64 / last;
            s * s * 0.5 + s * 0.5
        })
    }

    pub fn input(
        &self,
        solver_type: SolverType,
        discretizer: SpaceDiscretizerType,
        dt: f64,
    ) -> FiniteDifferenceInput1D {
        FiniteDifferenceInput1D::new(
            dt,
            self.grid(),
            DVector::from_element(self.points, self.velocity),
            DVector::from_element(self.points, self.diffusion),
            solver_type,
            discretizer,
            BoundaryCondition1D::new(
                BoundaryCondition::dirichlet(0.0),
                BoundaryCondition::neumann(0.0),
            ),
        )
        .unwrap()
    }

    pub fn initial(&self) -> DVector<f64> {
        self.grid().map(|x| (-((x - 0.3) / 0.08).powi(2)).exp())
    }
}

// =================================================================================================
// Tests for Mock Problems
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodic_mode_is_consistent() {
        let mode = PeriodicDiffusionMode::new(16, 0.05);
        let initial = mode.initial();
        let n = mode.points();

        assert!((initial[0] - initial[n - 2]).abs() < 1e-12);
        assert!((initial[n - 1] - initial[1]).abs() < 1e-12);
        assert!(mode.eigenvalue() < 0.0);
    }

    #[test]
    fn test_bump_grid_is_increasing() {
        let grid = AdvectedBump::new(21, 1.0, 0.01).grid();
        assert_eq!(grid[0], 0.0);
        assert!((grid[20] - 1.0).abs() < 1e-12);
        assert!(grid.as_slice().windows(2).all(|pair| pair[1] > pair[0]));
    }
}
