//! Helper functions for integration tests

use advdiff_rs::config::SolverType;
use advdiff_rs::solver::{DenseLu, Stepper1D};
use advdiff_rs::config::FiniteDifferenceInput1D;
use nalgebra::DVector;

/// Assert that two states are close (within tolerance), element by element
pub fn assert_states_close(
    state1: &DVector<f64>,
    state2: &DVector<f64>,
    tolerance: f64,
    message: &str,
) {
    assert_eq!(state1.len(), state2.len(), "{}: Dimension mismatch", message);

    for (i, (&v1, &v2)) in state1.iter().zip(state2.iter()).enumerate() {
        let diff = (v1 - v2).abs();
        assert!(
            diff < tolerance,
            "{}: Element {} differs by {} (tolerance {})",
            message,
            i,
            diff,
            tolerance
        );
    }
}

/// Max-norm error between two states
pub fn max_error(state1: &DVector<f64>, state2: &DVector<f64>) -> f64 {
    (state1 - state2).amax()
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Observed order from errors at dt and dt/2
pub fn observed_order(coarse: f64, fine: f64) -> f64 {
    (coarse / fine).log2()
}

/// Stepper using the direct solver, so implicit solves add no iteration error
pub fn direct_stepper(input: FiniteDifferenceInput1D) -> Stepper1D {
    Stepper1D::from_input(input).unwrap().with_linear_solver(DenseLu)
}

/// Run `steps` steps from `initial`
pub fn run(stepper: &mut Stepper1D, initial: &DVector<f64>, steps: usize) -> DVector<f64> {
    let mut state = initial.clone();
    for _ in 0..steps {
        state = stepper
            .advance(&state)
            .unwrap_or_else(|error| panic!("{} failed: {}", stepper.solver_type(), error));
    }
    state
}

/// Every dispatchable solver type
pub fn all_solvers() -> impl Iterator<Item = SolverType> {
    SolverType::ALL.into_iter()
}
