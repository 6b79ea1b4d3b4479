//! Time stepping
//!
//! This module turns a problem configuration into a stepper that maps one
//! grid state to the next.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │ FiniteDifferenceInput1D  │  WHAT to solve (grid, coefficients,
//! │ FiniteDifferenceInput2D  │  boundaries, method selection)
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ Operator1D / Operator2D  │  F(u) + boundary applier
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐     ┌──────────────┐
//! │ TimeStepper (dispatcher) │────►│ LinearSolver │  implicit methods
//! │  match SolverType        │     └──────────────┘
//! │  History ring            │
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ next state / trajectory  │
//! └──────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - **`dispatcher`**: `TimeStepper`, `StartupPolicy`, `Stepper1D`, `Stepper2D`
//! - **`methods`**: the time-integration formulas
//! - **`linear`**: `LinearSolver` collaborator (`BiCgStab`, `DenseLu`)
//! - **`history`**: bounded ring of prior states for multistep methods
//! - **`traits`**: `TimeIntegrator` and `SimulationResult`
//!
//! # Choosing a Method
//!
//! - **Non-stiff, smooth**: RK4 or the 3/8 rule
//! - **Diffusion dominated, large dt**: implicit Euler, Crank-Nicolson or
//!   Gauss-Legendre (unconditionally stable)
//! - **Cheap per step**: Adams-Bashforth 2 (one evaluation once warm)
//!
//! Rule of thumb for explicit methods on uniform grids:
//! `dt ≤ h²/(2D)` and `dt ≤ h/|v|`.
//!
//! # Error Handling
//!
//! Every step returns [`FdResult`](crate::error::FdResult); see
//! [`FdError`](crate::error::FdError) for the taxonomy.

// =================================================================================================
// Module Declarations
// =================================================================================================
mod dispatcher;
mod history;
pub mod linear;
pub mod methods;
mod traits;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Grid points above which [`grid::ops`](crate::grid::ops) kernels go parallel
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

// Relaxed: a tuning knob read once per kernel call
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Point count above which stencil sweeps and state combinations use rayon
///
/// Has no effect without the `parallel` feature.
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Change the switch-over point for every stepper in the process
///
/// ```rust
/// use advdiff_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(4096);
/// assert_eq!(parallel_threshold(), 4096);
/// set_parallel_threshold(previous);
/// ```
///
/// # Panics
///
/// When `threshold == 0`.
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// Test-only override restored on drop
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use dispatcher::{StartupPolicy, Stepper1D, Stepper2D, TimeStepper, dispatch};
pub use history::{History, HistoryEntry};
pub use linear::{AffineSystem, BiCgStab, DenseLu, LinearOperator, LinearSolver};
pub use traits::{SimulationResult, TimeIntegrator};
