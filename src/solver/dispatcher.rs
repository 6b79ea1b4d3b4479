//! Solver dispatcher / time stepper
//!
//! # Design
//!
//! A [`TimeStepper`] owns one problem (a [`SpatialOperator`]), the
//! linear-solve collaborator used by implicit methods, and the bounded
//! history ring of multistep methods. `advance` maps the current state to
//! the next one:
//!
//! ```text
//!  state ──► boundary applier ──► F(start) ──► method (match on SolverType)
//!                                                          │
//!  commit (history, step count) ◄── finite check ◄── boundary applier
//! ```
//!
//! The incoming state goes through the boundary applier before the first
//! spatial evaluation, so every method starts from the same edge values
//! whether or not the caller pinned them.
//!
//! # Atomicity
//!
//! The caller's state is only read. The history and the step counter are
//! updated after the new state has passed the boundary applier and the
//! finite check, so a failed step (non-converged solve, instability,
//! insufficient history) leaves the stepper exactly as it was.
//!
//! # Multistep startup
//!
//! Adams methods need `step_order - 1` committed prior states. Until they
//! exist, [`StartupPolicy::SelfStarting`] runs a single-step method instead
//! (AB2 → explicit Euler, AM2 → Crank-Nicolson) and
//! [`StartupPolicy::Strict`] fails with [`FdError::InsufficientHistory`].
//! The history assumes each call receives the state returned by the
//! previous one; use [`TimeStepper::reset`] or [`TimeStepper::seed_history`]
//! when restarting from another state.
//!
//! # Example
//!
//! ```rust
//! use advdiff_rs::config::{
//!     BoundaryCondition, BoundaryCondition1D, FiniteDifferenceInput1D, SolverType,
//!     SpaceDiscretizerType,
//! };
//! use advdiff_rs::solver::Stepper1D;
//! use nalgebra::DVector;
//!
//! let input = FiniteDifferenceInput1D::new(
//!     0.1,
//!     DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0]),
//!     DVector::zeros(5),
//!     DVector::from_element(5, 1.0),
//!     SolverType::ExplicitEuler,
//!     SpaceDiscretizerType::Centered,
//!     BoundaryCondition1D::uniform(BoundaryCondition::dirichlet(0.0)),
//! )?;
//!
//! let mut stepper = Stepper1D::from_input(input)?;
//! let next = stepper.advance(&DVector::from_vec(vec![0.0, 1.0, 0.0, 1.0, 0.0]))?;
//!
//! assert!((next[1] - 0.8).abs() < 1e-12);
//! assert!((next[2] - 0.2).abs() < 1e-12);
//! # Ok::<(), advdiff_rs::error::FdError>(())
//! ```

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

use crate::config::{FiniteDifferenceInput1D, FiniteDifferenceInput2D, SolverType};
use crate::error::{FdError, FdResult};
use crate::grid::ops;
use crate::solver::history::History;
use crate::solver::linear::{BiCgStab, LinearSolver};
use crate::solver::methods::{explicit, implicit, multistep, richardson};
use crate::solver::traits::TimeIntegrator;
use crate::space::{Operator1D, Operator2D, SpatialOperator};

// =================================================================================================
// Startup policy
// =================================================================================================

/// Behaviour of multistep methods before their history is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupPolicy {
    /// Bootstrap with a single-step method
    #[default]
    SelfStarting,

    /// Fail with [`FdError::InsufficientHistory`]
    Strict,
}

impl StartupPolicy {
    /// Single-step method used to bootstrap `solver_type`
    pub const fn fallback(solver_type: SolverType) -> Option<SolverType> {
        match solver_type {
            SolverType::AdamsBashforth2 => Some(SolverType::ExplicitEuler),
            SolverType::AdamsMoulton2 => Some(SolverType::CrankNicolson),
            _ => None,
        }
    }
}

// =================================================================================================
// Time stepper
// =================================================================================================

/// Stateful stepper of one problem
#[derive(Debug)]
pub struct TimeStepper<O: SpatialOperator> {
    operator: O,
    linear_solver: Box<dyn LinearSolver>,
    startup: StartupPolicy,
    history: History,
    steps_taken: usize,
}

/// Stepper of a 1D problem
pub type Stepper1D = TimeStepper<Operator1D>;

/// Stepper of a 2D problem
pub type Stepper2D = TimeStepper<Operator2D>;

impl<O: SpatialOperator> TimeStepper<O> {
    /// Stepper with the default BiCGSTAB solver and self-starting policy
    ///
    /// # Errors
    ///
    /// [`FdError::UnsupportedSolver`] when the operator reports the Null solver.
    pub fn new(operator: O) -> FdResult<Self> {
        let solver_type = operator.solver_type();
        if solver_type == SolverType::Null {
            return Err(FdError::UnsupportedSolver(solver_type.name().to_string()));
        }

        debug!(
            "Time stepper: {} on {} grid, dt = {}",
            solver_type,
            operator.shape(),
            operator.dt()
        );

        Ok(Self {
            operator,
            linear_solver: Box::new(BiCgStab::default()),
            startup: StartupPolicy::default(),
            history: History::new(solver_type.step_order() - 1),
            steps_taken: 0,
        })
    }

    /// Replace the linear-solve collaborator
    pub fn with_linear_solver(mut self, solver: impl LinearSolver + 'static) -> Self {
        self.linear_solver = Box::new(solver);
        self
    }

    pub fn with_startup_policy(mut self, policy: StartupPolicy) -> Self {
        self.startup = policy;
        self
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    pub fn solver_type(&self) -> SolverType {
        self.operator.solver_type()
    }

    pub fn startup_policy(&self) -> StartupPolicy {
        self.startup
    }

    pub fn linear_solver(&self) -> &dyn LinearSolver {
        self.linear_solver.as_ref()
    }

    /// Number of committed steps since construction or [`reset`](Self::reset)
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Number of retained prior states
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Forget retained states and the step count
    pub fn reset(&mut self) {
        self.history.clear();
        self.steps_taken = 0;
    }

    /// Replace the history with known prior states, oldest first
    ///
    /// Only the most recent `step_order - 1` states are kept. Single-step
    /// methods keep none.
    pub fn seed_history(&mut self, states: &[DVector<f64>]) -> FdResult<()> {
        for state in states {
            self.operator.check_state(state)?;
        }

        self.history.clear();
        let keep = states.len().saturating_sub(self.history.capacity());
        for state in &states[keep..] {
            let start = self.pinned(state);
            let rate = self.operator.evaluate(&start);
            self.history.push(start, rate);
        }
        Ok(())
    }

    /// Copy of `state` with the configured edge values applied
    fn pinned(&self, state: &DVector<f64>) -> DVector<f64> {
        let mut start = state.clone();
        self.operator.apply_boundaries(&mut start);
        start
    }

    /// Next state from `state`
    ///
    /// # Errors
    ///
    /// - [`FdError::InvalidConfiguration`] when `state` does not fit the grid
    /// - [`FdError::InsufficientHistory`] for a multistep method under
    ///   [`StartupPolicy::Strict`] before enough states are retained
    /// - [`FdError::SolveDidNotConverge`] from the linear solver
    /// - [`FdError::NumericalInstability`] when the new state is not finite
    pub fn advance(&mut self, state: &DVector<f64>) -> FdResult<DVector<f64>> {
        self.operator.check_state(state)?;

        let configured = self.operator.solver_type();
        let method = self.method_for_step(configured)?;
        let dt = self.operator.dt();

        let start = self.pinned(state);
        if method.is_multistep() && self.history.repeats(&start) {
            warn!(
                "{}: state equals the previous step's start, history is stale (call reset when restarting)",
                method
            );
        }
        let rate = self.operator.evaluate(&start);

        let mut next = dispatch(
            method,
            &self.operator,
            self.linear_solver.as_ref(),
            &self.history,
            &start,
            &rate,
            dt,
        )?;
        self.operator.apply_boundaries(&mut next);

        if let Some(index) = ops::first_non_finite(&next) {
            return Err(FdError::NumericalInstability {
                step: self.steps_taken + 1,
                index,
            });
        }

        self.history.push(start, rate);
        self.steps_taken += 1;
        Ok(next)
    }

    /// Advance `state` in place, untouched on failure
    pub fn advance_in_place(&mut self, state: &mut DVector<f64>) -> FdResult<()> {
        *state = self.advance(state)?;
        Ok(())
    }

    /// Method actually run this step (fallback resolution)
    fn method_for_step(&self, configured: SolverType) -> FdResult<SolverType> {
        let required = configured.step_order() - 1;
        if self.history.has(required) {
            return Ok(configured);
        }

        match (self.startup, StartupPolicy::fallback(configured)) {
            (StartupPolicy::SelfStarting, Some(fallback)) => {
                debug!(
                    "{}: {} of {} prior states, bootstrapping with {}",
                    configured,
                    self.history.len(),
                    required,
                    fallback
                );
                Ok(fallback)
            }
            _ => Err(FdError::InsufficientHistory {
                required: configured.step_order(),
                available: self.history.len() + 1,
            }),
        }
    }
}

impl Stepper1D {
    /// Stepper of a validated 1D input
    pub fn from_input(input: FiniteDifferenceInput1D) -> FdResult<Self> {
        Self::new(Operator1D::new(input)?)
    }
}

impl Stepper2D {
    /// Stepper of a validated 2D input
    pub fn from_input(input: FiniteDifferenceInput2D) -> FdResult<Self> {
        Self::new(Operator2D::new(input)?)
    }

    /// Next `nx × ny` field
    pub fn advance_field(&mut self, field: &DMatrix<f64>) -> FdResult<DMatrix<f64>> {
        let state = self.operator.flatten(field)?;
        let next = self.advance(&state)?;
        Ok(self.operator.unflatten(&next)?)
    }
}

impl<O: SpatialOperator> TimeIntegrator for TimeStepper<O> {
    fn step(&mut self, state: &DVector<f64>) -> FdResult<DVector<f64>> {
        self.advance(state)
    }

    fn dt(&self) -> f64 {
        self.operator.dt()
    }

    fn name(&self) -> &str {
        self.operator.solver_type().name()
    }
}

// =================================================================================================
// Dispatch
// =================================================================================================

/// Run one method; the result has not been through the boundary applier
///
/// `state` is expected to carry its edge values already. Null is rejected
/// here; history-dependent methods require their prior state.
pub fn dispatch<O>(
    method: SolverType,
    operator: &O,
    solver: &dyn LinearSolver,
    history: &History,
    state: &DVector<f64>,
    rate: &DVector<f64>,
    dt: f64,
) -> FdResult<DVector<f64>>
where
    O: SpatialOperator + ?Sized,
{
    let previous_rate = || {
        history
            .back(0)
            .map(|entry| &entry.rate)
            .ok_or(FdError::InsufficientHistory {
                required: method.step_order(),
                available: history.len() + 1,
            })
    };

    match method {
        SolverType::Null => Err(FdError::UnsupportedSolver(method.name().to_string())),
        SolverType::ExplicitEuler => Ok(explicit::euler(state, rate, dt)),
        SolverType::ImplicitEuler => implicit::theta_step(operator, solver, state, rate, dt, 1.0),
        SolverType::CrankNicolson => implicit::theta_step(operator, solver, state, rate, dt, 0.5),
        SolverType::RungeKuttaRalston => Ok(explicit::runge_kutta(
            operator,
            &explicit::RALSTON,
            state,
            rate,
            dt,
        )),
        SolverType::RungeKutta3 => Ok(explicit::runge_kutta(
            operator,
            &explicit::RK3,
            state,
            rate,
            dt,
        )),
        SolverType::RungeKutta4 => Ok(explicit::runge_kutta(
            operator,
            &explicit::RK4,
            state,
            rate,
            dt,
        )),
        SolverType::RungeKuttaThreeEight => Ok(explicit::runge_kutta(
            operator,
            &explicit::THREE_EIGHT,
            state,
            rate,
            dt,
        )),
        SolverType::RungeKuttaGaussLegendre4 => {
            implicit::gauss_legendre(operator, solver, state, dt)
        }
        SolverType::RichardsonExtrapolation2 => {
            Ok(richardson::richardson2(operator, state, rate, dt))
        }
        SolverType::RichardsonExtrapolation3 => {
            Ok(richardson::richardson3(operator, state, rate, dt))
        }
        SolverType::AdamsBashforth2 => Ok(multistep::adams_bashforth2(
            state,
            rate,
            previous_rate()?,
            dt,
        )),
        SolverType::AdamsMoulton2 => {
            multistep::adams_moulton2(operator, solver, state, rate, previous_rate()?, dt)
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
