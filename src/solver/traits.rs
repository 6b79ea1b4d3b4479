//! Integration driver traits and types
//!
//! # Design
//!
//! [`TimeIntegrator`] is the seam between a stepper and the code driving a
//! run: implementors provide one step, the trait provides
//! [`integrate`](TimeIntegrator::integrate), which records a full
//! [`SimulationResult`] (trajectory, time points, metadata).

use nalgebra::DVector;
use std::collections::HashMap;

use crate::error::FdResult;

// =================================================================================================
// Simulation result
// =================================================================================================

/// Trajectory of a multi-step run
///
/// `time_points[k]` is the time of `trajectory[k]`; index 0 is the initial
/// state at `t = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub time_points: Vec<f64>,
    pub trajectory: Vec<DVector<f64>>,
    pub final_state: DVector<f64>,

    /// Free-form diagnostics (solver name, dt, step count)
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    pub fn new(
        time_points: Vec<f64>,
        trajectory: Vec<DVector<f64>>,
        final_state: DVector<f64>,
    ) -> Self {
        Self {
            time_points,
            trajectory,
            final_state,
            metadata: HashMap::new(),
        }
    }

    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Number of recorded states (steps + 1)
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    /// Time of the final state
    pub fn final_time(&self) -> f64 {
        self.time_points.last().copied().unwrap_or_default()
    }
}

// =================================================================================================
// Integrator
// =================================================================================================

/// Anything that advances a flat state by a fixed `dt`
pub trait TimeIntegrator {
    /// One step from `state`
    fn step(&mut self, state: &DVector<f64>) -> FdResult<DVector<f64>>;

    /// Fixed time step
    fn dt(&self) -> f64;

    /// Method name for diagnostics
    fn name(&self) -> &str;

    /// Run `steps` steps from `initial`, recording every state
    ///
    /// Stops at the first failing step and returns its error.
    fn integrate(&mut self, initial: &DVector<f64>, steps: usize) -> FdResult<SimulationResult> {
        let dt = self.dt();

        let mut time_points = Vec::with_capacity(steps + 1);
        let mut trajectory = Vec::with_capacity(steps + 1);
        time_points.push(0.0);
        trajectory.push(initial.clone());

        let mut state = initial.clone();
        for step in 0..steps {
            state = self.step(&state)?;
            trajectory.push(state.clone());
            // from the index, no accumulated rounding
            time_points.push((step as f64 + 1.0) * dt);
        }

        let mut result = SimulationResult::new(time_points, trajectory, state);
        result.add_metadata("solver", self.name());
        result.add_metadata("time steps", &steps.to_string());
        result.add_metadata("dt", &dt.to_string());
        result.add_metadata("total time", &(steps as f64 * dt).to_string());

        Ok(result)
    }
}
