//! Common utilities for integration tests

#![allow(dead_code)]

pub mod mock_models;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_models::{AdvectedBump, HeatPulse, PeriodicDiffusionMode};
pub use test_helpers::{
    all_solvers, assert_states_close, direct_stepper, max_error, observed_order, relative_error,
    run,
};
