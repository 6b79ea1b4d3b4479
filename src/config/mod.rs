//! Problem configuration
//!
//! Immutable value objects describing one advection-diffusion problem:
//!
//! - **`types`**: method selection enumerations (`SolverType`, `SpaceDiscretizerType`,
//!   `BoundaryConditionType`)
//! - **`boundary`**: edge conditions for 1D and 2D domains
//! - **`input`**: validated `FiniteDifferenceInput1D` / `FiniteDifferenceInput2D`
//!
//! All invariants are checked when an input is built; the steppers never
//! re-validate them.

mod boundary;
mod input;
mod types;

pub use boundary::{Axis, BoundaryCondition, BoundaryCondition1D, BoundaryCondition2D, Side};
pub use input::{FiniteDifferenceInput1D, FiniteDifferenceInput2D, MIN_GRID_POINTS};
pub use types::{BoundaryConditionType, SolverType, SpaceDiscretizerType};
