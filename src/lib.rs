//! advdiff-rs: finite-difference advection-diffusion stepping core
//!
//! Advances 1D and 2D advection-diffusion equations
//!
//! ```text
//! ∂u/∂t = -v·∇u + D·∇²u
//! ```
//!
//! on rectilinear (possibly non-uniform) grids, with a selectable time
//! integrator, spatial stencil and edge conditions.
//!
//! # Architecture
//!
//! 1. **Configuration** ([`config`]): validated, immutable problem inputs
//!    (WHAT to solve)
//! 2. **Space** ([`space`]): stencils and boundary applier, exposed to the
//!    steppers as a `SpatialOperator`
//! 3. **Solver** ([`solver`]): the dispatcher matching on `SolverType`, the
//!    method formulas, the linear-solve collaborator (HOW to solve)
//!
//! The grid state itself is a plain `nalgebra::DVector<f64>` owned by the
//! caller; 2D fields are stored column-major (see [`grid::GridShape`]).
//!
//! # Quick Start
//!
//! ```rust
//! use advdiff_rs::prelude::*;
//! use nalgebra::DVector;
//!
//! # fn main() -> Result<(), FdError> {
//! let n = 21;
//! let grid = DVector::from_fn(n, |i, _| i as f64 / (n - 1) as f64);
//!
//! // 1. Describe the problem
//! let input = FiniteDifferenceInput1D::new(
//!     1e-3,
//!     grid.clone(),
//!     DVector::from_element(n, 0.5),
//!     DVector::from_element(n, 0.1),
//!     SolverType::RungeKutta4,
//!     SpaceDiscretizerType::Upwind,
//!     BoundaryCondition1D::uniform(BoundaryCondition::dirichlet(0.0)),
//! )?;
//!
//! // 2. Build the stepper
//! let mut stepper = Stepper1D::from_input(input)?;
//!
//! // 3. Run
//! let initial = grid.map(|x| (std::f64::consts::PI * x).sin());
//! let result = stepper.integrate(&initial, 100)?;
//!
//! println!("{} states, final time {}", result.len(), result.final_time());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: method enumerations, boundary conditions, problem inputs
//! - [`grid`]: flat state layout and parallel elementwise kernels
//! - [`space`]: space discretizer, boundary applier, spatial operators
//! - [`solver`]: time steppers and integration methods
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod grid;
pub mod solver;
pub mod space;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use advdiff_rs::prelude::*;
    //! ```
    pub use crate::config::{
        BoundaryCondition, BoundaryCondition1D, BoundaryCondition2D, BoundaryConditionType,
        FiniteDifferenceInput1D, FiniteDifferenceInput2D, SolverType, SpaceDiscretizerType,
    };
    pub use crate::error::{ConfigurationError, FdError, FdResult};
    pub use crate::solver::{
        BiCgStab, DenseLu, LinearSolver, SimulationResult, StartupPolicy, Stepper1D, Stepper2D,
        TimeIntegrator, TimeStepper,
    };
    pub use crate::space::{Operator1D, Operator2D, SpatialOperator};
}
