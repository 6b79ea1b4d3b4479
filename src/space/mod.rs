//! Spatial discretization
//!
//! - **`discretizer`**: three-point stencils (centered, upwind, Lax-Wendroff)
//!   on non-uniform grids, evaluated at interior points
//! - **`boundary`**: edge conditions written after every evaluation
//! - **`operator`**: `SpatialOperator`, the problem as seen by the time steppers

mod boundary;
mod discretizer;
mod operator;

pub use boundary::BoundaryApplier;
pub use discretizer::{SpaceDiscretizer, Stencil3, axis_weights};
pub use operator::{Operator1D, Operator2D, SpatialOperator};
