//! Problem configuration
//!
//! [`FiniteDifferenceInput1D`] and [`FiniteDifferenceInput2D`] bundle everything
//! that defines one advection-diffusion problem: time step, spatial grid,
//! coefficient fields and the method selections. They are validated once, at
//! construction, and are immutable afterwards (fields are private, accessors
//! are read-only).
//!
//! # 2D layout
//!
//! 2D fields are `DMatrix<f64>` of shape `nx × ny`: row `i` follows the x grid,
//! column `j` follows the y grid. Velocities and diffusion are full per-point
//! fields; [`FiniteDifferenceInput2D::separable`] broadcasts per-axis velocity
//! arrays into that layout. Diffusion is isotropic (no cross terms).
//!
//! # Serialization
//!
//! Both inputs (de)serialize through a raw mirror, and deserialization runs
//! the same validation as [`FiniteDifferenceInput1D::new`], so an invalid
//! document can never produce an input.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::config::boundary::{Axis, BoundaryCondition1D, BoundaryCondition2D};
use crate::config::types::{SolverType, SpaceDiscretizerType};
use crate::error::ConfigurationError;

/// Smallest number of points along an axis
pub const MIN_GRID_POINTS: usize = 3;

// =================================================================================================
// Shared validation helpers
// =================================================================================================

fn validate_selection(
    solver_type: SolverType,
    space_discretizer_type: SpaceDiscretizerType,
    dt: f64,
) -> Result<(), ConfigurationError> {
    if solver_type == SolverType::Null {
        return Err(ConfigurationError::NullSolver);
    }
    if space_discretizer_type == SpaceDiscretizerType::Null {
        return Err(ConfigurationError::NullDiscretizer);
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(ConfigurationError::NonPositiveTimeStep(dt));
    }
    Ok(())
}

fn validate_axis(axis: &'static str, grid: &[f64]) -> Result<(), ConfigurationError> {
    if grid.len() < MIN_GRID_POINTS {
        return Err(ConfigurationError::GridTooShort { axis, len: grid.len() });
    }
    validate_finite(axis, grid)?;
    if let Some(index) = grid.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(ConfigurationError::GridNotIncreasing { axis, index: index + 1 });
    }
    Ok(())
}

/// Relative tolerance on the two wrap spacings of a periodic axis
const PERIODIC_SPACING_TOLERANCE: f64 = 1e-9;

/// Periodic ghosts mirror `x_{N-2}` and `x₁`, so the two edge spacings must agree
fn validate_periodic_wrap(
    axis: &'static str,
    grid: &[f64],
    periodic: bool,
) -> Result<(), ConfigurationError> {
    let n = grid.len();
    if !periodic || n < MIN_GRID_POINTS {
        return Ok(());
    }
    let left = grid[1] - grid[0];
    let right = grid[n - 1] - grid[n - 2];
    if (left - right).abs() > PERIODIC_SPACING_TOLERANCE * left.max(right) {
        return Err(ConfigurationError::PeriodicSpacingMismatch { axis, left, right });
    }
    Ok(())
}

fn validate_finite(field: &'static str, values: &[f64]) -> Result<(), ConfigurationError> {
    match values.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(ConfigurationError::NonFiniteValue { field, index }),
        None => Ok(()),
    }
}

fn validate_length(
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ConfigurationError> {
    if expected != actual {
        return Err(ConfigurationError::LengthMismatch { field, expected, actual });
    }
    Ok(())
}

fn validate_field(
    field: &'static str,
    values: &DMatrix<f64>,
    nx: usize,
    ny: usize,
) -> Result<(), ConfigurationError> {
    validate_length(field, nx, values.nrows())?;
    validate_length(field, ny, values.ncols())?;
    validate_finite(field, values.as_slice())
}

// =================================================================================================
// 1D input
// =================================================================================================

/// Validated 1D problem
///
/// # Example
///
/// ```rust
/// use advdiff_rs::config::{
///     BoundaryCondition, BoundaryCondition1D, FiniteDifferenceInput1D, SolverType,
///     SpaceDiscretizerType,
/// };
/// use nalgebra::DVector;
///
/// let input = FiniteDifferenceInput1D::new(
///     0.1,
///     DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0]),
///     DVector::zeros(5),
///     DVector::from_element(5, 1.0),
///     SolverType::ExplicitEuler,
///     SpaceDiscretizerType::Centered,
///     BoundaryCondition1D::uniform(BoundaryCondition::dirichlet(0.0)),
/// ).unwrap();
///
/// assert_eq!(input.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInput1D", into = "RawInput1D")]
pub struct FiniteDifferenceInput1D {
    dt: f64,
    grid: DVector<f64>,
    velocity: DVector<f64>,
    diffusion: DVector<f64>,
    solver_type: SolverType,
    space_discretizer_type: SpaceDiscretizerType,
    boundary_conditions: BoundaryCondition1D,
}

impl FiniteDifferenceInput1D {
    /// Validate and freeze a 1D problem
    ///
    /// # Errors
    ///
    /// Any [`ConfigurationError`]: Null selections, `dt <= 0`, fewer than 3 points,
    /// non-increasing grid, misaligned fields, non-finite values, asymmetric
    /// periodic pairing or a periodic grid whose two edge spacings differ.
    pub fn new(
        dt: f64,
        grid: DVector<f64>,
        velocity: DVector<f64>,
        diffusion: DVector<f64>,
        solver_type: SolverType,
        space_discretizer_type: SpaceDiscretizerType,
        boundary_conditions: BoundaryCondition1D,
    ) -> Result<Self, ConfigurationError> {
        validate_selection(solver_type, space_discretizer_type, dt)?;
        validate_axis("x", grid.as_slice())?;

        let n = grid.len();
        validate_length("velocity", n, velocity.len())?;
        validate_length("diffusion", n, diffusion.len())?;
        validate_finite("velocity", velocity.as_slice())?;
        validate_finite("diffusion", diffusion.as_slice())?;

        boundary_conditions.validate(Axis::X)?;
        validate_periodic_wrap("x", grid.as_slice(), boundary_conditions.is_periodic())?;

        Ok(Self {
            dt,
            grid,
            velocity,
            diffusion,
            solver_type,
            space_discretizer_type,
            boundary_conditions,
        })
    }

    /// Same problem advanced with another solver
    pub fn with_solver_type(&self, solver_type: SolverType) -> Result<Self, ConfigurationError> {
        Self::new(
            self.dt,
            self.grid.clone(),
            self.velocity.clone(),
            self.diffusion.clone(),
            solver_type,
            self.space_discretizer_type,
            self.boundary_conditions,
        )
    }

    /// Same problem with another time step
    pub fn with_dt(&self, dt: f64) -> Result<Self, ConfigurationError> {
        Self::new(
            dt,
            self.grid.clone(),
            self.velocity.clone(),
            self.diffusion.clone(),
            self.solver_type,
            self.space_discretizer_type,
            self.boundary_conditions,
        )
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn grid(&self) -> &DVector<f64> {
        &self.grid
    }

    pub fn velocity(&self) -> &DVector<f64> {
        &self.velocity
    }

    pub fn diffusion(&self) -> &DVector<f64> {
        &self.diffusion
    }

    pub fn solver_type(&self) -> SolverType {
        self.solver_type
    }

    pub fn space_discretizer_type(&self) -> SpaceDiscretizerType {
        self.space_discretizer_type
    }

    pub fn boundary_conditions(&self) -> &BoundaryCondition1D {
        &self.boundary_conditions
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Always false once validated, kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}

/// Unvalidated mirror used for (de)serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawInput1D {
    dt: f64,
    grid: Vec<f64>,
    velocity: Vec<f64>,
    diffusion: Vec<f64>,
    solver_type: SolverType,
    space_discretizer_type: SpaceDiscretizerType,
    #[serde(default)]
    boundary_conditions: BoundaryCondition1D,
}

impl TryFrom<RawInput1D> for FiniteDifferenceInput1D {
    type Error = ConfigurationError;

    fn try_from(raw: RawInput1D) -> Result<Self, Self::Error> {
        Self::new(
            raw.dt,
            DVector::from_vec(raw.grid),
            DVector::from_vec(raw.velocity),
            DVector::from_vec(raw.diffusion),
            raw.solver_type,
            raw.space_discretizer_type,
            raw.boundary_conditions,
        )
    }
}

impl From<FiniteDifferenceInput1D> for RawInput1D {
    fn from(input: FiniteDifferenceInput1D) -> Self {
        Self {
            dt: input.dt,
            grid: input.grid.as_slice().to_vec(),
            velocity: input.velocity.as_slice().to_vec(),
            diffusion: input.diffusion.as_slice().to_vec(),
            solver_type: input.solver_type,
            space_discretizer_type: input.space_discretizer_type,
            boundary_conditions: input.boundary_conditions,
        }
    }
}

// =================================================================================================
// 2D input
// =================================================================================================

/// Validated 2D problem on a tensor-product grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInput2D", into = "RawInput2D")]
pub struct FiniteDifferenceInput2D {
    dt: f64,
    x_grid: DVector<f64>,
    y_grid: DVector<f64>,
    x_velocity: DMatrix<f64>,
    y_velocity: DMatrix<f64>,
    diffusion: DMatrix<f64>,
    solver_type: SolverType,
    space_discretizer_type: SpaceDiscretizerType,
    boundary_conditions: BoundaryCondition2D,
}

impl FiniteDifferenceInput2D {
    /// Validate and freeze a 2D problem with per-point fields (`nx × ny` each)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dt: f64,
        x_grid: DVector<f64>,
        y_grid: DVector<f64>,
        x_velocity: DMatrix<f64>,
        y_velocity: DMatrix<f64>,
        diffusion: DMatrix<f64>,
        solver_type: SolverType,
        space_discretizer_type: SpaceDiscretizerType,
        boundary_conditions: BoundaryCondition2D,
    ) -> Result<Self, ConfigurationError> {
        validate_selection(solver_type, space_discretizer_type, dt)?;
        validate_axis("x", x_grid.as_slice())?;
        validate_axis("y", y_grid.as_slice())?;

        let (nx, ny) = (x_grid.len(), y_grid.len());
        validate_field("x_velocity", &x_velocity, nx, ny)?;
        validate_field("y_velocity", &y_velocity, nx, ny)?;
        validate_field("diffusion", &diffusion, nx, ny)?;

        boundary_conditions.validate()?;
        validate_periodic_wrap(
            "x",
            x_grid.as_slice(),
            boundary_conditions.axis(Axis::X).is_periodic(),
        )?;
        validate_periodic_wrap(
            "y",
            y_grid.as_slice(),
            boundary_conditions.axis(Axis::Y).is_periodic(),
        )?;

        Ok(Self {
            dt,
            x_grid,
            y_grid,
            x_velocity,
            y_velocity,
            diffusion,
            solver_type,
            space_discretizer_type,
            boundary_conditions,
        })
    }

    /// Axis-separable advection: `x_velocity[i]` applies to row `i`, `y_velocity[j]` to column `j`
    #[allow(clippy::too_many_arguments)]
    pub fn separable(
        dt: f64,
        x_grid: DVector<f64>,
        y_grid: DVector<f64>,
        x_velocity: DVector<f64>,
        y_velocity: DVector<f64>,
        diffusion: DMatrix<f64>,
        solver_type: SolverType,
        space_discretizer_type: SpaceDiscretizerType,
        boundary_conditions: BoundaryCondition2D,
    ) -> Result<Self, ConfigurationError> {
        let (nx, ny) = (x_grid.len(), y_grid.len());
        validate_length("x_velocity", nx, x_velocity.len())?;
        validate_length("y_velocity", ny, y_velocity.len())?;

        let x_field = DMatrix::from_fn(nx, ny, |i, _| x_velocity[i]);
        let y_field = DMatrix::from_fn(nx, ny, |_, j| y_velocity[j]);

        Self::new(
            dt,
            x_grid,
            y_grid,
            x_field,
            y_field,
            diffusion,
            solver_type,
            space_discretizer_type,
            boundary_conditions,
        )
    }

    /// Same problem advanced with another solver
    pub fn with_solver_type(&self, solver_type: SolverType) -> Result<Self, ConfigurationError> {
        Self::new(
            self.dt,
            self.x_grid.clone(),
            self.y_grid.clone(),
            self.x_velocity.clone(),
            self.y_velocity.clone(),
            self.diffusion.clone(),
            solver_type,
            self.space_discretizer_type,
            self.boundary_conditions,
        )
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn x_grid(&self) -> &DVector<f64> {
        &self.x_grid
    }

    pub fn y_grid(&self) -> &DVector<f64> {
        &self.y_grid
    }

    pub fn x_velocity(&self) -> &DMatrix<f64> {
        &self.x_velocity
    }

    pub fn y_velocity(&self) -> &DMatrix<f64> {
        &self.y_velocity
    }

    pub fn diffusion(&self) -> &DMatrix<f64> {
        &self.diffusion
    }

    pub fn solver_type(&self) -> SolverType {
        self.solver_type
    }

    pub fn space_discretizer_type(&self) -> SpaceDiscretizerType {
        self.space_discretizer_type
    }

    pub fn boundary_conditions(&self) -> &BoundaryCondition2D {
        &self.boundary_conditions
    }

    /// `(nx, ny)`
    pub fn shape(&self) -> (usize, usize) {
        (self.x_grid.len(), self.y_grid.len())
    }
}

/// Unvalidated mirror; fields are column-major `nx × ny`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawInput2D {
    dt: f64,
    x_grid: Vec<f64>,
    y_grid: Vec<f64>,
    x_velocity: Vec<f64>,
    y_velocity: Vec<f64>,
    diffusion: Vec<f64>,
    solver_type: SolverType,
    space_discretizer_type: SpaceDiscretizerType,
    #[serde(default)]
    boundary_conditions: BoundaryCondition2D,
}

impl TryFrom<RawInput2D> for FiniteDifferenceInput2D {
    type Error = ConfigurationError;

    fn try_from(raw: RawInput2D) -> Result<Self, Self::Error> {
        let (nx, ny) = (raw.x_grid.len(), raw.y_grid.len());
        let field = |name: &'static str, values: Vec<f64>| {
            validate_length(name, nx * ny, values.len())
                .map(|_| DMatrix::from_vec(nx, ny, values))
        };

        let x_velocity = field("x_velocity", raw.x_velocity)?;
        let y_velocity = field("y_velocity", raw.y_velocity)?;
        let diffusion = field("diffusion", raw.diffusion)?;

        Self::new(
            raw.dt,
            DVector::from_vec(raw.x_grid),
            DVector::from_vec(raw.y_grid),
            x_velocity,
            y_velocity,
            diffusion,
            raw.solver_type,
            raw.space_discretizer_type,
            raw.boundary_conditions,
        )
    }
}

impl From<FiniteDifferenceInput2D> for RawInput2D {
    fn from(input: FiniteDifferenceInput2D) -> Self {
        Self {
            dt: input.dt,
            x_grid: input.x_grid.as_slice().to_vec(),
            y_grid: input.y_grid.as_slice().to_vec(),
            x_velocity: input.x_velocity.as_slice().to_vec(),
            y_velocity: input.y_velocity.as_slice().to_vec(),
            diffusion: input.diffusion.as_slice().to_vec(),
            solver_type: input.solver_type,
            space_discretizer_type: input.space_discretizer_type,
            boundary_conditions: input.boundary_conditions,
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
