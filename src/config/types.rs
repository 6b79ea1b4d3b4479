//! Method selection enumerations
//!
//! # Design
//!
//! The three enumerations below are the closed vocabulary a problem uses to
//! select HOW it is advanced in time ([`SolverType`]), HOW spatial derivatives
//! are approximated ([`SpaceDiscretizerType`]) and WHAT happens at the domain
//! edges ([`BoundaryConditionType`]).
//!
//! Each enumeration keeps a `Null` variant so raw values coming from a foreign
//! caller (or a deserialized file) can be represented faithfully. `Null` is
//! rejected when a configuration is built and again at the dispatch boundary;
//! it is never silently defaulted.
//!
//! # Raw discriminants
//!
//! | Value | SolverType |
//! |-------|------------|
//! | 0     | Null |
//! | 1     | ExplicitEuler (also the begin sentinel) |
//! | 2     | ImplicitEuler |
//! | 3     | CrankNicolson |
//! | 4..=8 | Runge-Kutta family |
//! | 9, 10 | Richardson extrapolation |
//! | 11, 12| Adams-Bashforth 2, Adams-Moulton 2 |
//! | 13    | end sentinel (never valid) |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FdError, FdResult};

// =================================================================================================
// Solver Type
// =================================================================================================

/// Time-integration family
///
/// # Example
///
/// ```rust
/// use advdiff_rs::config::SolverType;
///
/// assert_eq!(SolverType::AdamsBashforth2.step_order(), 2);
/// assert_eq!(SolverType::RungeKutta4.step_order(), 1);
/// assert_eq!(SolverType::RungeKutta4.stages(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SolverType {
    /// Unset value, never dispatched
    #[default]
    Null,

    // Single-step
    ExplicitEuler,
    ImplicitEuler,
    CrankNicolson,

    // Runge-Kutta
    /// Second order, minimum error bound two-stage method
    RungeKuttaRalston,
    /// Kutta's third order method
    RungeKutta3,
    /// Classical fourth order method
    RungeKutta4,
    /// Kutta's 3/8 rule (fourth order)
    RungeKuttaThreeEight,
    /// Two-stage implicit Gauss-Legendre collocation (fourth order)
    RungeKuttaGaussLegendre4,

    // Richardson extrapolation
    RichardsonExtrapolation2,
    RichardsonExtrapolation3,

    // Multi-step
    AdamsBashforth2,
    AdamsMoulton2,
}

impl SolverType {
    /// First valid raw discriminant
    pub const BEGIN: i32 = 1;

    /// One past the last valid raw discriminant
    pub const END: i32 = 13;

    /// Every dispatchable solver type, in discriminant order
    pub const ALL: [SolverType; 12] = [
        SolverType::ExplicitEuler,
        SolverType::ImplicitEuler,
        SolverType::CrankNicolson,
        SolverType::RungeKuttaRalston,
        SolverType::RungeKutta3,
        SolverType::RungeKutta4,
        SolverType::RungeKuttaThreeEight,
        SolverType::RungeKuttaGaussLegendre4,
        SolverType::RichardsonExtrapolation2,
        SolverType::RichardsonExtrapolation3,
        SolverType::AdamsBashforth2,
        SolverType::AdamsMoulton2,
    ];

    /// Decode a raw discriminant
    ///
    /// Null, the end sentinel and anything out of range fail with
    /// [`FdError::UnsupportedSolver`].
    pub fn from_raw(raw: i32) -> FdResult<Self> {
        match raw {
            0 => Err(FdError::UnsupportedSolver("Null".to_string())),
            Self::END => Err(FdError::UnsupportedSolver("__END__".to_string())),
            Self::BEGIN..Self::END => Ok(Self::ALL[(raw - Self::BEGIN) as usize]),
            other => Err(FdError::UnsupportedSolver(format!("raw value {}", other))),
        }
    }

    /// Raw discriminant
    pub fn to_raw(self) -> i32 {
        match self {
            SolverType::Null => 0,
            valid => {
                let position = Self::ALL
                    .iter()
                    .position(|candidate| *candidate == valid)
                    .unwrap_or_default();
                Self::BEGIN + position as i32
            }
        }
    }

    /// Number of retained states the method needs (2 for the Adams family, 1 otherwise)
    pub const fn step_order(self) -> usize {
        match self {
            SolverType::AdamsBashforth2 | SolverType::AdamsMoulton2 => 2,
            _ => 1,
        }
    }

    /// Formal order of accuracy in time (0 for Null)
    pub const fn order(self) -> usize {
        match self {
            SolverType::Null => 0,
            SolverType::ExplicitEuler | SolverType::ImplicitEuler => 1,
            SolverType::CrankNicolson
            | SolverType::RungeKuttaRalston
            | SolverType::RichardsonExtrapolation2
            | SolverType::AdamsBashforth2 => 2,
            SolverType::RungeKutta3
            | SolverType::RichardsonExtrapolation3
            | SolverType::AdamsMoulton2 => 3,
            SolverType::RungeKutta4
            | SolverType::RungeKuttaThreeEight
            | SolverType::RungeKuttaGaussLegendre4 => 4,
        }
    }

    /// Spatial-operator evaluations per step, implicit solves excluded
    pub const fn stages(self) -> usize {
        match self {
            SolverType::Null => 0,
            SolverType::ExplicitEuler | SolverType::ImplicitEuler | SolverType::CrankNicolson => 1,
            SolverType::RungeKuttaRalston | SolverType::RungeKuttaGaussLegendre4 => 2,
            SolverType::RungeKutta3 => 3,
            SolverType::RungeKutta4 | SolverType::RungeKuttaThreeEight => 4,
            // F(uₙ) is shared by the dt, dt/2 and dt/4 runs
            SolverType::RichardsonExtrapolation2 => 2,
            SolverType::RichardsonExtrapolation3 => 5,
            SolverType::AdamsBashforth2 | SolverType::AdamsMoulton2 => 1,
        }
    }

    /// Whether a step needs the linear-solve collaborator
    pub const fn is_implicit(self) -> bool {
        matches!(
            self,
            SolverType::ImplicitEuler
                | SolverType::CrankNicolson
                | SolverType::RungeKuttaGaussLegendre4
                | SolverType::AdamsMoulton2
        )
    }

    /// Whether the method reads retained history
    pub const fn is_multistep(self) -> bool {
        self.step_order() > 1
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            SolverType::Null => "Null",
            SolverType::ExplicitEuler => "Explicit Euler",
            SolverType::ImplicitEuler => "Implicit Euler",
            SolverType::CrankNicolson => "Crank-Nicolson",
            SolverType::RungeKuttaRalston => "Runge-Kutta Ralston",
            SolverType::RungeKutta3 => "Runge-Kutta 3",
            SolverType::RungeKutta4 => "Runge-Kutta 4",
            SolverType::RungeKuttaThreeEight => "Runge-Kutta 3/8",
            SolverType::RungeKuttaGaussLegendre4 => "Gauss-Legendre 4",
            SolverType::RichardsonExtrapolation2 => "Richardson Extrapolation 2",
            SolverType::RichardsonExtrapolation3 => "Richardson Extrapolation 3",
            SolverType::AdamsBashforth2 => "Adams-Bashforth 2",
            SolverType::AdamsMoulton2 => "Adams-Moulton 2",
        }
    }
}

impl fmt::Display for SolverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =================================================================================================
// Space Discretizer Type
// =================================================================================================

/// Stencil used to approximate spatial derivatives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpaceDiscretizerType {
    #[default]
    Null,

    /// Central differences for both derivatives
    Centered,

    /// One-sided first derivative picked by the local sign of the velocity
    Upwind,

    /// Centered plus the `dt·v²/2 · ∂²u/∂x²` correction
    LaxWendroff,
}

impl SpaceDiscretizerType {
    /// Decode a raw discriminant
    pub fn from_raw(raw: i32) -> FdResult<Self> {
        match raw {
            1 => Ok(SpaceDiscretizerType::Centered),
            2 => Ok(SpaceDiscretizerType::Upwind),
            3 => Ok(SpaceDiscretizerType::LaxWendroff),
            other => Err(FdError::InvalidDiscretization(format!("raw value {}", other))),
        }
    }
}

impl fmt::Display for SpaceDiscretizerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpaceDiscretizerType::Null => "Null",
            SpaceDiscretizerType::Centered => "Centered",
            SpaceDiscretizerType::Upwind => "Upwind",
            SpaceDiscretizerType::LaxWendroff => "Lax-Wendroff",
        };
        write!(f, "{}", name)
    }
}

// =================================================================================================
// Boundary Condition Type
// =================================================================================================

/// Edge condition family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BoundaryConditionType {
    Null,

    /// Edge value pinned to the configured value
    Dirichlet,

    /// Edge derivative pinned to the configured value
    #[default]
    Neumann,

    /// Edge coupled with the opposite side
    Periodic,
}

impl fmt::Display for BoundaryConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundaryConditionType::Null => "Null",
            BoundaryConditionType::Dirichlet => "Dirichlet",
            BoundaryConditionType::Neumann => "Neumann",
            BoundaryConditionType::Periodic => "Periodic",
        };
        write!(f, "{}", name)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
