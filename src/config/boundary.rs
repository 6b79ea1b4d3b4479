//! Boundary condition model
//!
//! # Design
//!
//! A [`BoundaryCondition`] is a plain value: a [`BoundaryConditionType`] and a
//! scalar. 1D problems carry a [`BoundaryCondition1D`] (left/right pair).
//! 2D problems carry a [`BoundaryCondition2D`], which is a composition of two
//! axis pairs tagged by [`Axis`]:
//!
//! ```text
//!              up (y, upper)
//!           ┌──────────────┐
//!   left    │              │  right
//!  (x,lower)│              │ (x,upper)
//!           └──────────────┘
//!             down (y, lower)
//! ```
//!
//! The y pair reuses the 1D type, with `lower` = down and `upper` = up.
//!
//! # Invariant
//!
//! Periodic conditions couple the two sides of an axis, so both sides must be
//! periodic or neither is. This is validated when the problem input is built
//! (see [`BoundaryCondition1D::validate`]).

use serde::{Deserialize, Serialize};

use crate::config::types::BoundaryConditionType;
use crate::error::ConfigurationError;

// =================================================================================================
// Axis / Side tags
// =================================================================================================

/// Spatial axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Axis label used in error messages
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

/// Side of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left (x) or down (y)
    Lower,
    /// Right (x) or up (y)
    Upper,
}

// =================================================================================================
// Boundary Condition
// =================================================================================================

/// Condition on a single edge
///
/// The default is a zero-flux Neumann condition.
///
/// For Neumann conditions `value` is the derivative `∂u/∂x` (or `∂u/∂y`) along
/// the increasing coordinate, not the outward normal derivative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCondition {
    #[serde(rename = "type")]
    pub kind: BoundaryConditionType,
    #[serde(default)]
    pub value: f64,
}

impl Default for BoundaryCondition {
    fn default() -> Self {
        Self::new(BoundaryConditionType::Neumann, 0.0)
    }
}

impl BoundaryCondition {
    /// Generic constructor
    pub fn new(kind: BoundaryConditionType, value: f64) -> Self {
        Self { kind, value }
    }

    /// Fixed edge value
    pub fn dirichlet(value: f64) -> Self {
        Self::new(BoundaryConditionType::Dirichlet, value)
    }

    /// Fixed edge derivative
    pub fn neumann(derivative: f64) -> Self {
        Self::new(BoundaryConditionType::Neumann, derivative)
    }

    /// Wrap-around coupling (the value is ignored)
    pub fn periodic() -> Self {
        Self::new(BoundaryConditionType::Periodic, 0.0)
    }

    pub fn is_periodic(&self) -> bool {
        self.kind == BoundaryConditionType::Periodic
    }
}

// =================================================================================================
// 1D pair
// =================================================================================================

/// Left/right conditions of one axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundaryCondition1D {
    #[serde(default)]
    pub left: BoundaryCondition,
    #[serde(default)]
    pub right: BoundaryCondition,
}

impl BoundaryCondition1D {
    pub fn new(left: BoundaryCondition, right: BoundaryCondition) -> Self {
        Self { left, right }
    }

    /// Same condition on both sides
    pub fn uniform(condition: BoundaryCondition) -> Self {
        Self::new(condition, condition)
    }

    /// Periodic on both sides
    pub fn periodic() -> Self {
        Self::uniform(BoundaryCondition::periodic())
    }

    /// Condition on one side
    pub fn side(&self, side: Side) -> &BoundaryCondition {
        match side {
            Side::Lower => &self.left,
            Side::Upper => &self.right,
        }
    }

    /// Both sides periodic
    pub fn is_periodic(&self) -> bool {
        self.left.is_periodic() && self.right.is_periodic()
    }

    /// Validate the pair for the axis labelled `axis`
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::NullBoundary`] when a side is Null
    /// - [`ConfigurationError::AsymmetricPeriodic`] when exactly one side is periodic
    pub fn validate(&self, axis: Axis) -> Result<(), ConfigurationError> {
        let (lower_name, upper_name) = match axis {
            Axis::X => ("left", "right"),
            Axis::Y => ("down", "up"),
        };

        if self.left.kind == BoundaryConditionType::Null {
            return Err(ConfigurationError::NullBoundary { side: lower_name });
        }
        if self.right.kind == BoundaryConditionType::Null {
            return Err(ConfigurationError::NullBoundary { side: upper_name });
        }

        if self.left.is_periodic() != self.right.is_periodic() {
            return Err(ConfigurationError::AsymmetricPeriodic { axis: axis.label() });
        }

        Ok(())
    }
}

// =================================================================================================
// 2D composition
// =================================================================================================

/// Conditions of a rectangular 2D domain
///
/// Holds one [`BoundaryCondition1D`] per axis instead of extending the 1D type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundaryCondition2D {
    /// left / right
    #[serde(default)]
    pub x: BoundaryCondition1D,
    /// down / up
    #[serde(default)]
    pub y: BoundaryCondition1D,
}

impl BoundaryCondition2D {
    /// Build from the four edges
    pub fn new(
        left: BoundaryCondition,
        right: BoundaryCondition,
        down: BoundaryCondition,
        up: BoundaryCondition,
    ) -> Self {
        Self {
            x: BoundaryCondition1D::new(left, right),
            y: BoundaryCondition1D::new(down, up),
        }
    }

    /// Build from the two axis pairs
    pub fn from_axes(x: BoundaryCondition1D, y: BoundaryCondition1D) -> Self {
        Self { x, y }
    }

    /// Same condition on every edge
    pub fn uniform(condition: BoundaryCondition) -> Self {
        Self::from_axes(
            BoundaryCondition1D::uniform(condition),
            BoundaryCondition1D::uniform(condition),
        )
    }

    pub fn axis(&self, axis: Axis) -> &BoundaryCondition1D {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    pub fn left(&self) -> &BoundaryCondition {
        &self.x.left
    }

    pub fn right(&self) -> &BoundaryCondition {
        &self.x.right
    }

    pub fn down(&self) -> &BoundaryCondition {
        &self.y.left
    }

    pub fn up(&self) -> &BoundaryCondition {
        &self.y.right
    }

    /// Validate both axes
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.x.validate(Axis::X)?;
        self.y.validate(Axis::Y)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
