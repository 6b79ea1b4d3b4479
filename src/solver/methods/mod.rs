//! Time-integration methods
//!
//! Each method is a free function over a [`SpatialOperator`](crate::space::SpatialOperator),
//! so it serves 1D and 2D problems alike. The functions return the raw next
//! state; the dispatcher applies the boundary conditions, checks for
//! non-finite values and commits.
//!
//! # Available Methods
//!
//! | Module       | Methods | Implicit |
//! |--------------|---------|----------|
//! | `explicit`   | Euler, Ralston, RK3, RK4, 3/8 rule | no |
//! | `implicit`   | implicit Euler, Crank-Nicolson, Gauss-Legendre 4 | yes |
//! | `richardson` | Richardson extrapolation 2 and 3 over Euler | no |
//! | `multistep`  | Adams-Bashforth 2, Adams-Moulton 2 | AM2 only |
//!
//! # Comparison
//!
//! | Method          | Order | F evals/step | Linear solves |
//! |-----------------|-------|--------------|---------------|
//! | Euler           | 1     | 1            | 0 |
//! | RK4             | 4     | 4            | 0 |
//! | Crank-Nicolson  | 2     | 1            | 1 (n unknowns) |
//! | Gauss-Legendre  | 4     | 3            | 1 (2n unknowns) |
//! | Richardson 3    | 3     | 5            | 0 |
//! | Adams-Bashforth | 2     | 1            | 0 |

pub mod explicit;
pub mod implicit;
pub mod multistep;
pub mod richardson;

pub use explicit::ButcherTableau;
