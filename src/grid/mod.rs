//! Grid state storage
//!
//! - **`shape`**: `GridShape`, the flat layout shared by 1D and 2D states
//! - **`ops`**: elementwise kernels (linear combinations, point maps) with
//!   Rayon dispatch above the parallel threshold

pub mod ops;
mod shape;

pub use shape::GridShape;
