//! Elementwise kernels on flat grid states
//!
//! Every kernel here is a flat map over grid points: each output element only
//! reads inputs at the same index (or, for [`map_points`], an immutable input
//! state), so points can be processed in any order. With the `parallel`
//! feature, vectors longer than [`parallel_threshold()`](crate::solver::parallel_threshold)
//! are processed with Rayon.

use nalgebra::DVector;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::solver::parallel_threshold;

/// `base + Σ cₖ·termₖ`
///
/// # Panics
///
/// Panics when a term does not have the length of `base`.
pub fn linear_combination(base: &DVector<f64>, terms: &[(f64, &DVector<f64>)]) -> DVector<f64> {
    for (_, term) in terms {
        assert_eq!(term.len(), base.len(), "Vector length must match");
    }

    let mut out = base.clone();
    let kernel = |(index, value): (usize, &mut f64)| {
        for (coefficient, term) in terms {
            *value += coefficient * term[index];
        }
    };

    if out.len() > parallel_threshold() {
        #[cfg(feature = "parallel")]
        out.as_mut_slice().par_iter_mut().enumerate().for_each(kernel);
        #[cfg(not(feature = "parallel"))]
        out.iter_mut().enumerate().for_each(kernel);
    } else {
        out.iter_mut().enumerate().for_each(kernel);
    }
    out
}

/// Weighted sum `Σ cₖ·termₖ` (no base)
pub fn weighted_sum(len: usize, terms: &[(f64, &DVector<f64>)]) -> DVector<f64> {
    linear_combination(&DVector::zeros(len), terms)
}

/// Evaluate `f` at the listed indices of a `len`-long vector, zero elsewhere
pub fn map_points<F>(len: usize, indices: &[usize], f: F) -> DVector<f64>
where
    F: Fn(usize) -> f64 + Sync + Send,
{
    let mut out = DVector::zeros(len);

    let values = collect_points(indices, &f);

    for (&index, value) in indices.iter().zip(values) {
        out[index] = value;
    }
    out
}

#[cfg(feature = "parallel")]
fn collect_points<F>(indices: &[usize], f: &F) -> Vec<f64>
where
    F: Fn(usize) -> f64 + Sync + Send,
{
    if indices.len() > parallel_threshold() {
        indices.par_iter().map(|&index| f(index)).collect()
    } else {
        indices.iter().map(|&index| f(index)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn collect_points<F>(indices: &[usize], f: &F) -> Vec<f64>
where
    F: Fn(usize) -> f64 + Sync + Send,
{
    indices.iter().map(|&index| f(index)).collect()
}

/// Index of the first NaN or infinite element
pub fn first_non_finite(values: &DVector<f64>) -> Option<usize> {
    values.iter().position(|value| !value.is_finite())
}
