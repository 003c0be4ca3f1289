//! Kernel trait definitions

use crate::core::Result;
use std::sync::Arc;

/// Kernel bound to a left (training) and a right (query) sequence set
///
/// Values are addressed by index: `compute(i, j)` compares the i-th sequence
/// of the left set with the j-th sequence of the right set.
pub trait Kernel {
    /// The sequence set type the kernel binds to
    type Store;

    /// Bind the kernel to a pair of sets and precompute per-example state
    ///
    /// Passing the same `Arc` on both sides selects the symmetric
    /// (train-vs-train) case.
    fn init(&mut self, lhs: Arc<Self::Store>, rhs: Arc<Self::Store>) -> Result<()>;

    /// Unbind both sides
    fn remove_lhs(&mut self);

    /// Unbind the right side, leaving the left set bound against itself
    fn remove_rhs(&mut self);

    /// Release all per-binding state. Safe to call repeatedly.
    fn cleanup(&mut self);

    /// Compute kernel value K(lhs[i], rhs[j])
    fn compute(&self, i: usize, j: usize) -> Result<f64>;

    /// Number of sequences on the left side, 0 when unbound
    fn num_lhs(&self) -> usize;

    /// Number of sequences on the right side, 0 when unbound
    fn num_rhs(&self) -> usize;
}

/// Kernels whose weighted sums over left examples collapse into an explicit feature map
///
/// After `init_optimization(indices, weights)`,
/// `compute_optimized(j) == Σ weights[k] * compute(indices[k], j)` in time
/// proportional to the length of `rhs[j]` alone.
pub trait LinearAdd: Kernel {
    /// Fold the weighted left examples into the feature map
    fn init_optimization(&mut self, indices: &[usize], weights: &[f64]) -> Result<()>;

    /// Reset the feature map
    fn delete_optimization(&mut self);

    /// Evaluate the feature map against `rhs[j]`
    fn compute_optimized(&self, j: usize) -> Result<f64>;

    /// Whether the feature map may be evaluated
    fn is_optimization_ready(&self) -> bool;
}
