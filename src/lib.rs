//! Common word kernels for sequence classification
//!
//! Scores sequences of sorted discrete words (e.g. encoded k-mers) against each
//! other for use in margin-based classifiers, with an explicit feature map that
//! evaluates a weighted sum over many training sequences in one pass.

pub mod cache;
pub mod core;
pub mod data;
pub mod kernel;
pub mod report;

// Re-export main types for convenience
pub use crate::cache::{CacheStats, ScoreCache};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{KernelError, Result};
pub use crate::data::SequenceSet;
pub use crate::kernel::{BindState, CommWordKernel, Kernel, LinearAdd};
pub use crate::report::ScoreReport;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
