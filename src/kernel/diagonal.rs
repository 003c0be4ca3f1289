//! Per-example normalization caches
//!
//! Each example keeps the square root of its raw self-similarity. When the
//! kernel is bound to the same set on both sides the right cache is an alias of
//! the left one: it owns no storage and every lookup resolves through the left
//! cache, so there is nothing to release twice.

use crate::core::DIAGONAL_EPSILON;

/// Square roots of the left set's self-similarities
#[derive(Debug, Clone, Default)]
pub struct LeftDiagonal {
    values: Vec<f64>,
}

/// Square roots of the right set's self-similarities, owned or aliased
#[derive(Debug, Clone, Default)]
pub enum RightDiagonal {
    #[default]
    AliasOfLeft,
    Owned(Vec<f64>),
}

impl LeftDiagonal {
    /// Create a cache of `len` neutral entries
    pub fn neutral(len: usize) -> Self {
        Self {
            values: vec![1.0; len],
        }
    }

    pub fn get(&self, i: usize) -> f64 {
        self.values[i]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }
}

impl RightDiagonal {
    /// Create an owned cache of `len` neutral entries
    pub fn neutral(len: usize) -> Self {
        RightDiagonal::Owned(vec![1.0; len])
    }

    pub fn get(&self, left: &LeftDiagonal, j: usize) -> f64 {
        match self {
            RightDiagonal::AliasOfLeft => left.get(j),
            RightDiagonal::Owned(values) => values[j],
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, RightDiagonal::AliasOfLeft)
    }
}

/// Turn a raw self-similarity into a cache entry
///
/// Returns the entry and whether it had to be floored.
pub fn sqrt_diagonal(raw: f64) -> (f64, bool) {
    let value = raw.sqrt();
    if value == 0.0 {
        (DIAGONAL_EPSILON, true)
    } else {
        (value, false)
    }
}
