//! Core traits for the word kernel

use crate::core::Symbol;

/// Read-only access to a set of sorted symbol sequences
///
/// The kernel binds to stores through `Arc`, never copies the sequences and
/// relies on each returned slice being sorted in non-decreasing order.
pub trait SequenceStore: Send + Sync {
    /// Number of sequences in the set
    fn len(&self) -> usize;

    /// Get the sorted sequence at `index`
    ///
    /// # Panics
    /// Panics if index >= len()
    fn sequence(&self, index: usize) -> &[Symbol];

    /// Check if the set holds no sequences
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
