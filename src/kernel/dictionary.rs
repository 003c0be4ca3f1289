//! Dense per-word weight table backing the explicit feature map

use crate::core::{Symbol, DICTIONARY_SIZE};

/// One accumulated weight per possible symbol value
pub struct DictionaryWeights {
    weights: Box<[f64]>,
    initialized: bool,
}

impl DictionaryWeights {
    /// Create a cleared table
    pub fn new() -> Self {
        Self {
            weights: vec![0.0; DICTIONARY_SIZE].into_boxed_slice(),
            initialized: false,
        }
    }

    /// Zero every weight and mark the table as not initialized
    pub fn clear(&mut self) {
        self.weights.fill(0.0);
        self.initialized = false;
    }

    #[inline]
    pub fn add(&mut self, symbol: Symbol, weight: f64) {
        self.weights[symbol as usize] += weight;
    }

    #[inline]
    pub fn weight(&self, symbol: Symbol) -> f64 {
        self.weights[symbol as usize]
    }

    pub fn set_initialized(&mut self, initialized: bool) {
        self.initialized = initialized;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of symbols carrying a non-zero weight
    pub fn nonzero(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }
}

impl Default for DictionaryWeights {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterate the maximal runs of equal symbols in a sorted sequence
///
/// Yields `(symbol, run_length)` pairs in order.
pub fn runs(sequence: &[Symbol]) -> impl Iterator<Item = (Symbol, usize)> + '_ {
    sequence
        .chunk_by(|a, b| a == b)
        .map(|run| (run[0], run.len()))
}
