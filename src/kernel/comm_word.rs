//! Common word kernel
//!
//! Compares two sorted word sequences by the words they share:
//! K(a, b) = Σ_w count_a(w) · count_b(w), or the number of shared distinct
//! words in sign mode. Sorted input lets a single two-pointer merge find every
//! shared word in O(|a| + |b|) without building a feature vector.
//!
//! The kernel also implements [`LinearAdd`]: a weighted sum of left examples
//! is folded into a dense table indexed by word, so
//! Σ_i w_i K(i, j) costs one pass over rhs[j] instead of one merge per i.

use crate::cache::{CacheStats, ScoreCache};
use crate::core::{
    KernelConfig, KernelError, Normalization, Result, SequenceStore, Symbol, DICTIONARY_SIZE,
};
use crate::kernel::diagonal::{sqrt_diagonal, LeftDiagonal, RightDiagonal};
use crate::kernel::dictionary::{runs, DictionaryWeights};
use crate::kernel::{Kernel, LinearAdd};
use log::debug;
use std::io::{Read, Write};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Binding lifecycle of a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    /// No sequence sets bound
    Unbound,
    /// Building the normalization caches; kernel values are raw
    ComputingDiagonal,
    /// Caches complete; kernel values are normalized
    Ready,
}

/// Kernel over sorted word sequences with an explicit feature map
pub struct CommWordKernel<S: SequenceStore> {
    config: KernelConfig,
    lhs: Option<Arc<S>>,
    rhs: Option<Arc<S>>,
    state: BindState,
    sqrtdiag_lhs: LeftDiagonal,
    sqrtdiag_rhs: RightDiagonal,
    dictionary: DictionaryWeights,
    cache: Option<ScoreCache>,
}

impl<S: SequenceStore> CommWordKernel<S> {
    /// Create an unbound kernel
    pub fn new(config: KernelConfig) -> Self {
        debug!("using dictionary of {DICTIONARY_SIZE} words");

        let cache = NonZeroUsize::new(config.cache_entries).map(ScoreCache::new);

        Self {
            config,
            lhs: None,
            rhs: None,
            state: BindState::Unbound,
            sqrtdiag_lhs: LeftDiagonal::default(),
            sqrtdiag_rhs: RightDiagonal::default(),
            dictionary: DictionaryWeights::new(),
            cache,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn use_sign(&self) -> bool {
        self.config.use_sign
    }

    pub fn normalization(&self) -> Normalization {
        self.config.normalization
    }

    pub fn state(&self) -> BindState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == BindState::Ready
    }

    /// Whether the right normalization cache is the left one
    pub fn rhs_is_aliased(&self) -> bool {
        self.sqrtdiag_rhs.is_alias()
    }

    /// Normalization cache entry of the i-th left example
    pub fn sqrtdiag_lhs(&self, i: usize) -> Result<f64> {
        let lhs = self.lhs.as_deref().ok_or(KernelError::Unbound)?;
        check_index(i, lhs.len())?;
        Ok(self.sqrtdiag_lhs.get(i))
    }

    /// Normalization cache entry of the j-th right example
    pub fn sqrtdiag_rhs(&self, j: usize) -> Result<f64> {
        let rhs = self.rhs.as_deref().ok_or(KernelError::Unbound)?;
        check_index(j, rhs.len())?;
        Ok(self.sqrtdiag_rhs.get(&self.sqrtdiag_lhs, j))
    }

    /// Number of words carrying weight in the feature map
    pub fn optimization_words(&self) -> usize {
        self.dictionary.nonzero()
    }

    /// Compute K(i, j) through the kernel value cache
    ///
    /// Without a configured cache this is `compute`.
    pub fn compute_cached(&mut self, i: usize, j: usize) -> Result<f64> {
        if let Some(value) = self.cache.as_mut().and_then(|cache| cache.get(i, j)) {
            return Ok(value);
        }

        let value = self.compute(i, j)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.put(i, j, value);
        }
        Ok(value)
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ScoreCache::stats)
    }

    /// Restore precomputed kernel state; not supported by this kernel
    pub fn load_state<R: Read>(&mut self, _source: R) -> Result<()> {
        Err(KernelError::PersistenceUnsupported)
    }

    /// Save precomputed kernel state; not supported by this kernel
    pub fn save_state<W: Write>(&self, _dest: W) -> Result<()> {
        Err(KernelError::PersistenceUnsupported)
    }

    fn reset_cache(&mut self, symmetric: bool) {
        if let Some(cache) = self.cache.as_mut() {
            cache.reset(symmetric);
        }
    }

    fn release_binding(&mut self) {
        self.delete_optimization();
        self.reset_cache(false);

        // An aliased right cache owns nothing, so replacing both is enough
        self.sqrtdiag_rhs = RightDiagonal::default();
        self.sqrtdiag_lhs = LeftDiagonal::default();

        self.lhs = None;
        self.rhs = None;
        self.state = BindState::Unbound;
    }
}

impl<S: SequenceStore> Kernel for CommWordKernel<S> {
    type Store = S;

    fn init(&mut self, lhs: Arc<S>, rhs: Arc<S>) -> Result<()> {
        self.release_binding();

        let symmetric = Arc::ptr_eq(&lhs, &rhs);
        self.sqrtdiag_lhs = LeftDiagonal::neutral(lhs.len());
        self.sqrtdiag_rhs = if symmetric {
            RightDiagonal::AliasOfLeft
        } else {
            RightDiagonal::neutral(rhs.len())
        };

        self.state = BindState::ComputingDiagonal;

        fill_diagonal(self.sqrtdiag_lhs.values_mut(), &*lhs, self.config.use_sign);
        if let RightDiagonal::Owned(values) = &mut self.sqrtdiag_rhs {
            fill_diagonal(values, &*rhs, self.config.use_sign);
        }

        self.lhs = Some(lhs);
        self.rhs = Some(rhs);
        self.reset_cache(symmetric);
        self.state = BindState::Ready;

        debug!(
            "word kernel bound: {} x {} sequences{}",
            self.num_lhs(),
            self.num_rhs(),
            if symmetric { " (symmetric)" } else { "" }
        );
        Ok(())
    }

    fn remove_lhs(&mut self) {
        self.release_binding();
    }

    fn remove_rhs(&mut self) {
        self.delete_optimization();

        let Some(lhs) = self.lhs.as_ref() else {
            return;
        };
        self.rhs = Some(Arc::clone(lhs));
        self.sqrtdiag_rhs = RightDiagonal::AliasOfLeft;
        self.reset_cache(true);
    }

    fn cleanup(&mut self) {
        self.release_binding();
    }

    fn compute(&self, i: usize, j: usize) -> Result<f64> {
        if self.state == BindState::Unbound {
            return Err(KernelError::Unbound);
        }
        let (Some(lhs), Some(rhs)) = (self.lhs.as_deref(), self.rhs.as_deref()) else {
            return Err(KernelError::Unbound);
        };

        let a = checked_sequence(lhs, i)?;
        let b = checked_sequence(rhs, j)?;
        let raw = raw_score(a, b, self.config.use_sign);

        if self.state == BindState::ComputingDiagonal {
            return Ok(raw);
        }

        Ok(self.config.normalization.pair(
            raw,
            a.len(),
            b.len(),
            self.sqrtdiag_lhs.get(i),
            self.sqrtdiag_rhs.get(&self.sqrtdiag_lhs, j),
        ))
    }

    fn num_lhs(&self) -> usize {
        self.lhs.as_deref().map_or(0, SequenceStore::len)
    }

    fn num_rhs(&self) -> usize {
        self.rhs.as_deref().map_or(0, SequenceStore::len)
    }
}

impl<S: SequenceStore> LinearAdd for CommWordKernel<S> {
    fn init_optimization(&mut self, indices: &[usize], weights: &[f64]) -> Result<()> {
        self.delete_optimization();

        if indices.len() != weights.len() {
            return Err(KernelError::DimensionMismatch {
                expected: indices.len(),
                actual: weights.len(),
            });
        }

        let count = indices.len();
        if count == 0 {
            debug!("empty set of support vectors");
            self.dictionary.set_initialized(true);
            return Ok(());
        }

        if self.state != BindState::Ready {
            return Err(KernelError::Unbound);
        }
        let lhs = self.lhs.as_deref().ok_or(KernelError::Unbound)?;
        for &idx in indices {
            check_index(idx, lhs.len())?;
        }

        debug!("initializing word kernel optimization over {count} vectors");

        let use_sign = self.config.use_sign;
        let normalization = self.config.normalization;
        let step = count / 10 + 1;

        for (k, (&idx, &weight)) in indices.iter().zip(weights).enumerate() {
            if k % step == 0 {
                debug!("optimization progress: {k}/{count}");
            }

            let sequence = lhs.sequence(idx);
            let diag = self.sqrtdiag_lhs.get(idx);
            for (symbol, run) in runs(sequence) {
                let value = if use_sign { weight } else { weight * run as f64 };
                self.dictionary
                    .add(symbol, normalization.one_sided(value, sequence.len(), diag));
            }
        }

        self.dictionary.set_initialized(true);
        debug!("word kernel optimization done");
        Ok(())
    }

    fn delete_optimization(&mut self) {
        self.dictionary.clear();
    }

    fn compute_optimized(&self, j: usize) -> Result<f64> {
        if !self.dictionary.is_initialized() {
            return Err(KernelError::OptimizationNotInitialized);
        }
        let rhs = self.rhs.as_deref().ok_or(KernelError::Unbound)?;
        let sequence = checked_sequence(rhs, j)?;

        let use_sign = self.config.use_sign;
        let sum: f64 = runs(sequence)
            .map(|(symbol, run)| {
                let weight = self.dictionary.weight(symbol);
                if use_sign {
                    weight
                } else {
                    weight * run as f64
                }
            })
            .sum();

        Ok(self.config.normalization.one_sided(
            sum,
            sequence.len(),
            self.sqrtdiag_rhs.get(&self.sqrtdiag_lhs, j),
        ))
    }

    fn is_optimization_ready(&self) -> bool {
        self.dictionary.is_initialized()
    }
}

/// Raw kernel value of two sorted sequences
///
/// Merges both sequences once; each word present in both contributes the
/// product of its run lengths, or 1 in sign mode.
pub fn raw_score(a: &[Symbol], b: &[Symbol], use_sign: bool) -> f64 {
    let mut result = 0.0;
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        let x = a[i];
        let y = b[j];

        if x == y {
            let run_a = a[i..].iter().take_while(|&&s| s == x).count();
            let run_b = b[j..].iter().take_while(|&&s| s == x).count();
            i += run_a;
            j += run_b;

            result += if use_sign {
                1.0
            } else {
                run_a as f64 * run_b as f64
            };
        } else if x < y {
            i += 1;
        } else {
            j += 1;
        }
    }

    result
}

fn fill_diagonal<S: SequenceStore + ?Sized>(values: &mut [f64], set: &S, use_sign: bool) {
    for (i, value) in values.iter_mut().enumerate() {
        let sequence = set.sequence(i);
        let (diag, floored) = sqrt_diagonal(raw_score(sequence, sequence, use_sign));
        if floored {
            debug!("sequence {i} has zero self-similarity, normalizing with epsilon");
        }
        *value = diag;
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(KernelError::IndexOutOfRange { index, len })
    }
}

fn checked_sequence<S: SequenceStore + ?Sized>(set: &S, index: usize) -> Result<&[Symbol]> {
    check_index(index, set.len())?;
    Ok(set.sequence(index))
}
