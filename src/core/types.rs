//! Core type definitions for the word kernel

use crate::core::{KernelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single word of a sequence (e.g. an encoded k-mer)
pub type Symbol = u16;

/// Number of distinct symbol values, one dictionary slot each
pub const DICTIONARY_SIZE: usize = 1 << Symbol::BITS;

/// Floor applied to a zero self-similarity so normalization never divides by zero
pub const DIAGONAL_EPSILON: f64 = 1e-16;

/// Normalization applied to raw kernel values
///
/// With `a` and `b` the two sequences, `d` the square root of a sequence's
/// self-similarity and `|x|` a sequence length:
///
/// | variant          | K(a, b)                    |
/// |------------------|----------------------------|
/// | `None`           | raw                        |
/// | `SqrtDiagonal`   | raw / √(d_a · d_b)         |
/// | `FullDiagonal`   | raw / (d_a · d_b)          |
/// | `SqrtSqrtLength` | raw / √√(\|a\| · \|b\|)    |
/// | `SqrtLength`     | raw / √(\|a\| · \|b\|)     |
/// | `Length`         | raw / (\|a\| · \|b\|)      |
///
/// Every formula factors into a left and a right half, which is what lets the
/// explicit feature map fold the left half in at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "sqrt")]
    SqrtDiagonal,
    #[default]
    #[serde(rename = "full")]
    FullDiagonal,
    #[serde(rename = "sqrtlen")]
    SqrtSqrtLength,
    #[serde(rename = "len")]
    SqrtLength,
    #[serde(rename = "sqlen")]
    Length,
}

impl Normalization {
    pub const ALL: [Normalization; 6] = [
        Normalization::None,
        Normalization::SqrtDiagonal,
        Normalization::FullDiagonal,
        Normalization::SqrtSqrtLength,
        Normalization::SqrtLength,
        Normalization::Length,
    ];

    /// Normalize a raw pairwise value
    ///
    /// `diag_a` and `diag_b` are the square roots of both self-similarities.
    /// A pair involving an empty sequence has a raw value of zero and is
    /// returned unchanged.
    pub fn pair(self, raw: f64, len_a: usize, len_b: usize, diag_a: f64, diag_b: f64) -> f64 {
        if len_a == 0 || len_b == 0 {
            return raw;
        }
        let lengths = len_a as f64 * len_b as f64;

        match self {
            Normalization::None => raw,
            Normalization::SqrtDiagonal => raw / (diag_a * diag_b).sqrt(),
            Normalization::FullDiagonal => raw / (diag_a * diag_b),
            Normalization::SqrtSqrtLength => raw / lengths.sqrt().sqrt(),
            Normalization::SqrtLength => raw / lengths.sqrt(),
            Normalization::Length => raw / lengths,
        }
    }

    /// Apply one side of the pairwise formula to `value`
    pub fn one_sided(self, value: f64, len: usize, diag: f64) -> f64 {
        if len == 0 {
            return value;
        }
        let len = len as f64;

        match self {
            Normalization::None => value,
            Normalization::SqrtDiagonal => value / diag.sqrt(),
            Normalization::FullDiagonal => value / diag,
            Normalization::SqrtSqrtLength => value / len.sqrt().sqrt(),
            Normalization::SqrtLength => value / len.sqrt(),
            Normalization::Length => value / len,
        }
    }

    /// Short name used on the command line and in reports
    pub fn as_str(self) -> &'static str {
        match self {
            Normalization::None => "none",
            Normalization::SqrtDiagonal => "sqrt",
            Normalization::FullDiagonal => "full",
            Normalization::SqrtSqrtLength => "sqrtlen",
            Normalization::SqrtLength => "len",
            Normalization::Length => "sqlen",
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Normalization {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Normalization::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| KernelError::InvalidParameter(format!("Unknown normalization: {s}")))
    }
}

impl TryFrom<u8> for Normalization {
    type Error = KernelError;

    /// Decode the numeric mode codes 0..=5 in declaration order
    fn try_from(code: u8) -> Result<Self> {
        Normalization::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| {
                KernelError::InvalidParameter(format!("Unknown normalization code: {code}"))
            })
    }
}

/// Construction-time configuration of a word kernel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Count each shared word once instead of multiplying occurrence counts
    pub use_sign: bool,
    /// Normalization applied to kernel values
    pub normalization: Normalization,
    /// Capacity of the kernel value cache in entries, 0 disables it
    pub cache_entries: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            use_sign: false,
            normalization: Normalization::default(),
            cache_entries: 0,
        }
    }
}

impl KernelConfig {
    pub fn with_sign(mut self, use_sign: bool) -> Self {
        self.use_sign = use_sign;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_cache_entries(mut self, cache_entries: usize) -> Self {
        self.cache_entries = cache_entries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dictionary_size() {
        assert_eq!(DICTIONARY_SIZE, 65536);
    }

    #[test]
    fn test_normalization_parsing() {
        for mode in Normalization::ALL {
            assert_eq!(mode.as_str().parse::<Normalization>().unwrap(), mode);
        }
        assert!(matches!(
            "cosine".parse::<Normalization>(),
            Err(KernelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_normalization_codes() {
        assert_eq!(Normalization::try_from(0u8).unwrap(), Normalization::None);
        assert_eq!(Normalization::try_from(2u8).unwrap(), Normalization::FullDiagonal);
        assert_eq!(Normalization::try_from(5u8).unwrap(), Normalization::Length);
        assert!(matches!(
            Normalization::try_from(6u8),
            Err(KernelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_pair_formulas() {
        let raw = 12.0;
        assert_eq!(Normalization::None.pair(raw, 4, 9, 2.0, 8.0), 12.0);
        assert_relative_eq!(Normalization::SqrtDiagonal.pair(raw, 4, 9, 2.0, 8.0), 3.0);
        assert_relative_eq!(Normalization::FullDiagonal.pair(raw, 4, 9, 2.0, 8.0), 0.75);
        assert_relative_eq!(
            Normalization::SqrtSqrtLength.pair(raw, 4, 4, 1.0, 1.0),
            6.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(Normalization::SqrtLength.pair(raw, 4, 9, 1.0, 1.0), 2.0);
        assert_relative_eq!(Normalization::Length.pair(raw, 4, 3, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_pair_factors_into_one_sided_halves() {
        for mode in Normalization::ALL {
            let pair = mode.pair(7.0, 5, 3, 2.5, 1.5);
            let split = mode.one_sided(mode.one_sided(7.0, 5, 2.5), 3, 1.5);
            assert_relative_eq!(pair, split, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_sequence_is_not_normalized() {
        assert_eq!(Normalization::Length.pair(0.0, 0, 3, 1.0, 1.0), 0.0);
        assert_eq!(Normalization::SqrtLength.one_sided(0.0, 0, 1.0), 0.0);
    }

    #[test]
    fn test_kernel_config_builder() {
        let config = KernelConfig::default()
            .with_sign(true)
            .with_normalization(Normalization::None)
            .with_cache_entries(128);

        assert!(config.use_sign);
        assert_eq!(config.normalization, Normalization::None);
        assert_eq!(config.cache_entries, 128);

        let default = KernelConfig::default();
        assert!(!default.use_sign);
        assert_eq!(default.normalization, Normalization::FullDiagonal);
        assert_eq!(default.cache_entries, 0);
    }
}
