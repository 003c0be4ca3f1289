//! In-memory word sequence sets
//!
//! Supports loading sequences in a whitespace separated text format:
//! label symbol symbol ...
//!
//! Example:
//! +1 17 4 4 250
//! -0.5 3 3 9
//!
//! Symbols are sorted on construction, so the kernel can rely on sorted input.

use crate::core::{KernelError, Result, SequenceStore, Symbol};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Largest k-mer order whose 2-bit encoding fits in a symbol
pub const MAX_DNA_ORDER: usize = Symbol::BITS as usize / 2;

/// A set of sorted word sequences with one label per sequence
#[derive(Debug, Clone, Default)]
pub struct SequenceSet {
    sequences: Vec<Vec<Symbol>>,
    labels: Vec<f64>,
}

impl SequenceSet {
    /// Create a set from unsorted sequences, labelling every sequence 0
    pub fn new(sequences: Vec<Vec<Symbol>>) -> Self {
        let labels = vec![0.0; sequences.len()];
        Self::build(sequences, labels)
    }

    /// Create a set with one label per sequence
    pub fn with_labels(sequences: Vec<Vec<Symbol>>, labels: Vec<f64>) -> Result<Self> {
        if sequences.len() != labels.len() {
            return Err(KernelError::DimensionMismatch {
                expected: sequences.len(),
                actual: labels.len(),
            });
        }
        Ok(Self::build(sequences, labels))
    }

    fn build(mut sequences: Vec<Vec<Symbol>>, labels: Vec<f64>) -> Self {
        for sequence in &mut sequences {
            sequence.sort_unstable();
        }
        Self { sequences, labels }
    }

    /// Encode DNA strings as overlapping k-mers of the given order
    ///
    /// Each base takes two bits (A=0, C=1, G=2, T=3, case insensitive), so
    /// `order` must lie in `1..=MAX_DNA_ORDER`. Strings shorter than `order`
    /// produce empty sequences.
    pub fn from_dna<S: AsRef<str>>(strings: &[S], order: usize, labels: Vec<f64>) -> Result<Self> {
        if order == 0 || order > MAX_DNA_ORDER {
            return Err(KernelError::InvalidParameter(format!(
                "k-mer order must be between 1 and {MAX_DNA_ORDER}, got: {order}"
            )));
        }

        let sequences = strings
            .iter()
            .map(|s| encode_kmers(s.as_ref(), order))
            .collect::<Result<Vec<_>>>()?;

        Self::with_labels(sequences, labels)
    }

    /// Load a set from a text file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KernelError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a set from a reader (for testing and flexibility)
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut sequences = Vec::new();
        let mut labels = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(KernelError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (label, sequence) = Self::parse_line(line).map_err(|e| {
                KernelError::ParseError(format!("Error parsing line {}: {}", line_num + 1, e))
            })?;
            labels.push(label);
            sequences.push(sequence);
        }

        if sequences.is_empty() {
            return Err(KernelError::EmptyDataset);
        }

        Ok(Self::build(sequences, labels))
    }

    /// Load DNA strings from a text file, one `label STRING` per line
    pub fn from_dna_file<P: AsRef<Path>>(path: P, order: usize) -> Result<Self> {
        let file = File::open(path).map_err(KernelError::IoError)?;
        let mut strings = Vec::new();
        let mut labels = Vec::new();

        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(KernelError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let (Some(label), Some(dna), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(KernelError::ParseError(format!(
                    "Error parsing line {}: expected `label SEQUENCE`",
                    line_num + 1
                )));
            };
            labels.push(parse_label(label)?);
            strings.push(dna.to_string());
        }

        if strings.is_empty() {
            return Err(KernelError::EmptyDataset);
        }

        Self::from_dna(&strings, order, labels)
    }

    fn parse_line(line: &str) -> Result<(f64, Vec<Symbol>)> {
        let mut parts = line.split_whitespace();
        let label = parse_label(
            parts
                .next()
                .ok_or_else(|| KernelError::ParseError("Empty line".to_string()))?,
        )?;

        let sequence = parts
            .map(|word| {
                word.parse::<Symbol>()
                    .map_err(|_| KernelError::ParseError(format!("Invalid symbol: {word}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((label, sequence))
    }

    /// Labels in sequence order
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Total number of symbols over all sequences
    pub fn total_symbols(&self) -> usize {
        self.sequences.iter().map(Vec::len).sum()
    }
}

impl SequenceStore for SequenceSet {
    fn len(&self) -> usize {
        self.sequences.len()
    }

    fn sequence(&self, index: usize) -> &[Symbol] {
        &self.sequences[index]
    }
}

fn parse_label(label: &str) -> Result<f64> {
    label
        .parse::<f64>()
        .map_err(|_| KernelError::ParseError(format!("Invalid label: {label}")))
}

fn encode_kmers(dna: &str, order: usize) -> Result<Vec<Symbol>> {
    let bases = dna
        .bytes()
        .map(|b| match b.to_ascii_uppercase() {
            b'A' => Ok(0),
            b'C' => Ok(1),
            b'G' => Ok(2),
            b'T' => Ok(3),
            other => Err(KernelError::ParseError(format!(
                "Invalid base: {}",
                other as char
            ))),
        })
        .collect::<Result<Vec<Symbol>>>()?;

    Ok(bases
        .windows(order)
        .map(|window| window.iter().fold(0, |word, &base| (word << 2) | base))
        .collect())
}
