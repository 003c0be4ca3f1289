//! Score reports
//!
//! Kernel matrices and decision values computed by the CLI are written as
//! JSON together with the kernel configuration that produced them.

use crate::core::{KernelConfig, KernelError, Result, SequenceStore};
use crate::kernel::{CommWordKernel, Kernel, LinearAdd};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable result of a kernel run
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Kernel configuration used
    pub config: KernelConfig,
    /// Number of left sequences
    pub num_lhs: usize,
    /// Number of right sequences
    pub num_rhs: usize,
    /// Computed scores
    pub scores: Scores,
    /// Report metadata
    pub metadata: ReportMetadata,
}

/// Scores held by a report
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Scores {
    /// K(i, j) for every left i (rows) and right j (columns)
    Matrix { rows: Vec<Vec<f64>> },
    /// Σ w_i K(i, j) + bias for every right j
    Decision { bias: f64, values: Vec<f64> },
}

/// Metadata for tracking where a report came from
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Library version used to create the report
    pub library_version: String,
    /// Creation timestamp
    pub created_at: String,
}

impl ReportMetadata {
    fn now() -> Self {
        Self {
            library_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl ScoreReport {
    /// Compute the full kernel matrix of a bound kernel
    pub fn matrix<S: SequenceStore>(kernel: &CommWordKernel<S>) -> Result<Self> {
        let rows = (0..kernel.num_lhs())
            .map(|i| {
                (0..kernel.num_rhs())
                    .map(|j| kernel.compute(i, j))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(kernel, Scores::Matrix { rows }))
    }

    /// Evaluate the loaded feature map against every right sequence
    pub fn decision<S: SequenceStore>(kernel: &CommWordKernel<S>, bias: f64) -> Result<Self> {
        let values = (0..kernel.num_rhs())
            .map(|j| kernel.compute_optimized(j).map(|value| value + bias))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(kernel, Scores::Decision { bias, values }))
    }

    fn new<S: SequenceStore>(kernel: &CommWordKernel<S>, scores: Scores) -> Self {
        Self {
            config: kernel.config().clone(),
            num_lhs: kernel.num_lhs(),
            num_rhs: kernel.num_rhs(),
            scores,
            metadata: ReportMetadata::now(),
        }
    }

    /// Save report to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(KernelError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| KernelError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load report from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KernelError::IoError)?;
        let reader = BufReader::new(file);
        let report = serde_json::from_reader(reader)
            .map_err(|e| KernelError::SerializationError(e.to_string()))?;
        Ok(report)
    }

    /// Print report summary
    pub fn print_summary(&self) {
        println!("=== Word Kernel Report ===");
        println!("Normalization: {}", self.config.normalization);
        println!("Sign Mode: {}", self.config.use_sign);
        println!("Left Sequences: {}", self.num_lhs);
        println!("Right Sequences: {}", self.num_rhs);
        match &self.scores {
            Scores::Matrix { rows } => {
                println!("Scores: {} x {} matrix", rows.len(), self.num_rhs);
            }
            Scores::Decision { bias, values } => {
                println!("Scores: {} decision values (bias {bias:.6})", values.len());
            }
        }
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Normalization;
    use crate::data::SequenceSet;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn kernel() -> CommWordKernel<SequenceSet> {
        let lhs = Arc::new(SequenceSet::new(vec![vec![1, 1, 2, 3], vec![1, 2, 2, 3]]));
        let rhs = Arc::new(SequenceSet::new(vec![vec![1, 2, 2, 3], vec![9]]));
        let mut kernel = CommWordKernel::new(
            KernelConfig::default().with_normalization(Normalization::None),
        );
        kernel.init(lhs, rhs).expect("Binding should succeed");
        kernel
    }

    #[test]
    fn test_matrix_report() -> Result<()> {
        let report = ScoreReport::matrix(&kernel())?;

        assert_eq!(report.num_lhs, 2);
        assert_eq!(report.num_rhs, 2);
        match report.scores {
            Scores::Matrix { rows } => assert_eq!(rows, vec![vec![5.0, 0.0], vec![6.0, 0.0]]),
            other => panic!("expected matrix, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_decision_report_requires_optimization() {
        assert!(matches!(
            ScoreReport::decision(&kernel(), 0.0),
            Err(KernelError::OptimizationNotInitialized)
        ));
    }

    #[test]
    fn test_report_round_trip() -> Result<()> {
        let mut kernel = kernel();
        kernel.init_optimization(&[0, 1], &[1.0, -0.5])?;
        let report = ScoreReport::decision(&kernel, 0.25)?;

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        report.save_to_file(temp_file.path())?;
        let loaded = ScoreReport::load_from_file(temp_file.path())?;

        assert_eq!(loaded.config, report.config);
        assert_eq!(loaded.metadata.library_version, env!("CARGO_PKG_VERSION"));
        match loaded.scores {
            // 5 - 0.5 * 6 + 0.25, then 0 + 0.25
            Scores::Decision { bias, values } => {
                assert_eq!(bias, 0.25);
                assert_eq!(values, vec![2.25, 0.25]);
            }
            other => panic!("expected decision values, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_load_invalid_report() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(temp_file.path(), "not json").expect("Failed to write");
        assert!(matches!(
            ScoreReport::load_from_file(temp_file.path()),
            Err(KernelError::SerializationError(_))
        ));
    }
}
