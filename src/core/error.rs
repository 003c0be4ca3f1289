//! Error types for the word kernel

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Kernel is not bound to sequence sets")]
    Unbound,

    #[error("Kernel optimization not initialized")]
    OptimizationNotInitialized,

    #[error("Index {index} out of range for sequence set of size {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Kernel state persistence is not supported")]
    PersistenceUnsupported,
}

pub type Result<T> = std::result::Result<T, KernelError>;
