//! Sequence set implementations
//!
//! This module provides an in-memory implementation of the SequenceStore
//! trait together with loaders for word and DNA text files.

pub mod words;

pub use self::words::*;
