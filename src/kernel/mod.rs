//! Word sequence kernels

pub mod comm_word;
pub mod diagonal;
pub mod dictionary;
pub mod traits;

pub use self::comm_word::*;
pub use self::traits::*;
