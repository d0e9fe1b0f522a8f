//! Error types for loading a farm.
//!
//! Gameplay precondition failures live next to the operations that raise them
//! in `farm-sim`; the errors here are the fatal, load-time kind.

use thiserror::Error;

/// Top-level error type for building a farm from files.
#[derive(Debug, Error)]
pub enum FarmError {
    /// Map description errors
    #[error("Map error: {0}")]
    Map(#[from] MapError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed map description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The description has no rows
    #[error("Map is empty")]
    Empty,

    /// A row differs in length from the first row
    #[error("Row {row} has {actual} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of this row
        actual: usize,
    },

    /// A character that maps to no tile kind
    #[error("Unknown tile code {code:?} at ({row}, {col})")]
    UnknownTile {
        /// Offending character
        code: char,
        /// Zero-based row index
        row: usize,
        /// Zero-based column index
        col: usize,
    },
}

/// Result type alias for farm loading.
pub type FarmResult<T> = Result<T, FarmError>;
