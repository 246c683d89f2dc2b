//! Error types for threshold matrix validation

use std::fmt;

/// Error type for threshold matrix validation.
///
/// Returned by [`ThresholdMatrix::new`](super::ThresholdMatrix::new) and
/// [`ThresholdMatrix::from_rows`](super::ThresholdMatrix::from_rows) when
/// the supplied table cannot tile an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Side length of zero
    ZeroSize,
    /// Flat table length is not `size * size`
    NotSquare {
        /// Declared side length
        size: usize,
        /// Number of entries supplied
        len: usize,
    },
    /// A row in a nested table has the wrong length
    RaggedRow {
        /// Index of the offending row
        row: usize,
        /// Its length
        len: usize,
        /// Expected length (the number of rows)
        expected: usize,
    },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::ZeroSize => write!(f, "threshold matrix cannot be empty"),
            MatrixError::NotSquare { size, len } => write!(
                f,
                "threshold matrix of side {} needs {} entries, got {}",
                size,
                size * size,
                len
            ),
            MatrixError::RaggedRow { row, len, expected } => write!(
                f,
                "threshold matrix row {} has {} entries, expected {}",
                row, len, expected
            ),
        }
    }
}

impl std::error::Error for MatrixError {}
