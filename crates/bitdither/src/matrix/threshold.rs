//! Runtime-sized square threshold table.

use std::borrow::Cow;

use super::MatrixError;

/// An N x N table of byte thresholds, tiled across the image.
///
/// The table is stored flat with the pixel column as the outer index:
/// the threshold for pixel `(x, y)` is `table[(x % N) * N + (y % N)]`.
/// A matrix is read-only once built; validation happens in the
/// constructors so the per-pixel lookup never fails.
///
/// # Example
///
/// ```
/// use bitdither::ThresholdMatrix;
///
/// let m = ThresholdMatrix::new(2, vec![0, 128, 192, 64]).unwrap();
/// assert_eq!(m.threshold(1, 0), 192);
/// assert_eq!(m.threshold(3, 2), 192); // tiles with period 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdMatrix {
    size: usize,
    table: Cow<'static, [u8]>,
}

impl ThresholdMatrix {
    /// Build a matrix from a flat table of `size * size` thresholds.
    pub fn new(size: usize, table: Vec<u8>) -> Result<Self, MatrixError> {
        if size == 0 {
            return Err(MatrixError::ZeroSize);
        }
        if table.len() != size * size {
            return Err(MatrixError::NotSquare {
                size,
                len: table.len(),
            });
        }
        Ok(Self {
            size,
            table: Cow::Owned(table),
        })
    }

    /// Build a matrix from nested rows, outer index first.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let size = rows.len();
        if size == 0 {
            return Err(MatrixError::ZeroSize);
        }
        let mut table = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(MatrixError::RaggedRow {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            table.extend_from_slice(values);
        }
        Self::new(size, table)
    }

    /// Compile-time constructor for the built-in tables.
    pub(super) const fn from_static(size: usize, table: &'static [u8]) -> Self {
        assert!(size > 0 && table.len() == size * size);
        Self {
            size,
            table: Cow::Borrowed(table),
        }
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Flat table, outer index first.
    #[inline]
    pub fn table(&self) -> &[u8] {
        &self.table
    }

    /// Threshold for pixel `(x, y)`; periodic with period N on both axes.
    #[inline]
    pub fn threshold(&self, x: usize, y: usize) -> u8 {
        self.table[(x % self.size) * self.size + (y % self.size)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_size() {
        assert_eq!(ThresholdMatrix::new(0, vec![]), Err(MatrixError::ZeroSize));
        let empty: [[u8; 0]; 0] = [];
        assert_eq!(ThresholdMatrix::from_rows(&empty), Err(MatrixError::ZeroSize));
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert_eq!(
            ThresholdMatrix::new(3, vec![0; 8]),
            Err(MatrixError::NotSquare { size: 3, len: 8 })
        );
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![0u8, 1], vec![2u8]];
        assert_eq!(
            ThresholdMatrix::from_rows(&rows),
            Err(MatrixError::RaggedRow {
                row: 1,
                len: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_from_rows_matches_flat() {
        let nested = ThresholdMatrix::from_rows(&[[0u8, 128], [192, 64]]).unwrap();
        let flat = ThresholdMatrix::new(2, vec![0, 128, 192, 64]).unwrap();
        assert_eq!(nested, flat);
        assert_eq!(nested, crate::matrix::BAYER_2X2);
    }

    #[test]
    fn test_periodicity() {
        let m = ThresholdMatrix::new(3, (0..9).map(|v| v * 20).collect()).unwrap();
        for x in 0..9 {
            for y in 0..9 {
                assert_eq!(m.threshold(x, y), m.threshold(x + 3, y));
                assert_eq!(m.threshold(x, y), m.threshold(x, y + 3));
            }
        }
    }

    #[test]
    fn test_one_by_one() {
        let m = ThresholdMatrix::new(1, vec![100]).unwrap();
        assert_eq!(m.threshold(0, 0), 100);
        assert_eq!(m.threshold(57, 13), 100);
    }

    #[test]
    fn test_error_display() {
        let err = MatrixError::NotSquare { size: 2, len: 3 };
        assert_eq!(err.to_string(), "threshold matrix of side 2 needs 4 entries, got 3");
    }
}
