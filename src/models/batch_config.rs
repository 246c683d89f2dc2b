use crate::error::BatchConfigError;

/// Settings read from a batch configuration file.
///
/// The file holds two whitespace-separated integers: the algorithm index
/// and the colored flag (`0` grayscale, `1` colored). Anything after the
/// second integer is ignored.
///
/// Parsing is deliberately strict: a flag such as `2` or `-1` is not
/// coerced to colored, and a token such as `5abc` is not read as `5`.
/// Both make the file malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub algorithm: usize,
    pub colored: bool,
}

impl BatchConfig {
    /// Parse the configuration text, validating the index against the
    /// number of available algorithms.
    pub fn parse(text: &str, algorithm_count: usize) -> Result<Self, BatchConfigError> {
        let mut tokens = text.split_whitespace();

        let index = tokens.next().ok_or(BatchConfigError::Empty)?;
        let index: i64 = index
            .parse()
            .map_err(|_| BatchConfigError::InvalidIndex(index.to_string()))?;
        let algorithm = usize::try_from(index)
            .ok()
            .filter(|&i| i < algorithm_count)
            .ok_or(BatchConfigError::IndexOutOfRange {
                index,
                count: algorithm_count,
            })?;

        let colored = match tokens.next() {
            None => return Err(BatchConfigError::MissingColoredFlag),
            Some("0") => false,
            Some("1") => true,
            Some(other) => return Err(BatchConfigError::InvalidColoredFlag(other.to_string())),
        };

        Ok(Self { algorithm, colored })
    }
}
