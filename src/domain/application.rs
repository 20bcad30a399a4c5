//! Validated patent application numbers and whole-batch validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Required length of an Indian patent application number.
pub const APPLICATION_NUMBER_LEN: usize = 11;

/// Maximum number of applications accepted in a single batch.
pub const MAX_BATCH_SIZE: usize = 100;

/// A validated patent application number: exactly 11 ASCII digits.
///
/// Numbers are validated once on the way in and read-only afterwards, so
/// the rest of the pipeline never re-checks the format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationNumber(String);

impl ApplicationNumber {
    /// Parses a raw candidate, trimming surrounding whitespace first.
    pub fn parse(raw: &str) -> Result<Self, InvalidApplicationNumber> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidApplicationNumber::Empty);
        }
        if trimmed.len() != APPLICATION_NUMBER_LEN
            || !trimmed.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(InvalidApplicationNumber::BadFormat {
                value: trimmed.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a single candidate string is not a valid application number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidApplicationNumber {
    #[error("application number is empty")]
    Empty,

    #[error("application number '{value}' must be exactly 11 digits")]
    BadFormat { value: String },
}

/// Why an uploaded batch was rejected as a whole.
///
/// Validation is all-or-nothing: one bad row rejects the entire batch
/// before the runner is ever invoked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchValidationError {
    #[error("batch contains no application numbers")]
    Empty,

    #[error("batch has {count} applications, the maximum per run is {max}")]
    TooLarge { count: usize, max: usize },

    #[error("row {row}: {source}")]
    InvalidNumber {
        /// 1-based row position within the uploaded column.
        row: usize,
        source: InvalidApplicationNumber,
    },
}

/// Validates an ordered batch of raw candidates into application numbers.
///
/// Input order is preserved. Blank rows are expected to have been dropped
/// by the spreadsheet import already; a blank row here is an error.
pub fn validate_batch<S: AsRef<str>>(
    candidates: &[S],
) -> Result<Vec<ApplicationNumber>, BatchValidationError> {
    if candidates.is_empty() {
        return Err(BatchValidationError::Empty);
    }
    if candidates.len() > MAX_BATCH_SIZE {
        return Err(BatchValidationError::TooLarge {
            count: candidates.len(),
            max: MAX_BATCH_SIZE,
        });
    }

    candidates
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            ApplicationNumber::parse(raw.as_ref())
                .map_err(|source| BatchValidationError::InvalidNumber {
                    row: index + 1,
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("20231234567")]
    #[case("  20231234567  ")]
    #[case("00000000000")]
    fn accepts_eleven_digit_numbers(#[case] raw: &str) {
        let number = ApplicationNumber::parse(raw).unwrap();
        assert_eq!(number.as_str().len(), APPLICATION_NUMBER_LEN);
    }

    #[rstest]
    #[case("2023123456")] // too short
    #[case("202312345678")] // too long
    #[case("2023123456a")] // non-digit
    #[case("2023-123456")]
    fn rejects_malformed_numbers(#[case] raw: &str) {
        assert!(matches!(
            ApplicationNumber::parse(raw),
            Err(InvalidApplicationNumber::BadFormat { .. })
        ));
    }

    #[test]
    fn rejects_empty_candidate() {
        assert_eq!(
            ApplicationNumber::parse("   "),
            Err(InvalidApplicationNumber::Empty)
        );
    }

    #[test]
    fn batch_validation_preserves_order() {
        let batch = validate_batch(&["20231234567", "20231234568"]).unwrap();
        assert_eq!(batch[0].as_str(), "20231234567");
        assert_eq!(batch[1].as_str(), "20231234568");
    }

    #[test]
    fn batch_validation_rejects_empty_batch() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(validate_batch(&empty), Err(BatchValidationError::Empty));
    }

    #[test]
    fn batch_validation_rejects_oversize_batch() {
        let batch: Vec<String> = (0..=MAX_BATCH_SIZE)
            .map(|i| format!("{i:011}"))
            .collect();
        assert_eq!(
            validate_batch(&batch),
            Err(BatchValidationError::TooLarge {
                count: MAX_BATCH_SIZE + 1,
                max: MAX_BATCH_SIZE,
            })
        );
    }

    #[test]
    fn batch_validation_reports_offending_row() {
        let err = validate_batch(&["20231234567", "oops", "20231234569"]).unwrap_err();
        assert!(matches!(
            err,
            BatchValidationError::InvalidNumber { row: 2, .. }
        ));
    }
}
