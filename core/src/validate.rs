//! Record and package validation.
//!
//! Records built through the [`OutcomeRecord`] builders always satisfy the
//! numeric invariants, but records re-loaded from a JSON or YAML result file
//! can carry anything. Validation reports every problem found instead of
//! stopping at the first one, so a reviewer sees the whole picture.
//!
//! # Examples
//!
//! ```
//! use aipk_core::*;
//!
//! let good = OutcomeRecord::new("kimi+roo", Status::Success).with_quality_score(8);
//! assert!(validate_record(&good).is_empty());
//!
//! let mut bad = good.clone();
//! bad.quality_score = 11;
//! assert_eq!(validate_record(&bad), vec![ValidationError::ScoreOutOfRange {
//!     source_id: "kimi+roo".into(),
//!     score: 11,
//! }]);
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{MAX_QUALITY_SCORE, OutcomeRecord, ResultPackage, StatusSummary};

/// Record/package validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Source identifier is empty or whitespace-only.
    #[error("source id cannot be empty")]
    EmptySourceId,
    /// Two records share a source identifier.
    #[error("duplicate source id: {0}")]
    DuplicateSourceId(String),
    /// Elapsed minutes is negative, NaN or infinite.
    #[error("invalid elapsed minutes for {source_id}: {minutes}")]
    InvalidElapsed { source_id: String, minutes: f64 },
    /// Quality score above the allowed maximum.
    #[error("quality score out of range for {source_id}: {score}")]
    ScoreOutOfRange { source_id: String, score: u8 },
    /// Stored summary disagrees with the records it describes.
    #[error("summary does not match records")]
    SummaryMismatch,
}

/// Validates a single record.
pub fn validate_record(record: &OutcomeRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if record.source_id.trim().is_empty() {
        errors.push(ValidationError::EmptySourceId);
    }

    if let Some(minutes) = record.elapsed_minutes {
        if !minutes.is_finite() || minutes < 0.0 {
            errors.push(ValidationError::InvalidElapsed {
                source_id: record.source_id.clone(),
                minutes,
            });
        }
    }

    if record.quality_score > MAX_QUALITY_SCORE {
        errors.push(ValidationError::ScoreOutOfRange {
            source_id: record.source_id.clone(),
            score: record.quality_score,
        });
    }

    errors
}

/// Validates a batch of records, including identifier uniqueness.
pub fn validate_records(records: &[OutcomeRecord]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for record in records {
        errors.extend(validate_record(record));
        if !seen.insert(record.source_id.as_str()) {
            errors.push(ValidationError::DuplicateSourceId(record.source_id.clone()));
        }
    }

    errors
}

/// Validates a result package: its records and its stored summary.
pub fn validate_package(package: &ResultPackage) -> Vec<ValidationError> {
    let mut errors = validate_records(&package.records);
    if StatusSummary::from_records(&package.records) != package.summary {
        errors.push(ValidationError::SummaryMismatch);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn test_validate_records_reports_duplicates() {
        let records = vec![
            OutcomeRecord::new("a", Status::Success),
            OutcomeRecord::new("a", Status::Failed),
        ];
        assert_eq!(
            validate_records(&records),
            vec![ValidationError::DuplicateSourceId("a".to_string())]
        );
    }

    #[test]
    fn test_validate_record_collects_every_problem() {
        let mut record = OutcomeRecord::new("  ", Status::Unclear);
        record.elapsed_minutes = Some(-2.0);
        record.quality_score = 12;

        let errors = validate_record(&record);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], ValidationError::EmptySourceId);
    }

    #[test]
    fn test_validate_package_detects_summary_mismatch() {
        let mut package = ResultPackage::new(
            "2026-01-01T00:00:00Z",
            vec![OutcomeRecord::new("a", Status::Success)],
        );
        assert!(validate_package(&package).is_empty());

        package.summary.failed = 3;
        assert_eq!(validate_package(&package), vec![ValidationError::SummaryMismatch]);
    }
}
