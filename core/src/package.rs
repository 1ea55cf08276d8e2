use serde::{Deserialize, Serialize};

use crate::{Corpus, OutcomeRecord, StatusSummary};

/// Serializable result bundle for one benchmark run.
///
/// Carries the ranked records together with their status summary so a
/// single JSON or YAML file is enough for downstream renderers.
///
/// # Examples
///
/// ```
/// use aipk_core::*;
///
/// let corpus = Corpus::build(vec![
///     OutcomeRecord::new("a", Status::Success).with_quality_score(9),
///     OutcomeRecord::new("b", Status::Failed).with_quality_score(2),
/// ])
/// .unwrap();
///
/// let package = ResultPackage::from_corpus("2026-01-15T10:30:00Z", &corpus);
/// assert_eq!(package.record_count(), 2);
/// assert_eq!(package.summary.success, 1);
/// assert_eq!(package.format_version, RESULT_FORMAT_VERSION);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPackage {
    /// Result file format version.
    pub format_version: String,
    /// Optional run name (e.g. the benchmark task).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// ISO-8601 timestamp for package creation.
    pub generated_at: String,
    /// Per-status counts over `records`.
    pub summary: StatusSummary,
    /// Ranked outcome records.
    pub records: Vec<OutcomeRecord>,
}

/// Version of the result file format.
pub const RESULT_FORMAT_VERSION: &str = "1.0.0";

impl ResultPackage {
    /// Creates a package from records, computing the summary.
    pub fn new(generated_at: impl Into<String>, records: Vec<OutcomeRecord>) -> Self {
        Self {
            format_version: RESULT_FORMAT_VERSION.to_string(),
            name: None,
            generated_at: generated_at.into(),
            summary: StatusSummary::from_records(&records),
            records,
        }
    }

    /// Creates a package holding a copy of a ranked corpus.
    pub fn from_corpus(generated_at: impl Into<String>, corpus: &Corpus) -> Self {
        Self::new(generated_at, corpus.records().to_vec())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
