//! Corpus construction, ranking and per-status summaries.
//!
//! A [`Corpus`] is built once from a complete batch of outcome records.
//! Building rejects duplicate source identifiers and sorts the records by
//! rank:
//!
//! 1. quality score, descending;
//! 2. status priority (`SUCCESS < PARTIAL < FAILED < UNCLEAR`);
//! 3. input order (the sort is stable).
//!
//! # Examples
//!
//! ```
//! use aipk_core::{Corpus, OutcomeRecord, Status};
//!
//! let corpus = Corpus::build(vec![
//!     OutcomeRecord::new("b", Status::Partial).with_quality_score(7),
//!     OutcomeRecord::new("a", Status::Success).with_quality_score(7),
//!     OutcomeRecord::new("c", Status::Failed).with_quality_score(9),
//! ])
//! .unwrap();
//!
//! let order: Vec<&str> = corpus.iter().map(|r| r.source_id.as_str()).collect();
//! assert_eq!(order, ["c", "a", "b"]);
//!
//! let summary = corpus.summary();
//! assert_eq!(summary.count(Status::Success), 1);
//! assert_eq!(summary.percentage(Status::Success), 33);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{OutcomeRecord, Status};

/// Errors raised while building a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// Two records share a source identifier.
    #[error("duplicate source id: {0}")]
    DuplicateSourceId(String),
}

/// Ranked, duplicate-free collection of outcome records for one run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Corpus {
    records: Vec<OutcomeRecord>,
}

impl Corpus {
    /// Builds a ranked corpus from a complete batch of records.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::DuplicateSourceId`] for the first identifier
    /// seen twice; no corpus is produced in that case.
    pub fn build(records: Vec<OutcomeRecord>) -> Result<Self, AggregateError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for record in &records {
            if !seen.insert(record.source_id.as_str()) {
                return Err(AggregateError::DuplicateSourceId(record.source_id.clone()));
            }
        }

        let mut records = records;
        sort_records(&mut records);
        Ok(Self { records })
    }

    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutcomeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the best-ranked `n` records (fewer if the corpus is smaller).
    pub fn top(&self, n: usize) -> &[OutcomeRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Looks up a record by source identifier.
    pub fn get(&self, source_id: &str) -> Option<&OutcomeRecord> {
        self.records.iter().find(|r| r.source_id == source_id)
    }

    /// Computes per-status counts over the corpus.
    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_records(&self.records)
    }

    pub fn into_records(self) -> Vec<OutcomeRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a OutcomeRecord;
    type IntoIter = std::slice::Iter<'a, OutcomeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Sorts records in place by rank. Stable: equal ranks keep input order.
pub fn sort_records(records: &mut [OutcomeRecord]) {
    records.sort_by(|a, b| a.rank_cmp(b));
}

/// Counts of records per status.
///
/// Percentages use truncating integer division and are `0` for every bucket
/// when `total` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusSummary {
    pub total: usize,
    pub success: usize,
    pub partial: usize,
    pub failed: usize,
    pub unclear: usize,
}

impl StatusSummary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a OutcomeRecord>) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.total += 1;
            match record.status {
                Status::Success => summary.success += 1,
                Status::Partial => summary.partial += 1,
                Status::Failed => summary.failed += 1,
                Status::Unclear => summary.unclear += 1,
            }
        }
        summary
    }

    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Success => self.success,
            Status::Partial => self.partial,
            Status::Failed => self.failed,
            Status::Unclear => self.unclear,
        }
    }

    /// Share of `status` in whole percent, truncated.
    pub fn percentage(&self, status: Status) -> usize {
        if self.total == 0 {
            return 0;
        }
        self.count(status) * 100 / self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, status: Status, score: i64) -> OutcomeRecord {
        OutcomeRecord::new(id, status).with_quality_score(score)
    }

    fn ids(corpus: &Corpus) -> Vec<&str> {
        corpus.iter().map(|r| r.source_id.as_str()).collect()
    }

    #[test]
    fn test_success_ranks_before_partial_at_equal_score() {
        let corpus = Corpus::build(vec![
            record("partial", Status::Partial, 7),
            record("success", Status::Success, 7),
        ])
        .unwrap();
        assert_eq!(ids(&corpus), ["success", "partial"]);
    }

    #[test]
    fn test_ties_keep_insertion_order_not_name_order() {
        let corpus = Corpus::build(vec![
            record("zeta", Status::Failed, 4),
            record("alpha", Status::Failed, 4),
            record("mid", Status::Failed, 4),
        ])
        .unwrap();
        assert_eq!(ids(&corpus), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_full_ordering() {
        let corpus = Corpus::build(vec![
            record("u9", Status::Unclear, 9),
            record("f3", Status::Failed, 3),
            record("s9", Status::Success, 9),
            record("p9", Status::Partial, 9),
            record("s0", Status::Success, 0),
            record("f9", Status::Failed, 9),
        ])
        .unwrap();
        assert_eq!(ids(&corpus), ["s9", "p9", "f9", "u9", "f3", "s0"]);
    }

    #[test]
    fn test_resorting_is_identity() {
        let corpus = Corpus::build(vec![
            record("a", Status::Partial, 5),
            record("b", Status::Success, 5),
            record("c", Status::Unclear, 8),
            record("d", Status::Partial, 5),
        ])
        .unwrap();

        let mut again = corpus.records().to_vec();
        sort_records(&mut again);
        assert_eq!(again.as_slice(), corpus.records());

        let rebuilt = Corpus::build(corpus.clone().into_records()).unwrap();
        assert_eq!(rebuilt, corpus);
    }

    #[test]
    fn test_duplicate_source_id_is_rejected() {
        let err = Corpus::build(vec![
            record("kimi+roo", Status::Success, 8),
            record("glm+cline", Status::Failed, 2),
            record("kimi+roo", Status::Partial, 6),
        ])
        .unwrap_err();
        assert_eq!(err, AggregateError::DuplicateSourceId("kimi+roo".to_string()));
        assert_eq!(err.to_string(), "duplicate source id: kimi+roo");
    }

    #[test]
    fn test_empty_corpus_summary_is_all_zero() {
        let corpus = Corpus::build(Vec::new()).unwrap();
        let summary = corpus.summary();
        assert_eq!(summary.total, 0);
        for status in Status::ALL {
            assert_eq!(summary.count(status), 0);
            assert_eq!(summary.percentage(status), 0);
        }
    }

    #[test]
    fn test_percentage_truncates() {
        let corpus = Corpus::build(vec![
            record("a", Status::Success, 1),
            record("b", Status::Success, 1),
            record("c", Status::Failed, 1),
        ])
        .unwrap();
        let summary = corpus.summary();
        assert_eq!(summary.percentage(Status::Success), 66);
        assert_eq!(summary.percentage(Status::Failed), 33);
        assert_eq!(summary.percentage(Status::Partial), 0);
    }

    #[test]
    fn test_top_and_get() {
        let corpus = Corpus::build(vec![
            record("a", Status::Success, 3),
            record("b", Status::Success, 9),
        ])
        .unwrap();
        assert_eq!(corpus.top(1)[0].source_id, "b");
        assert_eq!(corpus.top(10).len(), 2);
        assert_eq!(corpus.get("a").map(|r| r.quality_score), Some(3));
        assert!(corpus.get("missing").is_none());
    }
}
