//! Record type definitions for benchmark outcome modeling.
//!
//! This module defines the data model that flows through the pipeline: the
//! raw [`SourceRecord`] read from a finish log, and the structured
//! [`OutcomeRecord`] derived from it. The types serialize with [`serde`] and
//! round-trip through JSON and YAML with every field present.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Highest quality score a record can carry.
pub const MAX_QUALITY_SCORE: u8 = 10;

/// Outcome classification of one benchmark attempt.
///
/// A closed set: every record carries exactly one of these values, with
/// [`Status::Unclear`] as the default when no evidence matched.
///
/// The derived ordering is the ranking priority used by the aggregator:
/// successes rank above partials, partials above failures, failures above
/// unclear outcomes.
///
/// # Examples
///
/// ```
/// use aipk_core::Status;
///
/// assert_eq!(Status::default(), Status::Unclear);
/// assert!(Status::Success < Status::Partial);
/// assert_eq!(Status::Failed.label(), "FAILED");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// The agent completed the task.
    Success,
    /// The agent produced something usable but incomplete.
    Partial,
    /// The agent could not complete the task.
    Failed,
    /// No evidence either way (the default).
    #[default]
    Unclear,
}

impl Status {
    /// All statuses in ranking order.
    pub const ALL: [Status; 4] = [
        Status::Success,
        Status::Partial,
        Status::Failed,
        Status::Unclear,
    ];

    /// Ranking priority; lower ranks first at equal quality score.
    pub fn priority(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial => 1,
            Self::Failed => 2,
            Self::Unclear => 3,
        }
    }

    /// Stable upper-case label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Partial => "PARTIAL",
            Self::Failed => "FAILED",
            Self::Unclear => "UNCLEAR",
        }
    }

    /// Single-glyph marker used by leaderboard renderers.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Partial => "⚠️",
            Self::Failed => "❌",
            Self::Unclear => "❓",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => Ok(Self::Success),
            "PARTIAL" => Ok(Self::Partial),
            "FAILED" => Ok(Self::Failed),
            "UNCLEAR" => Ok(Self::Unclear),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// One raw log body attributed to an engine/client attempt.
///
/// # Examples
///
/// ```
/// use aipk_core::SourceRecord;
///
/// let source = SourceRecord::new("glm-4.6+claude-code", "real 3m0s\n完成");
/// assert_eq!(source.source_id, "glm-4.6+claude-code");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    /// Identifier of the engine/client pair that produced the log.
    pub source_id: String,
    /// Raw log text.
    pub text: String,
}

impl SourceRecord {
    /// Creates a source record.
    pub fn new(source_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
        }
    }
}

/// Structured outcome derived from one [`SourceRecord`].
///
/// Use [`OutcomeRecord::new`] and the `with_*` builders rather than struct
/// literals: the builders enforce the numeric invariants (finite,
/// non-negative elapsed time; quality score clamped into `0..=10`).
///
/// # Examples
///
/// ```
/// use aipk_core::{OutcomeRecord, Status};
///
/// let record = OutcomeRecord::new("kimi+roo", Status::Success)
///     .with_elapsed_minutes(Some(12.5))
///     .with_tokens(Some(48_000))
///     .with_quality_score(14)
///     .with_note("非常流畅");
///
/// assert_eq!(record.quality_score, 10);
/// assert_eq!(record.elapsed_minutes, Some(12.5));
///
/// let negative = OutcomeRecord::new("x", Status::Failed).with_elapsed_minutes(Some(-1.0));
/// assert_eq!(negative.elapsed_minutes, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Identifier of the engine/client pair.
    pub source_id: String,
    /// Outcome classification.
    pub status: Status,
    /// Wall-clock minutes spent, when the log mentions it.
    pub elapsed_minutes: Option<f64>,
    /// Tokens consumed, when the log mentions it.
    pub tokens: Option<u64>,
    /// Externally supplied rating in `0..=10`.
    pub quality_score: u8,
    /// Short canonical note summarizing the outcome (may be empty).
    pub note: String,
}

impl OutcomeRecord {
    /// Creates a record with no metrics, a zero score and an empty note.
    pub fn new(source_id: impl Into<String>, status: Status) -> Self {
        Self {
            source_id: source_id.into(),
            status,
            elapsed_minutes: None,
            tokens: None,
            quality_score: 0,
            note: String::new(),
        }
    }

    /// Sets elapsed minutes; non-finite or negative values become absent.
    pub fn with_elapsed_minutes(mut self, minutes: Option<f64>) -> Self {
        self.elapsed_minutes = minutes.filter(|m| m.is_finite() && *m >= 0.0);
        self
    }

    /// Sets the token count.
    pub fn with_tokens(mut self, tokens: Option<u64>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Sets the quality score, clamped into `0..=10`.
    pub fn with_quality_score(mut self, score: i64) -> Self {
        self.quality_score = clamp_quality_score(score);
        self
    }

    /// Sets the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Compares two records by rank: higher score first, then status priority.
    ///
    /// Records that compare `Equal` keep their relative input order when
    /// sorted stably; the identifier is deliberately not consulted.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .quality_score
            .cmp(&self.quality_score)
            .then_with(|| self.status.priority().cmp(&other.status.priority()))
    }
}

/// Clamps an externally supplied score into `0..=10`.
pub fn clamp_quality_score(score: i64) -> u8 {
    // Bounded by the clamp, so the cast cannot truncate.
    score.clamp(0, i64::from(MAX_QUALITY_SCORE)) as u8
}
