//! Externally supplied quality scores.
//!
//! Scores are assigned by a reviewer, not derived from the logs. They come
//! from a `stats.json` next to each attempt's log, or from a flat
//! `source_id: score` map in YAML or JSON, and are clamped into `0..=10`;
//! sources without an entry score `0`.
//!
//! ```yaml
//! kimi-k2+claude-code: 9
//! glm-4.6+cline: 7
//! ```

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;

use aipk_core::clamp_quality_score;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzeError, Result};

/// Per-attempt stats file read next to each log.
pub const DEFAULT_STATS_FILE_NAME: &str = "stats.json";

/// Fields of an attempt's `stats.json` that feed the ranking.
#[derive(Debug, Deserialize)]
struct AttemptStats {
    #[serde(default)]
    quality_score: Option<f64>,
}

/// Reads `quality_score` from an attempt stats file.
///
/// Returns `Ok(None)` when the file has no usable score. Fractional scores
/// are rounded.
pub fn read_attempt_score(path: &Path) -> Result<Option<i64>> {
    let content = std::fs::read_to_string(path)?;
    let stats: AttemptStats = serde_json::from_str(&content)?;
    Ok(stats
        .quality_score
        .filter(|score| score.is_finite())
        .map(|score| score.round() as i64))
}

/// Quality scores keyed by source identifier.
///
/// # Examples
///
/// ```
/// use aipk_extract::scores::QualityScores;
///
/// let scores: QualityScores = serde_yaml::from_str("a: 8\nb: 42\nc: -1\n").unwrap();
/// assert_eq!(scores.score_for("a"), 8);
/// assert_eq!(scores.score_for("b"), 10);
/// assert_eq!(scores.score_for("c"), 0);
/// assert_eq!(scores.score_for("missing"), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityScores {
    scores: BTreeMap<String, i64>,
}

impl QualityScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads scores from a `.yaml`/`.yml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::InvalidInput`] for other extensions, and I/O or
    /// parse errors otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(OsStr::to_str) {
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Err(AnalyzeError::InvalidInput(format!(
                "Score file '{}' must end in .yaml, .yml or .json",
                path.display()
            ))),
        }
    }

    pub fn insert(&mut self, source_id: impl Into<String>, score: i64) {
        self.scores.insert(source_id.into(), score);
    }

    /// Copies every entry of `other` over this map.
    pub fn merge(&mut self, other: &QualityScores) {
        for (source_id, score) in &other.scores {
            self.scores.insert(source_id.clone(), *score);
        }
    }

    /// Clamped score for `source_id`, `0` when unscored.
    pub fn score_for(&self, source_id: &str) -> u8 {
        self.scores
            .get(source_id)
            .map_or(0, |score| clamp_quality_score(*score))
    }

    /// Raw entries in source-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.scores.iter().map(|(id, score)| (id.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
