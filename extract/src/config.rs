//! Analyzer configuration.
//!
//! Defines the YAML-serializable configuration for an analysis run: where
//! logs live, how they are classified, how notes are translated and which
//! quality scores apply. Every section is optional and falls back to the
//! built-in defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! source:
//!   log_file_name: finish.log
//!   stats_file_name: stats.json
//!   exclude_dirs: [start-org]
//!   start_marker: cat start
//!   end_marker: cat end
//! jobs: 4
//! classifier:
//!   failure: [无法完成, 失败, failed]
//!   success: [完成, 成功, success]
//!   partial: [部分]
//!   notes:
//!     - phrase: 完成度很高
//!       note: 完成度很高
//! translations:
//!   - from: 完成度很高
//!     to: High completion quality
//! scores:
//!   kimi-k2+claude-code: 9
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use aipk_core::{TranslationTable, Translator};
use serde::{Deserialize, Serialize};

use crate::analyze::Analyzer;
use crate::classify::{KeywordRules, OutcomeClassifier};
use crate::error::Result;
use crate::metrics::MetricExtractor;
use crate::scores::{DEFAULT_STATS_FILE_NAME, QualityScores};
use crate::source::{DEFAULT_EXCLUDED_DIRS, DEFAULT_LOG_FILE_NAME, SourceOptions};

/// Configuration format version written by [`AnalyzerConfig::default`].
pub const CONFIG_VERSION: &str = "1.0";

/// Where to find logs and which markers bracket a timed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Log file name inside each attempt directory.
    pub log_file_name: String,
    /// Per-attempt stats file carrying `quality_score`; empty disables it.
    pub stats_file_name: String,
    /// Directory names to skip while walking.
    pub exclude_dirs: Vec<String>,
    /// Start marker for the elapsed-time fallback.
    pub start_marker: String,
    /// End marker for the elapsed-time fallback.
    pub end_marker: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
            stats_file_name: DEFAULT_STATS_FILE_NAME.to_string(),
            exclude_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            start_marker: "cat start".to_string(),
            end_marker: "cat end".to_string(),
        }
    }
}

/// Top-level analyzer configuration.
///
/// # Examples
///
/// ```
/// use aipk_extract::config::AnalyzerConfig;
///
/// let config: AnalyzerConfig = serde_yaml::from_str("jobs: 2\n").unwrap();
/// assert_eq!(config.jobs, Some(2));
/// assert_eq!(config.source.log_file_name, "finish.log");
/// assert!(!config.classifier.failure.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Configuration format version (e.g. `"1.0"`).
    pub version: String,
    /// Log discovery settings.
    pub source: SourceConfig,
    /// Worker threads for batch analysis (`None` = available parallelism).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    /// Classifier vocabulary.
    pub classifier: KeywordRules,
    /// Ordered note translation table.
    pub translations: TranslationTable,
    /// Inline quality scores; per-attempt stats files and a score file given
    /// on the command line override matching entries, in that order.
    pub scores: QualityScores,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            source: SourceConfig::default(),
            jobs: None,
            classifier: KeywordRules::default(),
            translations: TranslationTable::default(),
            scores: QualityScores::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::AnalyzeError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::AnalyzeError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn source_options(&self) -> SourceOptions {
        SourceOptions {
            log_file_name: self.source.log_file_name.clone(),
            stats_file_name: self.source.stats_file_name.clone(),
            excluded_dirs: self.source.exclude_dirs.clone(),
        }
    }

    /// Builds the analyzer described by this configuration.
    pub fn analyzer(&self) -> Analyzer {
        Analyzer::new(
            MetricExtractor::with_markers(&self.source.start_marker, &self.source.end_marker),
            OutcomeClassifier::new(self.classifier.clone()),
        )
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.translations.clone())
    }
}

#[cfg(test)]
mod tests {
    use aipk_core::{Language, Status};

    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
source:
  log_file_name: result.log
  stats_file_name: meta.json
  exclude_dirs: [template, scratch]
  start_marker: BEGIN
  end_marker: END
jobs: 3
classifier:
  failure: [broken]
  success: [works]
  partial: [mostly]
  notes:
    - phrase: fast
      note: 快
translations:
  - from: 快
    to: Fast
scores:
  alpha: 7
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: AnalyzerConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.source.log_file_name, "result.log");
        assert_eq!(config.source_options().stats_file_name, "meta.json");
        assert_eq!(config.source.exclude_dirs, vec!["template", "scratch"]);
        assert_eq!(config.jobs, Some(3));
        assert_eq!(config.classifier.failure, vec!["broken"]);
        assert_eq!(config.translations.len(), 1);
        assert_eq!(config.scores.score_for("alpha"), 7);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AnalyzerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
    }

    #[test]
    fn test_partial_classifier_section_keeps_other_defaults() {
        let config: AnalyzerConfig =
            serde_yaml::from_str("classifier:\n  partial: [半成品]\n").unwrap();
        assert_eq!(config.classifier.partial, vec!["半成品"]);
        assert_eq!(config.classifier.failure, KeywordRules::default().failure);
    }

    #[test]
    fn test_configured_analyzer_uses_custom_vocabulary() {
        let config: AnalyzerConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let analyzer = config.analyzer();
        let text = "BEGIN\nit works, mostly, and fast: 12分钟\nEND";
        let (metrics, classification) = analyzer.inspect(text);
        assert_eq!(metrics.elapsed_minutes, Some(12.0));
        assert_eq!(classification.status, Status::Partial);
        assert_eq!(
            config.translator().translate(&classification.note, Language::En),
            "Fast"
        );
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aipk.yml");

        let original: AnalyzerConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = AnalyzerConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
