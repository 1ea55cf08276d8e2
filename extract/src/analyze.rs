//! Analysis pipeline: source records in, ranked corpus out.

use std::path::Path;

use aipk_core::{Corpus, OutcomeRecord, SourceRecord};
use tracing::{debug, info, warn};

use crate::classify::{Classification, OutcomeClassifier};
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzeError, Result};
use crate::metrics::{MetricExtractor, Metrics};
use crate::scores::QualityScores;
use crate::source::{SourceFailure, load_sources};

/// Metric extractor and classifier applied to each log.
///
/// Both components read the same raw text independently.
#[derive(Debug, Default)]
pub struct Analyzer {
    extractor: MetricExtractor,
    classifier: OutcomeClassifier,
}

/// Output of analyzing a benchmark tree.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// Ranked outcomes for every readable log.
    pub corpus: Corpus,
    /// Logs that could not be read and were left out.
    pub failures: Vec<SourceFailure>,
}

impl Analyzer {
    pub fn new(extractor: MetricExtractor, classifier: OutcomeClassifier) -> Self {
        Self {
            extractor,
            classifier,
        }
    }

    /// Runs extraction and classification without building a record.
    pub fn inspect(&self, text: &str) -> (Metrics, Classification) {
        (self.extractor.extract(text), self.classifier.classify(text))
    }

    /// Turns one source into an outcome record carrying `quality_score`.
    pub fn analyze(&self, source: &SourceRecord, quality_score: u8) -> OutcomeRecord {
        let (metrics, classification) = self.inspect(&source.text);
        debug!(
            source_id = source.source_id.as_str(),
            status = %classification.status,
            elapsed_minutes = ?metrics.elapsed_minutes,
            tokens = ?metrics.tokens,
            "Analyzed log"
        );

        OutcomeRecord::new(source.source_id.clone(), classification.status)
            .with_elapsed_minutes(metrics.elapsed_minutes)
            .with_tokens(metrics.tokens)
            .with_quality_score(i64::from(quality_score))
            .with_note(classification.note)
    }

    /// Analyzes a complete batch on a worker pool, then builds the corpus.
    ///
    /// Workers own their source records; results are collected in input
    /// order before ranking, so the output does not depend on scheduling.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Aggregate`] when two sources share an
    /// identifier, and [`AnalyzeError::ThreadPool`] when the pool cannot be
    /// built.
    pub fn analyze_batch(
        &self,
        sources: Vec<SourceRecord>,
        scores: &QualityScores,
        jobs: Option<usize>,
    ) -> Result<Corpus> {
        use rayon::prelude::*;

        let jobs = jobs
            .filter(|jobs| *jobs > 0)
            .unwrap_or_else(|| default_parallel_jobs(sources.len()));
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|err| AnalyzeError::ThreadPool(err.to_string()))?;

        info!(sources = sources.len(), jobs, "Analyzing batch");
        let records: Vec<OutcomeRecord> = pool.install(|| {
            sources
                .into_par_iter()
                .map(|source| {
                    let score = scores.score_for(&source.source_id);
                    self.analyze(&source, score)
                })
                .collect()
        });

        Ok(Corpus::build(records)?)
    }
}

/// Loads every log under `root` and analyzes it with `config`.
///
/// Scores are layered: inline `config.scores`, then each attempt's stats
/// file, then `scores`.
pub fn analyze_dir(
    root: &Path,
    config: &AnalyzerConfig,
    scores: &QualityScores,
) -> Result<AnalysisRun> {
    let batch = load_sources(root, &config.source_options())?;
    info!(
        root = %root.display(),
        logs = batch.records.len(),
        unreadable = batch.failures.len(),
        "Collected finish logs"
    );

    let mut merged = config.scores.clone();
    merged.merge(&batch.scores);
    merged.merge(scores);

    let corpus = config
        .analyzer()
        .analyze_batch(batch.records, &merged, config.jobs)?;

    for (source_id, _) in merged.iter() {
        if corpus.get(source_id).is_none() {
            warn!(source_id, "Quality score has no matching log");
        }
    }

    Ok(AnalysisRun {
        corpus,
        failures: batch.failures,
    })
}

fn default_parallel_jobs(source_count: usize) -> usize {
    let cpu_count = std::thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(4);
    cpu_count.max(1).min(source_count.max(1))
}

#[cfg(test)]
mod tests {
    use aipk_core::Status;

    use super::*;

    #[test]
    fn test_analyze_carries_score_and_metrics() {
        let source = SourceRecord::new(
            "kimi+roo",
            "real 2m15.0s\ntokens used: 1,200\n完成度很高",
        );
        let record = Analyzer::default().analyze(&source, 8);
        assert_eq!(record.source_id, "kimi+roo");
        assert_eq!(record.status, Status::Success);
        assert_eq!(record.elapsed_minutes, Some(2.25));
        assert_eq!(record.tokens, Some(1200));
        assert_eq!(record.quality_score, 8);
        assert_eq!(record.note, "完成度很高");
    }

    #[test]
    fn test_batch_ranks_and_scores() {
        let mut scores = QualityScores::new();
        scores.insert("b", 7);
        scores.insert("c", 7);

        let corpus = Analyzer::default()
            .analyze_batch(
                vec![
                    SourceRecord::new("a", "没有结论"),
                    SourceRecord::new("b", "部分完成"),
                    SourceRecord::new("c", "成功"),
                ],
                &scores,
                Some(2),
            )
            .unwrap();

        let ids: Vec<&str> = corpus.iter().map(|r| r.source_id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }

    #[test]
    fn test_batch_rejects_duplicate_ids() {
        let err = Analyzer::default()
            .analyze_batch(
                vec![SourceRecord::new("a", "成功"), SourceRecord::new("a", "失败")],
                &QualityScores::new(),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Aggregate(_)));
    }

    #[test]
    fn test_empty_batch_builds_empty_corpus() {
        let corpus = Analyzer::default()
            .analyze_batch(Vec::new(), &QualityScores::new(), None)
            .unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.summary().percentage(Status::Success), 0);
    }
}
