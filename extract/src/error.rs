//! Error types for analysis runs.
//!
//! Covers the failure modes outside the pure extraction core: reading logs
//! and configuration, serializing results, and building the corpus.

use aipk_core::AggregateError;
use thiserror::Error;

/// Errors that can occur while loading inputs or building results.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Corpus construction failure (e.g. duplicate source id).
    #[error("aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),

    /// Invalid or missing input (e.g. non-existent path, bad extension).
    #[error("{0}")]
    InvalidInput(String),

    /// Worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

/// Convenience alias for results with [`AnalyzeError`].
pub type Result<T> = std::result::Result<T, AnalyzeError>;
