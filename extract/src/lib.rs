//! Metric extraction and outcome classification for AI agent benchmark logs.
//!
//! This crate turns free-form, bilingual finish logs into structured
//! [`OutcomeRecord`]s and ranks them into a [`Corpus`]:
//!
//! - [`metrics`]: elapsed time through an ordered chain of matcher
//!   strategies, token usage through one labelled pattern.
//! - [`classify`]: keyword evidence to a [`Status`](aipk_core::Status) plus a
//!   short canonical note.
//! - [`analyze`]: applies both to single logs or to whole batches on a
//!   worker pool.
//! - [`source`] and [`scores`]: read logs from a benchmark tree and quality
//!   scores from a YAML/JSON file.
//! - [`output`]: JSON, YAML, Markdown and terminal table rendering.
//!
//! # Example
//!
//! ```
//! use aipk_core::Status;
//! use aipk_extract::analyze_text;
//!
//! let log = "\
//! $ time ./run-agent.sh
//! real    2m15.0s
//! tokens used: 1,200
//! 完成度很高
//! ";
//!
//! let record = analyze_text("kimi-k2+claude-code", log);
//! assert_eq!(record.status, Status::Success);
//! assert_eq!(record.elapsed_minutes, Some(2.25));
//! assert_eq!(record.tokens, Some(1200));
//! assert_eq!(record.note, "完成度很高");
//! ```
//!
//! [`OutcomeRecord`]: aipk_core::OutcomeRecord
//! [`Corpus`]: aipk_core::Corpus

pub mod analyze;
pub mod classify;
pub mod config;
pub mod error;
pub mod metrics;
pub mod output;
pub mod scores;
pub mod source;

pub use error::{AnalyzeError, Result};

use aipk_core::{OutcomeRecord, SourceRecord};
use analyze::Analyzer;

/// Analyzes one log body with the default vocabulary and a zero score.
///
/// Never fails: text without evidence yields an `UNCLEAR` record with no
/// metrics.
pub fn analyze_text(source_id: &str, text: &str) -> OutcomeRecord {
    Analyzer::default().analyze(&SourceRecord::new(source_id, text), 0)
}
