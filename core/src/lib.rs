//! Core outcome types, ranking and note translation for AI agent benchmarks.
//!
//! This crate defines the structured side of the benchmark pipeline:
//!
//! - [`SourceRecord`]: one raw finish-log body for an engine/client pair.
//! - [`OutcomeRecord`]: the structured outcome derived from it, with a closed
//!   [`Status`], optional elapsed minutes and token count, an externally
//!   supplied quality score and a short canonical note.
//! - [`Corpus`]: the ranked, duplicate-free collection of outcomes for a
//!   run, with a [`StatusSummary`] of counts and percentages.
//! - [`Translator`]: ordered phrase substitution that renders canonical
//!   (Chinese) notes in English.
//! - [`ResultPackage`]: the serializable bundle handed to renderers.
//!
//! Extraction from raw text lives in `aipk-extract`; this crate does no I/O.
//!
//! # Example
//!
//! ```
//! use aipk_core::*;
//!
//! let corpus = Corpus::build(vec![
//!     OutcomeRecord::new("glm+cline", Status::Partial).with_quality_score(7),
//!     OutcomeRecord::new("kimi+roo", Status::Success)
//!         .with_quality_score(7)
//!         .with_note("完成度很高"),
//! ])
//! .unwrap();
//!
//! let best = &corpus.records()[0];
//! assert_eq!(best.source_id, "kimi+roo");
//!
//! let translator = Translator::default();
//! assert_eq!(translator.translate(&best.note, Language::En), "High completion quality");
//! assert!(validate_records(corpus.records()).is_empty());
//! ```

mod aggregate;
mod package;
mod translate;
mod types;
mod validate;

pub use aggregate::{AggregateError, Corpus, StatusSummary, sort_records};
pub use package::{RESULT_FORMAT_VERSION, ResultPackage};
pub use translate::{Language, TranslationRule, TranslationTable, Translator};
pub use types::*;
pub use validate::{ValidationError, validate_package, validate_record, validate_records};
