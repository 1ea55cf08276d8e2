//! Batch source: collects finish logs from a benchmark directory tree.
//!
//! Each attempt directory holds one log file (`finish.log` by default); the
//! directory name is the source identifier. An optional `stats.json` next to
//! the log supplies the attempt's quality score. Logs are decoded lossily so
//! a stray invalid byte never drops a record. A log or directory that cannot
//! be read is reported as a [`SourceFailure`] and left out of the batch.
//! Symlinked directories are not followed.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use aipk_core::SourceRecord;
use tracing::{debug, warn};

use crate::error::{AnalyzeError, Result};
use crate::scores::{DEFAULT_STATS_FILE_NAME, QualityScores, read_attempt_score};

/// Default log file name looked up in each attempt directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "finish.log";

/// Directory names skipped by default (`start-org` is the untouched template).
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["start-org"];

/// How to look for logs under a benchmark root.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// File name of the log inside each attempt directory.
    pub log_file_name: String,
    /// File name of the per-attempt stats file; empty disables it.
    pub stats_file_name: String,
    /// Directory names whose subtrees are skipped.
    pub excluded_dirs: Vec<String>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
            stats_file_name: DEFAULT_STATS_FILE_NAME.to_string(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// A log or directory that was found but could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source_id: String,
    pub path: PathBuf,
    pub error: String,
}

impl SourceFailure {
    fn new(path: PathBuf, source_id: String, error: &std::io::Error) -> Self {
        warn!(path = %path.display(), error = %error, "Skipping unreadable source");
        Self {
            source_id,
            path,
            error: error.to_string(),
        }
    }
}

/// Log paths found under a root, plus directories that could not be listed.
#[derive(Debug, Clone, Default)]
pub struct LogWalk {
    /// Log paths, sorted.
    pub paths: Vec<PathBuf>,
    /// Unlistable directories, sorted by path.
    pub failures: Vec<SourceFailure>,
}

/// Records read from a benchmark root, plus per-record failures.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub records: Vec<SourceRecord>,
    pub failures: Vec<SourceFailure>,
    /// Scores read from per-attempt stats files.
    pub scores: QualityScores,
}

/// Recursively collects log paths under `root`, sorted for deterministic
/// input order.
///
/// Symlinked directories are skipped so a link back to an ancestor cannot
/// visit the same attempt twice. A nested directory that cannot be listed
/// becomes a [`SourceFailure`] and the walk continues.
///
/// # Errors
///
/// Returns [`AnalyzeError::InvalidInput`] when `root` is not a directory, and
/// [`AnalyzeError::Io`] when `root` itself cannot be listed.
pub fn collect_log_paths(root: &Path, options: &SourceOptions) -> Result<LogWalk> {
    if !root.is_dir() {
        return Err(AnalyzeError::InvalidInput(format!(
            "Benchmark root '{}' is not a directory",
            root.display()
        )));
    }

    let mut paths = BTreeSet::new();
    let mut failures = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir.as_path() == root => return Err(err.into()),
            Err(err) => {
                let source_id = dir_source_id(&dir);
                failures.push(SourceFailure::new(dir, source_id, &err));
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    failures.push(SourceFailure::new(dir.clone(), dir_source_id(&dir), &err));
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    let source_id = dir_source_id(&path);
                    failures.push(SourceFailure::new(path, source_id, &err));
                    continue;
                }
            };

            if file_type.is_symlink() && path.is_dir() {
                debug!(path = %path.display(), "Skipping symlinked directory");
                continue;
            }

            if file_type.is_dir() {
                let excluded = path
                    .file_name()
                    .and_then(OsStr::to_str)
                    .is_some_and(|name| options.excluded_dirs.iter().any(|d| d == name));
                if excluded {
                    debug!(path = %path.display(), "Skipping excluded directory");
                } else {
                    pending.push(path);
                }
                continue;
            }

            if path.file_name() == Some(OsStr::new(options.log_file_name.as_str())) {
                paths.insert(path);
            }
        }
    }

    failures.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(LogWalk {
        paths: paths.into_iter().collect(),
        failures,
    })
}

fn dir_source_id(dir: &Path) -> String {
    dir.file_name().map_or_else(
        || dir.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Source identifier for a log path: the name of its parent directory.
pub fn source_id_for(path: &Path) -> Option<String> {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
}

/// Reads one log as text, replacing invalid UTF-8.
pub fn read_log(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Loads every log under `root`, with the quality score from the stats file
/// beside it when one exists.
///
/// Unreadable logs and directories become [`SourceFailure`]s; only a root
/// that cannot be walked is an error. A broken stats file is logged and the
/// attempt keeps its log but gets no score from it.
pub fn load_sources(root: &Path, options: &SourceOptions) -> Result<SourceBatch> {
    let walk = collect_log_paths(root, options)?;
    let mut batch = SourceBatch {
        failures: walk.failures,
        ..SourceBatch::default()
    };

    for path in walk.paths {
        let source_id = source_id_for(&path).unwrap_or_else(|| path.display().to_string());
        match read_log(&path) {
            Ok(text) => {
                if let Some(score) = stats_score(&path, options) {
                    batch.scores.insert(source_id.clone(), score);
                }
                batch.records.push(SourceRecord::new(source_id, text));
            }
            Err(err) => batch.failures.push(SourceFailure::new(path, source_id, &err)),
        }
    }

    Ok(batch)
}

fn stats_score(log_path: &Path, options: &SourceOptions) -> Option<i64> {
    if options.stats_file_name.is_empty() {
        return None;
    }
    let stats_path = log_path.with_file_name(&options.stats_file_name);
    if !stats_path.is_file() {
        return None;
    }
    match read_attempt_score(&stats_path) {
        Ok(score) => score,
        Err(err) => {
            warn!(path = %stats_path.display(), error = %err, "Ignoring unreadable stats file");
            None
        }
    }
}
