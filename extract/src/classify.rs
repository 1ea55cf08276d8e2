//! Keyword-based outcome classification.
//!
//! Status is decided by three keyword sets checked in a fixed priority:
//! failure evidence first, then success evidence (downgraded to partial when
//! a partial marker is present), otherwise unclear. Failure vocabulary is
//! checked first because success words also show up in hedged statements
//! such as "基本可用但是失败了".
//!
//! The note is derived separately from an ordered list of phrase rules; the
//! first phrase found in the text wins.

use aipk_core::Status;
use serde::{Deserialize, Serialize};

/// Maps a phrase found in the log to a short canonical note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRule {
    pub phrase: String,
    pub note: String,
}

impl NoteRule {
    pub fn new(phrase: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            note: note.into(),
        }
    }
}

/// Keyword vocabulary for the classifier.
///
/// Every list is ordered; for `notes` the order decides which rule wins, so
/// phrases that contain other phrases must come first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRules {
    pub failure: Vec<String>,
    pub success: Vec<String>,
    pub partial: Vec<String>,
    pub notes: Vec<NoteRule>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            failure: words(&["无法完成", "失败", "failed", "很扯淡"]),
            success: words(&["完成", "成功", "success", "done", "可用"]),
            partial: words(&["部分"]),
            notes: [
                ("完成度很高", "完成度很高"),
                ("非常流畅", "非常流畅"),
                ("目前最快的", "目前最快的"),
                ("功能完全可用", "功能完全可用"),
                ("整体可用但核心功能缺陷", "整体可用但核心功能缺陷"),
                ("大部分可用", "大部分可用"),
                ("整体可用", "整体可用"),
                ("总体可用", "总体可用"),
                ("基本可用", "基本可用"),
                ("功能正常", "功能正常"),
                ("并发控制无效", "并发控制无效"),
                ("完全失败", "完全失败"),
                ("无法完成", "无法完成"),
                ("bug", "有bug"),
                ("错误", "有bug"),
            ]
            .into_iter()
            .map(|(phrase, note)| NoteRule::new(phrase, note))
            .collect(),
        }
    }
}

/// Status and note assigned to one log body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub status: Status,
    pub note: String,
}

/// Deterministic keyword classifier.
///
/// Matching is case-insensitive; keywords are lower-cased once at
/// construction.
///
/// # Examples
///
/// ```
/// use aipk_core::Status;
/// use aipk_extract::classify::OutcomeClassifier;
///
/// let classifier = OutcomeClassifier::default();
///
/// let result = classifier.classify("跑通了，完成度很高");
/// assert_eq!(result.status, Status::Success);
/// assert_eq!(result.note, "完成度很高");
///
/// // Failure evidence outranks success evidence.
/// assert_eq!(classifier.classify("一度成功，最后还是失败").status, Status::Failed);
/// assert_eq!(classifier.classify("nothing to see").status, Status::Unclear);
/// ```
#[derive(Debug, Clone)]
pub struct OutcomeClassifier {
    failure: Vec<String>,
    success: Vec<String>,
    partial: Vec<String>,
    notes: Vec<NoteRule>,
}

impl OutcomeClassifier {
    pub fn new(rules: KeywordRules) -> Self {
        let lower = |list: Vec<String>| {
            list.into_iter()
                .map(|w| w.to_lowercase())
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
        };
        Self {
            failure: lower(rules.failure),
            success: lower(rules.success),
            partial: lower(rules.partial),
            notes: rules
                .notes
                .into_iter()
                .filter(|rule| !rule.phrase.is_empty())
                .map(|rule| NoteRule::new(rule.phrase.to_lowercase(), rule.note))
                .collect(),
        }
    }

    pub fn classify(&self, text: &str) -> Classification {
        let lower = text.to_lowercase();
        Classification {
            status: self.status_for(&lower),
            note: self.note_for(&lower),
        }
    }

    /// Status decision over already lower-cased text.
    fn status_for(&self, lower: &str) -> Status {
        if contains_any(lower, &self.failure) {
            return Status::Failed;
        }
        if contains_any(lower, &self.success) {
            if contains_any(lower, &self.partial) {
                return Status::Partial;
            }
            return Status::Success;
        }
        Status::Unclear
    }

    fn note_for(&self, lower: &str) -> String {
        self.notes
            .iter()
            .find(|rule| lower.contains(rule.phrase.as_str()))
            .map(|rule| rule.note.clone())
            .unwrap_or_default()
    }
}

impl Default for OutcomeClassifier {
    fn default() -> Self {
        Self::new(KeywordRules::default())
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}
