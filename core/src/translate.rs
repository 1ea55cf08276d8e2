//! Ordered phrase substitution for localizing outcome notes.
//!
//! Notes are produced in the canonical language (Chinese). Rendering for an
//! English audience runs each [`TranslationRule`] in declared order over one
//! accumulating buffer. The order is part of the table's meaning: when one
//! source phrase contains another, whichever rule comes first decides the
//! result, so tables are never sorted or deduplicated.
//!
//! # Examples
//!
//! ```
//! use aipk_core::{Language, TranslationTable, Translator};
//!
//! let translator = Translator::new(TranslationTable::default());
//! assert_eq!(translator.translate("非常流畅", Language::En), "Very smooth");
//! assert_eq!(translator.translate("非常流畅", Language::Zh), "非常流畅");
//! assert_eq!(translator.translate("unknown", Language::En), "unknown");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display language for rendered notes and headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English; notes are translated.
    #[default]
    En,
    /// Chinese, the canonical language of the logs; notes pass through.
    Zh,
}

impl Language {
    /// Picks the string for this language from a `(zh, en)` pair.
    pub fn pick<'a>(self, zh: &'a str, en: &'a str) -> &'a str {
        match self {
            Self::Zh => zh,
            Self::En => en,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => f.write_str("en"),
            Self::Zh => f.write_str("zh"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// One `from → to` substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRule {
    /// Canonical-language phrase to replace.
    pub from: String,
    /// Target-language replacement.
    pub to: String,
}

impl TranslationRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Ordered translation table.
///
/// Serializes as a plain sequence of rules so a YAML or JSON configuration
/// keeps its declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable {
    rules: Vec<TranslationRule>,
}

/// Built-in Chinese → English phrases, in application order.
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("成功", "Success"),
    ("非常流畅", "Very smooth"),
    ("完成度很高", "High completion quality"),
    ("目前最快的", "Currently the fastest"),
    ("可以用", "Usable"),
    ("总体可用", "Generally usable"),
    ("大部分可用", "Mostly usable"),
    ("整体可用但核心功能缺陷", "Usable but core defects"),
    ("整体可用", "Overall usable"),
    ("基本可用", "Basically usable"),
    ("功能完全可用", "Fully functional"),
    ("功能正常", "Working"),
    ("除了贵没其他问题", "No issues except cost"),
    ("投机使用ncat", "Used ncat shortcut"),
    ("全自动化", "Fully automated"),
    ("国产agent扛把子", "Best domestic AI agent"),
    ("完全失败", "Complete failure"),
    ("无法完成", "Unable to complete"),
    ("无法成功", "Unable to succeed"),
    ("并发控制无效", "Concurrency control ineffective"),
    ("token不多", "Low token usage"),
    ("有bug", "Has bugs"),
    ("失败", "Failed"),
];

impl TranslationTable {
    /// Creates a table whose rules apply in the given order.
    pub fn new(rules: Vec<TranslationRule>) -> Self {
        Self { rules }
    }

    /// Creates a table from `(from, to)` pairs, preserving their order.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            rules: pairs
                .into_iter()
                .map(|(from, to)| TranslationRule::new(from, to))
                .collect(),
        }
    }

    pub fn rules(&self) -> &[TranslationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_RULES.iter().copied())
    }
}

/// Applies a [`TranslationTable`] to note text.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    table: TranslationTable,
}

impl Translator {
    pub fn new(table: TranslationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Returns `text` rendered for `language`.
    ///
    /// For [`Language::En`] every rule replaces all occurrences of its
    /// phrase in the output of the previous rule. Empty phrases are skipped.
    pub fn translate(&self, text: &str, language: Language) -> String {
        if language == Language::Zh || text.is_empty() {
            return text.to_string();
        }

        let mut buffer = text.to_string();
        for rule in &self.table.rules {
            if rule.from.is_empty() || !buffer.contains(rule.from.as_str()) {
                continue;
            }
            buffer = buffer.replace(rule.from.as_str(), rule.to.as_str());
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_translates_known_notes() {
        let translator = Translator::default();
        assert_eq!(
            translator.translate("完成度很高", Language::En),
            "High completion quality"
        );
        assert_eq!(
            translator.translate("整体可用但核心功能缺陷", Language::En),
            "Usable but core defects"
        );
        assert_eq!(translator.translate("有bug", Language::En), "Has bugs");
    }

    #[test]
    fn test_declared_order_decides_overlapping_phrases() {
        let short_first = Translator::new(TranslationTable::from_pairs([
            ("可用", "usable"),
            ("大部分可用", "mostly usable"),
        ]));
        assert_eq!(short_first.translate("大部分可用", Language::En), "大部分usable");

        let long_first = Translator::new(TranslationTable::from_pairs([
            ("大部分可用", "mostly usable"),
            ("可用", "usable"),
        ]));
        assert_eq!(long_first.translate("大部分可用", Language::En), "mostly usable");
    }

    #[test]
    fn test_replacements_accumulate_on_one_buffer() {
        let translator = Translator::new(TranslationTable::from_pairs([
            ("甲", "乙"),
            ("乙", "done"),
        ]));
        assert_eq!(translator.translate("甲", Language::En), "done");
    }

    #[test]
    fn test_default_table_keeps_success_rule_first() {
        // "成功" runs before "无法成功", so the longer phrase never matches.
        let translator = Translator::default();
        assert_eq!(translator.translate("无法成功", Language::En), "无法Success");
    }

    #[test]
    fn test_passthrough_cases() {
        let translator = Translator::default();
        assert_eq!(translator.translate("", Language::En), "");
        assert_eq!(translator.translate("no match here", Language::En), "no match here");
        assert_eq!(translator.translate("完全失败", Language::Zh), "完全失败");
    }

    #[test]
    fn test_table_deserializes_as_ordered_sequence() {
        let json = r#"[{"from":"b","to":"B"},{"from":"a","to":"A"}]"#;
        let table: TranslationTable = serde_json::from_str(json).unwrap();
        let froms: Vec<&str> = table.rules().iter().map(|r| r.from.as_str()).collect();
        assert_eq!(froms, ["b", "a"]);
        assert_eq!(serde_json::to_string(&table).unwrap(), json);
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::En));
        assert_eq!("zh".parse::<Language>(), Ok(Language::Zh));
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::Zh.pick("成功率", "Success rate"), "成功率");
    }
}
