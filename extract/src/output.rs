//! Output formatting for result packages and single records.
//!
//! JSON and YAML emit the [`ResultPackage`] unchanged, with canonical notes.
//! Markdown and table output are for people: headings follow the requested
//! [`Language`], notes go through the [`Translator`] and records are ranked
//! through a [`Corpus`], so a hand-edited package still renders in order.

use aipk_core::{
    Corpus, Language, OutcomeRecord, ResultPackage, Status, StatusSummary, Translator,
};

use crate::error::Result;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Presentation settings for human-readable formats.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub language: Language,
    pub translator: Translator,
    /// Number of entries shown in the table report.
    pub top: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            language: Language::En,
            translator: Translator::default(),
            top: 10,
        }
    }
}

impl RenderOptions {
    fn note(&self, record: &OutcomeRecord) -> String {
        self.translator.translate(&record.note, self.language)
    }
}

/// Formats a result package in the requested output format.
pub fn format_package(
    package: &ResultPackage,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(package)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(package)?),
        OutputFormat::Markdown => {
            let corpus = Corpus::build(package.records.clone())?;
            Ok(package_to_markdown(package, &corpus, options))
        }
        OutputFormat::Table => {
            let corpus = Corpus::build(package.records.clone())?;
            Ok(package_to_table(package, &corpus, options))
        }
    }
}

/// Formats a single outcome record in the requested output format.
pub fn format_record(
    record: &OutcomeRecord,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(record)?),
        OutputFormat::Markdown => {
            let mut out = leaderboard_header(options.language);
            out.push_str(&leaderboard_row(1, record, options));
            Ok(out)
        }
        OutputFormat::Table => Ok(table_entry(1, record, options)),
    }
}

fn report_title(package: &ResultPackage, language: Language) -> String {
    let name = package.name.as_deref().unwrap_or("AI-PK").to_uppercase();
    format!("{name} {}", language.pick("基准测试报告", "BENCHMARK REPORT"))
}

fn package_to_markdown(
    package: &ResultPackage,
    corpus: &Corpus,
    options: &RenderOptions,
) -> String {
    let language = options.language;
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", report_title(package, language)));
    out.push_str(&format!(
        "_{}: {}_\n\n",
        language.pick("生成时间", "Generated"),
        package.generated_at
    ));

    out.push_str(&format!("## {}\n\n", language.pick("概览", "Summary")));
    out.push_str(&summary_lines(&package.summary, language, "- "));
    out.push('\n');

    out.push_str(&format!("## {}\n\n", language.pick("排行榜", "Leaderboard")));
    out.push_str(&leaderboard_header(language));
    for (index, record) in corpus.iter().enumerate() {
        out.push_str(&leaderboard_row(index + 1, record, options));
    }

    out.push_str(&format!("\n## {}\n\n", language.pick("图例", "Legend")));
    for status in Status::ALL {
        out.push_str(&format!("- {} {}\n", status.symbol(), status_legend(status, language)));
    }

    out
}

fn leaderboard_header(language: Language) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "| {} | {} | {} | {} | {} | {} | {} |\n",
        language.pick("排名", "Rank"),
        language.pick("AI 引擎 + 客户端", "AI Engine + Client"),
        language.pick("状态", "Status"),
        language.pick("评分", "Score"),
        language.pick("用时 (分钟)", "Time (min)"),
        "Tokens",
        language.pick("备注", "Notes"),
    ));
    out.push_str("|------|-------------------|--------|-------|------------|--------|-------|\n");
    out
}

fn leaderboard_row(rank: usize, record: &OutcomeRecord, options: &RenderOptions) -> String {
    let time = record
        .elapsed_minutes
        .map_or_else(|| "-".to_string(), |minutes| format!("{minutes:.1}"));
    let tokens = record
        .tokens
        .map_or_else(|| "-".to_string(), group_thousands);
    format!(
        "| {rank} | {} | {} | {}/10 | {time} | {tokens} | {} |\n",
        escape_cell(&record.source_id),
        record.status.symbol(),
        record.quality_score,
        escape_cell(&options.note(record)),
    )
}

/// Escapes text for a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn status_legend(status: Status, language: Language) -> &'static str {
    match status {
        Status::Success => language.pick("成功完成", "Completed successfully"),
        Status::Partial => language.pick("部分可用", "Partially working"),
        Status::Failed => language.pick("失败", "Failed"),
        Status::Unclear => language.pick("状态不明", "Status unclear"),
    }
}

fn summary_lines(summary: &StatusSummary, language: Language, prefix: &str) -> String {
    let mut out = format!(
        "{prefix}{}: {}\n",
        language.pick("测试总数", "Total Tests"),
        summary.total
    );
    for status in Status::ALL {
        out.push_str(&format!(
            "{prefix}{} {}: {} ({}%)\n",
            status.symbol(),
            status.label(),
            summary.count(status),
            summary.percentage(status)
        ));
    }
    out
}

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn package_to_table(
    package: &ResultPackage,
    corpus: &Corpus,
    options: &RenderOptions,
) -> String {
    let language = options.language;
    let mut out = String::new();

    out.push_str(&format!("{}\n\n", report_title(package, language)));
    out.push_str(&summary_lines(&package.summary, language, ""));
    out.push('\n');

    out.push_str(RULE);
    out.push('\n');
    out.push_str(language.pick("性能排行榜", "TOP PERFORMERS"));
    out.push('\n');
    out.push_str(RULE);
    out.push_str("\n\n");

    for (index, record) in corpus.top(options.top).iter().enumerate() {
        out.push_str(&table_entry(index + 1, record, options));
        out.push('\n');
    }

    out.push_str(RULE);
    out.push('\n');
    out
}

fn table_entry(rank: usize, record: &OutcomeRecord, options: &RenderOptions) -> String {
    let score = usize::from(record.quality_score.min(10));
    let bar = format!("{}{}", "█".repeat(score), "░".repeat(10 - score));
    let time = record
        .elapsed_minutes
        .map_or_else(|| "N/A".to_string(), |minutes| format!("{minutes:.1}min"));
    let tokens = record
        .tokens
        .map_or_else(|| "N/A".to_string(), |tokens| format!("{}K", tokens / 1000));

    let mut note = options.note(record);
    if note.is_empty() {
        note = "N/A".to_string();
    }

    format!(
        "{rank:2}. [{score:2}/10] {bar} {}\n    Status: {:<8}  Time: {time:<10}  Tokens: {tokens}\n    Notes: {note}\n",
        record.source_id,
        record.status.label(),
    )
}

/// Formats an integer with `,` between groups of three digits.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_package() -> ResultPackage {
        ResultPackage::new(
            "2026-01-15T10:30:00Z",
            vec![
                OutcomeRecord::new("kimi+roo", Status::Success)
                    .with_elapsed_minutes(Some(2.5))
                    .with_tokens(Some(1_234_567))
                    .with_quality_score(9)
                    .with_note("完成度很高"),
                OutcomeRecord::new("glm+cline", Status::Failed)
                    .with_quality_score(2)
                    .with_note("完全失败"),
            ],
        )
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1200), "1,200");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_package_json_keeps_canonical_notes() {
        let json = format_package(&sample_package(), OutputFormat::Json, &RenderOptions::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["records"][0]["note"], "完成度很高");
        assert_eq!(value["records"][1]["elapsed_minutes"], serde_json::Value::Null);
        assert_eq!(value["summary"]["failed"], 1);
    }

    #[test]
    fn test_format_package_yaml() {
        let yaml = format_package(&sample_package(), OutputFormat::Yaml, &RenderOptions::default())
            .unwrap();
        assert!(yaml.contains("source_id: kimi+roo"));
        assert!(yaml.contains("status: SUCCESS"));
    }

    #[test]
    fn test_format_package_markdown_english() {
        let md = format_package(
            &sample_package(),
            OutputFormat::Markdown,
            &RenderOptions::default(),
        )
        .unwrap();
        assert!(md.starts_with("# AI-PK BENCHMARK REPORT"));
        assert!(md.contains("| 1 | kimi+roo | ✅ | 9/10 | 2.5 | 1,234,567 | High completion quality |"));
        assert!(md.contains("| 2 | glm+cline | ❌ | 2/10 | - | - | Complete failure |"));
        assert!(md.contains("✅ SUCCESS: 1 (50%)"));
    }

    #[test]
    fn test_format_package_markdown_chinese() {
        let options = RenderOptions {
            language: Language::Zh,
            ..RenderOptions::default()
        };
        let md = format_package(&sample_package(), OutputFormat::Markdown, &options).unwrap();
        assert!(md.contains("## 排行榜"));
        assert!(md.contains("| 完成度很高 |"));
    }

    #[test]
    fn test_format_package_table_respects_top() {
        let options = RenderOptions {
            top: 1,
            ..RenderOptions::default()
        };
        let table = format_package(&sample_package(), OutputFormat::Table, &options).unwrap();
        assert!(table.contains(" 1. [ 9/10] █████████░ kimi+roo"));
        assert!(table.contains("Time: 2.5min"));
        assert!(table.contains("Tokens: 1234K"));
        assert!(!table.contains("glm+cline"));
        assert!(table.contains("Total Tests: 2"));
    }

    #[test]
    fn test_format_record_table_without_metrics() {
        let record = OutcomeRecord::new("x", Status::Unclear);
        let table = format_record(&record, OutputFormat::Table, &RenderOptions::default()).unwrap();
        assert!(table.contains("[ 0/10] ░░░░░░░░░░ x"));
        assert!(table.contains("Time: N/A"));
        assert!(table.contains("Notes: N/A"));
    }

    #[test]
    fn test_markdown_escapes_pipes_in_cells() {
        let package = ResultPackage::new(
            "2026-01-15T10:30:00Z",
            vec![OutcomeRecord::new("kimi|roo", Status::Partial).with_note("a|b\nc")],
        );
        let md = format_package(&package, OutputFormat::Markdown, &RenderOptions::default())
            .unwrap();
        assert!(md.contains("| 1 | kimi\\|roo | ⚠️ | 0/10 | - | - | a\\|b c |"));
    }

    #[test]
    fn test_human_formats_rank_unsorted_packages() {
        let package = ResultPackage::new(
            "2026-01-15T10:30:00Z",
            vec![
                OutcomeRecord::new("low", Status::Success).with_quality_score(3),
                OutcomeRecord::new("high", Status::Failed).with_quality_score(8),
            ],
        );
        let options = RenderOptions {
            top: 1,
            ..RenderOptions::default()
        };
        let table = format_package(&package, OutputFormat::Table, &options).unwrap();
        assert!(table.contains(" 1. [ 8/10] ████████░░ high"));
        assert!(!table.contains("low"));

        let md = format_package(&package, OutputFormat::Markdown, &options).unwrap();
        assert!(md.contains("| 1 | high |"));
        assert!(md.contains("| 2 | low |"));
    }

    #[test]
    fn test_human_formats_reject_duplicate_ids() {
        let package = ResultPackage::new(
            "2026-01-15T10:30:00Z",
            vec![
                OutcomeRecord::new("a", Status::Success),
                OutcomeRecord::new("a", Status::Failed),
            ],
        );
        let err = format_package(&package, OutputFormat::Table, &RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, crate::AnalyzeError::Aggregate(_)));
        assert!(format_package(&package, OutputFormat::Json, &RenderOptions::default()).is_ok());
    }
}
