//! Numeric signal extraction from free-form log text.
//!
//! Elapsed time comes from an ordered chain of [`TimeMatcher`] strategies,
//! strongest evidence first. Token usage comes from a single labelled
//! pattern. The two fields are extracted independently: a malformed number
//! in one never affects the other.

pub mod matchers;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

pub use matchers::{ElapsedPhraseMatcher, MarkerFallbackMatcher, TimeMatcher, WallClockMatcher};

static TOKENS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)tokens?\s*(?:used|usage|消耗|用量)[：:]*\s*([\d,_]+)")
        .expect("static regex must compile")
});

/// Result of probing text for one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
    /// The pattern did not occur.
    NoMatch,
    /// The pattern occurred but its literal did not parse; holds the match.
    Malformed(String),
    /// The pattern occurred and parsed.
    Found(T),
}

/// Numeric signals found in one log body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub elapsed_minutes: Option<f64>,
    pub tokens: Option<u64>,
}

/// Ordered chain of time matchers plus the token pattern.
///
/// # Examples
///
/// ```
/// use aipk_extract::metrics::MetricExtractor;
///
/// let extractor = MetricExtractor::default();
/// let metrics = extractor.extract("real 2m15.0s\nTokens Used: 1,200\n用时：40分钟");
/// assert_eq!(metrics.elapsed_minutes, Some(2.25));
/// assert_eq!(metrics.tokens, Some(1200));
/// ```
pub struct MetricExtractor {
    time_matchers: Vec<Box<dyn TimeMatcher>>,
}

impl MetricExtractor {
    /// Creates an extractor evaluating `time_matchers` in the given order.
    pub fn new(time_matchers: Vec<Box<dyn TimeMatcher>>) -> Self {
        Self { time_matchers }
    }

    /// Default chain with custom start/end markers for the weak fallback.
    pub fn with_markers(start_marker: &str, end_marker: &str) -> Self {
        Self::new(vec![
            Box::new(WallClockMatcher),
            Box::new(ElapsedPhraseMatcher),
            Box::new(MarkerFallbackMatcher::new(start_marker, end_marker)),
        ])
    }

    /// Matcher names in evaluation order.
    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.time_matchers.iter().map(|m| m.name()).collect()
    }

    pub fn extract(&self, text: &str) -> Metrics {
        Metrics {
            elapsed_minutes: self.extract_elapsed_minutes(text),
            tokens: extract_tokens(text),
        }
    }

    /// First matcher that recognizes a time signal decides the value; a
    /// malformed literal makes the field absent rather than falling through
    /// to weaker evidence.
    pub fn extract_elapsed_minutes(&self, text: &str) -> Option<f64> {
        for matcher in &self.time_matchers {
            match matcher.probe(text) {
                Probe::NoMatch => continue,
                Probe::Found(minutes) => {
                    debug!(matcher = matcher.name(), minutes, "Extracted elapsed time");
                    return Some(minutes);
                }
                Probe::Malformed(literal) => {
                    debug!(
                        matcher = matcher.name(),
                        literal = literal.as_str(),
                        "Malformed elapsed time literal"
                    );
                    return None;
                }
            }
        }
        None
    }
}

impl Default for MetricExtractor {
    fn default() -> Self {
        Self::with_markers("cat start", "cat end")
    }
}

impl std::fmt::Debug for MetricExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricExtractor")
            .field("time_matchers", &self.matcher_names())
            .finish()
    }
}

/// Extracts the first labelled token count, ignoring `,` and `_` grouping.
pub fn extract_tokens(text: &str) -> Option<u64> {
    match probe_tokens(text) {
        Probe::Found(tokens) => Some(tokens),
        Probe::Malformed(literal) => {
            debug!(literal = literal.as_str(), "Malformed token count literal");
            None
        }
        Probe::NoMatch => None,
    }
}

fn probe_tokens(text: &str) -> Probe<u64> {
    let Some(caps) = TOKENS_RE.captures(text) else {
        return Probe::NoMatch;
    };
    let digits: String = caps[1].chars().filter(|c| *c != ',' && *c != '_').collect();
    match digits.parse::<u64>() {
        Ok(tokens) => Probe::Found(tokens),
        Err(_) => Probe::Malformed(caps[0].to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_beats_weaker_signals() {
        let text = "cat start\n用时：50分钟\nreal 3m30.0s\ncat end\n约20分钟";
        let extractor = MetricExtractor::default();
        assert_eq!(extractor.extract_elapsed_minutes(text), Some(3.5));
    }

    #[test]
    fn test_elapsed_phrase_beats_marker_fallback() {
        let text = "cat start\n前后大约 20 分钟\ncat end\n总结：用时: 25 分钟";
        let extractor = MetricExtractor::default();
        assert_eq!(extractor.extract_elapsed_minutes(text), Some(25.0));
    }

    #[test]
    fn test_marker_fallback_is_last_resort() {
        let text = "cat start\n折腾了 45 分钟\ncat end";
        assert_eq!(
            MetricExtractor::default().extract_elapsed_minutes(text),
            Some(45.0)
        );
        assert_eq!(
            MetricExtractor::default().extract_elapsed_minutes("折腾了 45 分钟"),
            None
        );
    }

    #[test]
    fn test_malformed_time_is_absent_and_tokens_survive() {
        let text = "real 1m1.2.3s\n用时：9分钟\ntokens used: 5_000";
        let metrics = MetricExtractor::default().extract(text);
        assert_eq!(metrics.elapsed_minutes, None);
        assert_eq!(metrics.tokens, Some(5000));
    }

    #[test]
    fn test_token_label_variants() {
        assert_eq!(extract_tokens("Token usage: 1,234,567"), Some(1_234_567));
        assert_eq!(extract_tokens("TOKENS USED 42"), Some(42));
        assert_eq!(extract_tokens("token消耗：9_900"), Some(9900));
        assert_eq!(extract_tokens("tokens: 100"), None);
    }

    #[test]
    fn test_only_first_token_match_counts() {
        assert_eq!(
            extract_tokens("tokens used: 10\ntokens used: 20"),
            Some(10)
        );
    }

    #[test]
    fn test_malformed_token_count_is_absent() {
        assert_eq!(extract_tokens("tokens used: ,,,"), None);
        assert_eq!(extract_tokens("tokens used: 99999999999999999999999"), None);
    }

    #[test]
    fn test_custom_matcher_chain() {
        struct Fixed;
        impl TimeMatcher for Fixed {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn probe(&self, _text: &str) -> Probe<f64> {
                Probe::Found(1.0)
            }
        }

        let extractor = MetricExtractor::new(vec![Box::new(Fixed), Box::new(WallClockMatcher)]);
        assert_eq!(extractor.matcher_names(), ["fixed", "wall_clock"]);
        assert_eq!(extractor.extract_elapsed_minutes("real 9m0s"), Some(1.0));
    }
}
