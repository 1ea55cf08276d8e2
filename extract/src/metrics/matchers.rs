//! Elapsed-time matcher strategies.

use std::sync::LazyLock;

use regex::Regex;

use super::Probe;

static WALL_CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"real\s+(\d+)m([\d.]+)s").expect("static regex must compile"));
static ELAPSED_PHRASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"用时[：:]*\s*(\d+)\s*分钟").expect("static regex must compile"));
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*分钟").expect("static regex must compile"));

/// Pluggable strategy for pulling elapsed minutes out of a log body.
///
/// Matchers are evaluated in priority order by
/// [`MetricExtractor`](super::MetricExtractor); the first one that does not
/// report [`Probe::NoMatch`] decides the field.
pub trait TimeMatcher: Send + Sync {
    fn name(&self) -> &'static str;
    fn probe(&self, text: &str) -> Probe<f64>;
}

/// `time` harness output such as `real 2m15.0s`.
pub struct WallClockMatcher;

impl TimeMatcher for WallClockMatcher {
    fn name(&self) -> &'static str {
        "wall_clock"
    }

    fn probe(&self, text: &str) -> Probe<f64> {
        let Some(caps) = WALL_CLOCK_RE.captures(text) else {
            return Probe::NoMatch;
        };
        let minutes = caps[1].parse::<u32>();
        let seconds = caps[2].parse::<f64>();
        match (minutes, seconds) {
            (Ok(m), Ok(s)) if s.is_finite() => Probe::Found(f64::from(m) + s / 60.0),
            _ => Probe::Malformed(caps[0].to_string()),
        }
    }
}

/// Explicit phrase such as `用时：35分钟`.
pub struct ElapsedPhraseMatcher;

impl TimeMatcher for ElapsedPhraseMatcher {
    fn name(&self) -> &'static str {
        "elapsed_phrase"
    }

    fn probe(&self, text: &str) -> Probe<f64> {
        match ELAPSED_PHRASE_RE.captures(text) {
            Some(caps) => parse_whole_minutes(&caps[1], &caps[0]),
            None => Probe::NoMatch,
        }
    }
}

/// Weak fallback: when the log shows both start and end markers, the first
/// standalone `N分钟` is taken as the elapsed time.
pub struct MarkerFallbackMatcher {
    start_marker: String,
    end_marker: String,
}

impl MarkerFallbackMatcher {
    pub fn new(start_marker: impl Into<String>, end_marker: impl Into<String>) -> Self {
        Self {
            start_marker: start_marker.into(),
            end_marker: end_marker.into(),
        }
    }
}

impl Default for MarkerFallbackMatcher {
    fn default() -> Self {
        Self::new("cat start", "cat end")
    }
}

impl TimeMatcher for MarkerFallbackMatcher {
    fn name(&self) -> &'static str {
        "marker_fallback"
    }

    fn probe(&self, text: &str) -> Probe<f64> {
        if !text.contains(self.start_marker.as_str()) || !text.contains(self.end_marker.as_str()) {
            return Probe::NoMatch;
        }
        match MINUTES_RE.captures(text) {
            Some(caps) => parse_whole_minutes(&caps[1], &caps[0]),
            None => Probe::NoMatch,
        }
    }
}

fn parse_whole_minutes(digits: &str, matched: &str) -> Probe<f64> {
    // `\d` also matches non-ASCII digits, which `parse` rejects.
    match digits.parse::<u32>() {
        Ok(n) => Probe::Found(f64::from(n)),
        Err(_) => Probe::Malformed(matched.to_string()),
    }
}
