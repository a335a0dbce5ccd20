use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::HookError;

/// Splits the raw multi-line topic field of the edit form into patterns.
///
/// Lines are separated by `\r\n`, `\n` or `\r`, trimmed, and blank lines dropped.
#[must_use]
pub fn split_topics(raw: &str) -> Vec<String> {
    static LINE_BREAK_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\r\n|\n|\r").expect("static regex compile"));

    LINE_BREAK_RE
        .split(raw)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Compiled topic allow-list, in configured order.
#[derive(Debug, Clone, Default)]
pub struct TopicMatcher {
    patterns: Vec<Regex>,
}

impl TopicMatcher {
    /// # Errors
    ///
    /// Returns `HookError::InvalidTopicPattern` for the first pattern that does not compile.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, HookError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|e| HookError::InvalidTopicPattern {
                    pattern: p.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// First pattern found anywhere in `topic_arn`, if any.
    #[must_use]
    pub fn find_match(&self, topic_arn: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|re| re.is_match(topic_arn))
            .map(Regex::as_str)
    }
}
