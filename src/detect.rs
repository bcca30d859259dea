//! Error signal detection over captured command output.
//!
//! The detector is a plain substring heuristic: any pattern occurring
//! anywhere in the text counts, regardless of line boundaries or meaning.
//! Benign messages such as `0 errors found` are therefore reported as
//! errors. That false positive is accepted behavior.

use regex::{Regex, RegexBuilder};

/// Default patterns, checked in order.
pub const DEFAULT_ERROR_PATTERNS: &[&str] = &[
    "error",
    "exception",
    "failed",
    "fatal",
    "traceback",
    "stack trace",
];

#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("Invalid error pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Case-insensitive pattern set applied to whole blocks of output.
#[derive(Debug, Clone)]
pub struct ErrorDetector {
    patterns: Vec<Regex>,
}

impl Default for ErrorDetector {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_ERROR_PATTERNS
                .iter()
                .map(|p| build_pattern(p).expect("default error patterns are valid regexes"))
                .collect(),
        }
    }
}

impl ErrorDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a detector from custom regex sources.
    pub fn with_patterns<I, S>(patterns: I) -> Result<Self, DetectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| build_pattern(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True if any pattern matches anywhere in `text`.
    pub fn contains_error(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// The first pattern, in set order, that matches `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|re| re.is_match(text))
            .map(|re| re.as_str())
    }
}

fn build_pattern(pattern: &str) -> Result<Regex, DetectorError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|source| DetectorError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_python_traceback() {
        let detector = ErrorDetector::new();
        let output = "Traceback (most recent call last):\n  File \"main.py\", line 1, in <module>";
        assert!(detector.contains_error(output));
    }

    #[test]
    fn test_success_message_with_errors_word_is_flagged() {
        // Substring match, not semantic.
        let detector = ErrorDetector::new();
        assert!(detector.contains_error("Build succeeded, 0 errors found"));
    }

    #[test]
    fn test_clean_output_not_flagged() {
        let detector = ErrorDetector::new();
        assert!(!detector.contains_error("total 0\ndrwxr-xr-x  2 user user 4096 ."));
        assert!(!detector.contains_error(""));
    }

    #[test]
    fn test_case_insensitive() {
        let detector = ErrorDetector::new();
        assert!(detector.contains_error("FATAL: database is locked"));
        assert!(detector.contains_error("npm ERR! Failed at the build script"));
        assert!(detector.contains_error("java.lang.NullPointerException"));
    }

    #[test]
    fn test_stack_trace_phrase() {
        let detector = ErrorDetector::new();
        assert!(detector.contains_error("printing Stack Trace below"));
        assert!(!detector.contains_error("stack\ntrace"));
    }

    #[test]
    fn test_first_match_follows_pattern_order() {
        let detector = ErrorDetector::new();
        assert_eq!(
            detector.first_match("fatal: not a git repository\nerror: aborting"),
            Some("error")
        );
        assert_eq!(detector.first_match("fatal: bad object"), Some("fatal"));
        assert_eq!(detector.first_match("all good"), None);
    }

    #[test]
    fn test_custom_patterns() {
        let detector = ErrorDetector::with_patterns(["segfault", r"exit status \d+"]).unwrap();
        assert!(detector.contains_error("Process finished: EXIT STATUS 2"));
        assert!(!detector.contains_error("error: this is not in the custom set"));
    }

    #[test]
    fn test_invalid_custom_pattern() {
        let err = ErrorDetector::with_patterns(["(unclosed"]).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }
}
