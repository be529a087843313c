use regex::{Regex, RegexBuilder};

use super::AnalysisError;
use crate::config::KeywordConfig;

/// Case-insensitive "does this comment say thanks" test.
///
/// Compiles every keyword into one alternation: raw patterns first, in
/// configured order, then escaped literal phrases. Nothing is deduplicated.
/// With no keywords at all the pattern is empty and matches every input.
///
/// `\b` is Unicode-aware: accented letters count as word characters, so
/// `\bvlw\b` does not match inside "évlw".
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Regex,
}

impl KeywordMatcher {
    /// Build from raw pattern fragments, used verbatim, plus literal phrases.
    pub fn new<S, P>(patterns: &[S], phrases: &[P]) -> Result<Self, AnalysisError>
    where
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let alternatives: Vec<String> = patterns
            .iter()
            .map(|p| p.as_ref().to_string())
            .chain(phrases.iter().map(|p| regex::escape(p.as_ref())))
            .collect();
        let pattern = alternatives.join("|");

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| AnalysisError::InvalidKeyword { pattern, source })?;

        Ok(Self { regex })
    }

    pub fn from_config(config: &KeywordConfig) -> Result<Self, AnalysisError> {
        Self::new(&config.patterns, &config.phrases)
    }

    /// Unanchored search anywhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
