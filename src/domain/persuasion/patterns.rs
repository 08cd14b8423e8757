//! Case-insensitive regex tables shared by the rule-based classifiers.

use regex::Regex;

/// A list of compiled patterns matched independently against a text.
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: Vec<Regex>,
}

impl PatternTable {
    /// Compiles every source with the case-insensitive flag. A pattern that
    /// fails to compile is logged and left out of the table.
    pub fn compile(sources: &[&str]) -> Self {
        let patterns = sources
            .iter()
            .filter_map(|src| match Regex::new(&format!("(?i){}", src)) {
                Ok(re) => Some(re),
                Err(err) => {
                    tracing::error!(pattern = %src, error = %err, "invalid classifier pattern");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Builds a whole-word pattern for each literal keyword.
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sources: Vec<String> = keywords
            .into_iter()
            .map(|k| format!(r"\b{}\b", regex::escape(k.as_ref())))
            .collect();
        let refs: Vec<&str> = sources.iter().map(String::as_str).collect();
        Self::compile(&refs)
    }

    /// Number of patterns with at least one match.
    pub fn count(&self, text: &str) -> usize {
        self.patterns.iter().filter(|re| re.is_match(text)).count()
    }

    pub fn any(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Lowercases, unifies apostrophes and collapses whitespace.
pub fn normalize(text: &str) -> String {
    text.replace(['\u{2019}', '\u{2018}', '`'], "'")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
