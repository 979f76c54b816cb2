use serde::{Deserialize, Serialize};

use crate::app::Result;
use crate::rules::Rule;

/// A feed URL plus its ordered rule lists. Rule order is significant:
/// it defines match precedence within each list, and keyword rules are
/// always evaluated before regex rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub regexes: Vec<String>,
}

impl Source {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().to_lowercase(),
            keywords: Vec::new(),
            regexes: Vec::new(),
        }
    }

    /// Append a keyword expression, normalized to lowercase. Total:
    /// any expression is accepted.
    pub fn add_keyword(&mut self, expr: &str) {
        let expr = expr.trim().to_lowercase();
        if !expr.is_empty() {
            self.keywords.push(expr);
        }
    }

    /// Append a regex rule after validating it, so a syntactically
    /// broken pattern never enters the matching path.
    pub fn add_regex(&mut self, pattern: &str) -> Result<()> {
        Rule::regex(pattern)?;
        self.regexes.push(pattern.to_string());
        Ok(())
    }

    /// Remove keywords by zero-based index. Invalid indices are
    /// ignored; survivors keep their relative order. Returns the
    /// removed expressions.
    pub fn remove_keywords(&mut self, indices: &[usize]) -> Vec<String> {
        Self::remove_at(&mut self.keywords, indices)
    }

    /// Remove regex rules by zero-based index, same semantics as
    /// [`Source::remove_keywords`].
    pub fn remove_regexes(&mut self, indices: &[usize]) -> Vec<String> {
        Self::remove_at(&mut self.regexes, indices)
    }

    fn remove_at(list: &mut Vec<String>, indices: &[usize]) -> Vec<String> {
        let mut removed = Vec::new();
        let mut kept = Vec::new();
        for (i, item) in list.drain(..).enumerate() {
            if indices.contains(&i) {
                removed.push(item);
            } else {
                kept.push(item);
            }
        }
        *list = kept;
        removed
    }

    /// Compile this source's rules into one ordered list: keywords in
    /// stored order, then regexes in stored order. A stored regex that
    /// no longer compiles (hand-edited state file) is logged and
    /// skipped; it never aborts the rest of the list.
    pub fn compiled_rules(&self) -> Vec<Rule> {
        let mut rules: Vec<Rule> = self.keywords.iter().map(|k| Rule::keyword(k)).collect();

        for pattern in &self.regexes {
            match Rule::regex(pattern) {
                Ok(rule) => rules.push(rule),
                Err(e) => {
                    tracing::warn!(url = %self.url, pattern = %pattern, error = %e,
                        "skipping stored regex that no longer compiles");
                }
            }
        }

        rules
    }

    /// Short display name: the host part of the URL.
    pub fn display_name(&self) -> &str {
        let stripped = self
            .url
            .strip_prefix("https://")
            .or_else(|| self.url.strip_prefix("http://"))
            .unwrap_or(&self.url);
        stripped.split('/').next().unwrap_or(stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleKind;

    #[test]
    fn add_keyword_normalizes() {
        let mut source = Source::new("https://rss.example.com");
        source.add_keyword(" DMIT ");
        source.add_keyword("");
        assert_eq!(source.keywords, vec!["dmit"]);
    }

    #[test]
    fn add_regex_rejects_invalid() {
        let mut source = Source::new("https://rss.example.com");
        assert!(source.add_regex("(unclosed").is_err());
        assert!(source.regexes.is_empty());
        assert!(source.add_regex(r"\d+GB").is_ok());
        assert_eq!(source.regexes, vec![r"\d+GB"]);
    }

    #[test]
    fn remove_preserves_order_of_survivors() {
        let mut source = Source::new("https://rss.example.com");
        for kw in ["a", "b", "c", "d"] {
            source.add_keyword(kw);
        }
        let removed = source.remove_keywords(&[1, 3]);
        assert_eq!(removed, vec!["b", "d"]);
        assert_eq!(source.keywords, vec!["a", "c"]);
    }

    #[test]
    fn remove_ignores_out_of_range() {
        let mut source = Source::new("https://rss.example.com");
        source.add_keyword("a");
        let removed = source.remove_keywords(&[5]);
        assert!(removed.is_empty());
        assert_eq!(source.keywords, vec!["a"]);
    }

    #[test]
    fn compiled_rules_order_keywords_first() {
        let mut source = Source::new("https://rss.example.com");
        source.add_keyword("dmit");
        source.add_regex(r"\d+GB").unwrap();
        let rules = source.compiled_rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].kind(), RuleKind::Keyword);
        assert_eq!(rules[1].kind(), RuleKind::Regex);
    }

    #[test]
    fn compiled_rules_skips_broken_stored_regex() {
        let mut source = Source::new("https://rss.example.com");
        source.add_keyword("dmit");
        // Simulate a hand-edited state file with a broken pattern.
        source.regexes.push("(broken".to_string());
        source.regexes.push(r"\d+GB".to_string());
        let rules = source.compiled_rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].describe(), r"\d+GB");
    }

    #[test]
    fn display_name_is_host() {
        let source = Source::new("https://rss.nodeseek.com/feed.xml");
        assert_eq!(source.display_name(), "rss.nodeseek.com");
        let bare = Source::new("not-a-url");
        assert_eq!(bare.display_name(), "not-a-url");
    }
}
