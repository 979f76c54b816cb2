//! Matchable rules: compiled keyword expressions and user regexes,
//! unified behind one [`Rule`] type so the matching engine needs a
//! single evaluation loop.

pub mod keyword;

pub use keyword::KeywordPattern;

use regex::{Regex, RegexBuilder};

use crate::app::{FeedwatchError, Result};

/// Which rule list a rule came from. Keyword rules take precedence
/// over regex rules during matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Keyword,
    Regex,
}

#[derive(Debug, Clone)]
pub enum Rule {
    Keyword {
        expr: String,
        pattern: KeywordPattern,
    },
    Regex {
        pattern: String,
        regex: Regex,
    },
}

impl Rule {
    /// Build a keyword rule. Never fails; the expression is normalized
    /// to lowercase the same way it is stored.
    pub fn keyword(expr: &str) -> Self {
        let expr = expr.trim().to_lowercase();
        let pattern = KeywordPattern::compile(&expr);
        Rule::Keyword { expr, pattern }
    }

    /// Build a regex rule, validating the pattern. Invalid patterns are
    /// rejected here so they never reach the matching path.
    pub fn regex(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| FeedwatchError::InvalidRegex(e.to_string()))?;
        Ok(Rule::Regex {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Rule::Keyword { pattern, .. } => pattern.matches(text),
            Rule::Regex { regex, .. } => regex.is_match(text),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Keyword { .. } => RuleKind::Keyword,
            Rule::Regex { .. } => RuleKind::Regex,
        }
    }

    /// The user-supplied text of the rule, for listings and
    /// notification messages.
    pub fn describe(&self) -> &str {
        match self {
            Rule::Keyword { expr, .. } => expr,
            Rule::Regex { pattern, .. } => pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_rule_normalizes_expression() {
        let rule = Rule::keyword("  DMIT ");
        assert_eq!(rule.describe(), "dmit");
        assert!(rule.matches("DMIT sale"));
    }

    #[test]
    fn regex_rule_is_case_insensitive_search() {
        let rule = Rule::regex(r"\d+GB").unwrap();
        assert!(rule.matches("comes with 16gb of RAM"));
        assert!(rule.matches("2GB VPS"));
        assert!(!rule.matches("no sizes here"));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let err = Rule::regex("(unclosed").unwrap_err();
        assert!(matches!(err, FeedwatchError::InvalidRegex(_)));
    }

    #[test]
    fn kind_and_describe() {
        let kw = Rule::keyword("+a-b");
        let re = Rule::regex("(VPS|服务器)").unwrap();
        assert_eq!(kw.kind(), RuleKind::Keyword);
        assert_eq!(re.kind(), RuleKind::Regex);
        assert_eq!(re.describe(), "(VPS|服务器)");
    }
}
