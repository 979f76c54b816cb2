//! Keyword expression compiler.
//!
//! A keyword expression is either a plain substring (`dmit`) or a
//! `+A+B-C` combination: every `+`-segment contributes a required
//! substring, and `-`-separated tails within a segment contribute
//! forbidden substrings. Matching is case-insensitive throughout.

/// Compiled form of a keyword expression: the substrings that must all
/// be present and the substrings that must all be absent.
///
/// Derived deterministically from the expression; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordPattern {
    required: Vec<String>,
    forbidden: Vec<String>,
}

impl KeywordPattern {
    /// Compile an expression. Total: any input yields a usable pattern,
    /// malformed syntax degenerates to a literal substring match.
    pub fn compile(expr: &str) -> Self {
        let expr = expr.to_lowercase();

        if !expr.contains('+') && !expr.contains('-') {
            return Self {
                required: vec![expr],
                forbidden: Vec::new(),
            };
        }

        let mut required = Vec::new();
        let mut forbidden = Vec::new();

        for segment in expr.split('+') {
            if segment.is_empty() {
                continue;
            }
            let mut parts = segment.split('-');
            if let Some(first) = parts.next() {
                if !first.is_empty() {
                    required.push(first.to_string());
                }
            }
            for neg in parts {
                if !neg.is_empty() {
                    forbidden.push(neg.to_string());
                }
            }
        }

        Self {
            required,
            forbidden,
        }
    }

    /// True if every required substring is present and no forbidden
    /// substring is present, case-insensitively.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.required.iter().all(|s| text.contains(s.as_str()))
            && !self.forbidden.iter().any(|s| text.contains(s.as_str()))
    }

    /// Equivalent regex in lookaround form,
    /// `^(?!.*NEG1)..(?=.*POS1)...*$`, or `.*lit.*` for a plain literal.
    ///
    /// Exposed for display and interop with engines that support
    /// lookarounds; the `regex` crate does not, so evaluation goes
    /// through [`KeywordPattern::matches`] instead.
    pub fn to_regex(&self) -> String {
        if self.forbidden.is_empty() && self.required.len() == 1 {
            return format!(".*{}.*", regex::escape(&self.required[0]));
        }

        let mut out = String::from("^");
        for neg in &self.forbidden {
            out.push_str(&format!("(?!.*{})", regex::escape(neg)));
        }
        for pos in &self.required {
            out.push_str(&format!("(?=.*{})", regex::escape(pos)));
        }
        out.push_str(".*$");
        out
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn forbidden(&self) -> &[String] {
        &self.forbidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_is_substring_match() {
        let p = KeywordPattern::compile("dmit");
        assert!(p.matches("DMIT 2GB VPS Sale"));
        assert!(p.matches("xdmity"));
        assert!(!p.matches("Random Blog Post"));
    }

    #[test]
    fn literal_metacharacters_are_not_special() {
        let p = KeywordPattern::compile("c.d");
        assert!(p.matches("abc.def"));
        assert!(!p.matches("abcxdef"));
    }

    #[test]
    fn required_and_forbidden() {
        let p = KeywordPattern::compile("+A+B-C");
        assert!(p.matches("xAByz"));
        assert!(!p.matches("xAByzC"));
        assert!(!p.matches("xByz")); // missing A
        assert!(!p.matches("xAyz")); // missing B
    }

    #[test]
    fn multiple_minus_groups() {
        let p = KeywordPattern::compile("+A-B+X-Y");
        assert_eq!(p.required(), &["a", "x"]);
        assert_eq!(p.forbidden(), &["b", "y"]);
        assert!(p.matches("has A and X"));
        assert!(!p.matches("has A and X and B"));
        assert!(!p.matches("has A and X and Y"));
        assert!(!p.matches("only A here"));
    }

    #[test]
    fn leading_segment_without_plus() {
        // "A-B" has no '+' but contains '-': A required, B forbidden.
        let p = KeywordPattern::compile("A-B");
        assert!(p.matches("xAy"));
        assert!(!p.matches("xAyB"));
    }

    #[test]
    fn cjk_expression() {
        let p = KeywordPattern::compile("+VPS+优惠-免费");
        assert!(p.matches("限时VPS优惠活动"));
        assert!(!p.matches("VPS优惠免费领取"));
        assert!(!p.matches("限时优惠活动"));
    }

    #[test]
    fn empty_parts_are_ignored() {
        let p = KeywordPattern::compile("++A--+B");
        assert_eq!(p.required(), &["a", "b"]);
        assert!(p.forbidden().is_empty());
    }

    #[test]
    fn case_insensitive() {
        let p = KeywordPattern::compile("+VPS-FREE");
        assert!(p.matches("cheap vps here"));
        assert!(!p.matches("free vps here"));
    }

    #[test]
    fn regex_form_literal() {
        let p = KeywordPattern::compile("dmit");
        assert_eq!(p.to_regex(), ".*dmit.*");
    }

    #[test]
    fn regex_form_lookaround() {
        let p = KeywordPattern::compile("+A+B-C");
        assert_eq!(p.to_regex(), "^(?!.*c)(?=.*a)(?=.*b).*$");
    }

    #[test]
    fn regex_form_escapes_metacharacters() {
        let p = KeywordPattern::compile("+1.5GB-$0");
        assert_eq!(p.to_regex(), "^(?!.*\\$0)(?=.*1\\.5gb).*$");
    }
}
