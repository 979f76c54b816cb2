//! Matching engine: evaluate an entry title against a source's rules
//! in precedence order.
//!
//! The rule slice is expected to hold keyword rules first (in stored
//! order), then regex rules (in stored order); see
//! [`Source::compiled_rules`](crate::domain::Source::compiled_rules).
//! The first matching rule wins and nothing after it is evaluated.

use crate::rules::{Rule, RuleKind};

/// Outcome of a successful match: which rule fired and how it was
/// supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub kind: RuleKind,
    pub rule: String,
}

/// Ordered short-circuit scan. Returns `None` when no rule matches.
pub fn match_entry(title: &str, rules: &[Rule]) -> Option<RuleMatch> {
    rules.iter().find(|r| r.matches(title)).map(|r| RuleMatch {
        kind: r.kind(),
        rule: r.describe().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(keywords: &[&str], regexes: &[&str]) -> Vec<Rule> {
        let mut out: Vec<Rule> = keywords.iter().map(|k| Rule::keyword(k)).collect();
        out.extend(regexes.iter().map(|r| Rule::regex(r).unwrap()));
        out
    }

    #[test]
    fn keyword_wins_over_regex() {
        // Both would match; the keyword rule is evaluated first.
        let rules = rules(&["dmit"], &[r"\d+GB"]);
        let m = match_entry("DMIT 2GB VPS Sale", &rules).unwrap();
        assert_eq!(m.kind, RuleKind::Keyword);
        assert_eq!(m.rule, "dmit");
    }

    #[test]
    fn first_keyword_in_stored_order_wins() {
        let rules = rules(&["vps", "sale"], &[]);
        let m = match_entry("VPS Sale", &rules).unwrap();
        assert_eq!(m.rule, "vps");
    }

    #[test]
    fn falls_through_to_regex() {
        let rules = rules(&["racknerd"], &[r"\d+GB"]);
        let m = match_entry("Big 4GB box", &rules).unwrap();
        assert_eq!(m.kind, RuleKind::Regex);
        assert_eq!(m.rule, r"\d+GB");
    }

    #[test]
    fn no_rule_matches() {
        let rules = rules(&["dmit"], &[r"\d+GB"]);
        assert_eq!(match_entry("Random Blog Post", &rules), None);
    }

    #[test]
    fn empty_rule_list_never_matches() {
        assert_eq!(match_entry("anything", &[]), None);
    }

    #[test]
    fn complex_keyword_expression() {
        let rules = rules(&["+vps+优惠-免费"], &[]);
        assert!(match_entry("限时VPS优惠活动", &rules).is_some());
        assert!(match_entry("VPS优惠免费领取", &rules).is_none());
    }
}
