use regex::RegexBuilder;

use crate::models::Rule;

/// Outcome of a successful rule match.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub rule_id: i64,
    pub category_id: i64,
    pub category_name: String,
}

/// True if the merchant text matches the rule's pattern, either as a
/// case-insensitive substring or as a case-insensitive regex. A pattern
/// that fails to compile as a regex falls back to the substring check
/// alone; it never aborts evaluation.
fn pattern_matches(merchant: &str, pattern: &str) -> bool {
    let merchant_lower = merchant.to_lowercase();
    let pattern_lower = pattern.to_lowercase();
    if merchant_lower.contains(&pattern_lower) {
        return true;
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(merchant))
        .unwrap_or(false)
}

fn rule_matches(merchant: &str, amount: f64, rule: &Rule) -> bool {
    if pattern_matches(merchant, &rule.pattern) {
        return true;
    }
    match rule.amount_threshold {
        Some(threshold) => amount >= threshold,
        None => false,
    }
}

/// Scan rules in the given order and return the category of the first
/// rule that matches the receipt's merchant text or amount. Returns None
/// when no rule matches; the caller owns the fallback policy.
pub fn evaluate_rules(merchant: &str, amount: f64, rules: &[Rule]) -> Option<RuleMatch> {
    rules
        .iter()
        .find(|rule| rule_matches(merchant, amount, rule))
        .map(|rule| RuleMatch {
            rule_id: rule.id,
            category_id: rule.category_id,
            category_name: rule.category_name.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: i64, pattern: &str, threshold: Option<f64>, category: &str) -> Rule {
        Rule {
            id,
            pattern: pattern.to_string(),
            amount_threshold: threshold,
            position: id,
            category_id: id * 10,
            category_name: category.to_string(),
        }
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let rules = vec![rule(1, "starbucks", None, "Food & Dining")];
        let m = evaluate_rules("STARBUCKS #1234", 5.75, &rules).unwrap();
        assert_eq!(m.category_name, "Food & Dining");
    }

    #[test]
    fn test_regex_pattern_match() {
        let rules = vec![rule(1, r"^uber\s+(eats|trip)", None, "Transportation")];
        assert!(evaluate_rules("Uber Trip 58279", 28.75, &rules).is_some());
        assert!(evaluate_rules("Uber One Membership", 9.99, &rules).is_none());
    }

    #[test]
    fn test_threshold_match_without_pattern_match() {
        let rules = vec![
            rule(1, "starbucks", None, "Food & Dining"),
            rule(2, "amazon", Some(100.0), "Tech"),
        ];
        // Threshold clause fires: 250 >= 100, even though "amazon" also
        // matches the pattern of the same rule.
        let m = evaluate_rules("Amazon", 250.0, &rules).unwrap();
        assert_eq!(m.category_name, "Tech");
    }

    #[test]
    fn test_first_match_wins() {
        let rules = vec![
            rule(1, "payment", None, "Client Services"),
            rule(2, "payment", None, "Bank Fees"),
        ];
        let m = evaluate_rules("PAYMENT RECEIVED", 100.0, &rules).unwrap();
        assert_eq!(m.category_name, "Client Services");
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let rules = vec![rule(1, "zzz-no-such-merchant", Some(100.0), "Big Ticket")];
        assert!(evaluate_rules("Unknown Shop", 100.0, &rules).is_some());
        assert!(evaluate_rules("Unknown Shop", 99.99, &rules).is_none());
    }

    #[test]
    fn test_no_match_returns_none() {
        let rules = vec![
            rule(1, "starbucks", None, "Food & Dining"),
            rule(2, "amazon", Some(100.0), "Tech"),
        ];
        assert!(evaluate_rules("Unknown Shop", 10.0, &rules).is_none());
    }

    #[test]
    fn test_invalid_regex_is_skipped_not_fatal() {
        let rules = vec![
            rule(1, "([unclosed", None, "Broken"),
            rule(2, "shell", None, "Transportation"),
        ];
        let m = evaluate_rules("Shell Gas Station", 45.0, &rules).unwrap();
        assert_eq!(m.category_name, "Transportation");
    }

    #[test]
    fn test_invalid_regex_still_matches_as_substring() {
        // "c++" is not a valid regex but is a legitimate substring pattern.
        let rules = vec![rule(1, "c++", None, "Education")];
        assert!(evaluate_rules("C++ Conference Ticket", 300.0, &rules).is_some());
    }

    #[test]
    fn test_empty_rule_set() {
        assert!(evaluate_rules("Starbucks", 5.0, &[]).is_none());
    }
}
