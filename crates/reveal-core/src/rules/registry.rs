//! Rule selection algebra (spec §4.3): `(all ∩ selected) \ ignored`.
//! Grounded on `checks.py`'s `--select`/`--ignore` comma-split handling.

use super::{all_rules, Rule};

/// Holds every known rule and resolves `--select`/`--ignore` expressions
/// against it. Selection and ignore lists are comma-separated strings of
/// exact codes (`C901`), prefixes (`C9`), or bare category letters (`V`) —
/// all three collapse to the same "rule code starts with this token" test.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self { rules: all_rules() }
    }
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn find(&self, code: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.code() == code).map(|b| b.as_ref())
    }

    /// Resolve `--select`/`--ignore` into the ordered subset of rules that
    /// should run, preserving registration order (spec §5).
    pub fn resolve<'a>(&'a self, select: Option<&str>, ignore: Option<&str>) -> Vec<&'a dyn Rule> {
        let selected = parse_tokens(select);
        let ignored = parse_tokens(ignore);

        self.rules
            .iter()
            .map(|r| r.as_ref())
            .filter(|rule| selected.as_ref().map(|s| matches_any(rule.code(), s)).unwrap_or(true))
            .filter(|rule| !matches_any(rule.code(), &ignored))
            .collect()
    }
}

fn parse_tokens(expr: Option<&str>) -> Option<Vec<String>> {
    let expr = expr?;
    let tokens: Vec<String> = expr.split(',').map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

fn matches_any(code: &str, tokens: &[String]) -> bool {
    tokens.iter().any(|t| code.starts_with(t.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_means_all_applicable() {
        let registry = RuleRegistry::new();
        assert_eq!(registry.resolve(None, None).len(), registry.rules().len());
    }

    #[test]
    fn selecting_by_exact_code() {
        let registry = RuleRegistry::new();
        let resolved = registry.resolve(Some("C901"), None);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].code(), "C901");
    }

    #[test]
    fn selecting_by_category_prefix() {
        let registry = RuleRegistry::new();
        let resolved = registry.resolve(Some("V"), None);
        assert!(resolved.iter().all(|r| r.code().starts_with('V')));
        assert!(!resolved.is_empty());
    }

    #[test]
    fn ignore_removes_from_selection() {
        let registry = RuleRegistry::new();
        let resolved = registry.resolve(Some("F"), Some("F005"));
        assert!(resolved.iter().all(|r| r.code() != "F005"));
        assert!(resolved.iter().any(|r| r.code() == "F001"));
    }
}
