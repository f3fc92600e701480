//! Rule execution engine (spec §4.3): runs every applicable, selected rule
//! over a `(path, structure, content)` triple and collects its detections.
//!
//! A single misbehaving rule must not take down a whole check run — each
//! `check()` call is isolated with `catch_unwind` and a panic becomes a
//! debug-level log plus zero detections for that rule, not a crashed engine
//! (spec §7, Rule error: "Logged at debug level and skipped; the remaining
//! rules for that file still run").

use super::registry::RuleRegistry;
use super::{Rule, RuleContext};
use crate::config::Thresholds;
use crate::detection::Detection;
use crate::schema::Schema;
use crate::structure::StructureDocument;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

pub struct Engine<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Run the resolved rule subset against one file, in registration order
    /// (spec §5). Detections are NOT sorted here — callers sort the final
    /// aggregate across files with `Detection`'s `Ord` impl.
    #[allow(clippy::too_many_arguments)]
    pub fn check_file(
        &self,
        path: &Path,
        structure: Option<&StructureDocument>,
        content: &str,
        schema: Option<&Schema>,
        thresholds: &Thresholds,
        select: Option<&str>,
        ignore: Option<&str>,
        dev_mode: bool,
    ) -> Vec<Detection> {
        let ctx = RuleContext { path, structure, content, schema, thresholds, dev_mode };
        self.registry
            .resolve(select, ignore)
            .into_iter()
            .filter(|rule| rule.applies_to(path))
            .flat_map(|rule| run_rule_safely(rule, &ctx))
            .collect()
    }
}

fn run_rule_safely(rule: &dyn Rule, ctx: &RuleContext) -> Vec<Detection> {
    match catch_unwind(AssertUnwindSafe(|| rule.check(ctx))) {
        Ok(detections) => detections,
        Err(_) => {
            tracing::debug!(rule = rule.code(), path = %ctx.path.display(), "rule panicked, skipping");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Severity;

    struct Panicky;
    impl Rule for Panicky {
        fn code(&self) -> &'static str {
            "Q999"
        }
        fn message(&self) -> &'static str {
            "always panics"
        }
        fn severity(&self) -> Severity {
            Severity::Low
        }
        fn file_patterns(&self) -> &'static [&'static str] {
            &["*"]
        }
        fn check(&self, _ctx: &RuleContext) -> Vec<Detection> {
            panic!("boom")
        }
    }

    #[test]
    fn a_panicking_rule_does_not_abort_the_run() {
        let ctx = RuleContext {
            path: Path::new("a.rs"),
            structure: None,
            content: "",
            schema: None,
            thresholds: &Thresholds::default(),
            dev_mode: false,
        };
        assert!(run_rule_safely(&Panicky, &ctx).is_empty());
    }

    #[test]
    fn check_file_runs_applicable_rules_in_registration_order() {
        let registry = RuleRegistry::new();
        let engine = Engine::new(&registry);
        let content = "x".repeat(200) + "\n";
        let detections = engine.check_file(
            Path::new("a.txt"),
            None,
            &content,
            None,
            &Thresholds { line_length: 50, ..Thresholds::default() },
            Some("E501"),
            None,
            false,
        );
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].rule_code, "E501");
    }
}
