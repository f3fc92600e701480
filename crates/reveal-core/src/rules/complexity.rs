//! C-series: complexity thresholds over function/method structure (spec §4.3).

use super::{Rule, RuleContext};
use crate::detection::{Detection, Severity};

#[derive(Default)]
pub struct C901;
impl Rule for C901 {
    fn code(&self) -> &'static str {
        "C901"
    }
    fn message(&self) -> &'static str {
        "cyclomatic complexity exceeds threshold"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["*"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(structure) = ctx.structure else { return Vec::new() };
        let threshold = ctx.thresholds.complexity;
        let mut out = Vec::new();
        for category in ["functions", "methods"] {
            for item in structure.category(category) {
                let Some(complexity) = item.complexity else { continue };
                if complexity > threshold {
                    out.push(
                        Detection::new(
                            self.code(),
                            ctx.path.to_path_buf(),
                            item.line,
                            format!("`{}` has cyclomatic complexity {complexity} (max {threshold})", item.name),
                            self.severity(),
                        )
                        .with_suggestion("Extract branches into smaller helper functions"),
                    );
                }
            }
        }
        out
    }
}

#[derive(Default)]
pub struct C905;
impl Rule for C905 {
    fn code(&self) -> &'static str {
        "C905"
    }
    fn message(&self) -> &'static str {
        "nesting depth exceeds threshold"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["*"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        // Nesting depth over 4 blocks is the point diminishing readability
        // sets in regardless of language; unlike complexity this has no
        // REVEAL_* override since it rarely needs per-project tuning.
        const MAX_DEPTH: u32 = 4;
        let Some(structure) = ctx.structure else { return Vec::new() };
        let mut out = Vec::new();
        for category in ["functions", "methods"] {
            for item in structure.category(category) {
                let Some(depth) = item.depth else { continue };
                if depth > MAX_DEPTH {
                    out.push(Detection::new(
                        self.code(),
                        ctx.path.to_path_buf(),
                        item.line,
                        format!("`{}` nests {depth} blocks deep (max {MAX_DEPTH})", item.name),
                        self.severity(),
                    ));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::structure::extractors::treesitter;
    use crate::structure::grammar::GrammarLanguage;
    use std::path::Path;

    #[test]
    fn c901_flags_high_complexity_function() {
        let source = "fn f(x: i32) -> i32 {\n    if x > 0 { if x > 1 { if x > 2 { if x > 3 { if x > 4 { if x > 5 { if x > 6 { if x > 7 { if x > 8 { if x > 9 { if x > 10 { return 1 } } } } } } } } } } }\n    0\n}\n";
        let doc = treesitter::extract(source, GrammarLanguage::Rust).unwrap();
        let thresholds = Thresholds::default();
        let ctx = RuleContext {
            path: Path::new("a.rs"),
            structure: Some(&doc),
            content: source,
            schema: None,
            thresholds: &thresholds,
            dev_mode: false,
        };
        let detections = C901::default().check(&ctx);
        assert_eq!(detections.len(), 1);
    }
}
