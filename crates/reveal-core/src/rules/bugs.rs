//! B-series: bug-pattern detectors over Python method structure (spec §4.3).

use super::{Rule, RuleContext};
use crate::detection::{Detection, Severity};

fn has_decorator(decorators: &[String], name: &str) -> bool {
    decorators.iter().any(|d| d.trim_start_matches('@') == name)
}

pub struct B002;
impl Rule for B002 {
    fn code(&self) -> &'static str {
        "B002"
    }
    fn message(&self) -> &'static str {
        "@staticmethod takes `self` as its first parameter"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".py"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(structure) = ctx.structure else { return Vec::new() };
        let mut out = Vec::new();
        for item in structure.category("methods") {
            if !has_decorator(&item.decorators, "staticmethod") {
                continue;
            }
            let takes_self = item
                .signature
                .as_deref()
                .map(|sig| {
                    let after_paren = sig.split_once('(').map(|(_, rest)| rest).unwrap_or("");
                    after_paren.trim_start().starts_with("self")
                })
                .unwrap_or(false);
            if takes_self {
                out.push(
                    Detection::new(self.code(), ctx.path.to_path_buf(), item.line, self.message(), self.severity())
                        .with_suggestion(format!("Remove the unused `self` parameter from `{}`", item.name))
                        .with_context(item.signature.clone().unwrap_or_default()),
                );
            }
        }
        out
    }
}

pub struct B003;
impl Rule for B003 {
    fn code(&self) -> &'static str {
        "B003"
    }
    fn message(&self) -> &'static str {
        "@property getter is unusually large for a simple accessor"
    }
    fn severity(&self) -> Severity {
        Severity::Low
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".py"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        const MAX_PROPERTY_LINES: u32 = 10;
        let Some(structure) = ctx.structure else { return Vec::new() };
        let mut out = Vec::new();
        for item in structure.category("methods") {
            if !has_decorator(&item.decorators, "property") {
                continue;
            }
            let span = item.line_end.saturating_sub(item.line) + 1;
            if span > MAX_PROPERTY_LINES {
                out.push(
                    Detection::new(self.code(), ctx.path.to_path_buf(), item.line, self.message(), self.severity())
                        .with_suggestion(format!(
                            "`{}` is {span} lines; consider a regular method instead of @property",
                            item.name
                        )),
                );
            }
        }
        out
    }
}

pub struct B004;
impl Rule for B004 {
    fn code(&self) -> &'static str {
        "B004"
    }
    fn message(&self) -> &'static str {
        "@property getter has no return statement"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".py"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(structure) = ctx.structure else { return Vec::new() };
        let mut out = Vec::new();
        for item in structure.category("methods") {
            if !has_decorator(&item.decorators, "property") {
                continue;
            }
            let contains_return =
                body_contains(ctx.content, item.line, item.line_end, "return");
            if !contains_return {
                out.push(Detection::new(
                    self.code(),
                    ctx.path.to_path_buf(),
                    item.line,
                    self.message(),
                    self.severity(),
                ));
            }
        }
        out
    }
}

fn body_contains(content: &str, line: u32, line_end: u32, needle: &str) -> bool {
    let lines: Vec<&str> = content.lines().collect();
    let start = line.saturating_sub(1) as usize;
    let end = (line_end as usize).min(lines.len());
    lines.get(start..end).map(|slice| slice.iter().any(|l| l.contains(needle))).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::structure::extractors::treesitter;
    use crate::structure::grammar::GrammarLanguage;
    use std::path::Path;

    fn ctx<'a>(path: &'a Path, structure: &'a crate::structure::StructureDocument, content: &'a str, thresholds: &'a Thresholds) -> RuleContext<'a> {
        RuleContext { path, structure: Some(structure), content, schema: None, thresholds, dev_mode: false }
    }

    #[test]
    fn b002_flags_staticmethod_with_self() {
        let source = "class Foo:\n    @staticmethod\n    def bar(self, x):\n        return x\n";
        let doc = treesitter::extract(source, GrammarLanguage::Python).unwrap();
        let thresholds = Thresholds::default();
        let detections = B002.check(&ctx(Path::new("a.py"), &doc, source, &thresholds));
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn b004_flags_property_without_return() {
        let source = "class Foo:\n    @property\n    def bar(self):\n        self.x = 1\n";
        let doc = treesitter::extract(source, GrammarLanguage::Python).unwrap();
        let thresholds = Thresholds::default();
        let detections = B004.check(&ctx(Path::new("a.py"), &doc, source, &thresholds));
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn b004_passes_property_with_return() {
        let source = "class Foo:\n    @property\n    def bar(self):\n        return self.x\n";
        let doc = treesitter::extract(source, GrammarLanguage::Python).unwrap();
        let thresholds = Thresholds::default();
        let detections = B004.check(&ctx(Path::new("a.py"), &doc, source, &thresholds));
        assert!(detections.is_empty());
    }
}
