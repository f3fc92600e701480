//! I-series: import hygiene for Python sources (spec §4.3, grounded on
//! `I001.py`/`I004.py`).

use super::{Rule, RuleContext};
use crate::detection::{Detection, Severity};
use regex::Regex;
use std::path::Path;

/// Standard library module names whose shadowing by a same-named project
/// file is a common source of import confusion (I004). Not exhaustive —
/// covers the modules most often accidentally shadowed in the wild.
const STDLIB_MODULES: &[&str] = &[
    "abc", "argparse", "array", "ast", "asyncio", "base64", "bisect", "calendar", "collections",
    "copy", "csv", "dataclasses", "datetime", "decimal", "enum", "functools", "glob", "hashlib",
    "heapq", "html", "http", "io", "itertools", "json", "logging", "math", "os", "pathlib",
    "pickle", "platform", "queue", "random", "re", "shutil", "socket", "sqlite3", "string",
    "struct", "subprocess", "sys", "tempfile", "threading", "time", "types", "typing", "unittest",
    "urllib", "uuid", "warnings", "weakref", "xml", "zipfile", "config", "test", "setup",
];

pub struct I001;
impl Rule for I001 {
    fn code(&self) -> &'static str {
        "I001"
    }
    fn message(&self) -> &'static str {
        "unused import detected"
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

        for item in structure.category("imports") {
            let Some(text) = item.signature.as_deref() else { continue };
            if text.contains("import *") {
                continue;
            }
            let names = imported_names(text);
            if names.is_empty() {
                continue;
            }
            let all_unused = names.iter().all(|name| !used_elsewhere(ctx.content, name, item.line));
            if all_unused {
                out.push(
                    Detection::new(self.code(), ctx.path.to_path_buf(), item.line, self.message(), self.severity())
                        .with_suggestion(format!("Remove unused import: {text}"))
                        .with_context(text.to_string()),
                );
            }
        }
        out
    }
}

/// Parse `import X [as Y]` or `from X import Y [as Z], W [as V]` into the
/// local binding name(s) that usage is checked against.
fn imported_names(text: &str) -> Vec<String> {
    let text = text.trim().trim_end_matches(';');
    if let Some(rest) = text.strip_prefix("from ") {
        let Some((_, names)) = rest.split_once(" import ") else { return Vec::new() };
        return names
            .split(',')
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(|n| n.rsplit(" as ").next().unwrap_or(n).trim().to_string())
            .collect();
    }
    if let Some(rest) = text.strip_prefix("import ") {
        let module = rest.split(',').next().unwrap_or(rest).trim();
        let local = module.rsplit(" as ").next().unwrap_or(module);
        let local = local.split('.').next().unwrap_or(local);
        return vec![local.trim().to_string()];
    }
    Vec::new()
}

fn used_elsewhere(content: &str, name: &str, import_line: u32) -> bool {
    let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(name))) else { return true };
    content
        .lines()
        .enumerate()
        .any(|(idx, line)| idx as u32 + 1 != import_line && re.is_match(line))
}

pub struct I004;
impl Rule for I004 {
    fn code(&self) -> &'static str {
        "I004"
    }
    fn message(&self) -> &'static str {
        "local file shadows standard library module"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".py"]
    }

    /// Python-specific by design (spec §9, Open Question (c)): other
    /// languages either don't have an ambient import-shadowing hazard of
    /// this shape, or resolve modules in ways this heuristic doesn't model.
    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(stem) = ctx.path.file_stem().and_then(|s| s.to_str()) else { return Vec::new() };
        if !STDLIB_MODULES.contains(&stem) {
            return Vec::new();
        }
        if is_allowed_context(ctx.path) || is_nested_in_subpackage(ctx.path) {
            return Vec::new();
        }
        if has_noqa(ctx.content) {
            return Vec::new();
        }

        let suggestion = build_suggestion(stem, ctx.path);
        vec![Detection::new(self.code(), ctx.path.to_path_buf(), 1, self.message(), self.severity())
            .with_suggestion(suggestion)
            .with_context(format!(
                "file '{}' shadows 'import {stem}' from stdlib",
                ctx.path.file_name().and_then(|n| n.to_str()).unwrap_or(stem)
            ))]
    }
}

fn is_allowed_context(path: &Path) -> bool {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_lowercase();
    if stem.starts_with("test_") || stem.ends_with("_test") || stem == "conftest" {
        return true;
    }
    path.components().any(|c| {
        let s = c.as_os_str().to_string_lossy().to_lowercase();
        s == "tests" || s == "test"
    })
}

/// Files at `package/sub/json.py` (depth >= 2 inside `__init__.py`-bearing
/// directories) resolve absolute imports to stdlib in Python 3 regardless
/// of nesting; only depth 0-1 creates real shadowing risk.
fn is_nested_in_subpackage(path: &Path) -> bool {
    let mut depth = 0u32;
    let mut current = path.parent();
    for _ in 0..20 {
        let Some(dir) = current else { break };
        if !dir.join("__init__.py").exists() {
            break;
        }
        depth += 1;
        current = dir.parent();
    }
    depth >= 2
}

fn has_noqa(content: &str) -> bool {
    content.lines().take(5).any(|line| {
        let lower = line.to_lowercase();
        lower.contains("# noqa") && (lower.contains("i004") || !lower.contains(':'))
    })
}

fn build_suggestion(module_name: &str, path: &Path) -> String {
    let parent_name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("app");
    let preferred = match module_name {
        "logging" => format!("{parent_name}_logging.py or logger.py"),
        "types" => "type_defs.py or models.py".to_string(),
        "json" => "json_utils.py or serialization.py".to_string(),
        "config" => "app_config.py or settings.py".to_string(),
        _ => format!("{parent_name}_{module_name}.py or {module_name}_utils.py"),
    };
    format!("Rename to avoid shadowing stdlib '{module_name}': consider {preferred}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::structure::extractors::treesitter;
    use crate::structure::grammar::GrammarLanguage;

    #[test]
    fn i001_flags_fully_unused_import() {
        let source = "import os\nfrom sys import argv\n\ndef main():\n    print(argv)\n";
        let doc = treesitter::extract(source, GrammarLanguage::Python).unwrap();
        let thresholds = Thresholds::default();
        let ctx = RuleContext {
            path: Path::new("a.py"),
            structure: Some(&doc),
            content: source,
            schema: None,
            thresholds: &thresholds,
            dev_mode: false,
        };
        let detections = I001.check(&ctx);
        assert_eq!(detections.len(), 1);
        assert!(detections[0].context.as_deref().unwrap().contains("import os"));
    }

    #[test]
    fn i004_flags_top_level_shadowing_file() {
        let thresholds = Thresholds::default();
        let ctx = RuleContext {
            path: Path::new("myapp/logging.py"),
            structure: None,
            content: "x = 1\n",
            schema: None,
            thresholds: &thresholds,
            dev_mode: false,
        };
        let detections = I004.check(&ctx);
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn i004_allows_test_files() {
        let thresholds = Thresholds::default();
        let ctx = RuleContext {
            path: Path::new("test_logging.py"),
            structure: None,
            content: "x = 1\n",
            schema: None,
            thresholds: &thresholds,
            dev_mode: false,
        };
        assert!(I004.check(&ctx).is_empty());
    }
}
