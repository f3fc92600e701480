//! `imports://` adapter (spec §4.4, "Scheme parsing for `imports://`"): the
//! one adapter this crate fully implements, rather than stubbing. Grounded
//! on `tests/test_scheme_handler_imports.py` for the four element kinds'
//! exact field names, and on `rules::imports` (I001/I004) for the
//! import-statement parsing it reuses the pattern of.
//!
//! Authority is a filesystem root; query flags select the element kind
//! (`?unused`, `?cycles`, `?violations`; absent means the import summary).
//! `?layers=a,b,c` declares an ordered layer policy (foundational first)
//! for violation checking — undeclared means no violations are reported,
//! since the policy is caller-declared, not inferred.

use crate::adapter::{envelope, Adapter, AdapterError, AdapterHelp, BoundAdapter, HelpExample, SourceType, CONTRACT_VERSION};
use crate::uri::Uri;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

const SKIP_DIRS: &[&str] = &[".git", "__pycache__", ".venv", "venv", "node_modules", "target", ".mypy_cache"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Summary,
    Unused,
    Cycles,
    Violations,
}

pub struct ImportsAdapter {
    root: PathBuf,
    mode: Mode,
    layers: Vec<String>,
}

struct ParsedImport {
    line: u32,
    module: String,
    local_name: String,
}

impl Adapter for ImportsAdapter {
    fn bind(uri: &Uri) -> Result<Self, AdapterError> {
        if uri.authority.is_empty() {
            return Err(AdapterError::Unbound("imports:// needs a filesystem root".to_string()));
        }
        let root = if uri.authority == "." { PathBuf::from(".") } else { PathBuf::from(&uri.authority) };
        let mode = if uri.query.contains_key("unused") {
            Mode::Unused
        } else if uri.query.contains_key("cycles") {
            Mode::Cycles
        } else if uri.query.contains_key("violations") {
            Mode::Violations
        } else {
            Mode::Summary
        };
        let layers = uri
            .query
            .get("layers")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        Ok(ImportsAdapter { root, mode, layers })
    }

    fn help() -> AdapterHelp {
        let mut elements = std::collections::BTreeMap::new();
        elements.insert("unused", "Unused imports found across the tree (?unused)");
        elements.insert("cycles", "Circular import chains (?cycles)");
        elements.insert("violations", "Layer policy violations (?violations, needs ?layers=...)");
        AdapterHelp {
            name: "imports",
            description: "Import graph analysis: unused imports, circular dependencies, layer violations",
            syntax: "imports://<root>[?unused|cycles|violations][&layers=a,b,c]",
            elements,
            examples: vec![
                HelpExample { uri: "imports://src/app", description: "Summary of imports under src/app", output_type: "import_summary" },
                HelpExample { uri: "imports://src/app?unused", description: "List unused imports", output_type: "unused_imports" },
                HelpExample { uri: "imports://.?cycles", description: "Find circular import chains", output_type: "circular_dependencies" },
            ],
        }
    }
}

impl BoundAdapter for ImportsAdapter {
    fn get_structure(&self) -> Value {
        let graph = build_graph(&self.root);
        let source = format!("imports://{}", self.root.display());
        match self.mode {
            Mode::Summary => {
                let total_files = graph.files.len();
                let total_imports: usize = graph.imports.values().map(|v| v.len()).sum();
                let has_cycles = !find_cycles(&graph).is_empty();
                envelope(
                    CONTRACT_VERSION,
                    "import_summary",
                    &source,
                    SourceType::Directory,
                    json!({
                        "metadata": {
                            "total_files": total_files,
                            "total_imports": total_imports,
                            "has_cycles": has_cycles,
                        },
                        "next_steps": [
                            format!("reveal 'imports://{}?unused'", self.root.display()),
                            format!("reveal 'imports://{}?cycles'", self.root.display()),
                        ],
                    }),
                )
            }
            Mode::Unused => {
                let unused = find_unused(&graph);
                envelope(
                    CONTRACT_VERSION,
                    "unused_imports",
                    &source,
                    SourceType::Directory,
                    json!({ "count": unused.len(), "unused": unused }),
                )
            }
            Mode::Cycles => {
                let cycles = find_cycles(&graph);
                envelope(
                    CONTRACT_VERSION,
                    "circular_dependencies",
                    &source,
                    SourceType::Directory,
                    json!({ "count": cycles.len(), "cycles": cycles }),
                )
            }
            Mode::Violations => {
                let violations = find_layer_violations(&graph, &self.layers);
                let mut extra = json!({ "count": violations.len(), "violations": violations });
                if self.layers.is_empty() {
                    extra["note"] = Value::String("no layer policy declared (?layers=a,b,c)".to_string());
                }
                envelope(CONTRACT_VERSION, "layer_violations", &source, SourceType::Directory, extra)
            }
        }
    }

    fn get_element(&self, name: &str) -> Option<Value> {
        let graph = build_graph(&self.root);
        let rel = PathBuf::from(name);
        let imports = graph.imports.get(&rel)?;
        Some(json!({
            "file": name,
            "imports": imports.iter().map(|i| i.module.clone()).collect::<Vec<_>>(),
        }))
    }
}

struct Graph {
    /// Directory all file paths below are relative to.
    root: PathBuf,
    /// Every Python file discovered under the root, relative to it.
    files: Vec<PathBuf>,
    /// Per-file parsed import statements.
    imports: FxHashMap<PathBuf, Vec<ParsedImport>>,
    /// Resolved file -> file import edges (only imports that land on
    /// another file under the root).
    edges: FxHashMap<PathBuf, Vec<PathBuf>>,
}

fn build_graph(root: &Path) -> Graph {
    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort();

    let mut imports = FxHashMap::default();
    let mut edges = FxHashMap::default();
    for rel in &files {
        let full = root.join(rel);
        let Ok(content) = std::fs::read_to_string(&full) else { continue };
        let Ok(structure) = reveal_core::extract_structure(&full, &content, false) else { continue };
        let parsed = parse_imports(&structure);
        let mut resolved = Vec::new();
        for imp in &parsed {
            if let Some(target) = resolve_import(&imp.module, rel, root) {
                if files.contains(&target) {
                    resolved.push(target);
                }
            }
        }
        edges.insert(rel.clone(), resolved);
        imports.insert(rel.clone(), parsed);
    }
    Graph { root: root.to_path_buf(), files, imports, edges }
}

fn walk(dir: &Path, root: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if path.is_dir() {
            if SKIP_DIRS.contains(&name.as_ref()) || name.starts_with('.') {
                continue;
            }
            walk(&path, root, out);
        } else if path.extension().and_then(|e| e.to_str()) == Some("py") {
            if let Ok(rel) = path.strip_prefix(root) {
                out.push(rel.to_path_buf());
            }
        }
    }
}

fn parse_imports(structure: &reveal_core::StructureDocument) -> Vec<ParsedImport> {
    let mut out = Vec::new();
    for item in structure.category("imports") {
        let Some(text) = item.signature.as_deref() else { continue };
        let text = text.trim().trim_end_matches(';');
        if text.contains("import *") {
            continue;
        }
        if let Some(rest) = text.strip_prefix("from ") {
            let Some((module, names)) = rest.split_once(" import ") else { continue };
            let module = module.trim();
            for name in names.split(',').map(|n| n.trim()).filter(|n| !n.is_empty()) {
                let local = name.rsplit(" as ").next().unwrap_or(name).trim();
                out.push(ParsedImport {
                    line: item.line,
                    module: if module.is_empty() { local.to_string() } else { format!("{module}.{local}") },
                    local_name: local.to_string(),
                });
            }
        } else if let Some(rest) = text.strip_prefix("import ") {
            for part in rest.split(',').map(|p| p.trim()).filter(|p| !p.is_empty()) {
                let module = part.rsplit(" as ").next().unwrap_or(part).trim();
                let local = module.split('.').next().unwrap_or(module);
                out.push(ParsedImport { line: item.line, module: module.to_string(), local_name: local.to_string() });
            }
        }
    }
    out
}

/// Resolve a parsed `module` string to a project-relative file path, if one
/// exists. Handles dotted absolute imports (`pkg.sub.mod`) and relative
/// imports (`.sibling`, `..pkg.sibling`) the way Python's import system
/// does; anything that doesn't land on a file under `root` is external.
fn resolve_import(module: &str, from_file: &Path, root: &Path) -> Option<PathBuf> {
    let leading_dots = module.chars().take_while(|c| *c == '.').count();
    let rest = &module[leading_dots..];
    let segments: Vec<&str> = if rest.is_empty() { Vec::new() } else { rest.split('.').collect() };

    let base_dir = if leading_dots == 0 {
        root.to_path_buf()
    } else {
        let mut dir = from_file.parent().unwrap_or(Path::new("")).to_path_buf();
        for _ in 1..leading_dots {
            dir.pop();
        }
        dir
    };

    let candidate = segments.iter().fold(base_dir.clone(), |acc, seg| acc.join(seg));
    for candidate_path in [candidate.with_extension("py"), candidate.join("__init__.py")] {
        if root.join(&candidate_path).is_file() {
            return Some(candidate_path);
        }
    }
    None
}

fn find_unused(graph: &Graph) -> Vec<Value> {
    let mut out = Vec::new();
    for (file, parsed) in &graph.imports {
        let Ok(src) = std::fs::read_to_string(graph.root.join(file)) else { continue };
        for imp in parsed {
            if !used_elsewhere(&src, &imp.local_name, imp.line) {
                out.push(json!({
                    "file": file.to_string_lossy(),
                    "line": imp.line,
                    "module": imp.module,
                }));
            }
        }
    }
    out.sort_by(|a, b| (a["file"].as_str(), a["line"].as_u64()).cmp(&(b["file"].as_str(), b["line"].as_u64())));
    out
}

fn used_elsewhere(content: &str, name: &str, import_line: u32) -> bool {
    let Ok(re) = regex::Regex::new(&format!(r"\b{}\b", regex::escape(name))) else { return true };
    content.lines().enumerate().any(|(idx, line)| idx as u32 + 1 != import_line && re.is_match(line))
}

/// DFS cycle detection over the resolved file-import graph. Each cycle is
/// reported once as a sequence of file paths ending where it began.
fn find_cycles(graph: &Graph) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    let mut seen_cycle_keys = FxHashSet::default();
    let mut visited = FxHashSet::default();

    for start in &graph.files {
        if visited.contains(start) {
            continue;
        }
        let mut stack = Vec::new();
        let mut on_stack = FxHashSet::default();
        dfs(graph, start, &mut stack, &mut on_stack, &mut visited, &mut cycles, &mut seen_cycle_keys);
    }
    cycles
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    graph: &Graph,
    node: &Path,
    stack: &mut Vec<PathBuf>,
    on_stack: &mut FxHashSet<PathBuf>,
    visited: &mut FxHashSet<PathBuf>,
    cycles: &mut Vec<Vec<String>>,
    seen_cycle_keys: &mut FxHashSet<Vec<PathBuf>>,
) {
    visited.insert(node.to_path_buf());
    stack.push(node.to_path_buf());
    on_stack.insert(node.to_path_buf());

    if let Some(targets) = graph.edges.get(node) {
        for target in targets {
            if on_stack.contains(target) {
                let start_idx = stack.iter().position(|p| p == target).unwrap_or(0);
                let mut cycle: Vec<PathBuf> = stack[start_idx..].to_vec();
                cycle.push(target.clone());
                let mut key = cycle.clone();
                key.sort();
                if seen_cycle_keys.insert(key) {
                    cycles.push(cycle.iter().map(|p| p.to_string_lossy().to_string()).collect());
                }
            } else if !visited.contains(target) {
                dfs(graph, target, stack, on_stack, visited, cycles, seen_cycle_keys);
            }
        }
    }

    stack.pop();
    on_stack.remove(node);
}

fn find_layer_violations(graph: &Graph, layers: &[String]) -> Vec<Value> {
    if layers.is_empty() {
        return Vec::new();
    }
    let layer_of = |path: &Path| -> Option<usize> {
        let text = path.to_string_lossy();
        layers.iter().position(|layer| text.split(['/', '\\']).any(|seg| seg == layer))
    };

    let mut out = Vec::new();
    for (file, parsed) in &graph.imports {
        let Some(importer_idx) = layer_of(file) else { continue };
        let Some(targets) = graph.edges.get(file) else { continue };
        for target in targets {
            let Some(importee_idx) = layer_of(target) else { continue };
            if importer_idx < importee_idx {
                let line = parsed.iter().find(|i| resolve_import_matches(i, target)).map(|i| i.line).unwrap_or(1);
                out.push(json!({
                    "file": file.to_string_lossy(),
                    "line": line,
                    "message": format!(
                        "{} importing from {} layer",
                        layers[importer_idx], layers[importee_idx]
                    ),
                }));
            }
        }
    }
    out
}

fn resolve_import_matches(imp: &ParsedImport, _target: &Path) -> bool {
    // Best-effort line attribution: exact import -> file resolution isn't
    // tracked per-edge, so the first parsed import in the file stands in.
    let _ = imp;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn summary_counts_files_and_imports() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", "import os\nimport sys\n");
        write(dir.path(), "b.py", "import re\n");

        let uri = Uri::parse(&format!("imports://{}", dir.path().display())).unwrap();
        let adapter = ImportsAdapter::bind(&uri).unwrap();
        let structure = adapter.get_structure();
        assert_eq!(structure["type"], "import_summary");
        assert_eq!(structure["metadata"]["total_files"], 2);
        assert_eq!(structure["metadata"]["total_imports"], 3);
    }

    #[test]
    fn unused_flags_imports_with_no_later_use() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", "import os\nimport sys\nprint(sys.argv)\n");

        let uri = Uri::parse(&format!("imports://{}?unused", dir.path().display())).unwrap();
        let adapter = ImportsAdapter::bind(&uri).unwrap();
        let structure = adapter.get_structure();
        assert_eq!(structure["type"], "unused_imports");
        assert_eq!(structure["count"], 1);
        assert_eq!(structure["unused"][0]["module"], "os");
    }

    #[test]
    fn cycles_detects_mutual_import() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", "from . import b\n");
        write(dir.path(), "b.py", "from . import a\n");

        let uri = Uri::parse(&format!("imports://{}?cycles", dir.path().display())).unwrap();
        let adapter = ImportsAdapter::bind(&uri).unwrap();
        let structure = adapter.get_structure();
        assert_eq!(structure["type"], "circular_dependencies");
        assert!(structure["count"].as_u64().unwrap() >= 1);
    }

    #[test]
    fn get_element_returns_per_file_imports() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "import os\nimport sys\n");

        let uri = Uri::parse(&format!("imports://{}", dir.path().display())).unwrap();
        let adapter = ImportsAdapter::bind(&uri).unwrap();
        let element = adapter.get_element("app.py").unwrap();
        assert_eq!(element["file"], "app.py");
        assert_eq!(element["imports"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn get_element_unknown_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "import os\n");
        let uri = Uri::parse(&format!("imports://{}", dir.path().display())).unwrap();
        let adapter = ImportsAdapter::bind(&uri).unwrap();
        assert!(adapter.get_element("missing.py").is_none());
    }

    #[test]
    fn empty_authority_is_rejected_as_unbound() {
        // Uri::parse itself already rejects an empty authority syntactically;
        // this covers the adapter-level guard for completeness.
        let uri = Uri { scheme: "imports".into(), authority: String::new(), element: None, query: Default::default() };
        assert!(matches!(ImportsAdapter::bind(&uri), Err(AdapterError::Unbound(_))));
    }
}
