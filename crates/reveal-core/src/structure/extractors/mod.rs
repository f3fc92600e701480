//! Extractor dispatch registry (spec §4.1)
//!
//! Maps a file name to the extractor that should parse it: grammar-driven
//! languages go through `treesitter`, a handful of configuration formats get
//! dedicated parsers, and anything unrecognized falls back to a degraded,
//! similarity-tagged extraction so callers always get *something* back
//! instead of an error (spec §7, "never hard-fail on an unknown extension").

pub mod dockerfile;
pub mod jsonl;
pub mod markdown;
pub mod nginx;
pub mod treesitter;
pub mod xml;

use crate::error::Result;
use crate::structure::grammar::GrammarLanguage;
use crate::structure::StructureDocument;
use std::path::Path;

/// Options controlling extraction; currently just the fallback escape hatch
/// callers can use when they'd rather get an explicit error than a guess.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub allow_fallback: bool,
}

/// Extract a `StructureDocument` from `source`, dispatching on `path`'s file
/// name / extension. Unknown extensions fall back to the nearest-extension
/// grammar when `opts.allow_fallback` is set, tagging the result with
/// `fallback_language` so callers can tell a guess from a real parse.
pub fn extract(path: &Path, source: &str, opts: ExtractOptions) -> Result<StructureDocument> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

    if is_dockerfile(file_name) {
        return Ok(dockerfile::extract(source));
    }
    if is_nginx_config(file_name) {
        return Ok(nginx::extract(source));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    match ext {
        "md" | "markdown" => return markdown::extract(source),
        "xml" | "svg" | "xsd" | "wsdl" => return xml::extract(source),
        "jsonl" | "ndjson" => return Ok(jsonl::extract(source)),
        _ => {}
    }

    if let Some(language) = GrammarLanguage::from_path(path) {
        return treesitter::extract(source, language);
    }

    if opts.allow_fallback {
        if let Some(guess) = nearest_grammar_by_extension(ext) {
            let mut doc = treesitter::extract(source, guess)?;
            doc.fallback_language = Some(guess.name().to_string());
            return Ok(doc);
        }
    }

    Ok(StructureDocument::new())
}

fn is_dockerfile(file_name: &str) -> bool {
    file_name == "Dockerfile"
        || file_name.starts_with("Dockerfile.")
        || file_name.ends_with(".dockerfile")
}

fn is_nginx_config(file_name: &str) -> bool {
    file_name == "nginx.conf" || file_name.ends_with(".nginx.conf") || file_name.ends_with(".conf.nginx")
}

/// Best-effort guess for an unrecognized extension: find the grammar whose
/// canonical extensions share the longest common prefix with `ext` (e.g.
/// `.tsx.bak` isn't in the table, but its stem `tsx` is).
fn nearest_grammar_by_extension(ext: &str) -> Option<GrammarLanguage> {
    const CANDIDATES: &[&str] = &[
        "ts", "js", "py", "rs", "go", "java", "c", "cpp", "cs", "rb", "sh", "php", "scala", "kt", "swift", "md",
    ];
    let best = CANDIDATES
        .iter()
        .filter_map(|cand| Some((*cand, common_prefix_len(cand, ext))))
        .filter(|(_, len)| *len > 0)
        .max_by_key(|(_, len)| *len)?;
    GrammarLanguage::from_extension(best.0)
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn dispatches_rust_files_to_treesitter() {
        let doc = extract(&PathBuf::from("lib.rs"), "fn f() {}\n", ExtractOptions::default()).unwrap();
        assert_eq!(doc.category("functions").len(), 1);
    }

    #[test]
    fn dispatches_dockerfile_by_filename() {
        let doc = extract(&PathBuf::from("Dockerfile"), "FROM scratch\n", ExtractOptions::default()).unwrap();
        assert_eq!(doc.category("from").len(), 1);
    }

    #[test]
    fn unrecognized_extension_without_fallback_is_empty() {
        let doc = extract(&PathBuf::from("notes.xyz"), "whatever\n", ExtractOptions::default()).unwrap();
        assert_eq!(doc.total_items(), 0);
        assert!(doc.fallback_language.is_none());
    }

    #[test]
    fn unrecognized_extension_with_fallback_tags_guess() {
        let doc = extract(
            &PathBuf::from("script.pyw"),
            "def f():\n    pass\n",
            ExtractOptions { allow_fallback: true },
        )
        .unwrap();
        assert_eq!(doc.fallback_language.as_deref(), Some("Python"));
    }
}
