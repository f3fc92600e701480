//! Duplicate Detector (spec §4.6): near-duplicate function/method bodies by
//! structural similarity over a normalized token feature vector.
//!
//! Grounded on `test_base_detector.py`'s shape (`DetectionMode`,
//! `SimilarityMetric`, `Chunk`, `DuplicateConfig`) — the Python module under
//! test wasn't present in the retrieval pack, so the feature/similarity math
//! below follows spec §4.6's description directly.

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMode {
    /// Cosine similarity over normalized token-feature histograms (default).
    Feature,
    /// Longest-common-subsequence over normalized token sequences.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityMetric {
    Cosine,
    Lcs,
}

/// A single analyzable unit — typically a function or method body.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub path: PathBuf,
    pub name: String,
    pub line: u32,
    pub line_end: u32,
    pub source: String,
    pub tokens: Vec<String>,
}

impl Chunk {
    pub fn new(path: PathBuf, name: impl Into<String>, line: u32, line_end: u32, source: impl Into<String>) -> Self {
        let source = source.into();
        let tokens = normalize_tokens(&source);
        Self { path, name: name.into(), line, line_end, source, tokens }
    }

    pub fn line_count(&self) -> u32 {
        self.line_end.saturating_sub(self.line) + 1
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DuplicateConfig {
    pub min_function_size: u32,
    pub min_similarity: f64,
    pub max_candidates_per_chunk: usize,
    pub mode: DetectionMode,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self { min_function_size: 8, min_similarity: 0.50, max_candidates_per_chunk: 5, mode: DetectionMode::Feature }
    }
}

/// Fixed-dimension structural feature vector derived from a chunk's
/// normalized token stream (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub keyword_count: f64,
    pub operator_count: f64,
    pub literal_count: f64,
    pub identifier_count: f64,
    pub control_flow_count: f64,
    pub statement_count: f64,
    pub depth: f64,
    pub length: f64,
}

impl Features {
    fn as_vector(self) -> [f64; 8] {
        [
            self.keyword_count,
            self.operator_count,
            self.literal_count,
            self.identifier_count,
            self.control_flow_count,
            self.statement_count,
            self.depth,
            self.length,
        ]
    }
}

const KEYWORDS: &[&str] = &[
    "if", "else", "elif", "for", "while", "match", "switch", "case", "return", "break", "continue", "fn", "def",
    "function", "class", "struct", "enum", "impl", "let", "var", "const", "pub", "use", "import", "from",
];
const CONTROL_FLOW: &[&str] = &["if", "else", "elif", "for", "while", "match", "switch", "case", "return", "break", "continue"];
const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "==", "!=", "<", ">", "<=", ">=", "&&", "||", "!", "=", "+=", "-=", "->", "=>", "::",
];

/// Replace identifiers with `ID` and numeric/string literals with `LIT`,
/// collapsing whitespace, while keeping keywords, operators, and
/// punctuation verbatim — a fingerprint that survives local renaming but
/// preserves control structure (spec §4.6).
pub fn normalize_tokens(source: &str) -> Vec<String> {
    raw_tokens(source)
        .into_iter()
        .map(|tok| {
            if KEYWORDS.contains(&tok.as_str()) || OPERATORS.contains(&tok.as_str()) {
                tok
            } else if is_punct(&tok) {
                tok
            } else if is_numeric_literal(&tok) || is_string_literal(&tok) {
                "LIT".to_string()
            } else if is_identifier(&tok) {
                "ID".to_string()
            } else {
                tok
            }
        })
        .collect()
}

fn raw_tokens(source: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            current.push(c);
            continue;
        }
        if c == '"' || c == '\'' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            let quote = c;
            let mut lit = String::new();
            lit.push(c);
            for next in chars.by_ref() {
                lit.push(next);
                if next == quote {
                    break;
                }
            }
            tokens.push(lit);
            continue;
        }
        if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        tokens.push(c.to_string());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn is_punct(tok: &str) -> bool {
    tok.len() == 1 && !tok.chars().next().unwrap().is_alphanumeric() && !OPERATORS.contains(&tok)
}

fn is_numeric_literal(tok: &str) -> bool {
    !tok.is_empty() && tok.chars().next().unwrap().is_ascii_digit()
}

fn is_string_literal(tok: &str) -> bool {
    tok.starts_with('"') || tok.starts_with('\'')
}

fn is_identifier(tok: &str) -> bool {
    tok.chars().next().map(|c| c.is_alphabetic() || c == '_').unwrap_or(false)
}

pub fn extract_features(tokens: &[String]) -> Features {
    let keyword_count = tokens.iter().filter(|t| KEYWORDS.contains(&t.as_str())).count() as f64;
    let operator_count = tokens.iter().filter(|t| OPERATORS.contains(&t.as_str())).count() as f64;
    let literal_count = tokens.iter().filter(|t| t.as_str() == "LIT").count() as f64;
    let identifier_count = tokens.iter().filter(|t| t.as_str() == "ID").count() as f64;
    let control_flow_count = tokens.iter().filter(|t| CONTROL_FLOW.contains(&t.as_str())).count() as f64;
    let statement_count = tokens.iter().filter(|t| t.as_str() == ";" || t.as_str() == ":").count().max(1) as f64;
    let depth = max_brace_depth(tokens) as f64;
    let length = tokens.len() as f64;

    Features { keyword_count, operator_count, literal_count, identifier_count, control_flow_count, statement_count, depth, length }
}

fn max_brace_depth(tokens: &[String]) -> u32 {
    let mut depth = 0u32;
    let mut max_depth = 0u32;
    for tok in tokens {
        match tok.as_str() {
            "{" | "(" | "[" => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            "}" | ")" | "]" => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max_depth
}

pub fn cosine_similarity(a: Features, b: Features) -> f64 {
    let (va, vb) = (a.as_vector(), b.as_vector());
    let dot: f64 = va.iter().zip(vb.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = va.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = vb.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Longest-common-subsequence ratio over two normalized token sequences,
/// normalized by the length of the longer sequence.
pub fn lcs_similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            dp[i][j] = if a[i - 1] == b[j - 1] { dp[i - 1][j - 1] + 1 } else { dp[i - 1][j].max(dp[i][j - 1]) };
        }
    }
    let lcs_len = dp[a.len()][b.len()] as f64;
    lcs_len / a.len().max(b.len()) as f64
}

#[derive(Debug, Clone)]
pub struct DuplicatePair {
    pub chunk_a: (PathBuf, String),
    pub chunk_b: (PathBuf, String),
    pub similarity: f64,
    pub shared_tokens: usize,
}

fn shared_token_count(a: &[String], b: &[String]) -> usize {
    let set_b: std::collections::HashSet<&String> = b.iter().collect();
    a.iter().filter(|t| set_b.contains(t)).count()
}

/// Find near-duplicate chunk pairs above `config.min_similarity`, capped at
/// `config.max_candidates_per_chunk` per chunk, pairs deduplicated
/// unordered (spec §4.6).
pub fn find_duplicates(chunks: &[Chunk], config: &DuplicateConfig) -> Vec<DuplicatePair> {
    let eligible: Vec<&Chunk> = chunks.iter().filter(|c| c.line_count() >= config.min_function_size).collect();
    let features: Vec<Features> = eligible.iter().map(|c| extract_features(&c.tokens)).collect();

    let mut pairs = Vec::new();
    for i in 0..eligible.len() {
        let mut candidates: Vec<(usize, f64)> = Vec::new();
        for j in 0..eligible.len() {
            if i == j {
                continue;
            }
            let similarity = match config.mode {
                DetectionMode::Feature => cosine_similarity(features[i], features[j]),
                DetectionMode::Exact => lcs_similarity(&eligible[i].tokens, &eligible[j].tokens),
            };
            if similarity >= config.min_similarity {
                candidates.push((j, similarity));
            }
        }
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        candidates.truncate(config.max_candidates_per_chunk);

        for (j, similarity) in candidates {
            if j < i {
                continue; // unordered dedup: keep only (i, j) with i < j
            }
            pairs.push(DuplicatePair {
                chunk_a: (eligible[i].path.clone(), eligible[i].name.clone()),
                chunk_b: (eligible[j].path.clone(), eligible[j].name.clone()),
                similarity,
                shared_tokens: shared_token_count(&eligible[i].tokens, &eligible[j].tokens),
            });
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_collapses_identifier_renames() {
        let a = normalize_tokens("fn add(x, y) { return x + y; }");
        let b = normalize_tokens("fn add(p, q) { return p + q; }");
        assert_eq!(a, b);
    }

    #[test]
    fn normalization_elides_literals() {
        let tokens = normalize_tokens("let x = 42;");
        assert!(tokens.contains(&"LIT".to_string()));
        assert!(!tokens.contains(&"42".to_string()));
    }

    #[test]
    fn identical_functions_are_perfectly_similar() {
        let chunk_a = Chunk::new("a.rs".into(), "add", 1, 3, "fn add(x, y) { return x + y; }");
        let chunk_b = Chunk::new("b.rs".into(), "sum", 1, 3, "fn add(p, q) { return p + q; }");
        let fa = extract_features(&chunk_a.tokens);
        let fb = extract_features(&chunk_b.tokens);
        assert!((cosine_similarity(fa, fb) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn find_duplicates_respects_min_function_size() {
        let chunks = vec![
            Chunk::new("a.rs".into(), "tiny", 1, 2, "fn t() { x() }"),
            Chunk::new("b.rs".into(), "tiny2", 1, 2, "fn t() { y() }"),
        ];
        let config = DuplicateConfig::default();
        assert!(find_duplicates(&chunks, &config).is_empty());
    }

    #[test]
    fn find_duplicates_dedupes_unordered_pairs() {
        let body = "fn process(a, b) {\n    if a > b {\n        return a;\n    }\n    return b;\n}\n";
        let chunks =
            vec![Chunk::new("a.rs".into(), "f1", 1, 8, body), Chunk::new("b.rs".into(), "f2", 1, 8, body)];
        let config = DuplicateConfig { min_function_size: 1, ..DuplicateConfig::default() };
        let pairs = find_duplicates(&chunks, &config);
        assert_eq!(pairs.len(), 1);
    }
}
