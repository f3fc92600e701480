//! Integration tests for reveal-core
//!
//! Validate the full pipeline from source bytes through structure
//! extraction and rule execution, across several grammars.

use reveal_core::{check_file, extract_structure, Thresholds};
use std::path::Path;

#[test]
fn python_structure_extracts_imports_and_functions() {
    let source = "import os\n\ndef add(a, b):\n    return a + b\n";
    let structure = extract_structure(Path::new("a.py"), source, false).unwrap();
    assert_eq!(structure.category("imports").len(), 1);
    assert_eq!(structure.category("functions").len(), 1);
    assert_eq!(structure.category("functions")[0].name, "add");
}

#[test]
fn rust_structure_extracts_functions_and_structs() {
    let source = "struct Point { x: i32, y: i32 }\n\nfn origin() -> Point {\n    Point { x: 0, y: 0 }\n}\n";
    let structure = extract_structure(Path::new("a.rs"), source, false).unwrap();
    assert_eq!(structure.category("structs").len(), 1);
    assert_eq!(structure.category("functions").len(), 1);
}

#[test]
fn nginx_structure_extracts_servers_and_upstreams() {
    let source = "upstream app { server 127.0.0.1:8080; }\nserver { listen 80; server_name example.com; }\n";
    let structure = extract_structure(Path::new("nginx.conf"), source, false).unwrap();
    assert_eq!(structure.category("upstreams").len(), 1);
    assert_eq!(structure.category("servers").len(), 1);
}

#[test]
fn unsupported_extension_without_fallback_errors() {
    let err = extract_structure(Path::new("a.xyz123"), "whatever", false);
    assert!(err.is_err());
}

#[test]
fn check_file_detects_unused_python_import() {
    let source = "import os\nimport sys\nprint(sys.argv)\n";
    let path = Path::new("a.py");
    let structure = extract_structure(path, source, false).unwrap();
    let detections =
        check_file(path, Some(&structure), source, None, &Thresholds::default(), Some("I001"), None);
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].rule_code, "I001");
}

#[test]
fn check_file_ignore_excludes_selected_rule() {
    let source = "import os\nimport sys\nprint(sys.argv)\n";
    let path = Path::new("a.py");
    let structure = extract_structure(path, source, false).unwrap();
    let detections =
        check_file(path, Some(&structure), source, None, &Thresholds::default(), Some("I001"), Some("I001"));
    assert!(detections.is_empty());
}

#[test]
fn structure_document_round_trips_through_json() {
    let source = "def add(a, b):\n    return a + b\n";
    let structure = extract_structure(Path::new("a.py"), source, false).unwrap();
    let json = serde_json::to_string(&structure).unwrap();
    let reparsed: reveal_core::StructureDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed.category("functions").len(), structure.category("functions").len());
}
