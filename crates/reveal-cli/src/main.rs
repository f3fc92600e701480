//! reveal CLI — command-line interface for the reveal analysis engine
//!
//! ARCHITECTURE: thin I/O layer over `reveal-core`/`reveal-adapters`. This
//! binary handles CLI argument parsing (clap), file I/O, output formatting,
//! and process exit codes (spec §6); the engine itself owns no process
//! exit and no stdout.

use clap::Parser;
use colored::Colorize;
use reveal_adapters::{adapters::help, registry::SchemeRegistry, uri::Uri};
use reveal_core::{check_file, extract_structure, Detection, ElementIndex, Severity, Thresholds};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// reveal - polyglot source-inspection and static-analysis CLI
///
/// Produces structural summaries and runs diagnostic rules over source
/// files, or dispatches a URI (`ssl://`, `cpanel://`, `imports://`,
/// `help://`) to an operational-resource adapter.
#[derive(Parser, Debug)]
#[command(name = "reveal")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:\n  \
    reveal file.py                        Show structure: classes, functions, imports\n  \
    reveal file.py::MyClass               Show one element and its children\n  \
    reveal file.py --check                Run diagnostic rules, text output\n  \
    reveal file.py --check --select I,B   Only run import-hygiene and bug rules\n  \
    reveal file.py --check --ignore E501  Run every applicable rule except E501\n  \
    reveal post.md --validate-schema hugo Validate front matter against a schema\n  \
    reveal 'imports://src?unused'         List unused imports under src/\n  \
    reveal 'ssl://example.com/san'        Adapter dispatch over a URI\n  \
    reveal help://imports                 Show help for the imports adapter\n\n\
For more info: https://github.com/reveal-dev/reveal")]
struct Args {
    /// File path (optionally `path::Element`), or a `scheme://...` URI
    #[arg(value_name = "TARGET")]
    target: String,

    /// Run diagnostic rules instead of showing structure
    #[arg(long)]
    check: bool,

    /// Validate Markdown front matter against a named or path-given schema
    #[arg(long, value_name = "NAME_OR_PATH")]
    validate_schema: Option<String>,

    /// Comma-separated rule codes/prefixes/categories to run (default: all applicable)
    #[arg(long)]
    select: Option<String>,

    /// Comma-separated rule codes/prefixes/categories to exclude
    #[arg(long)]
    ignore: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: FormatArg,

    /// Allow extraction fallback to the nearest known grammar for unrecognized extensions
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Text,
    Json,
    Grep,
}

/// Installs a `tracing` subscriber gated by `REVEAL_LOG` (falling back to
/// `RUST_LOG`), defaulting to `warn` so rule-panic debug logs stay quiet
/// unless a caller asks for them (spec §7).
fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("REVEAL_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    if let Some(scheme) = parse_scheme(&args.target) {
        return run_adapter(&scheme, &args);
    }

    run_file(&args)
}

/// An argument is a scheme dispatch when it contains `://` before any
/// `::element` suffix delimiter could plausibly apply.
fn parse_scheme(target: &str) -> Option<String> {
    target.split_once("://").map(|(scheme, _)| scheme.to_string())
}

fn run_adapter(scheme: &str, args: &Args) -> ExitCode {
    if scheme == "help" {
        let topic_name = args.target.trim_start_matches("help://");
        return match help::topic(topic_name) {
            Some(help) => {
                print_help(&help);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("Error: no help topic '{topic_name}'");
                eprintln!("Available topics: {}", help::topics().iter().map(|h| h.name).collect::<Vec<_>>().join(", "));
                ExitCode::from(2)
            }
        };
    }

    let uri = match Uri::parse(&args.target) {
        Ok(uri) => uri,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::from(2);
        }
    };

    let registry = SchemeRegistry::new();
    let adapter = match registry.dispatch(&uri) {
        Ok(adapter) => adapter,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::from(2);
        }
    };

    let envelope = match &uri.element {
        Some(name) => match adapter.get_element(name) {
            Some(envelope) => envelope,
            None => {
                eprintln!("Error: element '{name}' not found for '{}'", args.target);
                return ExitCode::from(1);
            }
        },
        None => adapter.get_structure(),
    };

    println!("{}", serde_json::to_string_pretty(&envelope).unwrap_or_default());
    ExitCode::SUCCESS
}

fn print_help(help: &reveal_adapters::AdapterHelp) {
    println!("{}: {}", help.name.bold(), help.description);
    println!("\nSyntax: {}", help.syntax);
    println!("\nElements:");
    for (name, desc) in &help.elements {
        println!("  {:<12} {desc}", name);
    }
    println!("\nExamples:");
    for example in &help.examples {
        println!("  {}  -> {}", example.uri, example.description);
    }
}

fn run_file(args: &Args) -> ExitCode {
    let (path_str, element) = match args.target.split_once("::") {
        Some((p, e)) => (p, Some(e)),
        None => (args.target.as_str(), None),
    };
    let path = PathBuf::from(path_str);

    let content = match reveal_core::util::read_source(&path, reveal_core::util::DEFAULT_MAX_FILE_BYTES) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading '{}': {err}", path.display());
            return ExitCode::from(2);
        }
    };

    let structure = match extract_structure(&path, &content, args.force) {
        Ok(structure) => structure,
        Err(err) => {
            eprintln!("Error parsing '{}': {err}", path.display());
            return ExitCode::from(2);
        }
    };

    if let Some(schema_name) = &args.validate_schema {
        return validate_schema(&path, &content, &structure, schema_name, args);
    }

    if args.check {
        return run_check(&path, &content, &structure, None, args);
    }

    show_structure(&path, &structure, element)
}

fn validate_schema(path: &Path, content: &str, structure: &reveal_core::StructureDocument, schema_name: &str, args: &Args) -> ExitCode {
    if !path.to_string_lossy().to_lowercase().ends_with(".md") && !path.to_string_lossy().to_lowercase().ends_with(".markdown") {
        eprintln!("Warning: Schema validation is designed for markdown files");
        eprintln!("         File '{}' does not appear to be markdown", path.display());
        eprintln!("         Continuing anyway...\n");
    }

    let schema = match reveal_core::schema::load_schema(schema_name) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("Error: schema '{schema_name}' not found ({err})");
            eprintln!("\nAvailable built-in schemas:");
            for name in reveal_core::schema::list_builtin_schemas() {
                eprintln!("  - {name}");
            }
            eprintln!("\nOr provide a path to a custom schema file");
            return ExitCode::from(2);
        }
    };

    run_check(path, content, structure, Some(&schema), args)
}

fn run_check(
    path: &Path,
    content: &str,
    structure: &reveal_core::StructureDocument,
    schema: Option<&reveal_core::Schema>,
    args: &Args,
) -> ExitCode {
    let select = args.select.as_deref().or(if schema.is_some() { Some("F") } else { None });
    let thresholds = Thresholds::from_env();
    let mut detections =
        check_file(path, Some(structure), content, schema, &thresholds, select, args.ignore.as_deref());
    detections.sort();

    match args.format {
        FormatArg::Json => print_detections_json(path, &detections),
        FormatArg::Grep => print_detections_grep(&detections),
        FormatArg::Text => print_detections_text(path, &detections),
    }

    exit_code_for(&detections)
}

/// Exit codes per spec §6: 0 clean, 1 diagnostics present, 2 reserved for
/// adapter/resource failures (handled at their own call sites above).
fn exit_code_for(detections: &[Detection]) -> ExitCode {
    if detections.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn print_detections_json(path: &Path, detections: &[Detection]) {
    let payload = serde_json::json!({
        "file": path.to_string_lossy(),
        "detections": detections,
        "total": detections.len(),
    });
    println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
}

fn print_detections_grep(detections: &[Detection]) {
    for d in detections {
        println!("{}:{}:{}:{}:{}", d.file_path.display(), d.line, d.column, d.rule_code, d.message);
    }
}

fn print_detections_text(path: &Path, detections: &[Detection]) {
    if detections.is_empty() {
        println!("{}: {} No issues found", path.display(), "\u{2705}".green());
        return;
    }
    println!("{}: Found {} issues\n", path.display(), detections.len());
    for d in detections {
        let marker = match d.severity {
            Severity::Critical => "CRITICAL".red().bold(),
            Severity::High => "HIGH".red(),
            Severity::Medium => "MEDIUM".yellow(),
            Severity::Low => "LOW".normal(),
        };
        println!("{}:{}:{} [{marker}] {}: {}", d.file_path.display(), d.line, d.column, d.rule_code, d.message);
        if let Some(suggestion) = &d.suggestion {
            println!("  suggestion: {suggestion}");
        }
        println!();
    }
}

fn show_structure(path: &Path, structure: &reveal_core::StructureDocument, element: Option<&str>) -> ExitCode {
    let index = ElementIndex::build(structure);

    if let Some(name) = element {
        let Some(found) = index.find_by_name(name) else {
            eprintln!("Error: element '{name}' not found in '{}'", path.display());
            return ExitCode::from(1);
        };
        println!("{} ({}) lines {}-{}", found.name, found.display_category(), found.line, found.line_end);
        if let Some(sig) = found.compact_signature() {
            println!("  {sig}");
        }
        return ExitCode::SUCCESS;
    }

    let payload = serde_json::to_value(structure).unwrap_or(serde_json::Value::Null);
    println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    ExitCode::SUCCESS
}
