//! Dockerfile extractor — directive line parser with `\`-continuation (spec §4.1)

use crate::structure::{Item, StructureDocument};

const DIRECTIVES: &[&str] = &[
    "FROM", "RUN", "COPY", "ADD", "ENV", "EXPOSE", "ENTRYPOINT", "CMD", "LABEL", "ARG",
    "WORKDIR", "USER", "VOLUME", "SHELL", "HEALTHCHECK", "ONBUILD", "STOPSIGNAL",
];

fn category_for(directive: &str) -> &'static str {
    match directive {
        "FROM" => "from",
        "RUN" => "run",
        "COPY" | "ADD" => "copy",
        "ENV" => "env",
        "EXPOSE" => "expose",
        "ENTRYPOINT" => "entrypoint",
        "CMD" => "cmd",
        "LABEL" => "label",
        "ARG" => "arg",
        "WORKDIR" => "workdir",
        _ => "other",
    }
}

pub fn extract(source: &str) -> StructureDocument {
    let mut doc = StructureDocument::new();
    let lines: Vec<&str> = source.lines().collect();

    let mut i = 0usize;
    while i < lines.len() {
        let raw = lines[i];
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            i += 1;
            continue;
        }

        let start_line = i + 1;
        let mut joined = String::new();
        let mut j = i;
        loop {
            let line = lines[j];
            let continues = line.trim_end().ends_with('\\');
            let content = if continues { &line.trim_end()[..line.trim_end().len() - 1] } else { line };
            joined.push_str(content.trim());
            j += 1;
            if !continues || j >= lines.len() {
                break;
            }
            joined.push(' ');
        }
        let end_line = j;

        let Some((directive, rest)) = joined.split_once(char::is_whitespace) else {
            i = j.max(i + 1);
            continue;
        };
        let directive_upper = directive.to_ascii_uppercase();
        if DIRECTIVES.contains(&directive_upper.as_str()) {
            let args = rest.trim().to_string();
            let name = args.split_whitespace().next().unwrap_or(&directive_upper).to_string();
            let mut item = Item::new(name, start_line as u32, end_line as u32).with_signature(args.clone());
            item.extra.insert("directive".to_string(), serde_json::json!(directive_upper));
            item.extra.insert("args".to_string(), serde_json::json!(args));
            doc.push(category_for(&directive_upper), item);
        }

        i = j.max(i + 1);
    }

    doc
}
