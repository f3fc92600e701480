//! nginx config extractor — brace-balanced block parser (spec §4.1)
//!
//! Extracts `server`, `upstream`, and `location` blocks plus the
//! directives the N-series infrastructure rules need: `listen`,
//! `server_name`, `ssl_certificate*`, `proxy_set_header`, and ACME
//! challenge locations (`location /.well-known/acme-challenge/*`).

use crate::structure::{Item, StructureDocument};

struct Block<'a> {
    kind: &'a str,
    arg: String,
    line: u32,
    line_end: u32,
    directives: Vec<(String, String, u32)>,
}

pub fn extract(source: &str) -> StructureDocument {
    let mut doc = StructureDocument::new();
    let tokens = tokenize(source);
    let mut pos = 0usize;
    parse_blocks(&tokens, &mut pos, &mut doc);
    doc
}

#[derive(Debug, Clone)]
enum Token {
    Word(String, u32),
    OpenBrace(u32),
    CloseBrace(u32),
    Semicolon(u32),
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx as u32 + 1;
        let line = match raw_line.find('#') {
            Some(hash) => &raw_line[..hash],
            None => raw_line,
        };
        let mut word = String::new();
        for ch in line.chars() {
            match ch {
                '{' | '}' | ';' => {
                    if !word.is_empty() {
                        tokens.push(Token::Word(std::mem::take(&mut word), line_no));
                    }
                    tokens.push(match ch {
                        '{' => Token::OpenBrace(line_no),
                        '}' => Token::CloseBrace(line_no),
                        _ => Token::Semicolon(line_no),
                    });
                }
                c if c.is_whitespace() => {
                    if !word.is_empty() {
                        tokens.push(Token::Word(std::mem::take(&mut word), line_no));
                    }
                }
                c => word.push(c),
            }
        }
        if !word.is_empty() {
            tokens.push(Token::Word(word, line_no));
        }
    }
    tokens
}

fn parse_blocks(tokens: &[Token], pos: &mut usize, doc: &mut StructureDocument) {
    while *pos < tokens.len() {
        match &tokens[*pos] {
            Token::CloseBrace(_) => {
                *pos += 1;
                return;
            }
            Token::Word(_, _) => {
                let (words, start_line) = collect_statement_words(tokens, pos);
                if words.is_empty() {
                    continue;
                }
                match tokens.get(*pos) {
                    Some(Token::OpenBrace(_)) => {
                        *pos += 1;
                        let mut block = Block {
                            kind: block_kind(&words[0]),
                            arg: words.get(1..).map(|s| s.join(" ")).unwrap_or_default(),
                            line: start_line,
                            line_end: start_line,
                            directives: Vec::new(),
                        };
                        collect_directives(tokens, pos, &mut block, doc);
                        emit_block(&block, doc);
                    }
                    Some(Token::Semicolon(line)) => {
                        *pos += 1;
                        let _ = line;
                    }
                    _ => {}
                }
            }
            _ => {
                *pos += 1;
            }
        }
    }
}

fn collect_directives(tokens: &[Token], pos: &mut usize, block: &mut Block, doc: &mut StructureDocument) {
    loop {
        match tokens.get(*pos) {
            None => return,
            Some(Token::CloseBrace(line)) => {
                block.line_end = *line;
                *pos += 1;
                return;
            }
            Some(Token::Word(_, _)) => {
                let (words, start_line) = collect_statement_words(tokens, pos);
                if words.is_empty() {
                    continue;
                }
                match tokens.get(*pos) {
                    Some(Token::OpenBrace(_)) => {
                        *pos += 1;
                        let mut nested = Block {
                            kind: block_kind(&words[0]),
                            arg: words.get(1..).map(|s| s.join(" ")).unwrap_or_default(),
                            line: start_line,
                            line_end: start_line,
                            directives: Vec::new(),
                        };
                        collect_directives(tokens, pos, &mut nested, doc);
                        emit_block(&nested, doc);
                    }
                    Some(Token::Semicolon(_)) => {
                        *pos += 1;
                        let directive = words[0].clone();
                        let value = words.get(1..).map(|s| s.join(" ")).unwrap_or_default();
                        block.directives.push((directive, value, start_line));
                    }
                    _ => {}
                }
            }
            _ => {
                *pos += 1;
            }
        }
    }
}

fn collect_statement_words(tokens: &[Token], pos: &mut usize) -> (Vec<String>, u32) {
    let mut words = Vec::new();
    let mut start_line = 0;
    while let Some(Token::Word(w, line)) = tokens.get(*pos) {
        if start_line == 0 {
            start_line = *line;
        }
        words.push(w.clone());
        *pos += 1;
    }
    (words, start_line)
}

fn block_kind(word: &str) -> &'static str {
    match word {
        "server" => "servers",
        "upstream" => "upstreams",
        "location" => "locations",
        _ => "blocks",
    }
}

fn emit_block(block: &Block, doc: &mut StructureDocument) {
    let name = if block.arg.is_empty() { block.kind.trim_end_matches('s').to_string() } else { block.arg.clone() };
    let mut item = Item::new(name, block.line, block.line_end);

    for (directive, value, line) in &block.directives {
        match directive.as_str() {
            "listen" | "server_name" | "proxy_set_header" => {
                item.extra
                    .entry(directive.clone())
                    .and_modify(|v| {
                        if let Some(arr) = v.as_array_mut() {
                            arr.push(serde_json::json!(value));
                        }
                    })
                    .or_insert_with(|| serde_json::json!([value]));
            }
            d if d.starts_with("ssl_certificate") => {
                item.extra.insert(d.clone(), serde_json::json!(value));
            }
            "proxy_pass" => {
                item.extra.insert("proxy_pass".to_string(), serde_json::json!(value));
            }
            "root" if block.kind == "locations" && item.name.contains(".well-known/acme-challenge") => {
                item.extra.insert("acme_root".to_string(), serde_json::json!(value));
            }
            _ => {}
        }
        let _ = line;
    }

    // upstream backends: collect `server host:port;` lines as a list for N001.
    if block.kind == "upstreams" {
        let servers: Vec<&str> = block
            .directives
            .iter()
            .filter(|(d, _, _)| d == "server")
            .map(|(_, v, _)| v.split_whitespace().next().unwrap_or(""))
            .collect();
        item.extra.insert("backends".to_string(), serde_json::json!(servers));
    }

    doc.push(block.kind, item);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_server_and_listen() {
        let source = "server {\n    listen 443 ssl;\n    server_name example.com;\n}\n";
        let doc = extract(source);
        assert_eq!(doc.category("servers").len(), 1);
        let server = &doc.category("servers")[0];
        assert_eq!(server.extra["listen"], serde_json::json!(["443 ssl"]));
    }

    #[test]
    fn duplicate_upstream_backends_are_visible() {
        let source = "upstream a {\n    server 127.0.0.1:8000;\n}\nupstream b {\n    server 127.0.0.1:8000;\n}\n";
        let doc = extract(source);
        let upstreams = doc.category("upstreams");
        assert_eq!(upstreams.len(), 2);
        assert_eq!(upstreams[0].extra["backends"], serde_json::json!(["127.0.0.1:8000"]));
        assert_eq!(upstreams[1].extra["backends"], serde_json::json!(["127.0.0.1:8000"]));
    }

    #[test]
    fn locations_are_nested_under_server() {
        let source = "server {\n    location / {\n        proxy_pass http://backend;\n    }\n}\n";
        let doc = extract(source);
        assert_eq!(doc.category("locations").len(), 1);
        assert_eq!(doc.category("locations")[0].extra["proxy_pass"], serde_json::json!("http://backend"));
    }
}
