//! N-series: nginx/infrastructure misconfiguration detectors (spec §4.3,
//! grounded on `test_nginx_rules.py` and the `nginx` structure extractor).

use super::{Rule, RuleContext};
use crate::detection::{Detection, Severity};
use rustc_hash::FxHashMap;

fn server_label(item: &crate::structure::Item) -> String {
    item.extra
        .get("server_name")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| item.name.clone())
}

fn listen_values(item: &crate::structure::Item) -> Vec<String> {
    item.extra
        .get("listen")
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

fn is_ssl_server(item: &crate::structure::Item) -> bool {
    listen_values(item).iter().any(|l| l.contains("ssl"))
}

/// N001: two `upstream` blocks sharing the same normalized backend address.
pub struct N001;
impl Rule for N001 {
    fn code(&self) -> &'static str {
        "N001"
    }
    fn message(&self) -> &'static str {
        "duplicate upstream backend"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".conf", "nginx.conf"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(structure) = ctx.structure else { return Vec::new() };
        let mut first_seen: FxHashMap<String, String> = FxHashMap::default();
        let mut out = Vec::new();

        for item in structure.category("upstreams") {
            let backends = item.extra.get("backends").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            for b in backends {
                let Some(raw) = b.as_str() else { continue };
                let norm = normalize_backend(raw);
                match first_seen.get(&norm) {
                    Some(first_upstream) if first_upstream != &item.name => {
                        out.push(Detection::new(
                            self.code(),
                            ctx.path.to_path_buf(),
                            item.line,
                            format!(
                                "upstream '{}' duplicates backend '{norm}' already used by upstream '{first_upstream}'",
                                item.name
                            ),
                            self.severity(),
                        ));
                    }
                    Some(_) => {}
                    None => {
                        first_seen.insert(norm, item.name.clone());
                    }
                }
            }
        }
        out
    }
}

fn normalize_backend(raw: &str) -> String {
    let spec = raw.split_whitespace().next().unwrap_or(raw);
    if spec.starts_with("unix:") {
        return spec.to_string();
    }
    if spec.contains(':') {
        spec.to_string()
    } else {
        format!("{spec}:80")
    }
}

/// N002: an SSL server block missing `ssl_certificate`/`ssl_certificate_key`.
pub struct N002;
impl Rule for N002 {
    fn code(&self) -> &'static str {
        "N002"
    }
    fn message(&self) -> &'static str {
        "SSL server missing certificate configuration"
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".conf", "nginx.conf"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(structure) = ctx.structure else { return Vec::new() };
        let mut out = Vec::new();

        for item in structure.category("servers") {
            if !is_ssl_server(item) {
                continue;
            }
            let mut missing = Vec::new();
            if !item.extra.contains_key("ssl_certificate") {
                missing.push("ssl_certificate");
            }
            if !item.extra.contains_key("ssl_certificate_key") {
                missing.push("ssl_certificate_key");
            }
            if missing.is_empty() {
                continue;
            }
            out.push(Detection::new(
                self.code(),
                ctx.path.to_path_buf(),
                item.line,
                format!("SSL server '{}' missing {}", server_label(item), missing.join(", ")),
                self.severity(),
            ));
        }
        out
    }
}

const RECOMMENDED_PROXY_HEADERS: &[&str] = &["X-Real-IP", "X-Forwarded-For"];

/// N003: a proxying `location` block missing recommended forwarding headers.
pub struct N003;
impl Rule for N003 {
    fn code(&self) -> &'static str {
        "N003"
    }
    fn message(&self) -> &'static str {
        "proxy location missing recommended headers"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".conf", "nginx.conf"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(structure) = ctx.structure else { return Vec::new() };
        let mut out = Vec::new();

        for item in structure.category("locations") {
            if !item.extra.contains_key("proxy_pass") {
                continue;
            }
            let present: Vec<String> = item
                .extra
                .get("proxy_set_header")
                .and_then(|v| v.as_array())
                .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
                .unwrap_or_default();

            let missing: Vec<&str> = RECOMMENDED_PROXY_HEADERS
                .iter()
                .filter(|h| !present.iter().any(|p| p.starts_with(**h)))
                .copied()
                .collect();
            if missing.is_empty() {
                continue;
            }
            out.push(Detection::new(
                self.code(),
                ctx.path.to_path_buf(),
                item.line,
                format!("location '{}' missing recommended proxy headers: {}", item.name, missing.join(", ")),
                self.severity(),
            ));
        }
        out
    }
}

/// N004: ACME HTTP-01 challenge locations disagree on their webroot.
pub struct N004;
impl Rule for N004 {
    fn code(&self) -> &'static str {
        "N004"
    }
    fn message(&self) -> &'static str {
        "inconsistent ACME challenge webroot across server blocks"
    }
    fn severity(&self) -> Severity {
        Severity::Low
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".conf", "nginx.conf"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(structure) = ctx.structure else { return Vec::new() };
        let roots: Vec<(&crate::structure::Item, &str)> = structure
            .category("locations")
            .iter()
            .filter_map(|item| item.extra.get("acme_root").and_then(|v| v.as_str()).map(|r| (item, r)))
            .collect();

        let Some((_, first_root)) = roots.first() else { return Vec::new() };
        roots
            .iter()
            .skip(1)
            .filter(|(_, root)| root != first_root)
            .map(|(item, root)| {
                Detection::new(
                    self.code(),
                    ctx.path.to_path_buf(),
                    item.line,
                    format!("ACME webroot '{root}' differs from '{first_root}' used elsewhere"),
                    self.severity(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::structure::extractors::nginx;
    use std::path::Path;

    fn ctx<'a>(doc: &'a crate::structure::StructureDocument, content: &'a str, thresholds: &'a Thresholds) -> RuleContext<'a> {
        RuleContext { path: Path::new("test.conf"), structure: Some(doc), content, schema: None, thresholds, dev_mode: false }
    }

    #[test]
    fn n001_detects_duplicate_backends() {
        let content = "upstream app1 {\n    server 127.0.0.1:8000;\n}\nupstream app2 {\n    server 127.0.0.1:8000;\n}\n";
        let doc = nginx::extract(content);
        let t = Thresholds::default();
        let detections = N001.check(&ctx(&doc, content, &t));
        assert_eq!(detections.len(), 1);
        assert!(detections[0].message.contains("app1"));
        assert!(detections[0].message.contains("app2"));
    }

    #[test]
    fn n001_no_false_positive_different_ports() {
        let content = "upstream app1 {\n    server 127.0.0.1:8000;\n}\nupstream app2 {\n    server 127.0.0.1:8001;\n}\n";
        let doc = nginx::extract(content);
        let t = Thresholds::default();
        assert!(N001.check(&ctx(&doc, content, &t)).is_empty());
    }

    #[test]
    fn n001_normalizes_missing_port_to_80() {
        let content = "upstream app1 {\n    server 127.0.0.1;\n}\nupstream app2 {\n    server 127.0.0.1:80;\n}\n";
        let doc = nginx::extract(content);
        let t = Thresholds::default();
        assert_eq!(N001.check(&ctx(&doc, content, &t)).len(), 1);
    }

    #[test]
    fn n002_detects_missing_cert_only() {
        let content = "server {\n    listen 443 ssl;\n    server_name example.com;\n    ssl_certificate_key /etc/ssl/private/example.key;\n}\n";
        let doc = nginx::extract(content);
        let t = Thresholds::default();
        let detections = N002.check(&ctx(&doc, content, &t));
        assert_eq!(detections.len(), 1);
        assert!(detections[0].message.contains("ssl_certificate"));
        assert!(!detections[0].message.contains("ssl_certificate_key"));
    }

    #[test]
    fn n002_ignores_non_ssl_servers() {
        let content = "server {\n    listen 80;\n    server_name example.com;\n}\n";
        let doc = nginx::extract(content);
        let t = Thresholds::default();
        assert!(N002.check(&ctx(&doc, content, &t)).is_empty());
    }

    #[test]
    fn n003_detects_missing_headers() {
        let content = "server {\n    listen 80;\n    location /api {\n        proxy_pass http://backend;\n    }\n}\n";
        let doc = nginx::extract(content);
        let t = Thresholds::default();
        let detections = N003.check(&ctx(&doc, content, &t));
        assert_eq!(detections.len(), 1);
        assert!(detections[0].message.contains("/api"));
        assert!(detections[0].message.contains("X-Real-IP"));
    }

    #[test]
    fn n003_detects_partial_headers_only_missing_one() {
        let content = "server {\n    listen 80;\n    location /api {\n        proxy_pass http://backend;\n        proxy_set_header X-Real-IP $remote_addr;\n    }\n}\n";
        let doc = nginx::extract(content);
        let t = Thresholds::default();
        let detections = N003.check(&ctx(&doc, content, &t));
        assert_eq!(detections.len(), 1);
        assert!(detections[0].message.contains("X-Forwarded-For"));
        assert!(!detections[0].message.contains("X-Real-IP"));
    }
}
