//! JSONL extractor — line-wise JSON records with a bounded preview (spec §4.1, §8).
//!
//! Each line is parsed independently; a malformed line is recorded as an
//! error entry rather than aborting the whole document (JSONL files are
//! often append-only logs where one bad line shouldn't hide the rest).

use crate::structure::{Filtered, Item, StructureDocument};

const PREVIEW_LIMIT: usize = 10;

pub fn extract(source: &str) -> StructureDocument {
    let mut doc = StructureDocument::new();
    let mut total = 0usize;
    let mut valid = 0usize;
    let mut invalid = 0usize;

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx as u32 + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        total += 1;

        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(value) => {
                valid += 1;
                if total <= PREVIEW_LIMIT {
                    let name = record_name(&value, idx);
                    let mut item = Item::new(name, line_no, line_no);
                    item.extra.insert("value".to_string(), value);
                    doc.push("records", item);
                }
            }
            Err(e) => {
                invalid += 1;
                let mut item = Item::new(format!("line {line_no}"), line_no, line_no);
                item.extra.insert("error".to_string(), serde_json::json!(e.to_string()));
                doc.push("errors", item);
            }
        }
    }

    if total > PREVIEW_LIMIT {
        doc.filtered.insert(
            "records".to_string(),
            Filtered { showing: doc.category("records").len(), total },
        );
    }

    let mut stats = Item::new("statistics", 1, source.lines().count().max(1) as u32);
    stats.extra.insert("total_records".to_string(), serde_json::json!(total));
    stats.extra.insert("valid_records".to_string(), serde_json::json!(valid));
    stats.extra.insert("invalid_records".to_string(), serde_json::json!(invalid));
    doc.push("statistics", stats);

    doc
}

fn record_name(value: &serde_json::Value, idx: usize) -> String {
    if let Some(obj) = value.as_object() {
        for key in ["id", "name", "type", "event"] {
            if let Some(v) = obj.get(key) {
                if let Some(s) = v.as_str() {
                    return s.to_string();
                }
                return v.to_string();
            }
        }
    }
    format!("record[{idx}]")
}
