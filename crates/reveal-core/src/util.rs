//! Utilities (spec §4.7): safe file I/O, JSON serialization, project-root
//! discovery, relative-path computation.

use crate::error::{RevealError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default cap on bytes read from a single source file before the read is
/// refused rather than risking an out-of-memory extractor run.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Read a file as UTF-8 text, bounded by `max_bytes` and falling back to a
/// lossy decode when the bytes aren't valid UTF-8 (spec §4.7 — extractors
/// must never panic on binary-ish input).
pub fn read_source(path: &Path, max_bytes: u64) -> Result<String> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > max_bytes {
        return Err(RevealError::ParseError(format!(
            "{} is {} bytes, over the {max_bytes}-byte limit",
            path.display(),
            metadata.len()
        )));
    }
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => Ok(String::from_utf8_lossy(err.as_bytes()).into_owned()),
    }
}

/// Serialize any value to pretty JSON. `serde_json` already renders the
/// plain ISO-8601 strings this crate stores dates as, so no custom
/// date/datetime encoder is needed — unlike the reference implementation,
/// nothing here carries a native datetime type across the JSON boundary.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| RevealError::ParseError(e.to_string()))
}

pub fn to_json_compact<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| RevealError::ParseError(e.to_string()))
}

const PROJECT_MARKERS: &[&str] =
    &["pyproject.toml", ".git", "Cargo.toml", "package.json", "go.mod", "setup.cfg", "setup.py", "Makefile"];
const MAX_PARENT_DEPTH: usize = 10;

/// Walk up from `start` looking for a project-root marker, capped at 10
/// parent levels (spec §4.7).
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_dir() { start.to_path_buf() } else { start.parent()?.to_path_buf() };
    for _ in 0..MAX_PARENT_DEPTH {
        if PROJECT_MARKERS.iter().any(|marker| dir.join(marker).exists()) {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
    None
}

/// Compute `path` relative to `base`, falling back to `path` unchanged when
/// it isn't actually nested under `base`.
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).map(Path::to_path_buf).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_source_rejects_oversized_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();
        let err = read_source(file.path(), 3).unwrap_err();
        assert!(matches!(err, RevealError::ParseError(_)));
    }

    #[test]
    fn read_source_falls_back_to_lossy_on_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x68, 0x69, 0xff, 0xfe]).unwrap();
        let text = read_source(file.path(), DEFAULT_MAX_FILE_BYTES).unwrap();
        assert!(text.starts_with("hi"));
    }

    #[test]
    fn find_project_root_locates_cargo_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();
        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn relative_path_falls_back_when_not_nested() {
        let p = Path::new("/var/other/file.rs");
        let base = Path::new("/home/project");
        assert_eq!(relative_path(p, base), p.to_path_buf());
    }
}
