//! `REVEAL_*` environment overrides (spec §6)
//!
//! ARCHITECTURE: Overrides are read once at startup and injected, never
//! read lazily mid-run — matches the teacher's "config is injected, not
//! global" principle (see `TransformConfig`).

/// Integer-valued thresholds that rules and extractors consult
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// C901: cyclomatic complexity above which a function is flagged
    pub complexity: u32,
    /// M101: file line count above which a warning is raised
    pub file_length_warn: u32,
    /// M101: file line count above which an error-severity detection is raised
    pub file_length_error: u32,
    /// E501: maximum line length before flagging
    pub line_length: u32,
    /// Advisory cap on items returned by a directory-style listing
    pub listing_limit: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            complexity: 10,
            file_length_warn: 500,
            file_length_error: 1000,
            line_length: 120,
            listing_limit: 200,
        }
    }
}

impl Thresholds {
    /// Build thresholds from defaults overridden by `REVEAL_*` env vars.
    ///
    /// Missing or unparseable values silently fall back to the default
    /// rather than erroring — config errors must never abort a run.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            complexity: env_u32("REVEAL_COMPLEXITY_THRESHOLD", defaults.complexity),
            file_length_warn: env_u32("REVEAL_FILE_LENGTH_WARN", defaults.file_length_warn),
            file_length_error: env_u32("REVEAL_FILE_LENGTH_ERROR", defaults.file_length_error),
            line_length: env_u32("REVEAL_LINE_LENGTH", defaults.line_length),
            listing_limit: env_u32("REVEAL_LISTING_LIMIT", defaults.listing_limit),
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_env_absent() {
        std::env::remove_var("REVEAL_COMPLEXITY_THRESHOLD");
        let t = Thresholds::from_env();
        assert_eq!(t.complexity, 10);
    }

    #[test]
    fn overrides_parse_and_apply() {
        std::env::set_var("REVEAL_COMPLEXITY_THRESHOLD", "15");
        let t = Thresholds::from_env();
        assert_eq!(t.complexity, 15);
        std::env::remove_var("REVEAL_COMPLEXITY_THRESHOLD");
    }

    #[test]
    fn unparseable_override_falls_back() {
        std::env::set_var("REVEAL_LINE_LENGTH", "not-a-number");
        let t = Thresholds::from_env();
        assert_eq!(t.line_length, 120);
        std::env::remove_var("REVEAL_LINE_LENGTH");
    }
}
