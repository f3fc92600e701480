//! M-series: maintainability metrics (spec §4.3).

use super::{Rule, RuleContext};
use crate::detection::{Detection, Severity};

#[derive(Default)]
pub struct M101;
impl Rule for M101 {
    fn code(&self) -> &'static str {
        "M101"
    }
    fn message(&self) -> &'static str {
        "file length exceeds threshold"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["*"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let total_lines = ctx.content.lines().count() as u32;
        let (warn, error) = (ctx.thresholds.file_length_warn, ctx.thresholds.file_length_error);
        if total_lines > error {
            return vec![Detection::new(
                self.code(),
                ctx.path.to_path_buf(),
                1,
                format!("file is {total_lines} lines (error threshold {error})"),
                Severity::High,
            )];
        }
        if total_lines > warn {
            return vec![Detection::new(
                self.code(),
                ctx.path.to_path_buf(),
                1,
                format!("file is {total_lines} lines (warn threshold {warn})"),
                Severity::Low,
            )];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use std::path::Path;

    #[test]
    fn flags_file_over_error_threshold_as_high_severity() {
        let thresholds = Thresholds { file_length_warn: 5, file_length_error: 10, ..Thresholds::default() };
        let content = "x\n".repeat(20);
        let ctx = RuleContext {
            path: Path::new("a.rs"),
            structure: None,
            content: &content,
            schema: None,
            thresholds: &thresholds,
            dev_mode: false,
        };
        let detections = M101::default().check(&ctx);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].severity, Severity::High);
    }

    #[test]
    fn under_warn_threshold_is_clean() {
        let thresholds = Thresholds::default();
        let content = "x\n".repeat(3);
        let ctx = RuleContext {
            path: Path::new("a.rs"),
            structure: None,
            content: &content,
            schema: None,
            thresholds: &thresholds,
            dev_mode: false,
        };
        assert!(M101::default().check(&ctx).is_empty());
    }
}
