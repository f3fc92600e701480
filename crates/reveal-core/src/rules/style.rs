//! E-series: style rules over raw file content (spec §4.3).

use super::{Rule, RuleContext};
use crate::detection::{Detection, Severity};

#[derive(Default)]
pub struct E501;
impl Rule for E501 {
    fn code(&self) -> &'static str {
        "E501"
    }
    fn message(&self) -> &'static str {
        "line too long"
    }
    fn severity(&self) -> Severity {
        Severity::Low
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["*"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let limit = ctx.thresholds.line_length as usize;
        let mut out = Vec::new();
        for (idx, line) in ctx.content.lines().enumerate() {
            let len = line.chars().count();
            if len > limit {
                out.push(
                    Detection::new(
                        self.code(),
                        ctx.path.to_path_buf(),
                        idx as u32 + 1,
                        format!("line is {len} characters (max {limit})"),
                        self.severity(),
                    )
                    .with_column(limit as u32 + 1),
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use std::path::Path;

    #[test]
    fn flags_lines_over_limit() {
        let thresholds = Thresholds { line_length: 10, ..Thresholds::default() };
        let content = "short\nthis line is definitely too long for the limit\n";
        let ctx = RuleContext {
            path: Path::new("a.txt"),
            structure: None,
            content,
            schema: None,
            thresholds: &thresholds,
            dev_mode: false,
        };
        let detections = E501::default().check(&ctx);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].line, 2);
    }
}
