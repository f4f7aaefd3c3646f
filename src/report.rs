//! Deterministic report synthesis from utterances and analysis.

use crate::analysis::AnalysisResult;
use crate::error::Result;
use crate::transcript::Utterance;
use std::fs;
use std::path::Path;

/// Title line of every report.
pub const REPORT_TITLE: &str = "# 课堂语音分析报告";

/// Heading of the summary section.
pub const SUMMARY_HEADING: &str = "## 概要";

/// Heading of the transcript section.
pub const TRANSCRIPT_HEADING: &str = "## 转写片段（含说话人分离）";

/// Summary shown when the analysis produced no report text.
pub const SUMMARY_PLACEHOLDER: &str = "未启用 Gemini，显示占位报告。";

/// Render the final report text.
///
/// Pure function: identical inputs always produce byte-identical output.
/// Structure is fixed: title, summary section carrying the analysis report
/// verbatim (or the placeholder when it is empty), then one transcript line
/// per utterance in input order. Callers persist the returned text
/// separately.
pub fn build_report(utterances: &[Utterance], analysis: &AnalysisResult) -> String {
    let summary = if analysis.report.is_empty() {
        SUMMARY_PLACEHOLDER
    } else {
        analysis.report.as_str()
    };

    let mut lines = vec![
        REPORT_TITLE.to_string(),
        String::new(),
        SUMMARY_HEADING.to_string(),
        summary.to_string(),
        String::new(),
        TRANSCRIPT_HEADING.to_string(),
    ];
    for u in utterances {
        lines.push(format!("- {}", u.line()));
    }
    lines.join("\n")
}

/// Persist report text, creating parent directories as needed.
pub fn save_report(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
