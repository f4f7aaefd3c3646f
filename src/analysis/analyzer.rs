//! The analysis stage seam, its mock, and the prompt serialization contract.

use crate::config::GeminiConfig;
use crate::defaults;
use crate::error::{ClasscribeError, Result};
use crate::transcript::Utterance;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Fixed report text returned by the mock analyzer.
pub const MOCK_REPORT: &str = "Mock 报告：学生参与度良好（S2 提出关键问题），主题聚焦能量守恒。\
建议保留互动提问，补充练习题。";

/// Task instruction appended after the transcript block in every prompt.
const TASK_INSTRUCTION: &str = "请生成课堂状态报告（参与度、提问、主题偏移、建议）。";

/// Free-text analysis of the transcript.
///
/// The schema is identical in mock and real mode; only the content differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub report: String,
}

/// Trait for transcript analysis.
///
/// This trait allows swapping implementations (real Gemini API vs mock).
#[async_trait]
pub trait Analyzer: Send + Sync + std::fmt::Debug {
    /// Produce a free-text analysis of the utterance sequence.
    async fn analyze(&self, utterances: &[Utterance]) -> Result<AnalysisResult>;

    /// Identifier of the model (or mock) backing this analyzer.
    fn model_name(&self) -> &str;
}

/// Build the analyzer selected by the configuration.
///
/// The mode is the explicit, user-controlled `enabled` flag, not an
/// availability probe. Enabled mode requires the injected credential and
/// fails here, before the pipeline starts, when it is absent.
pub fn build_analyzer(cfg: &GeminiConfig) -> Result<Box<dyn Analyzer>> {
    if !cfg.enabled {
        log::info!("analysis disabled, using mock report");
        return Ok(Box::new(MockAnalyzer::new()));
    }

    let api_key = cfg
        .api_key
        .clone()
        .ok_or_else(|| ClasscribeError::CredentialMissing {
            variable: defaults::GEMINI_API_KEY_ENV.to_string(),
        })?;

    Ok(Box::new(crate::analysis::GeminiAnalyzer::new(
        cfg.model.clone(),
        api_key,
        cfg.prompt_path.clone(),
    )?))
}

/// Build the analysis prompt for an utterance sequence.
///
/// Layout: optional template file contents, the serialized transcript (one
/// `[start-end] speaker: text` line per utterance with two-decimal times),
/// then the fixed task instruction.
pub fn build_prompt(template_path: Option<&Path>, utterances: &[Utterance]) -> Result<String> {
    let base = match template_path {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };
    let transcript = utterances
        .iter()
        .map(|u| u.line())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(format!(
        "{base}\n\n转写文本：\n{transcript}\n\n{TASK_INSTRUCTION}"
    ))
}

/// Deterministic stand-in analyzer used when analysis is disabled.
///
/// Returns immediately without any network call.
#[derive(Debug, Clone, Default)]
pub struct MockAnalyzer;

impl MockAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, _utterances: &[Utterance]) -> Result<AnalysisResult> {
        Ok(AnalysisResult {
            report: MOCK_REPORT.to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
