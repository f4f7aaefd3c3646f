//! Gemini-backed analyzer calling the generateContent REST endpoint.

use crate::analysis::analyzer::{AnalysisResult, Analyzer, build_prompt};
use crate::defaults;
use crate::error::{ClasscribeError, Result};
use crate::transcript::Utterance;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Real-mode analyzer sending the serialized transcript to the Gemini API.
///
/// The credential is injected at construction; this type never reads the
/// environment. API-level errors are surfaced as `AnalysisFailed` and never
/// retried.
#[derive(Debug)]
pub struct GeminiAnalyzer {
    model: String,
    api_key: String,
    prompt_path: Option<PathBuf>,
    client: reqwest::Client,
}

impl GeminiAnalyzer {
    pub fn new(model: String, api_key: String, prompt_path: Option<PathBuf>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(defaults::ANALYSIS_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClasscribeError::AnalysisRuntimeUnavailable {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            model,
            api_key,
            prompt_path,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, utterances: &[Utterance]) -> Result<AnalysisResult> {
        let prompt = build_prompt(self.prompt_path.as_deref(), utterances)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClasscribeError::AnalysisFailed {
                message: format!("Gemini request failed: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClasscribeError::AnalysisFailed {
                message: format!("Gemini answered with status {status}: {body}"),
            });
        }

        let parsed: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| ClasscribeError::AnalysisFailed {
                    message: format!("failed to parse Gemini response: {e}"),
                })?;

        let report = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| ClasscribeError::AnalysisFailed {
                message: "Gemini response contained no candidates".to_string(),
            })?;

        Ok(AnalysisResult { report })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
