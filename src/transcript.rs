//! The Utterance data contract shared by every pipeline stage.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One timed, speaker-attributed unit of transcribed speech.
///
/// Invariants: `speaker` is non-empty, `start >= 0` and `start <= end`.
/// A transcription result is an ordered sequence of utterances; insertion
/// order matches ascending `start` time as produced by the stage, and no
/// independent sort is applied downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Utterance {
    /// Format as a transcript line: `[start-end] speaker: text`.
    ///
    /// Times are rendered with exactly two decimal places. The same
    /// formatting feeds both the analysis prompt and the final report.
    pub fn line(&self) -> String {
        format!(
            "[{:.2}-{:.2}] {}: {}",
            self.start, self.end, self.speaker, self.text
        )
    }
}

/// Serialized transcript artifact: `{"utterances": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub utterances: Vec<Utterance>,
}

/// Persist the utterance sequence as `transcript.json`.
///
/// Creates parent directories as needed.
pub fn save_transcript(utterances: &[Utterance], path: &Path) -> Result<()> {
    let transcript = Transcript {
        utterances: utterances.to_vec(),
    };
    // Pretty output keeps the artifact readable for debugging failed runs
    let json = serde_json::to_string_pretty(&transcript).map_err(|e| {
        crate::error::ClasscribeError::Io(std::io::Error::other(e))
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}
