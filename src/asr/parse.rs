//! Normalization of the loosely-structured FunASR raw result.
//!
//! The runtime emits one top-level entry holding three parallel collections
//! of different origin: `timestamp` pairs from alignment, a single `text`
//! blob from recognition, and an optional `speaker` list from diarization.
//! Their lengths are not guaranteed to agree, so normalization degrades
//! gracefully instead of rejecting partially-structured output: an index
//! missing from one collection falls back to a default rather than failing.

use crate::defaults;
use crate::error::{ClasscribeError, Result};
use crate::transcript::Utterance;
use serde::Deserialize;

/// One entry of the raw FunASR result, as printed by the runner.
///
/// Every field is optional; absent fields deserialize to their empty value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub timestamp: Vec<(f64, f64)>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub speaker: Vec<String>,
}

/// Deserialize the runner's stdout into raw entries.
///
/// Structural malformation (not valid JSON, wrong shape) is a transcription
/// failure; length mismatches between the parallel collections are not, and
/// are handled by `parse_raw_result`.
pub fn parse_raw_json(stdout: &str) -> Result<Vec<RawEntry>> {
    serde_json::from_str(stdout).map_err(|e| ClasscribeError::TranscriptionFailed {
        message: format!("malformed runner output: {e}"),
    })
}

/// Normalize raw entries into the utterance sequence.
///
/// Only the first entry carries data (the runner transcribes one file per
/// invocation). The padding rules, applied per timestamp index `i`:
///
/// - text: whitespace-split segment `i`, or the *entire* unsplit text blob
///   when the split yields fewer segments (not an empty string);
/// - speaker: diarization label `i`, or `"S0"` when the speaker list is
///   shorter.
///
/// Without any timestamps the whole blob becomes one utterance spanning
/// `[0.0, 0.0]` with the default speaker. An empty result stays empty.
pub fn parse_raw_result(entries: &[RawEntry]) -> Vec<Utterance> {
    let Some(entry) = entries.first() else {
        return Vec::new();
    };

    if entry.timestamp.is_empty() {
        return vec![Utterance {
            speaker: defaults::DEFAULT_SPEAKER.to_string(),
            start: 0.0,
            end: 0.0,
            text: entry.text.clone(),
        }];
    }

    let segments: Vec<&str> = entry.text.split_whitespace().collect();
    entry
        .timestamp
        .iter()
        .enumerate()
        .map(|(idx, &(start, end))| Utterance {
            speaker: entry
                .speaker
                .get(idx)
                .cloned()
                .unwrap_or_else(|| defaults::DEFAULT_SPEAKER.to_string()),
            start,
            end,
            text: segments
                .get(idx)
                .map(|s| s.to_string())
                .unwrap_or_else(|| entry.text.clone()),
        })
        .collect()
}
