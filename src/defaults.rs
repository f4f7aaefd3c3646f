//! Default configuration constants for classcribe.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and what the FunASR
/// paraformer models are trained on.
pub const SAMPLE_RATE: u32 = 16000;

/// Default channel count for extracted audio.
///
/// Mono is sufficient for speech and halves the audio artifact size.
pub const CHANNELS: u16 = 1;

/// Name of the media-conversion binary used for audio extraction.
pub const FFMPEG_TOOL: &str = "ffmpeg";

/// Name of the FunASR runner binary.
///
/// The speech model runtime is an external collaborator: a small CLI that
/// loads the FunASR models, transcribes one audio file and prints the raw
/// result as JSON on stdout.
pub const FUNASR_RUNNER: &str = "funasr-runner";

/// FunASR model for Chinese speech.
pub const ZH_MODEL: &str = "paraformer-zh";

/// FunASR model for English speech.
pub const EN_MODEL: &str = "paraformer-en";

/// Default inference device hint passed to the FunASR runner.
pub const DEVICE: &str = "cpu";

/// Speaker label assigned when diarization yields no label for a segment.
pub const DEFAULT_SPEAKER: &str = "S0";

/// Default Gemini model used for transcript analysis.
pub const GEMINI_MODEL: &str = "gemini-pro";

/// Environment variable holding the Gemini API credential.
///
/// Read once during config load and injected into `GeminiConfig`; the
/// analyzer itself never touches the environment.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default root directory for per-run workspaces.
pub const WORKDIR: &str = "artifacts";

/// Extracted audio artifact filename inside a run workspace.
pub const AUDIO_FILENAME: &str = "audio.wav";

/// Transcript artifact filename inside a run workspace.
pub const TRANSCRIPT_FILENAME: &str = "transcript.json";

/// Report artifact filename inside a run workspace.
pub const REPORT_FILENAME: &str = "report.md";

/// Filename for videos downloaded from a URL into a run workspace.
pub const DOWNLOAD_FILENAME: &str = "download.mp4";

/// Timeout in seconds for video downloads.
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Timeout in seconds for Gemini API calls.
pub const ANALYSIS_TIMEOUT_SECS: u64 = 120;
