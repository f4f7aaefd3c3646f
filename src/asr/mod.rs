//! Speech-to-text with speaker diarization.
//!
//! The `Transcriber` trait is the stage seam; `build_transcriber` selects
//! the real FunASR-backed implementation or the deterministic mock at
//! construction time, never silently.

pub mod funasr;
pub mod parse;
pub mod transcriber;

pub use funasr::FunasrTranscriber;
pub use parse::{RawEntry, parse_raw_result};
pub use transcriber::{MockTranscriber, Transcriber, build_transcriber, resolve_model};
