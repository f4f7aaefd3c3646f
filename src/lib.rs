//! classcribe - Classroom video analysis pipeline
//!
//! Extracts audio from a classroom recording, transcribes and diarizes it,
//! analyzes the verbal interaction, and writes a Markdown report.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod analysis;
pub mod app;
pub mod asr;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod error;
pub mod ingest;
pub mod ipc;
pub mod pipeline;
pub mod report;
pub mod service;
pub mod tool;
pub mod transcript;

// Core traits (extract → transcribe → analyze → report)
pub use analysis::{AnalysisResult, Analyzer};
pub use asr::Transcriber;
pub use tool::{SystemToolRunner, ToolRunner};

// Pipeline
pub use pipeline::{Pipeline, RunError, RunResult, Stage, VideoSource};

// Error handling
pub use error::{ClasscribeError, Result};

// Config
pub use config::Config;

// Data model
pub use transcript::{Transcript, Utterance};
