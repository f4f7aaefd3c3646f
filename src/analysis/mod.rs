//! Transcript analysis via the Gemini API or a deterministic mock.

pub mod analyzer;
pub mod gemini;

pub use analyzer::{AnalysisResult, Analyzer, MockAnalyzer, build_analyzer, build_prompt};
pub use gemini::GeminiAnalyzer;
