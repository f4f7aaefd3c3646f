//! Fail-fast composition of the four stages into one run.

use crate::analysis::{AnalysisResult, Analyzer, build_analyzer};
use crate::asr::{Transcriber, build_transcriber};
use crate::config::Config;
use crate::error::{ClasscribeError, Result};
use crate::ingest::{AudioExtractor, download_video};
use crate::pipeline::workspace::RunWorkspace;
use crate::report::{build_report, save_report};
use crate::tool::{SystemToolRunner, ToolRunner};
use crate::transcript::{Utterance, save_transcript};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Source of the input video.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoSource {
    /// An existing local file
    Local(PathBuf),
    /// A remote URL, stream-downloaded into the workspace before extraction
    Url(String),
}

/// Identity of the failing stage, attached to every run error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Workspace,
    AcquireInput,
    ExtractAudio,
    Transcribe,
    Analyze,
    BuildReport,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Workspace => "workspace",
            Stage::AcquireInput => "acquire-input",
            Stage::ExtractAudio => "extract-audio",
            Stage::Transcribe => "transcribe",
            Stage::Analyze => "analyze",
            Stage::BuildReport => "build-report",
        };
        f.write_str(name)
    }
}

/// A stage failure with the failing stage's identity attached.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {source}")]
pub struct RunError {
    pub stage: Stage,
    #[source]
    pub source: ClasscribeError,
}

/// Everything a successful run produced.
#[derive(Debug)]
pub struct RunResult {
    pub utterances: Vec<Utterance>,
    pub analysis: AnalysisResult,
    pub report: String,
    pub video_path: PathBuf,
    pub audio_path: PathBuf,
    pub transcript_path: PathBuf,
    pub report_path: PathBuf,
}

/// Composes workspace creation, input acquisition, audio extraction,
/// transcription, analysis and report synthesis into one run.
///
/// Stages execute strictly sequentially; the first failure halts the run and
/// is surfaced with its stage identity. Concurrent runs are independent:
/// each gets a fresh workspace, and the shared config is immutable.
pub struct Pipeline {
    config: Arc<Config>,
    extractor: AudioExtractor,
    transcriber: Box<dyn Transcriber>,
    analyzer: Box<dyn Analyzer>,
}

impl Pipeline {
    /// Build a pipeline with real providers selected by the configuration.
    ///
    /// Mode selection (mock transcription, disabled analysis) and its
    /// preconditions (runner availability, credential presence) are resolved
    /// here, before any run starts.
    pub fn new(config: Config) -> Result<Self> {
        let transcriber = build_transcriber(&config.funasr)?;
        let analyzer = build_analyzer(&config.gemini)?;
        Ok(Self::with_providers(
            config,
            Arc::new(SystemToolRunner::new()),
            transcriber,
            analyzer,
        ))
    }

    /// Build a pipeline from explicit providers. Used by tests and by
    /// callers that already constructed the stage implementations.
    pub fn with_providers(
        config: Config,
        runner: Arc<dyn ToolRunner>,
        transcriber: Box<dyn Transcriber>,
        analyzer: Box<dyn Analyzer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            extractor: AudioExtractor::new(runner),
            transcriber,
            analyzer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the model backing the transcription stage ("mock" in mock mode).
    pub fn transcriber_model(&self) -> &str {
        self.transcriber.model_name()
    }

    /// Name of the model backing the analysis stage ("mock" when disabled).
    pub fn analyzer_model(&self) -> &str {
        self.analyzer.model_name()
    }

    /// Execute one full run.
    ///
    /// `quiet` suppresses the download progress bar; it does not change any
    /// behavior. Artifacts already written when a later stage fails stay on
    /// disk for debugging but are never promoted as valid output.
    pub async fn run(
        &self,
        source: &VideoSource,
        quiet: bool,
    ) -> std::result::Result<RunResult, RunError> {
        let workspace = RunWorkspace::create(&self.config.output.workdir)
            .map_err(|e| fail(Stage::Workspace, e))?;
        log::info!("workspace created at {}", workspace.path().display());

        let video_path = self
            .acquire_input(source, &workspace, quiet)
            .await
            .map_err(|e| fail(Stage::AcquireInput, e))?;

        let audio_path = workspace.audio_path();
        log::info!("[1/4] extracting audio to {}", audio_path.display());
        self.extractor
            .extract(
                &video_path,
                &audio_path,
                self.config.ffmpeg.sample_rate,
                self.config.ffmpeg.channels,
            )
            .map_err(|e| fail(Stage::ExtractAudio, e))?;

        log::info!(
            "[2/4] transcribing with {}",
            self.transcriber.model_name()
        );
        let utterances = self
            .transcriber
            .transcribe(&audio_path)
            .map_err(|e| fail(Stage::Transcribe, e))?;
        let transcript_path = workspace.transcript_path();
        save_transcript(&utterances, &transcript_path)
            .map_err(|e| fail(Stage::Transcribe, e))?;

        log::info!("[3/4] analyzing with {}", self.analyzer.model_name());
        let analysis = self
            .analyzer
            .analyze(&utterances)
            .await
            .map_err(|e| fail(Stage::Analyze, e))?;

        let report_path = workspace.report_path();
        log::info!("[4/4] building report at {}", report_path.display());
        let report = build_report(&utterances, &analysis);
        save_report(&report, &report_path).map_err(|e| fail(Stage::BuildReport, e))?;

        Ok(RunResult {
            utterances,
            analysis,
            report,
            video_path,
            audio_path,
            transcript_path,
            report_path,
        })
    }

    /// Resolve the input video into a local path inside (or outside, for
    /// local sources) the workspace.
    async fn acquire_input(
        &self,
        source: &VideoSource,
        workspace: &RunWorkspace,
        quiet: bool,
    ) -> Result<PathBuf> {
        match source {
            VideoSource::Local(path) => {
                if !path.is_file() {
                    return Err(ClasscribeError::InvalidInput {
                        message: format!("video file not found: {}", path.display()),
                    });
                }
                Ok(path.clone())
            }
            VideoSource::Url(url) => {
                let target = workspace.download_path();
                log::info!("downloading {} to {}", url, target.display());
                download_video(url, &target, !quiet).await?;
                Ok(target)
            }
        }
    }
}

fn fail(stage: Stage, source: ClasscribeError) -> RunError {
    RunError { stage, source }
}
