//! FunASR-backed transcriber invoking the external runner.
//!
//! The runner contract: `funasr-runner --model <id> [--vad-model <id>]
//! [--punc-model <id>] [--spk-model <id>] --device <hint> [--hotword <w>]
//! <audio>` prints the raw FunASR result as JSON on stdout and exits
//! non-zero on inference failure. Its output shape is normalized by
//! [`crate::asr::parse`].

use crate::asr::parse::{parse_raw_json, parse_raw_result};
use crate::asr::transcriber::Transcriber;
use crate::config::FunasrConfig;
use crate::defaults;
use crate::error::{ClasscribeError, Result};
use crate::tool::{SystemToolRunner, ToolRunner};
use crate::transcript::Utterance;
use std::path::Path;
use std::sync::Arc;

/// Real-mode transcriber backed by the FunASR runner process.
pub struct FunasrTranscriber {
    model: String,
    config: FunasrConfig,
    runner: Arc<dyn ToolRunner>,
}

impl FunasrTranscriber {
    /// Create a transcriber for an already-resolved model identifier.
    ///
    /// Availability of the runner binary is the caller's responsibility
    /// (see `build_transcriber`); a runner that disappears between
    /// construction and use still fails cleanly at `transcribe`.
    pub fn new(model: String, config: FunasrConfig) -> Self {
        Self::with_runner(model, config, Arc::new(SystemToolRunner::new()))
    }

    pub fn with_runner(model: String, config: FunasrConfig, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            model,
            config,
            runner,
        }
    }

    fn build_args<'a>(&'a self, audio: &'a str) -> Vec<&'a str> {
        let mut args = vec!["--model", self.model.as_str()];
        if let Some(vad) = &self.config.vad_model {
            args.extend(["--vad-model", vad.as_str()]);
        }
        if let Some(punc) = &self.config.punc_model {
            args.extend(["--punc-model", punc.as_str()]);
        }
        if let Some(spk) = &self.config.spk_model {
            args.extend(["--spk-model", spk.as_str()]);
        }
        args.extend(["--device", self.config.device.as_str()]);
        if let Some(hotword) = &self.config.hotword {
            args.extend(["--hotword", hotword.as_str()]);
        }
        args.push(audio);
        args
    }
}

impl Transcriber for FunasrTranscriber {
    fn transcribe(&self, audio: &Path) -> Result<Vec<Utterance>> {
        let audio_arg = audio.display().to_string();
        let args = self.build_args(&audio_arg);

        log::debug!("running {} {}", defaults::FUNASR_RUNNER, args.join(" "));

        let stdout = self
            .runner
            .run(defaults::FUNASR_RUNNER, &args)
            .map_err(|e| match e {
                ClasscribeError::ToolNotFound { tool } => ClasscribeError::ModelUnavailable {
                    message: format!("{tool} disappeared from PATH"),
                },
                ClasscribeError::ToolFailed { message, .. } => {
                    ClasscribeError::TranscriptionFailed { message }
                }
                other => other,
            })?;

        let entries = parse_raw_json(&stdout)?;
        Ok(parse_raw_result(&entries))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
