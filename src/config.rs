//! Run configuration loaded once before the pipeline starts.
//!
//! The configuration document is TOML with four key groups mirroring the
//! pipeline stages: `ffmpeg` (audio extraction), `funasr` (transcription),
//! `gemini` (analysis) and `output`. The loaded `Config` is immutable for
//! the lifetime of a run and safe to share across concurrent runs.

use crate::defaults;
use crate::error::{ClasscribeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure.
///
/// The `ffmpeg` section is required: a document without it (or without its
/// numeric fields) fails to parse. The remaining sections fall back to
/// defaults when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub ffmpeg: FfmpegConfig,
    #[serde(default)]
    pub funasr: FunasrConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Audio extraction configuration.
///
/// Both fields are required in the document; missing values are a hard
/// configuration error, not silently defaulted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FfmpegConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Transcription stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FunasrConfig {
    /// Language code ("zh" or "en"); resolved to a model when `model` is unset
    pub language: Option<String>,
    /// Explicit model identifier; takes precedence over `language`
    pub model: Option<String>,
    pub vad_model: Option<String>,
    pub punc_model: Option<String>,
    pub spk_model: Option<String>,
    /// Inference device hint passed through to the runner
    pub device: String,
    /// Explicit opt-in to the deterministic mock transcriber
    pub use_mock: bool,
    /// Optional hotword boost passed through to the runner
    pub hotword: Option<String>,
}

/// Analysis stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiConfig {
    /// When false the analysis stage returns a fixed mock result and makes
    /// no network call
    pub enabled: bool,
    pub model: String,
    /// Optional prompt template prepended to the serialized transcript
    pub prompt_path: Option<PathBuf>,
    /// API credential, injected at load time (see `with_env_overrides`).
    /// Never written back out when serializing a config.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory under which per-run workspaces are created
    pub workdir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ffmpeg: FfmpegConfig::default(),
            funasr: FunasrConfig::default(),
            gemini: GeminiConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            channels: defaults::CHANNELS,
        }
    }
}

impl Default for FunasrConfig {
    fn default() -> Self {
        Self {
            language: None,
            model: None,
            vad_model: None,
            punc_model: None,
            spk_model: None,
            device: defaults::DEVICE.to_string(),
            use_mock: false,
            hotword: None,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: defaults::GEMINI_MODEL.to_string(),
            prompt_path: None,
            api_key: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from(defaults::WORKDIR),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    ///
    /// A document missing the `ffmpeg` section or its numeric fields fails
    /// here, before any pipeline stage executes.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ClasscribeError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ClasscribeError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if the file is missing.
    ///
    /// Only a missing file yields defaults; parse and validation errors
    /// propagate.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ClasscribeError::ConfigFileNotFound { .. }) => {
                log::warn!(
                    "config file not found at {}, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported environment variables:
    /// - GEMINI_API_KEY → gemini.api_key
    /// - CLASSCRIBE_WORKDIR → output.workdir
    ///
    /// The credential is injected here so the analysis stage never reads the
    /// environment itself.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(defaults::GEMINI_API_KEY_ENV)
            && !key.is_empty()
        {
            self.gemini.api_key = Some(key);
        }

        if let Ok(workdir) = std::env::var("CLASSCRIBE_WORKDIR")
            && !workdir.is_empty()
        {
            self.output.workdir = PathBuf::from(workdir);
        }

        self
    }

    /// Validate structural constraints on numeric fields.
    fn validate(&self) -> Result<()> {
        if self.ffmpeg.sample_rate == 0 {
            return Err(ClasscribeError::ConfigInvalidValue {
                key: "ffmpeg.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.ffmpeg.channels != 1 && self.ffmpeg.channels != 2 {
            return Err(ClasscribeError::ConfigInvalidValue {
                key: "ffmpeg.channels".to_string(),
                message: format!("must be 1 or 2, got {}", self.ffmpeg.channels),
            });
        }
        Ok(())
    }

    /// Write the default configuration to a file.
    ///
    /// Overwrites an existing file.
    pub fn write_default(path: &Path) -> Result<()> {
        let config = Config::default();
        let contents = toml::to_string_pretty(&config).map_err(|e| {
            ClasscribeError::ConfigInvalidValue {
                key: "<document>".to_string(),
                message: format!("failed to serialize defaults: {e}"),
            }
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    /// Default configuration file path, relative to the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("configs/pipeline.toml")
    }
}
