//! Error types for classcribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClasscribeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // Input acquisition errors
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Download failed: {message}")]
    DownloadFailed { message: String },

    // External tool errors
    #[error("Required tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    // Audio extraction errors
    #[error("Audio extraction failed: {message}")]
    ExtractionFailed { message: String },

    // Transcription errors
    #[error("Speech model unavailable: {message}")]
    ModelUnavailable { message: String },

    #[error("Unsupported language '{language}'. Only zh/en are supported")]
    UnsupportedLanguage { language: String },

    #[error("Transcription failed: {message}")]
    TranscriptionFailed { message: String },

    // Analysis errors
    #[error("Analysis credential missing: {variable} is not set")]
    CredentialMissing { variable: String },

    #[error("Analysis runtime unavailable: {message}")]
    AnalysisRuntimeUnavailable { message: String },

    #[error("Analysis failed: {message}")]
    AnalysisFailed { message: String },

    // IPC errors
    #[error("IPC socket error: {message}")]
    IpcSocket { message: String },

    #[error("IPC protocol error: {message}")]
    IpcProtocol { message: String },

    #[error("IPC connection failed: {message}")]
    IpcConnection { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ClasscribeError>;
