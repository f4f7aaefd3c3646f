//! Command-line interface for classcribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Classroom video analysis: transcription, diarization and report synthesis
#[derive(Parser, Debug)]
#[command(
    name = "classcribe",
    version,
    about = "Turn classroom videos into verbal interaction reports"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Local video file to analyze
    #[arg(long, value_name = "PATH", conflicts_with = "video_url")]
    pub video: Option<PathBuf>,

    /// Remote video URL to download and analyze
    #[arg(long, value_name = "URL")]
    pub video_url: Option<String>,

    /// Directory run workspaces are created under
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the analysis service (foreground process for systemd)
    Serve {
        /// Path to Unix socket (default: $XDG_RUNTIME_DIR/classcribe.sock)
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
    },

    /// Send a request to a running service
    Request {
        /// Path to Unix socket (default: $XDG_RUNTIME_DIR/classcribe.sock)
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,

        /// Local video file to analyze
        #[arg(long, value_name = "PATH", conflicts_with = "video_url")]
        video: Option<PathBuf>,

        /// Remote video URL to download and analyze
        #[arg(long, value_name = "URL")]
        video_url: Option<String>,
    },

    /// Get service status
    Status {
        /// Path to Unix socket (default: $XDG_RUNTIME_DIR/classcribe.sock)
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
    },

    /// Shut down a running service
    Shutdown {
        /// Path to Unix socket (default: $XDG_RUNTIME_DIR/classcribe.sock)
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,
    },

    /// Check system dependencies
    Check,

    /// View and manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init,
    /// Print the effective configuration
    Show,
    /// Print the default configuration file path
    Path,
}
