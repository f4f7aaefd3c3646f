//! External tool invocation with a testable execution seam.
//!
//! Both pipeline stages that shell out (audio extraction via ffmpeg, speech
//! recognition via the FunASR runner) go through the `ToolRunner` trait, so
//! tests can substitute a mock without any external binaries installed.

use crate::error::{ClasscribeError, Result};
use std::process::Command;

/// Trait for running external tools.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
pub trait ToolRunner: Send + Sync {
    /// Run a tool with arguments and wait for it to exit.
    ///
    /// Returns the tool's stdout on success. A tool that cannot be located
    /// yields `ToolNotFound`; a non-zero exit yields `ToolFailed` carrying
    /// the tool's stderr.
    fn run(&self, tool: &str, args: &[&str]) -> Result<String>;
}

/// Production tool runner using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemToolRunner;

impl SystemToolRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for SystemToolRunner {
    fn run(&self, tool: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(tool).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ClasscribeError::ToolNotFound {
                    tool: tool.to_string(),
                }
            } else {
                ClasscribeError::ToolFailed {
                    tool: tool.to_string(),
                    message: format!("failed to start: {e}"),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClasscribeError::ToolFailed {
                tool: tool.to_string(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
