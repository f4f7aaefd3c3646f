//! System diagnostics and dependency checking.
//!
//! Verifies that the external collaborators (ffmpeg, the FunASR runner) are
//! installed before a real-mode run is attempted.

use crate::defaults;
use std::process::Command;

/// Result of a dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Tool is installed and working
    Ok,
    /// Tool is not found
    NotFound,
    /// Tool is found but has issues
    Warning(String),
}

/// Check if a command exists and is executable.
///
/// `version_arg` is the flag that makes the tool print its version and exit
/// zero (`-version` for ffmpeg, `--version` for most others).
pub fn check_command(command: &str, version_arg: &str) -> CheckResult {
    match Command::new(command).arg(version_arg).output() {
        Ok(output) if output.status.success() => CheckResult::Ok,
        Ok(_) => CheckResult::Warning(format!("'{}' found but {} failed", command, version_arg)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", command, e)),
    }
}

/// Check whether a command can be resolved at all.
pub fn command_available(command: &str, version_arg: &str) -> bool {
    !matches!(check_command(command, version_arg), CheckResult::NotFound)
}

/// Check whether the FunASR runner is resolvable on this machine.
///
/// Used by transcriber construction: real mode refuses to start without it.
pub fn funasr_runner_available() -> bool {
    command_available(defaults::FUNASR_RUNNER, "--version")
}

/// Run all dependency checks and print results.
pub fn check_dependencies() {
    println!("Checking external dependencies...\n");

    print!("ffmpeg (audio extraction): ");
    match check_command(defaults::FFMPEG_TOOL, "-version") {
        CheckResult::Ok => println!("✓ OK"),
        CheckResult::NotFound => {
            println!("✗ NOT FOUND");
            println!("  Install ffmpeg:");
            println!("    Ubuntu/Debian: sudo apt install ffmpeg");
            println!("    Arch: sudo pacman -S ffmpeg");
            println!("    macOS: brew install ffmpeg");
        }
        CheckResult::Warning(msg) => println!("⚠ WARNING: {}", msg),
    }

    print!("funasr-runner (speech recognition): ");
    match check_command(defaults::FUNASR_RUNNER, "--version") {
        CheckResult::Ok => println!("✓ OK"),
        CheckResult::NotFound => {
            println!("✗ NOT FOUND");
            println!("  Install the FunASR runner, or set funasr.use_mock = true");
            println!("  to develop without the speech runtime.");
        }
        CheckResult::Warning(msg) => println!("⚠ WARNING: {}", msg),
    }

    println!();
    println!("Gemini analysis runs only when gemini.enabled = true and");
    println!("GEMINI_API_KEY is set; otherwise a mock report is produced.");
}
