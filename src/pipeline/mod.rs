//! Pipeline orchestration: per-run workspaces and fail-fast stage composition.

pub mod orchestrator;
pub mod workspace;

pub use orchestrator::{Pipeline, RunError, RunResult, Stage, VideoSource};
pub use workspace::RunWorkspace;
