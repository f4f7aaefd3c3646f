//! Audio extraction stage: invokes ffmpeg to produce a PCM audio artifact.

use crate::defaults;
use crate::error::{ClasscribeError, Result};
use crate::tool::ToolRunner;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Extracts a mono/stereo PCM WAV track from a source video via ffmpeg.
///
/// Extraction is deterministic given the same binary and input, so failures
/// are surfaced immediately and never retried.
pub struct AudioExtractor {
    runner: Arc<dyn ToolRunner>,
}

impl AudioExtractor {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self { runner }
    }

    /// Extract audio from `video` into a PCM s16le WAV file at `output`.
    ///
    /// Creates parent directories of `output` as needed.
    ///
    /// # Errors
    /// - `ConfigInvalidValue` if `sample_rate` is zero or `channels` is not 1 or 2
    /// - `ToolNotFound` if the ffmpeg binary cannot be located
    /// - `ExtractionFailed` carrying ffmpeg's stderr if conversion exits non-zero
    pub fn extract(
        &self,
        video: &Path,
        output: &Path,
        sample_rate: u32,
        channels: u16,
    ) -> Result<()> {
        if sample_rate == 0 {
            return Err(ClasscribeError::ConfigInvalidValue {
                key: "ffmpeg.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if channels != 1 && channels != 2 {
            return Err(ClasscribeError::ConfigInvalidValue {
                key: "ffmpeg.channels".to_string(),
                message: format!("must be 1 or 2, got {channels}"),
            });
        }

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }

        let video_arg = video.display().to_string();
        let output_arg = output.display().to_string();
        let channels_arg = channels.to_string();
        let rate_arg = sample_rate.to_string();

        let args = [
            "-y",
            "-i",
            video_arg.as_str(),
            "-vn",
            "-acodec",
            "pcm_s16le",
            "-ac",
            channels_arg.as_str(),
            "-ar",
            rate_arg.as_str(),
            output_arg.as_str(),
        ];

        log::debug!("running {} {}", defaults::FFMPEG_TOOL, args.join(" "));

        self.runner
            .run(defaults::FFMPEG_TOOL, &args)
            .map_err(|e| match e {
                // Missing binary keeps its identity; everything else is an
                // extraction failure carrying the tool's diagnostics.
                ClasscribeError::ToolNotFound { .. } => e,
                ClasscribeError::ToolFailed { message, .. } => {
                    ClasscribeError::ExtractionFailed { message }
                }
                other => other,
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records invocations and optionally writes the output file like ffmpeg would.
    struct RecordingRunner {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        fail_with: Option<ClasscribeError>,
    }

    impl RecordingRunner {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(error: ClasscribeError) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: Some(error),
            }
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, tool: &str, args: &[&str]) -> Result<String> {
            self.calls.lock().unwrap().push((
                tool.to_string(),
                args.iter().map(|s| s.to_string()).collect(),
            ));
            match &self.fail_with {
                Some(ClasscribeError::ToolNotFound { tool }) => {
                    Err(ClasscribeError::ToolNotFound { tool: tool.clone() })
                }
                Some(ClasscribeError::ToolFailed { tool, message }) => {
                    Err(ClasscribeError::ToolFailed {
                        tool: tool.clone(),
                        message: message.clone(),
                    })
                }
                Some(_) | None => Ok(String::new()),
            }
        }
    }

    #[test]
    fn test_extract_builds_expected_ffmpeg_invocation() {
        let runner = Arc::new(RecordingRunner::new());
        let extractor = AudioExtractor::new(runner.clone());

        extractor
            .extract(
                Path::new("/videos/lesson.mp4"),
                Path::new("/tmp/classcribe-test/audio.wav"),
                16000,
                1,
            )
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (tool, args) = &calls[0];
        assert_eq!(tool, "ffmpeg");
        assert_eq!(
            args,
            &vec![
                "-y".to_string(),
                "-i".to_string(),
                "/videos/lesson.mp4".to_string(),
                "-vn".to_string(),
                "-acodec".to_string(),
                "pcm_s16le".to_string(),
                "-ac".to_string(),
                "1".to_string(),
                "-ar".to_string(),
                "16000".to_string(),
                "/tmp/classcribe-test/audio.wav".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("deep").join("audio.wav");
        let extractor = AudioExtractor::new(Arc::new(RecordingRunner::new()));

        extractor
            .extract(Path::new("in.mp4"), &output, 16000, 2)
            .unwrap();

        assert!(output.parent().unwrap().is_dir());
    }

    #[test]
    fn test_extract_rejects_invalid_channels() {
        let runner = Arc::new(RecordingRunner::new());
        let extractor = AudioExtractor::new(runner.clone());

        let result = extractor.extract(Path::new("in.mp4"), Path::new("out.wav"), 16000, 3);

        assert!(matches!(
            result,
            Err(ClasscribeError::ConfigInvalidValue { .. })
        ));
        // ffmpeg must not be invoked for invalid parameters
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_extract_rejects_zero_sample_rate() {
        let extractor = AudioExtractor::new(Arc::new(RecordingRunner::new()));
        let result = extractor.extract(Path::new("in.mp4"), Path::new("out.wav"), 0, 1);
        assert!(matches!(
            result,
            Err(ClasscribeError::ConfigInvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_ffmpeg_keeps_tool_not_found() {
        let runner = Arc::new(RecordingRunner::failing(ClasscribeError::ToolNotFound {
            tool: "ffmpeg".to_string(),
        }));
        let extractor = AudioExtractor::new(runner);

        let result = extractor.extract(Path::new("in.mp4"), Path::new("out.wav"), 16000, 1);
        match result {
            Err(ClasscribeError::ToolNotFound { tool }) => assert_eq!(tool, "ffmpeg"),
            other => panic!("expected ToolNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_conversion_failure_carries_stderr() {
        let runner = Arc::new(RecordingRunner::failing(ClasscribeError::ToolFailed {
            tool: "ffmpeg".to_string(),
            message: "moov atom not found".to_string(),
        }));
        let extractor = AudioExtractor::new(runner);

        let result = extractor.extract(Path::new("in.mp4"), Path::new("out.wav"), 16000, 1);
        match result {
            Err(ClasscribeError::ExtractionFailed { message }) => {
                assert_eq!(message, "moov atom not found");
            }
            other => panic!("expected ExtractionFailed, got {:?}", other),
        }
    }
}
