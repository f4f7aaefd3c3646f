//! Long-running analysis service over the Unix socket protocol.

use crate::config::Config;
use crate::error::Result;
use crate::ipc::{IpcServer, Request, RequestHandler, Response};
use crate::pipeline::{Pipeline, VideoSource};
use std::path::PathBuf;
use std::sync::Arc;

/// Dispatches service requests onto a shared pipeline.
///
/// The pipeline is immutable and each analyze request gets its own
/// workspace, so concurrent requests are served without coordination.
pub struct AnalyzeHandler {
    pipeline: Arc<Pipeline>,
    quiet: bool,
}

impl AnalyzeHandler {
    pub fn new(pipeline: Arc<Pipeline>, quiet: bool) -> Self {
        Self { pipeline, quiet }
    }

    async fn analyze(&self, video_path: Option<String>, video_url: Option<String>) -> Response {
        let source = match (video_path, video_url) {
            (Some(path), None) => VideoSource::Local(PathBuf::from(path)),
            (None, Some(url)) => VideoSource::Url(url),
            (Some(_), Some(_)) => {
                return Response::Error {
                    message: "provide either video_path or video_url, not both".to_string(),
                };
            }
            (None, None) => {
                return Response::Error {
                    message: "provide one of video_path or video_url".to_string(),
                };
            }
        };

        match self.pipeline.run(&source, self.quiet).await {
            Ok(result) => Response::Analysis {
                utterances: result.utterances,
                analysis: result.analysis.report,
                report: result.report,
                audio_path: result.audio_path.display().to_string(),
                transcript_path: result.transcript_path.display().to_string(),
                report_path: result.report_path.display().to_string(),
            },
            Err(e) => {
                log::error!("analysis request failed: {}", e);
                Response::Error {
                    message: e.to_string(),
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl RequestHandler for AnalyzeHandler {
    async fn handle(&self, request: Request) -> Response {
        match request {
            Request::Analyze {
                video_path,
                video_url,
            } => self.analyze(video_path, video_url).await,
            Request::Status => Response::Status {
                transcriber_model: self.pipeline.transcriber_model().to_string(),
                analyzer_model: self.pipeline.analyzer_model().to_string(),
            },
            Request::Shutdown => {
                log::info!("shutdown requested");
                Response::Ok
            }
        }
    }
}

/// Start the service and block until it is shut down.
pub async fn run_serve(config: Config, socket_path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let pipeline = Arc::new(Pipeline::new(config)?);
    let socket_path = socket_path.unwrap_or_else(IpcServer::default_socket_path);

    log::info!(
        "transcriber: {}, analyzer: {}",
        pipeline.transcriber_model(),
        pipeline.analyzer_model()
    );

    let server = IpcServer::new(socket_path);
    server.start(AnalyzeHandler::new(pipeline, quiet)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ClasscribeError;
    use crate::tool::ToolRunner;
    use std::path::Path;
    use std::sync::Arc;

    struct FakeFfmpeg;

    impl ToolRunner for FakeFfmpeg {
        fn run(&self, _tool: &str, args: &[&str]) -> crate::error::Result<String> {
            if let Some(output) = args.last() {
                std::fs::write(output, b"RIFF").map_err(ClasscribeError::Io)?;
            }
            Ok(String::new())
        }
    }

    fn mock_pipeline(workdir: &Path) -> Pipeline {
        let mut config = Config::default();
        config.funasr.use_mock = true;
        config.output.workdir = workdir.to_path_buf();
        let transcriber = crate::asr::build_transcriber(&config.funasr).unwrap();
        let analyzer = crate::analysis::build_analyzer(&config.gemini).unwrap();
        Pipeline::with_providers(config, Arc::new(FakeFfmpeg), transcriber, analyzer)
    }

    #[tokio::test]
    async fn test_analyze_rejects_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let handler = AnalyzeHandler::new(Arc::new(mock_pipeline(dir.path())), true);

        let response = handler
            .handle(Request::Analyze {
                video_path: None,
                video_url: None,
            })
            .await;
        assert!(matches!(response, Response::Error { .. }));
    }

    #[tokio::test]
    async fn test_analyze_rejects_both_sources() {
        let dir = tempfile::tempdir().unwrap();
        let handler = AnalyzeHandler::new(Arc::new(mock_pipeline(dir.path())), true);

        let response = handler
            .handle(Request::Analyze {
                video_path: Some("/v.mp4".to_string()),
                video_url: Some("http://example.com/v.mp4".to_string()),
            })
            .await;
        assert!(matches!(response, Response::Error { .. }));
    }

    #[tokio::test]
    async fn test_analyze_runs_pipeline_on_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("lesson.mp4");
        std::fs::write(&video, b"fake video").unwrap();

        let handler = AnalyzeHandler::new(Arc::new(mock_pipeline(dir.path())), true);
        let response = handler
            .handle(Request::Analyze {
                video_path: Some(video.display().to_string()),
                video_url: None,
            })
            .await;

        match response {
            Response::Analysis {
                utterances,
                report,
                report_path,
                ..
            } => {
                assert_eq!(utterances.len(), 3);
                assert!(report.starts_with("# 课堂语音分析报告"));
                assert!(Path::new(&report_path).is_file());
            }
            other => panic!("expected analysis response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_analyze_reports_run_failure_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let handler = AnalyzeHandler::new(Arc::new(mock_pipeline(dir.path())), true);

        let response = handler
            .handle(Request::Analyze {
                video_path: Some(dir.path().join("missing.mp4").display().to_string()),
                video_url: None,
            })
            .await;
        match response {
            Response::Error { message } => {
                assert!(message.contains("acquire-input"));
            }
            other => panic!("expected error response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_status_reports_models() {
        let dir = tempfile::tempdir().unwrap();
        let handler = AnalyzeHandler::new(Arc::new(mock_pipeline(dir.path())), true);

        let response = handler.handle(Request::Status).await;
        assert_eq!(
            response,
            Response::Status {
                transcriber_model: "mock".to_string(),
                analyzer_model: "mock".to_string(),
            }
        );
    }
}
