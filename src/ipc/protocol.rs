//! JSON message protocol between clients and the analysis service.

use crate::transcript::Utterance;
use serde::{Deserialize, Serialize};

/// Requests sent by clients to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Run the full pipeline on a local file or a remote URL.
    ///
    /// Exactly one of `video_path` / `video_url` must be set.
    Analyze {
        #[serde(default)]
        video_path: Option<String>,
        #[serde(default)]
        video_url: Option<String>,
    },
    /// Get service status
    Status,
    /// Shut down the service
    Shutdown,
}

/// One utterance as carried on the wire.
pub type UtteranceView = Utterance;

/// Responses sent by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Command succeeded with no payload
    Ok,
    /// A completed pipeline run
    Analysis {
        utterances: Vec<UtteranceView>,
        analysis: String,
        report: String,
        audio_path: String,
        transcript_path: String,
        report_path: String,
    },
    /// Current service status
    Status {
        transcriber_model: String,
        analyzer_model: String,
    },
    /// Error occurred; the service stays up
    Error { message: String },
}

impl Request {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl Response {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_request_round_trip() {
        let request = Request::Analyze {
            video_path: Some("/videos/lesson.mp4".to_string()),
            video_url: None,
        };
        let json = request.to_json().unwrap();
        assert_eq!(Request::from_json(&json).unwrap(), request);
    }

    #[test]
    fn test_analyze_request_wire_format() {
        let request = Request::Analyze {
            video_path: None,
            video_url: Some("http://example.com/v.mp4".to_string()),
        };
        let json = request.to_json().unwrap();
        assert!(json.contains(r#""type":"analyze""#));
        assert!(json.contains(r#""video_url":"http://example.com/v.mp4""#));
    }

    #[test]
    fn test_analyze_request_defaults_missing_fields() {
        let request = Request::from_json(r#"{"type":"analyze"}"#).unwrap();
        assert_eq!(
            request,
            Request::Analyze {
                video_path: None,
                video_url: None,
            }
        );
    }

    #[test]
    fn test_status_and_shutdown_round_trip() {
        for request in [Request::Status, Request::Shutdown] {
            let json = request.to_json().unwrap();
            assert_eq!(Request::from_json(&json).unwrap(), request);
        }
    }

    #[test]
    fn test_error_response_round_trip() {
        let response = Response::Error {
            message: "transcribe stage failed: boom".to_string(),
        };
        let json = response.to_json().unwrap();
        assert_eq!(Response::from_json(&json).unwrap(), response);
    }

    #[test]
    fn test_analysis_response_round_trip() {
        let response = Response::Analysis {
            utterances: vec![Utterance {
                speaker: "S1".to_string(),
                start: 0.0,
                end: 3.2,
                text: "大家早上好".to_string(),
            }],
            analysis: "report body".to_string(),
            report: "# 报告".to_string(),
            audio_path: "/a/audio.wav".to_string(),
            transcript_path: "/a/transcript.json".to_string(),
            report_path: "/a/report.md".to_string(),
        };
        let json = response.to_json().unwrap();
        assert_eq!(Response::from_json(&json).unwrap(), response);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(Request::from_json("not json").is_err());
        assert!(Response::from_json("{}").is_err());
    }
}
