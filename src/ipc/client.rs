//! Client side of the Unix socket protocol.

use crate::error::{ClasscribeError, Result};
use crate::ipc::protocol::{Request, Response};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

/// Send a single request to a running service and wait for the response.
pub async fn send_request(socket_path: &Path, request: Request) -> Result<Response> {
    let stream =
        UnixStream::connect(socket_path)
            .await
            .map_err(|e| ClasscribeError::IpcConnection {
                message: format!(
                    "Failed to connect to {}: {}. Is the service running?",
                    socket_path.display(),
                    e
                ),
            })?;

    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    let request_json = request
        .to_json()
        .map_err(|e| ClasscribeError::IpcProtocol {
            message: format!("Failed to serialize request: {}", e),
        })?;

    writer
        .write_all(request_json.as_bytes())
        .await
        .map_err(|e| ClasscribeError::IpcConnection {
            message: format!("Failed to send request: {}", e),
        })?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| ClasscribeError::IpcConnection {
            message: format!("Failed to send newline: {}", e),
        })?;
    writer
        .flush()
        .await
        .map_err(|e| ClasscribeError::IpcConnection {
            message: format!("Failed to flush request: {}", e),
        })?;

    let mut line = String::new();
    reader
        .read_line(&mut line)
        .await
        .map_err(|e| ClasscribeError::IpcConnection {
            message: format!("Failed to read response: {}", e),
        })?;

    Response::from_json(line.trim()).map_err(|e| ClasscribeError::IpcProtocol {
        message: format!("Failed to parse response: {}", e),
    })
}
