//! Async Unix socket server for the analysis service.

use crate::error::{ClasscribeError, Result};
use crate::ipc::protocol::{Request, Response};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;

/// Handler trait for processing service requests.
#[async_trait::async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handle a request and return a response.
    async fn handle(&self, request: Request) -> Response;
}

/// Shutdown flag shared between the accept loop and client tasks.
#[derive(Debug, Clone)]
struct ServerState {
    shutdown: Arc<Mutex<bool>>,
}

impl ServerState {
    fn new() -> Self {
        Self {
            shutdown: Arc::new(Mutex::new(false)),
        }
    }

    async fn is_shutdown(&self) -> bool {
        *self.shutdown.lock().await
    }

    async fn set_shutdown(&self) {
        *self.shutdown.lock().await = true;
    }
}

/// Unix socket server dispatching newline-delimited JSON requests.
pub struct IpcServer {
    socket_path: PathBuf,
    state: ServerState,
}

impl IpcServer {
    /// Create a new server bound to the specified socket path.
    pub fn new(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            state: ServerState::new(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Default socket path based on XDG_RUNTIME_DIR or a /tmp fallback.
    pub fn default_socket_path() -> PathBuf {
        if let Ok(xdg_runtime) = std::env::var("XDG_RUNTIME_DIR") {
            PathBuf::from(xdg_runtime).join("classcribe.sock")
        } else {
            let uid = unsafe { libc::getuid() };
            PathBuf::from(format!("/tmp/classcribe-{}.sock", uid))
        }
    }

    /// Accept and serve connections until a Shutdown request arrives.
    ///
    /// Each connection is served on its own task; a failing pipeline run is
    /// reported to that client as `Response::Error` and never tears down the
    /// server.
    pub async fn start<H>(&self, handler: H) -> Result<()>
    where
        H: RequestHandler + 'static,
    {
        // Clean up any stale socket file
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).map_err(|e| ClasscribeError::IpcSocket {
                message: format!("Failed to remove existing socket: {}", e),
            })?;
        }

        let listener =
            UnixListener::bind(&self.socket_path).map_err(|e| ClasscribeError::IpcSocket {
                message: format!("Failed to bind to socket: {}", e),
            })?;

        log::info!("service listening on {}", self.socket_path.display());
        let handler = Arc::new(handler);

        loop {
            if self.state.is_shutdown().await {
                break;
            }

            // Accept with a timeout so the shutdown flag is re-checked
            let accept_result =
                tokio::time::timeout(tokio::time::Duration::from_millis(100), listener.accept())
                    .await;

            match accept_result {
                Ok(Ok((stream, _))) => {
                    let handler = Arc::clone(&handler);
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_client(stream, handler, state).await {
                            log::error!("error handling client: {}", e);
                        }
                    });
                }
                Ok(Err(e)) => {
                    return Err(ClasscribeError::IpcConnection {
                        message: format!("Failed to accept connection: {}", e),
                    });
                }
                Err(_) => {
                    // Timeout, loop to re-check shutdown
                    continue;
                }
            }
        }

        // Remove the socket on clean shutdown
        let _ = std::fs::remove_file(&self.socket_path);
        Ok(())
    }
}

async fn handle_client(
    stream: UnixStream,
    handler: Arc<dyn RequestHandler>,
    state: ServerState,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .await
            .map_err(|e| ClasscribeError::IpcConnection {
                message: format!("Failed to read request: {}", e),
            })?;
        if bytes == 0 {
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match Request::from_json(trimmed) {
            Ok(request) => {
                let is_shutdown = matches!(request, Request::Shutdown);
                let response = handler.handle(request).await;
                if is_shutdown {
                    state.set_shutdown().await;
                }
                response
            }
            Err(e) => Response::Error {
                message: format!("invalid request: {}", e),
            },
        };

        let response_json = response.to_json().map_err(|e| ClasscribeError::IpcProtocol {
            message: format!("Failed to serialize response: {}", e),
        })?;
        writer
            .write_all(response_json.as_bytes())
            .await
            .map_err(|e| ClasscribeError::IpcConnection {
                message: format!("Failed to write response: {}", e),
            })?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| ClasscribeError::IpcConnection {
                message: format!("Failed to write newline: {}", e),
            })?;
        writer
            .flush()
            .await
            .map_err(|e| ClasscribeError::IpcConnection {
                message: format!("Failed to flush writer: {}", e),
            })?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::client::send_request;

    struct EchoHandler;

    #[async_trait::async_trait]
    impl RequestHandler for EchoHandler {
        async fn handle(&self, request: Request) -> Response {
            match request {
                Request::Status => Response::Status {
                    transcriber_model: "mock".to_string(),
                    analyzer_model: "mock".to_string(),
                },
                Request::Shutdown => Response::Ok,
                Request::Analyze { .. } => Response::Error {
                    message: "not wired in this test".to_string(),
                },
            }
        }
    }

    #[tokio::test]
    async fn test_server_answers_status_and_shuts_down() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("test.sock");

        let server = IpcServer::new(socket.clone());
        let server_task = tokio::spawn(async move { server.start(EchoHandler).await });

        // Wait for the socket to appear
        for _ in 0..50 {
            if socket.exists() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        let response = send_request(&socket, Request::Status).await.unwrap();
        assert_eq!(
            response,
            Response::Status {
                transcriber_model: "mock".to_string(),
                analyzer_model: "mock".to_string(),
            }
        );

        let response = send_request(&socket, Request::Shutdown).await.unwrap();
        assert_eq!(response, Response::Ok);

        let result = tokio::time::timeout(
            tokio::time::Duration::from_secs(2),
            server_task,
        )
        .await
        .expect("server should stop after shutdown")
        .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_request_yields_error_response() {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("test.sock");

        let server = IpcServer::new(socket.clone());
        tokio::spawn(async move { server.start(EchoHandler).await });

        for _ in 0..50 {
            if socket.exists() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        let stream = UnixStream::connect(&socket).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        writer.write_all(b"garbage\n").await.unwrap();
        writer.flush().await.unwrap();

        let mut line = String::new();
        BufReader::new(reader).read_line(&mut line).await.unwrap();
        let response = Response::from_json(line.trim()).unwrap();
        assert!(matches!(response, Response::Error { .. }));
    }

    #[test]
    fn test_default_socket_path_mentions_classcribe() {
        let path = IpcServer::default_socket_path();
        assert!(path.to_string_lossy().contains("classcribe"));
    }
}
