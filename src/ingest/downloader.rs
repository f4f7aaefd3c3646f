//! Streamed video download into a run workspace.

use crate::defaults;
use crate::error::{ClasscribeError, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Download a video from `url` to `output`, streaming to disk.
///
/// Creates parent directories as needed. The whole request is bounded by a
/// fixed timeout; a non-success HTTP status, a network error or a timeout
/// all surface as `DownloadFailed`. Never retried.
pub async fn download_video(url: &str, output: &Path, progress: bool) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(defaults::DOWNLOAD_TIMEOUT_SECS))
        .build()
        .map_err(|e| ClasscribeError::DownloadFailed {
            message: format!("failed to build HTTP client: {e}"),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ClasscribeError::DownloadFailed {
            message: format!("request to {url} failed: {e}"),
        })?;

    if !response.status().is_success() {
        return Err(ClasscribeError::DownloadFailed {
            message: format!("{url} answered with status {}", response.status()),
        });
    }

    let total_size = response.content_length().unwrap_or(0);

    let pb = if progress {
        let pb = ProgressBar::new(total_size);
        // Hardcoded template string, always valid
        #[allow(clippy::expect_used)]
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .expect("hardcoded progress bar template")
            .progress_chars("#>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let mut stream = response.bytes_stream();
    let mut file = fs::File::create(output)?;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ClasscribeError::DownloadFailed {
            message: format!("failed to read download chunk: {e}"),
        })?;

        file.write_all(&chunk)?;

        if let Some(ref pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Downloaded");
    }

    Ok(())
}
