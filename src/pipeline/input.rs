//! Input resolution: load the source document from a URL or a local file.
//!
//! Redirects are followed by hand rather than by reqwest's built-in policy:
//! every 3xx carrying a `Location` header is another hop, relative locations
//! resolve against the URL that produced them, and the hop count is capped
//! by [`ExtractionConfig::max_redirects`]. Only a terminal `200 OK` counts as
//! success. Nothing is retried.

use crate::config::ExtractionConfig;
use crate::error::Pdf2TasksError;
use reqwest::header::LOCATION;
use reqwest::{StatusCode, Url};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Load the raw document bytes for `input`.
///
/// URLs are downloaded with [`fetch_url`]; anything else is read from disk.
pub async fn load_document(
    input: &str,
    config: &ExtractionConfig,
) -> Result<Vec<u8>, Pdf2TasksError> {
    if is_url(input) {
        fetch_url(input, config).await
    } else {
        read_local(input).await
    }
}

/// Read a local file, mapping I/O failures to the filesystem error variants.
async fn read_local(path_str: &str) -> Result<Vec<u8>, Pdf2TasksError> {
    let path = PathBuf::from(path_str);

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!("Read local document: {} ({} bytes)", path.display(), bytes.len());
            Ok(bytes)
        }
        Err(e) => Err(read_error(path, e)),
    }
}

fn read_error(path: PathBuf, e: io::Error) -> Pdf2TasksError {
    match e.kind() {
        io::ErrorKind::NotFound => Pdf2TasksError::FileNotFound { path },
        io::ErrorKind::PermissionDenied => Pdf2TasksError::PermissionDenied { path },
        _ => Pdf2TasksError::ReadFailed { path, source: e },
    }
}

/// Download `url`, following redirects, and return the final body.
pub async fn fetch_url(url: &str, config: &ExtractionConfig) -> Result<Vec<u8>, Pdf2TasksError> {
    info!("Downloading PDF from: {}", url);

    let mut current = Url::parse(url).map_err(|_| Pdf2TasksError::InvalidInput {
        input: url.to_string(),
    })?;

    let mut builder = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::none());
    if let Some(secs) = config.download_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder
        .build()
        .map_err(|e| Pdf2TasksError::Internal(format!("HTTP client: {e}")))?;

    let mut hops = 0usize;
    loop {
        let response = client
            .get(current.clone())
            .send()
            .await
            .map_err(|e| transport_error(&current, e, config))?;

        let status = response.status();
        if status.is_redirection() {
            if let Some(location) = response.headers().get(LOCATION) {
                if hops >= config.max_redirects {
                    return Err(Pdf2TasksError::TooManyRedirects {
                        url: url.to_string(),
                        limit: config.max_redirects,
                    });
                }
                let invalid = || Pdf2TasksError::InvalidRedirect {
                    url: current.to_string(),
                    location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
                };
                let target = location.to_str().map_err(|_| invalid())?;
                let next = current.join(target).map_err(|_| invalid())?;

                debug!("HTTP {} redirect: {} -> {}", status.as_u16(), current, next);
                hops += 1;
                current = next;
                continue;
            }
        }

        if status != StatusCode::OK {
            return Err(Pdf2TasksError::DownloadFailed {
                url: current.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(&current, e, config))?;

        info!("Downloaded {} bytes from {}", bytes.len(), current);
        return Ok(bytes.to_vec());
    }
}

fn transport_error(url: &Url, e: reqwest::Error, config: &ExtractionConfig) -> Pdf2TasksError {
    match config.download_timeout_secs {
        Some(secs) if e.is_timeout() => Pdf2TasksError::DownloadTimeout {
            url: url.to_string(),
            secs,
        },
        _ => Pdf2TasksError::Network {
            url: url.to_string(),
            source: e,
        },
    }
}
