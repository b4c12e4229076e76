//! Error types for the edgequake-pdf2tasks library.
//!
//! Every failure in a run is fatal: this is a single-shot batch tool, so
//! [`Pdf2TasksError`] is returned as `Err` from the top-level `extract_tasks*`
//! functions and nothing is recovered locally. [`Pdf2TasksError::kind`]
//! groups the variants into the four operator-facing categories (network,
//! download, extraction, filesystem) plus configuration problems and
//! internal faults.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the edgequake-pdf2tasks library.
#[derive(Debug, Error)]
pub enum Pdf2TasksError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read (a directory, an I/O fault).
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input looked like a URL but could not be parsed as one.
    #[error("Invalid input '{input}': not a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    // ── Network / download errors ─────────────────────────────────────────
    /// Transport-level failure (connection refused, DNS, TLS, broken body).
    #[error("Network error while fetching '{url}': {source}\nCheck your internet connection.")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The final response after redirects was not `200 OK`.
    #[error("Failed to download '{url}': HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    /// The redirect chain exceeded the configured limit.
    #[error("Too many redirects fetching '{url}' (limit {limit})\nThe server may be in a redirect loop.")]
    TooManyRedirects { url: String, limit: usize },

    /// A redirect carried a `Location` header that is not a usable URL.
    #[error("Invalid redirect from '{url}' to '{location}'")]
    InvalidRedirect { url: String, location: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The document bytes do not start with the PDF magic.
    #[error("Document is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { magic: Vec<u8> },

    /// The text extractor rejected the document.
    #[error("Text extraction failed: {detail}")]
    ExtractionFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse failure category, as reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Download,
    Extraction,
    Filesystem,
    Config,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Network => "network error",
            ErrorKind::Download => "download error",
            ErrorKind::Extraction => "extraction error",
            ErrorKind::Filesystem => "filesystem error",
            ErrorKind::Config => "configuration error",
            ErrorKind::Internal => "internal error",
        };
        f.write_str(s)
    }
}

impl Pdf2TasksError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pdf2TasksError::Network { .. } | Pdf2TasksError::DownloadTimeout { .. } => {
                ErrorKind::Network
            }
            Pdf2TasksError::DownloadFailed { .. }
            | Pdf2TasksError::TooManyRedirects { .. }
            | Pdf2TasksError::InvalidRedirect { .. } => ErrorKind::Download,
            Pdf2TasksError::NotAPdf { .. } | Pdf2TasksError::ExtractionFailed { .. } => {
                ErrorKind::Extraction
            }
            Pdf2TasksError::FileNotFound { .. }
            | Pdf2TasksError::PermissionDenied { .. }
            | Pdf2TasksError::ReadFailed { .. }
            | Pdf2TasksError::OutputWriteFailed { .. } => ErrorKind::Filesystem,
            Pdf2TasksError::InvalidInput { .. } | Pdf2TasksError::InvalidConfig(_) => {
                ErrorKind::Config
            }
            Pdf2TasksError::Internal(_) => ErrorKind::Internal,
        }
    }
}
