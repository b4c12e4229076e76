//! Top-level extraction entry points.
//!
//! The run is strictly sequential and holds the whole document in memory:
//! load → extract text → normalise → split pages → segment and aggregate.
//! Output files are written once, after everything else has succeeded, via
//! a temp file and a rename, so a failed run never leaves a partial file.

use crate::config::ExtractionConfig;
use crate::error::Pdf2TasksError;
use crate::output::{ExtractionOutput, ExtractionStats, TaskRecord};
use crate::pipeline::extract::{self, PdfExtractor, TextExtractor};
use crate::pipeline::{aggregate, input, normalise, pages, segment::TaskSegmenter};
use crate::serialize::OutputFormat;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Extract tasks from a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`  — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Extraction configuration
///
/// # Errors
/// Any download, extraction or configuration failure.
pub async fn extract_tasks(
    input: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TasksError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    info!("Starting extraction: {}", input);

    if let Some(ref cb) = config.progress_callback {
        cb.on_download_start(input);
    }
    let bytes = input::load_document(input, config).await?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_download_complete(bytes.len());
    }

    let mut output = extract_from_bytes(bytes, config).await?;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Extract tasks from PDF bytes already in memory.
pub async fn extract_tasks_from_bytes(
    bytes: Vec<u8>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TasksError> {
    let start = Instant::now();
    let mut output = extract_from_bytes(bytes, config).await?;
    output.stats.total_duration_ms = start.elapsed().as_millis() as u64;
    Ok(output)
}

async fn extract_from_bytes(
    bytes: Vec<u8>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TasksError> {
    let document_bytes = bytes.len();
    let extractor: Arc<dyn TextExtractor> = match config.extractor {
        Some(ref e) => Arc::clone(e),
        None => Arc::new(PdfExtractor),
    };

    let text = extract::extract_text(extractor, bytes).await?;
    let mut output = extract_tasks_from_text(&text, config)?;
    output.stats.document_bytes = document_bytes;
    Ok(output)
}

/// Segment already-extracted document text.
///
/// Runs normalisation, page splitting and aggregation; no I/O.
pub fn extract_tasks_from_text(
    text: &str,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TasksError> {
    let start = Instant::now();
    let segmenter = TaskSegmenter::new(&config.keywords)?;
    let progress = config.progress_callback.as_deref();

    let text = normalise::normalise_text(text);
    let text_chars = text.chars().count();
    if let Some(cb) = progress {
        cb.on_text_extracted(text_chars);
    }

    let pages = pages::split_pages(&text);
    let total_pages = pages.len();
    info!("Document split into {} pages", total_pages);
    if let Some(cb) = progress {
        cb.on_pages_split(total_pages);
    }

    let tasks = aggregate::aggregate(&pages, &segmenter, &config.pages, progress);
    if let Some(cb) = progress {
        cb.on_extraction_complete(tasks.len());
    }

    let pages_with_tasks = tasks.iter().map(|t| t.page).collect::<BTreeSet<_>>().len();
    let stats = ExtractionStats {
        total_pages,
        selected_pages: config.pages.count(total_pages),
        pages_with_tasks,
        total_tasks: tasks.len(),
        document_bytes: 0,
        text_chars,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {} tasks on {}/{} pages",
        stats.total_tasks, stats.pages_with_tasks, stats.total_pages
    );

    Ok(ExtractionOutput { tasks, stats })
}

/// Extract tasks and write them to `output_path` in `format`.
///
/// Parent directories are created as needed.
pub async fn extract_tasks_to_file(
    input: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    format: OutputFormat,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, Pdf2TasksError> {
    let output = extract_tasks(input, config).await?;
    write_tasks(&output.tasks, output_path, format).await?;
    Ok(output.stats)
}

/// Render `tasks` and write them atomically (temp file + rename).
pub async fn write_tasks(
    tasks: &[TaskRecord],
    output_path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<(), Pdf2TasksError> {
    let path = output_path.as_ref();
    let rendered = format.render(tasks)?;
    let write_failed = |source| Pdf2TasksError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, rendered)
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(write_failed)?;

    info!("Wrote {} tasks to {}", tasks.len(), path.display());
    Ok(())
}

/// Resolve `out` against `base_dir` unless it is already absolute.
pub fn resolve_output_path(out: impl AsRef<Path>, base_dir: impl AsRef<Path>) -> PathBuf {
    let out = out.as_ref();
    if out.is_absolute() {
        out.to_path_buf()
    } else {
        base_dir.as_ref().join(out)
    }
}

/// Synchronous wrapper around [`extract_tasks`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_tasks_sync(
    input: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Pdf2TasksError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Pdf2TasksError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract_tasks(input, config))
}
