//! # edgequake-pdf2tasks
//!
//! Extract numbered exercises from textbook PDFs into JSON or CSV.
//!
//! A textbook's extracted text is an undifferentiated stream of lines. This
//! crate cuts it into pages, recognises the lines that open an exercise
//! (`Вправа 12`, `3) `, `№ 145`, …), and emits one record per exercise with
//! its page, its position on the page, its number and its raw text.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      download from URL (bounded redirects) or read local file
//!  ├─ 2. Extract    PDF → text via pdf-extract (spawn_blocking)
//!  ├─ 3. Normalise  line endings, invisible characters
//!  ├─ 4. Pages      split on form feeds / runs of blank lines
//!  ├─ 5. Segment    marker-line state machine, per page
//!  ├─ 6. Aggregate  assign page numbers and per-page indices
//!  └─ 7. Output     JSON or CSV, written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2tasks::{extract_tasks_to_file, ExtractionConfig, OutputFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let stats = extract_tasks_to_file(
//!         "https://example.org/algebra-7.pdf",
//!         "out/tasks.csv",
//!         OutputFormat::Csv,
//!         &config,
//!     )
//!     .await?;
//!     eprintln!("{} tasks on {} pages", stats.total_tasks, stats.total_pages);
//!     Ok(())
//! }
//! ```
//!
//! The segmentation is a heuristic: it recognises a fixed set of marker
//! styles and nothing else. See [`pipeline::segment`] for the exact rules.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2tasks` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod serialize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ExtractionConfig, ExtractionConfigBuilder, PageFilter, DEFAULT_KEYWORDS,
    DEFAULT_MAX_REDIRECTS, DEFAULT_OUTPUT_PATH, DEFAULT_SOURCE_URL,
};
pub use convert::{
    extract_tasks, extract_tasks_from_bytes, extract_tasks_from_text, extract_tasks_sync,
    extract_tasks_to_file, resolve_output_path, write_tasks,
};
pub use error::{ErrorKind, Pdf2TasksError};
pub use output::{ExtractionOutput, ExtractionStats, SegmentedTask, TaskRecord};
pub use pipeline::extract::{PdfExtractor, TextExtractor};
pub use pipeline::segment::TaskSegmenter;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use serialize::OutputFormat;
