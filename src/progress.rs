//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the pipeline moves from download to segmentation. The library
//! never draws anything itself; the `pdf2tasks` binary renders these events
//! as a terminal progress bar.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2tasks::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct TaskCounter {
//!     seen: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for TaskCounter {
//!     fn on_page_segmented(&self, page_num: usize, total_pages: usize, task_count: usize) {
//!         self.seen.fetch_add(task_count, Ordering::SeqCst);
//!         eprintln!("page {}/{}: {} tasks", page_num, total_pages, task_count);
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(TaskCounter { seen: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extraction pipeline at each stage boundary.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in pipeline order from a single task;
/// the `Send + Sync` bound only exists so configs can cross threads.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called before the document is fetched or read.
    ///
    /// # Arguments
    /// * `source` — the URL or local path being loaded
    fn on_download_start(&self, source: &str) {
        let _ = source;
    }

    /// Called once the raw document bytes are in memory.
    fn on_download_complete(&self, bytes: usize) {
        let _ = bytes;
    }

    /// Called after text extraction and normalisation.
    ///
    /// # Arguments
    /// * `chars` — character count of the normalised text
    fn on_text_extracted(&self, chars: usize) {
        let _ = chars;
    }

    /// Called once the page splitter has run.
    fn on_pages_split(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each selected page has been segmented.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the split document
    /// * `task_count`  — tasks found on this page
    fn on_page_segmented(&self, page_num: usize, total_pages: usize, task_count: usize) {
        let _ = (page_num, total_pages, task_count);
    }

    /// Called once every selected page has been segmented.
    fn on_extraction_complete(&self, total_tasks: usize) {
        let _ = total_tasks;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
