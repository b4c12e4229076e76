//! Pipeline stages for task extraction.
//!
//! Each submodule implements exactly one transformation step and is
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ normalise ──▶ pages ──▶ segment ──▶ aggregate
//! (URL/path) (pdf-extract) (cleanup)   (split)   (per page)  (page, index)
//! ```
//!
//! 1. [`input`]     — load document bytes; the only stage with network I/O
//! 2. [`extract`]   — PDF bytes → text, on the blocking pool
//! 3. [`normalise`] — line endings and invisible characters
//! 4. [`pages`]     — form-feed / blank-line page splitting
//! 5. [`segment`]   — the marker-line state machine
//! 6. [`aggregate`] — run the segmenter per page and number the tasks

pub mod aggregate;
pub mod extract;
pub mod input;
pub mod normalise;
pub mod pages;
pub mod segment;
