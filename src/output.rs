//! Output types: task records and run statistics.

use serde::{Deserialize, Serialize};

/// One segmented exercise, positioned within the document.
///
/// Field order is significant: it is the key order of the JSON output and
/// the column order of the CSV output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// 1-indexed page number in the split document.
    pub page: usize,
    /// 1-indexed position of the task on its page.
    pub index: usize,
    /// Exercise number (or introducing keyword) taken from the opening line.
    pub id: Option<String>,
    /// Raw task text, lines joined with `\n`.
    pub text: String,
}

/// A task as produced by the segmenter, before page/index assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedTask {
    pub id: Option<String>,
    pub text: String,
}

impl SegmentedTask {
    /// Attach the page number and per-page index.
    pub fn into_record(self, page: usize, index: usize) -> TaskRecord {
        TaskRecord {
            page,
            index,
            id: self.id,
            text: self.text,
        }
    }
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages produced by the page splitter.
    pub total_pages: usize,
    /// Pages actually segmented (after page selection).
    pub selected_pages: usize,
    /// Selected pages that yielded at least one task.
    pub pages_with_tasks: usize,
    pub total_tasks: usize,
    /// Size of the source document; 0 when starting from text.
    pub document_bytes: usize,
    /// Characters of extracted text after normalisation.
    pub text_chars: usize,
    pub total_duration_ms: u64,
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Tasks ordered by (page, index).
    pub tasks: Vec<TaskRecord>,
    pub stats: ExtractionStats,
}
