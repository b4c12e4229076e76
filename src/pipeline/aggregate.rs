//! Aggregation: segment every selected page and number the results.

use crate::config::PageFilter;
use crate::output::TaskRecord;
use crate::pipeline::segment::TaskSegmenter;
use crate::progress::ExtractionProgressCallback;
use tracing::debug;

/// Segment the selected `pages` and assign page numbers and per-page indices.
///
/// Pages are processed in order; `page` is the 1-indexed position in
/// `pages` (never renumbered by the filter) and `index` restarts at 1 on
/// every page. A task broken across a page boundary comes out as two
/// unrelated records.
pub fn aggregate(
    pages: &[String],
    segmenter: &TaskSegmenter,
    filter: &PageFilter,
    progress: Option<&dyn ExtractionProgressCallback>,
) -> Vec<TaskRecord> {
    let total_pages = pages.len();
    let mut records = Vec::new();

    let selected = pages
        .iter()
        .enumerate()
        .map(|(i, text)| (i + 1, text))
        .filter(|&(page_num, _)| filter.keeps(page_num));

    for (page_num, text) in selected {
        let tasks = segmenter.segment(text);
        debug!("Page {}/{}: {} tasks", page_num, total_pages, tasks.len());

        if let Some(cb) = progress {
            cb.on_page_segmented(page_num, total_pages, tasks.len());
        }

        records.extend(
            tasks
                .into_iter()
                .enumerate()
                .map(|(i, task)| task.into_record(page_num, i + 1)),
        );
    }

    records
}
