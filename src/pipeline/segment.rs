//! Task segmentation: one page of text → ordered task records.
//!
//! ## Algorithm
//!
//! A single pass over the page's trimmed, non-empty lines drives a small
//! state machine holding the task being built (its lines and its id):
//!
//! ```text
//!             marker line                       other line
//!  preamble ───────────────▶ in task ◀──────────────────────┐
//!     ▲  │ other line            │ marker line: flush,       │ append
//!     └──┘ (discarded)           │ start next task ──────────┘
//!                                ▼
//!                     end of page: flush
//! ```
//!
//! A *marker line* is recognised by one of three [`MarkerPattern`]s, tried
//! in fixed priority order:
//!
//! 1. [`MarkerKind::Keyword`]: an exercise keyword (`Вправа`, `Завдання`, …),
//!    then optionally `№`/`#` and a number: `Вправа № 12`, `Завдання 3:`
//! 2. [`MarkerKind::Numbered`]: 1–3 digits, `.`/`)`/`]`, whitespace: `12. `, `3) `
//! 3. [`MarkerKind::NumberSign`]: `№` and 1–4 digits: `№123`, `№ 45`
//!
//! ## Identifier policy
//!
//! The task id always comes from the highest-priority pattern that matches
//! the line, never from a lower-priority one, even when the lower one would
//! yield a "better" number. `Завдання № 5 extra text` is id `"5"` via the
//! keyword pattern. A keyword marker without a number takes the keyword
//! itself, as written in the line, as its id.
//!
//! The segmenter is a heuristic with no formal grammar: prose lines that
//! happen to start with a keyword (`Номерація …`) or a short number and a
//! period do start a task.

use crate::error::Pdf2TasksError;
use crate::output::SegmentedTask;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]{1,3})[.)\]]\s+").unwrap());

static RE_NUMBER_SIGN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^№\s*([0-9]{1,4})").unwrap());

static DEFAULT_SEGMENTER: Lazy<TaskSegmenter> = Lazy::new(|| {
    let keywords: Vec<String> = crate::config::DEFAULT_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect();
    TaskSegmenter::new(&keywords).expect("built-in keywords are non-empty and escaped")
});

/// Which pattern recognised a marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Keyword,
    Numbered,
    NumberSign,
}

/// A recognised task start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub id: Option<String>,
}

/// One task-start pattern: a line predicate plus an id extractor over the
/// same regex.
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    kind: MarkerKind,
    regex: Regex,
    /// Capture groups tried in order; the first non-empty one is the id.
    id_groups: &'static [usize],
}

impl MarkerPattern {
    /// Keyword pattern for the given keywords (case-insensitive prefix).
    ///
    /// Keywords are trimmed. A blank keyword would match the empty prefix of
    /// every line, so it is rejected.
    pub fn keyword(keywords: &[String]) -> Result<Self, Pdf2TasksError> {
        if keywords.is_empty() {
            return Err(Pdf2TasksError::InvalidConfig(
                "At least one task keyword is required".into(),
            ));
        }
        let keywords: Vec<&str> = keywords.iter().map(|k| k.trim()).collect();
        if keywords.iter().any(|k| k.is_empty()) {
            return Err(Pdf2TasksError::InvalidConfig(
                "Task keywords must not be blank".into(),
            ));
        }
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!(r"(?i)^({alternation})\s*[№#]?[\s:]*([0-9]+)?"))
            .map_err(|e| Pdf2TasksError::InvalidConfig(format!("keyword pattern: {e}")))?;

        Ok(Self {
            kind: MarkerKind::Keyword,
            regex,
            id_groups: &[2, 1],
        })
    }

    pub fn numbered() -> Self {
        Self {
            kind: MarkerKind::Numbered,
            regex: RE_NUMBERED.clone(),
            id_groups: &[1],
        }
    }

    pub fn number_sign() -> Self {
        Self {
            kind: MarkerKind::NumberSign,
            regex: RE_NUMBER_SIGN.clone(),
            id_groups: &[1],
        }
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// Does `line` start a task according to this pattern?
    pub fn matches(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Match `line` and extract its id. `None` when the line does not match.
    pub fn extract(&self, line: &str) -> Option<Marker> {
        let caps = self.regex.captures(line)?;
        let id = self
            .id_groups
            .iter()
            .filter_map(|&g| caps.get(g))
            .map(|m| m.as_str())
            .find(|s| !s.is_empty())
            .map(str::to_string);

        Some(Marker {
            kind: self.kind,
            id,
        })
    }
}

/// Splits a page into tasks. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TaskSegmenter {
    /// In priority order: keyword, numbered, number sign.
    patterns: [MarkerPattern; 3],
}

impl Default for TaskSegmenter {
    fn default() -> Self {
        DEFAULT_SEGMENTER.clone()
    }
}

impl TaskSegmenter {
    /// Build a segmenter recognising `keywords` as exercise headings.
    pub fn new(keywords: &[String]) -> Result<Self, Pdf2TasksError> {
        Ok(Self {
            patterns: [
                MarkerPattern::keyword(keywords)?,
                MarkerPattern::numbered(),
                MarkerPattern::number_sign(),
            ],
        })
    }

    /// The marker patterns in priority order.
    pub fn patterns(&self) -> &[MarkerPattern] {
        &self.patterns
    }

    /// Classify a trimmed line. The first matching pattern decides both
    /// that the line is a marker and what its id is.
    pub fn classify(&self, line: &str) -> Option<Marker> {
        self.patterns.iter().find_map(|p| p.extract(line))
    }

    /// Segment one page of text into tasks, in order of appearance.
    pub fn segment(&self, page_text: &str) -> Vec<SegmentedTask> {
        let mut state = SegmentState::default();

        for line in page_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match self.classify(line) {
                Some(marker) => state.start_task(marker.id, line),
                None => state.continue_task(line),
            }
        }

        state.finish()
    }
}

#[derive(Default)]
struct SegmentState<'a> {
    tasks: Vec<SegmentedTask>,
    buffer: Vec<&'a str>,
    current_id: Option<String>,
}

impl<'a> SegmentState<'a> {
    fn start_task(&mut self, id: Option<String>, line: &'a str) {
        self.flush();
        self.current_id = id;
        self.buffer.push(line);
    }

    fn continue_task(&mut self, line: &'a str) {
        // Preamble before the first marker is dropped.
        if !self.buffer.is_empty() {
            self.buffer.push(line);
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        self.tasks.push(SegmentedTask {
            id: self.current_id.take(),
            text: self.buffer.join("\n"),
        });
        self.buffer.clear();
    }

    fn finish(mut self) -> Vec<SegmentedTask> {
        self.flush();
        self.tasks
    }
}
