//! Configuration types for task extraction.
//!
//! All run behaviour is controlled through [`ExtractionConfig`], built via
//! its [`ExtractionConfigBuilder`]. The default source URL is deliberately
//! *not* part of the config: it is a CLI default ([`DEFAULT_SOURCE_URL`])
//! and the library always takes the input explicitly.

use crate::error::Pdf2TasksError;
use crate::pipeline::extract::TextExtractor;
use crate::progress::ProgressCallback;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Textbook loaded when the CLI is run without arguments.
pub const DEFAULT_SOURCE_URL: &str =
    "https://lib.imzo.gov.ua/wa-data/public/site/books2/7-kl-nush/7kl_Algebra_2024.pdf";

/// Default output path, relative to the base directory.
pub const DEFAULT_OUTPUT_PATH: &str = "out/tasks.json";

/// Redirect hops followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Keywords that introduce an exercise in Ukrainian school textbooks
/// ("exercise", "exercises", "task", "number", "example", "summary task").
///
/// Order matters: the first keyword that prefixes a line wins.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "Вправа",
    "Вправи",
    "Завдання",
    "Номер",
    "Приклад",
    "Підсумкове завдання",
];

/// Configuration for a task-extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2tasks::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .max_redirects(5)
///     .pages("10-40".parse().unwrap())
///     .keywords(["Exercise", "Problem"])
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Maximum redirect hops when fetching a URL. Default: 10.
    ///
    /// Exceeding it fails the run with
    /// [`Pdf2TasksError::TooManyRedirects`] instead of looping forever.
    pub max_redirects: usize,

    /// Download timeout for URL inputs in seconds. Default: None (no timeout).
    pub download_timeout_secs: Option<u64>,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Keywords recognised as the start of a task (case-insensitive prefix).
    /// Default: [`DEFAULT_KEYWORDS`].
    pub keywords: Vec<String>,

    /// Split pages to segment. Default: all of them.
    pub pages: PageFilter,

    /// Text extractor override. If None, uses [`crate::pipeline::extract::PdfExtractor`].
    pub extractor: Option<Arc<dyn TextExtractor>>,

    /// Optional stage-event sink.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            download_timeout_secs: None,
            user_agent: concat!("edgequake-pdf2tasks/", env!("CARGO_PKG_VERSION")).to_string(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            pages: PageFilter::all(),
            extractor: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("max_redirects", &self.max_redirects)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("keywords", &self.keywords)
            .field("pages", &self.pages)
            .field("extractor", &self.extractor.as_ref().map(|_| "<dyn TextExtractor>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn max_redirects(mut self, n: usize) -> Self {
        self.config.max_redirects = n;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = Some(secs);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Replace the keyword set.
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn pages(mut self, filter: PageFilter) -> Self {
        self.config.pages = filter;
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ExtractionConfig, Pdf2TasksError> {
        for kw in self.config.keywords.iter_mut() {
            *kw = kw.trim().to_string();
        }
        let c = &self.config;
        if c.keywords.is_empty() {
            return Err(Pdf2TasksError::InvalidConfig(
                "At least one task keyword is required".into(),
            ));
        }
        if c.keywords.iter().any(|k| k.is_empty()) {
            return Err(Pdf2TasksError::InvalidConfig(
                "Task keywords must not be blank".into(),
            ));
        }
        if c.download_timeout_secs == Some(0) {
            return Err(Pdf2TasksError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Page filter ──────────────────────────────────────────────────────────

/// Split-page positions to segment.
///
/// Positions are 1-based indices into the page splitter's output, a
/// blank-line heuristic rather than the PDF's own pagination. A filter with
/// no spans keeps every page.
///
/// Parses from `all` or a comma list of `N`, `N-M` and open-ended `N-`:
///
/// ```rust
/// use edgequake_pdf2tasks::PageFilter;
///
/// let filter: PageFilter = "2-3, 9-".parse().unwrap();
/// assert!(filter.keeps(2) && filter.keeps(40));
/// assert!(!filter.keeps(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFilter {
    spans: Vec<PageSpan>,
}

/// Inclusive run of positions; `last: None` runs to the end of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageSpan {
    first: usize,
    last: Option<usize>,
}

impl PageSpan {
    fn contains(self, page: usize) -> bool {
        page >= self.first && self.last.map_or(true, |last| page <= last)
    }
}

impl PageFilter {
    /// Keep every page.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_all(&self) -> bool {
        self.spans.is_empty()
    }

    /// Is the 1-based split position `page` selected?
    pub fn keeps(&self, page: usize) -> bool {
        self.is_all() || self.spans.iter().any(|span| span.contains(page))
    }

    /// How many of the positions `1..=total_pages` are selected.
    pub fn count(&self, total_pages: usize) -> usize {
        (1..=total_pages).filter(|&p| self.keeps(p)).count()
    }
}

impl FromStr for PageFilter {
    type Err = Pdf2TasksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }
        let spans = s
            .split(',')
            .map(parse_span)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { spans })
    }
}

fn parse_span(item: &str) -> Result<PageSpan, Pdf2TasksError> {
    let item = item.trim();
    let invalid =
        |why: &str| Pdf2TasksError::InvalidConfig(format!("Invalid page span '{item}': {why}"));
    let position = |s: &str| match s.trim().parse::<usize>() {
        Ok(0) => Err(invalid("positions start at 1")),
        Ok(n) => Ok(n),
        Err(_) => Err(invalid("expected a page number")),
    };

    let span = match item.split_once('-') {
        None => {
            let page = position(item)?;
            PageSpan {
                first: page,
                last: Some(page),
            }
        }
        Some((first, last)) if last.trim().is_empty() => PageSpan {
            first: position(first)?,
            last: None,
        },
        Some((first, last)) => PageSpan {
            first: position(first)?,
            last: Some(position(last)?),
        },
    };

    match span.last {
        Some(last) if last < span.first => Err(invalid("end is before start")),
        _ => Ok(span),
    }
}
