//! CLI binary for edgequake-pdf2tasks.
//!
//! A thin shim over the library crate that maps CLI arguments
//! to `ExtractionConfig` and reports the result.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2tasks::{
    extract_tasks_to_file, resolve_output_path, ExtractionConfig, ExtractionProgressCallback,
    OutputFormat, PageFilter, ProgressCallback, DEFAULT_OUTPUT_PATH, DEFAULT_SOURCE_URL,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a spinner while the document loads and parses, then a
/// page bar while the segmenter runs.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_download_start(&self, source: &str) {
        self.bar.set_prefix("Loading");
        self.bar.set_message(source.to_string());
    }

    fn on_download_complete(&self, bytes: usize) {
        self.bar.println(format!(
            "  {} Loaded {}",
            green("✓"),
            dim(&format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0)))
        ));
        self.bar.set_prefix("Extracting");
        self.bar.set_message("Reading PDF text…");
    }

    fn on_text_extracted(&self, chars: usize) {
        self.bar.println(format!(
            "  {} Extracted {}",
            green("✓"),
            dim(&format!("{chars} chars"))
        ));
    }

    fn on_pages_split(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>4}/{len} pages  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Segmenting");
        self.bar.set_message("");
    }

    fn on_page_segmented(&self, page_num: usize, _total_pages: usize, task_count: usize) {
        self.bar.set_position(page_num as u64);
        self.bar.set_message(format!("{task_count} tasks on page {page_num}"));
    }

    fn on_extraction_complete(&self, _total_tasks: usize) {
        self.bar.finish_and_clear();
    }
}

/// Extract numbered exercises from a textbook PDF into JSON or CSV.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2tasks",
    version,
    about = "Extract numbered exercises from a textbook PDF into JSON or CSV",
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// PDF URL (http/https) or local file path.
    #[arg(default_value = DEFAULT_SOURCE_URL)]
    url: String,

    /// Output file; relative paths resolve against --base-dir.
    #[arg(default_value = DEFAULT_OUTPUT_PATH)]
    out: PathBuf,

    /// Output format. Default: csv for a .csv output file, json otherwise.
    #[arg(value_enum)]
    format: Option<FormatArg>,

    /// Directory that relative output paths resolve against. Default: current directory.
    #[arg(long, env = "PDF2TASKS_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Maximum HTTP redirects to follow.
    #[arg(long, env = "PDF2TASKS_MAX_REDIRECTS", default_value_t = 10)]
    max_redirects: usize,

    /// HTTP download timeout in seconds (no timeout when unset).
    #[arg(long, env = "PDF2TASKS_DOWNLOAD_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    download_timeout: Option<u64>,

    /// Split pages to segment: all, or a list like 5,12-20,40- (positions in
    /// the blank-line page split, not printed page numbers).
    #[arg(long, env = "PDF2TASKS_PAGES", default_value = "all")]
    pages: PageFilter,

    /// Comma-separated exercise keywords, replacing the built-in Ukrainian set.
    #[arg(long, env = "PDF2TASKS_KEYWORDS", value_delimiter = ',')]
    keywords: Vec<String>,

    /// Disable progress bar.
    #[arg(long, env = "PDF2TASKS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TASKS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TASKS_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Resolve output ───────────────────────────────────────────────────
    let base_dir = match cli.base_dir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let out_path = resolve_output_path(&cli.out, &base_dir);
    let format = cli
        .format
        .map(OutputFormat::from)
        .unwrap_or_else(|| OutputFormat::from_path(&cli.out));

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let stats = extract_tasks_to_file(&cli.url, &out_path, format, &config)
        .await
        .context("Task extraction failed")?;

    if !cli.quiet {
        eprintln!(
            "{} Wrote {} tasks to {}",
            green("✔"),
            stats.total_tasks,
            out_path.display()
        );
        eprintln!(
            "   {}",
            dim(&format!(
                "{} format  ·  {}/{} pages with tasks  ·  {}ms",
                format, stats.pages_with_tasks, stats.selected_pages, stats.total_duration_ms
            ))
        );
        if stats.total_tasks == 0 {
            eprintln!(
                "{} No task markers found; try --keywords for non-Ukrainian textbooks.",
                cyan("⚠")
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .max_redirects(cli.max_redirects)
        .pages(cli.pages.clone());

    if let Some(secs) = cli.download_timeout {
        builder = builder.download_timeout_secs(secs);
    }
    if !cli.keywords.is_empty() {
        builder = builder.keywords(cli.keywords.iter().cloned());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
