//! Rendering task records as JSON or CSV.
//!
//! Both layouts are fixed for compatibility with existing consumers:
//!
//! * JSON — a pretty-printed array (2-space indent) of objects with keys
//!   `page`, `index`, `id`, `text` in that order; a missing id is `null`.
//! * CSV — header `page,index,id,text`, `\n` row separators, every field
//!   double-quoted with embedded quotes doubled, a missing id as `""`, and
//!   the task text flattened to a single line.
//!
//! Neither output ends with a newline.

use crate::error::Pdf2TasksError;
use crate::output::TaskRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Output format for the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// Infer the format from a file extension: `.csv` → CSV, anything else → JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Json,
        }
    }

    /// Render `tasks` in this format.
    pub fn render(self, tasks: &[TaskRecord]) -> Result<String, Pdf2TasksError> {
        match self {
            OutputFormat::Json => to_json(tasks),
            OutputFormat::Csv => Ok(to_csv(tasks)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Pdf2TasksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(Pdf2TasksError::InvalidConfig(format!(
                "Unknown output format '{other}' (expected json or csv)"
            ))),
        }
    }
}

/// Pretty-printed JSON array.
pub fn to_json(tasks: &[TaskRecord]) -> Result<String, Pdf2TasksError> {
    serde_json::to_string_pretty(tasks)
        .map_err(|e| Pdf2TasksError::Internal(format!("JSON serialisation failed: {e}")))
}

/// CSV document with a fixed header and fully quoted fields.
pub fn to_csv(tasks: &[TaskRecord]) -> String {
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push("page,index,id,text".to_string());

    for task in tasks {
        let text = flatten_text(&task.text);
        let fields = [
            quote(&task.page.to_string()),
            quote(&task.index.to_string()),
            quote(task.id.as_deref().unwrap_or("")),
            quote(&text),
        ];
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

/// Replace every line break with a single space, then trim.
fn flatten_text(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace('\n', " ")
        .trim()
        .to_string()
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
