//! Results persistence and export.
//!
//! Each completed run becomes one CSV row, `time, index, answer...`, appended
//! to a per-set history store under the user data directory. The accumulated
//! CSV is also written as an export file next to the user (the "download").

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use canvass_types::{Question, Response};

/// File name of the results store for a set, and of the export file.
const STORE_DIR: &str = "results";
const EXPORT_SUFFIX: &str = "_results.csv";

/// Timestamp format for the `time` column: `DD/MM/YYYY HH:MM`.
const TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

// ============================================================================
// CSV encoding and decoding
// ============================================================================

/// Quote a field if it contains a separator, quote, or line break.
/// Embedded quotes are doubled.
#[must_use]
pub fn encode_field(field: &str) -> Cow<'_, str> {
    if field.contains(['"', ',', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Encode one row, without a trailing line break.
#[must_use]
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| encode_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode one record. Reverses [`encode_row`]; unquoted fields (as the store
/// format's earlier, unquoted incarnation wrote them) pass through unchanged.
#[must_use]
pub fn decode_row(record: &str) -> Vec<String> {
    parse_rows(record)
        .into_iter()
        .next()
        .unwrap_or_else(|| vec![String::new()])
}

/// Decode a whole store into rows.
///
/// Quoted fields may span lines (multi-line free-text answers), so this walks
/// the content as one stream instead of splitting on line breaks. Blank lines
/// between records are skipped.
#[must_use]
pub fn parse_rows(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
        } else {
            match ch {
                '"' if field.is_empty() => in_quotes = true,
                ',' => row.push(std::mem::take(&mut field)),
                '\r' => {}
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    if row.len() > 1 || !row[0].is_empty() {
                        rows.push(std::mem::take(&mut row));
                    } else {
                        row.clear();
                    }
                }
                _ => field.push(ch),
            }
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

/// The 1-based run counter for the next row.
///
/// Reads the `index` column of the last stored row; a missing store, a
/// header-only store, or a malformed field all restart the counter at 1.
#[must_use]
pub fn next_run_index(existing: &str) -> u32 {
    let rows = parse_rows(existing);
    if rows.len() < 2 {
        return 1;
    }
    let last = &rows[rows.len() - 1];
    last.get(1)
        .and_then(|field| field.parse::<u32>().ok())
        .map_or(1, |index| index + 1)
}

// ============================================================================
// Exporter
// ============================================================================

/// Outcome of recording a completed run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    /// 1-based counter of this run within the store.
    pub index: u32,
    /// Whether the history store write succeeded (best-effort).
    pub store_saved: bool,
    pub store_path: PathBuf,
    pub export_path: PathBuf,
}

/// Writes completed runs to the per-set history store and the export file.
#[derive(Debug, Clone)]
pub struct Exporter {
    store_path: PathBuf,
    export_path: PathBuf,
}

impl Exporter {
    /// Resolve paths for a named set: store under the user data directory,
    /// export file in `output_dir` (working directory when `None`).
    #[must_use]
    pub fn for_set(set_name: &str, output_dir: Option<&Path>) -> Self {
        let store_path = data_dir()
            .join(STORE_DIR)
            .join(format!("{set_name}.csv"));
        let export_path = output_dir
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{set_name}{EXPORT_SUFFIX}"));
        Self {
            store_path,
            export_path,
        }
    }

    /// Explicit paths, for tests and unusual layouts.
    #[must_use]
    pub fn with_paths(store_path: PathBuf, export_path: PathBuf) -> Self {
        Self {
            store_path,
            export_path,
        }
    }

    #[must_use]
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    #[must_use]
    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    /// Record a completed run with the current local time.
    pub fn record_run(
        &self,
        questions: &[Question],
        responses: &[Response],
    ) -> std::io::Result<RunRecord> {
        let time = chrono::Local::now().format(TIME_FORMAT).to_string();
        self.record_run_at(questions, responses, &time)
    }

    /// Record a completed run stamped with `time`.
    ///
    /// The history store write is best-effort: a failure is logged and
    /// reflected in [`RunRecord::store_saved`] but does not fail the run.
    /// A failed export file write is an error.
    pub fn record_run_at(
        &self,
        questions: &[Question],
        responses: &[Response],
        time: &str,
    ) -> std::io::Result<RunRecord> {
        let existing = fs::read_to_string(&self.store_path).unwrap_or_default();
        let index = next_run_index(&existing);

        let mut row = vec![time.to_string(), index.to_string()];
        row.extend(responses.iter().map(|r| r.answer.clone()));

        let mut content = if existing.trim().is_empty() {
            let mut header = vec!["time".to_string(), "index".to_string()];
            header.extend(questions.iter().map(|q| q.prompt.clone()));
            encode_row(&header)
        } else {
            existing.trim_end().to_string()
        };
        content.push('\n');
        content.push_str(&encode_row(&row));
        content.push('\n');

        let store_saved = self.write_store(&content);

        if let Some(parent) = self.export_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        canvass_utils::atomic_write(&self.export_path, content.as_bytes())?;

        tracing::info!(
            index,
            store_saved,
            export = %self.export_path.display(),
            "Survey run recorded"
        );

        Ok(RunRecord {
            index,
            store_saved,
            store_path: self.store_path.clone(),
            export_path: self.export_path.clone(),
        })
    }

    fn write_store(&self, content: &str) -> bool {
        let result = self
            .store_path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| canvass_utils::atomic_write(&self.store_path, content.as_bytes()));

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    path = %self.store_path.display(),
                    "Failed to save results store: {e}"
                );
                false
            }
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".canvass"), |home| home.join(".canvass"))
}
