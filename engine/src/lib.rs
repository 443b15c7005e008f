//! Core engine for Canvass - survey session state machine and CSV export.
//!
//! This crate contains the App state machine without TUI dependencies.

mod config;
mod export;
mod loader;
mod session;

pub use config::{AppConfig, CanvassConfig, ConfigError, ExportConfig, config_path};
pub use export::{Exporter, RunRecord, decode_row, encode_row, next_run_index, parse_rows};
pub use loader::{DEFAULT_SET_PATH, LoadError, QuestionSet};
pub use session::{App, DraftText, InputMode, Stage};

// Re-export from crates for public API
pub use canvass_types::{
    ParseError, Question, QuestionKind, Response, parse_question_set, ui::UiOptions,
};
