//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use canvass_engine::{App, Exporter, QuestionSet, UiOptions};
use tempfile::TempDir;

pub const SET_HEADER: &str = "question|choices|time_limit|multiple_choice|randomize_order|type\n";

/// A small mixed set: one single-select, one multi-select, one free-text.
pub fn sample_set_text() -> String {
    format!(
        "{SET_HEADER}\
         How satisfied are you?|Very;Somewhat;Not at all|0|false|false|choice\n\
         Which features do you use?|Search;Export;Sync|0|true|false|choice\n\
         Any other comments?||0|false|false|text\n"
    )
}

/// Write `contents` as a question set file inside `dir`.
pub fn write_set(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// An app over `set` whose store and export files live inside `dir`.
pub fn app_in(dir: &TempDir, set: QuestionSet) -> App {
    let exporter = Exporter::with_paths(
        dir.path().join("store.csv"),
        dir.path().join("export.csv"),
    );
    App::new(set, exporter, UiOptions::default())
}
