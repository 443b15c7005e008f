//! Core domain types for Canvass.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

pub mod ui;

mod question;
mod response;

pub use question::{ParseError, Question, QuestionKind, parse_question_set};
pub use response::Response;
