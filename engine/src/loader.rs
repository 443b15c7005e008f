//! Question set loading.

use std::fs;
use std::path::{Path, PathBuf};

use canvass_types::{ParseError, Question, parse_question_set};
use thiserror::Error;

/// Built-in set path, relative to the working directory.
pub const DEFAULT_SET_PATH: &str = "questions/q_set1.txt";

/// A loaded, validated question set.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    /// File stem of the source resource; names the results store.
    pub name: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read question set {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid question set {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl QuestionSet {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();

        let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let questions = parse_question_set(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "survey".to_string());

        tracing::info!(
            path = %path.display(),
            questions = questions.len(),
            "Question set loaded"
        );

        Ok(Self { name, questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
