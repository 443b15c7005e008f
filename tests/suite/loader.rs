//! Question set loading from disk.

use canvass_engine::{LoadError, ParseError, QuestionKind, QuestionSet};

use crate::common::{SET_HEADER, sample_set_text, write_set};

#[test]
fn loads_a_mixed_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_set(&dir, "q_set1.txt", &sample_set_text());

    let set = QuestionSet::load(&path).unwrap();
    assert_eq!(set.name, "q_set1");
    assert_eq!(set.len(), 3);
    assert_eq!(set.questions[0].kind, QuestionKind::Choice);
    assert!(set.questions[1].multiple);
    assert_eq!(set.questions[2].kind, QuestionKind::Text);
}

#[test]
fn set_name_comes_from_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_set(&dir, "customer_pulse.txt", &sample_set_text());

    let set = QuestionSet::load(&path).unwrap();
    assert_eq!(set.name, "customer_pulse");
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = QuestionSet::load(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, LoadError::Read { .. }), "got: {err}");
}

#[test]
fn header_only_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_set(&dir, "empty.txt", SET_HEADER);

    let err = QuestionSet::load(&path).unwrap_err();
    assert!(
        matches!(
            err,
            LoadError::Parse {
                source: ParseError::EmptySet,
                ..
            }
        ),
        "got: {err}"
    );
}

#[test]
fn parse_error_names_the_offending_line() {
    let dir = tempfile::tempdir().unwrap();
    let text = format!("{SET_HEADER}Good|A;B|0|false|false|choice\nBad|A;B|0|false|false|maybe\n");
    let path = write_set(&dir, "bad.txt", &text);

    let err = QuestionSet::load(&path).unwrap_err();
    match err {
        LoadError::Parse {
            source: ParseError::UnknownKind { line, kind },
            ..
        } => {
            assert_eq!(line, 3);
            assert_eq!(kind, "maybe");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn load_error_displays_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_set(&dir, "empty.txt", SET_HEADER);

    let err = QuestionSet::load(&path).unwrap_err();
    assert!(err.to_string().contains("empty.txt"));
}
