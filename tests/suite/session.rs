//! Full session walks through the public API.

use canvass_engine::{InputMode, QuestionSet, Stage, parse_question_set};

use crate::common::{app_in, sample_set_text};

fn sample_set() -> QuestionSet {
    QuestionSet {
        name: "pulse".to_string(),
        questions: parse_question_set(&sample_set_text()).unwrap(),
    }
}

#[test]
fn full_run_records_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_in(&dir, sample_set());

    // Q1: single select, pick the second choice
    assert_eq!(app.input_mode(), InputMode::Choosing);
    app.move_choice_down();
    app.toggle_choice();
    app.submit_answer();

    // Q2: multi select, pick first and last
    app.toggle_choice();
    app.move_choice_down();
    app.move_choice_down();
    app.toggle_choice();
    app.submit_answer();

    // Q3: free text
    assert_eq!(app.input_mode(), InputMode::Typing);
    app.draft_mut().unwrap().insert_str("All good.");
    app.submit_answer();

    assert_eq!(app.stage(), Stage::Complete);
    let record = app.outcome().expect("export succeeded");
    assert_eq!(record.index, 1);

    let content = std::fs::read_to_string(&record.export_path).unwrap();
    let rows = canvass_engine::parse_rows(&content);
    assert_eq!(rows.len(), 2, "header plus one run");
    assert_eq!(
        rows[0][2..],
        [
            "How satisfied are you?".to_string(),
            "Which features do you use?".to_string(),
            "Any other comments?".to_string(),
        ]
    );
    assert_eq!(rows[1][2..], [
        "Somewhat".to_string(),
        "Search, Sync".to_string(),
        "All good.".to_string(),
    ]);
}

#[test]
fn consecutive_runs_increment_the_counter() {
    let dir = tempfile::tempdir().unwrap();

    for expected_index in 1..=3 {
        let mut app = app_in(&dir, sample_set());
        app.submit_answer();
        app.submit_answer();
        app.submit_answer();
        assert_eq!(app.outcome().unwrap().index, expected_index);
    }

    let content = std::fs::read_to_string(dir.path().join("store.csv")).unwrap();
    let rows = canvass_engine::parse_rows(&content);
    assert_eq!(rows.len(), 4, "header plus three runs");
}

#[test]
fn skipping_everything_records_empty_answers() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_in(&dir, sample_set());

    app.submit_answer();
    app.submit_answer();
    app.submit_answer();

    let responses = app.responses();
    assert!(responses.iter().all(|r| r.answer.is_empty()));

    let content = std::fs::read_to_string(dir.path().join("export.csv")).unwrap();
    let rows = canvass_engine::parse_rows(&content);
    assert_eq!(rows[1][2..], ["", "", ""].map(String::from));
}

#[test]
fn timed_question_exposes_countdown() {
    let dir = tempfile::tempdir().unwrap();
    let text = format!(
        "{}Quick one?|Yes;No|20|false|false|choice\n",
        crate::common::SET_HEADER
    );
    let set = QuestionSet {
        name: "timed".to_string(),
        questions: parse_question_set(&text).unwrap(),
    };
    let app = app_in(&dir, set);

    let left = app.time_left_secs().expect("countdown running");
    assert!(left > 0 && left <= 20);
}
