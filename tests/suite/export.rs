//! Results store and export file behavior.

use canvass_engine::{Exporter, encode_row, next_run_index, parse_rows};
use canvass_types::{Question, QuestionKind, Response};

fn question(prompt: &str) -> Question {
    Question {
        prompt: prompt.to_string(),
        choices: vec!["Yes".to_string(), "No".to_string()],
        time_limit_secs: 0,
        multiple: false,
        randomize: false,
        kind: QuestionKind::Choice,
    }
}

fn answer(prompt: &str, answer: &str) -> Response {
    Response {
        prompt: prompt.to_string(),
        answer: answer.to_string(),
    }
}

#[test]
fn quoted_fields_round_trip_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::with_paths(
        dir.path().join("store.csv"),
        dir.path().join("export.csv"),
    );

    let questions = vec![question("Pick one, or two")];
    let responses = vec![answer("Pick one, or two", "Yes, No")];
    exporter
        .record_run_at(&questions, &responses, "05/08/2026 09:30")
        .unwrap();

    let content = std::fs::read_to_string(dir.path().join("store.csv")).unwrap();
    let rows = parse_rows(&content);
    assert_eq!(rows[0][2], "Pick one, or two");
    assert_eq!(rows[1][2], "Yes, No");
}

#[test]
fn continues_counting_from_a_legacy_unquoted_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store.csv");

    // Rows as the unquoted browser-era format wrote them.
    std::fs::write(
        &store,
        "time,index,Pick?\n05/08/2026 09:30,1,Yes\n05/08/2026 10:00,2,No\n",
    )
    .unwrap();

    let exporter = Exporter::with_paths(store.clone(), dir.path().join("export.csv"));
    let record = exporter
        .record_run_at(&[question("Pick?")], &[answer("Pick?", "Yes")], "06/08/2026 08:00")
        .unwrap();

    assert_eq!(record.index, 3);

    let rows = parse_rows(&std::fs::read_to_string(&store).unwrap());
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3][1], "3");
}

#[test]
fn malformed_counter_restarts_at_one() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store.csv");
    std::fs::write(&store, "time,index,Pick?\nsometime,not-a-number,Yes\n").unwrap();

    let exporter = Exporter::with_paths(store, dir.path().join("export.csv"));
    let record = exporter
        .record_run_at(&[question("Pick?")], &[answer("Pick?", "No")], "06/08/2026 08:00")
        .unwrap();

    assert_eq!(record.index, 1);
}

#[test]
fn header_is_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::with_paths(
        dir.path().join("store.csv"),
        dir.path().join("export.csv"),
    );

    let questions = vec![question("Pick?")];
    exporter
        .record_run_at(&questions, &[answer("Pick?", "Yes")], "05/08/2026 09:30")
        .unwrap();
    exporter
        .record_run_at(&questions, &[answer("Pick?", "No")], "05/08/2026 10:00")
        .unwrap();

    let content = std::fs::read_to_string(dir.path().join("store.csv")).unwrap();
    assert_eq!(content.matches("time,index").count(), 1);
}

#[test]
fn encode_decode_agree_on_awkward_fields() {
    let fields = [
        "plain".to_string(),
        "trailing space ".to_string(),
        "comma, inside".to_string(),
        "\"quoted\"".to_string(),
        String::new(),
    ];
    let rows = parse_rows(&format!("{}\n", encode_row(&fields)));
    assert_eq!(rows, vec![fields.to_vec()]);
}

#[test]
fn next_index_reads_the_last_row() {
    let store = "time,index,Q\n05/08/2026 09:30,1,a\n05/08/2026 10:00,41,b\n";
    assert_eq!(next_run_index(store), 42);
}
