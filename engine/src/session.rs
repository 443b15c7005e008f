//! Survey session state: the one-question-at-a-time walk.
//!
//! The [`App`] owns the loaded questions, the display state of the current
//! question (choice order, selection, free-text draft, countdown deadline),
//! and the responses collected so far. Submitting the final question
//! transitions to [`Stage::Complete`] and hands the run to the exporter.

use std::time::{Duration, Instant};

use canvass_types::{Question, QuestionKind, Response, ui::UiOptions};
use rand::seq::SliceRandom;
use unicode_segmentation::UnicodeSegmentation;

use crate::export::{Exporter, RunRecord};
use crate::loader::QuestionSet;

/// Coarse session stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// A question is on screen.
    Asking,
    /// All questions answered; completion screen.
    Complete,
}

/// What kind of input the current screen accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating and toggling a choice list.
    Choosing,
    /// Editing a free-text answer.
    Typing,
    /// Completion screen; any confirm key exits.
    Finished,
}

/// Free-text draft with a grapheme-aware cursor (byte offset).
#[derive(Debug, Default)]
pub struct DraftText {
    text: String,
    cursor: usize,
}

impl DraftText {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the cursor within the text.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn backspace(&mut self) {
        let prev = self.prev_boundary();
        if prev < self.cursor {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        let next = self.next_boundary();
        if next > self.cursor {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .grapheme_indices(true)
            .last()
            .map_or(0, |(idx, _)| idx)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map_or(self.text.len(), |g| self.cursor + g.len())
    }
}

/// Display state of the question currently on screen. Rebuilt per question.
#[derive(Debug, Default)]
struct Presented {
    /// Displayed position -> original choice index.
    order: Vec<usize>,
    /// Selection flags, by displayed position.
    selected: Vec<bool>,
    /// Highlighted choice, by displayed position.
    cursor: usize,
    draft: DraftText,
}

/// The survey session state machine.
pub struct App {
    questions: Vec<Question>,
    set_name: String,
    exporter: Exporter,
    options: UiOptions,

    current: usize,
    responses: Vec<Response>,
    stage: Stage,
    presented: Presented,
    deadline: Option<Instant>,

    status: Option<String>,
    outcome: Option<RunRecord>,
    export_error: Option<String>,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(set: QuestionSet, exporter: Exporter, options: UiOptions) -> Self {
        assert!(
            !set.questions.is_empty(),
            "question set must not be empty (loader rejects empty sets)"
        );
        let mut app = Self {
            questions: set.questions,
            set_name: set.name,
            exporter,
            options,
            current: 0,
            responses: Vec::new(),
            stage: Stage::Asking,
            presented: Presented::default(),
            deadline: None,
            status: None,
            outcome: None,
            export_error: None,
            should_quit: false,
        };
        app.present_current();
        app
    }

    // ------------------------------------------------------------------
    // Accessors for the TUI
    // ------------------------------------------------------------------

    #[must_use]
    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.options
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        match self.stage {
            Stage::Complete => InputMode::Finished,
            Stage::Asking => match self.questions[self.current].kind {
                QuestionKind::Choice => InputMode::Choosing,
                QuestionKind::Text => InputMode::Typing,
            },
        }
    }

    /// The question on screen, `None` once the session is complete.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// `(position, total)`, 1-based; position saturates at total on completion.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        let total = self.questions.len();
        ((self.current + 1).min(total), total)
    }

    /// Fraction of questions answered, 0.0 to 1.0.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.current as f64 / self.questions.len() as f64
    }

    /// Choice texts with selection flags, in displayed (possibly shuffled) order.
    #[must_use]
    pub fn displayed_choices(&self) -> Vec<(&str, bool)> {
        let Some(q) = self.current_question() else {
            return Vec::new();
        };
        self.presented
            .order
            .iter()
            .enumerate()
            .map(|(pos, &orig)| (q.choices[orig].as_str(), self.presented.selected[pos]))
            .collect()
    }

    #[must_use]
    pub fn choice_cursor(&self) -> usize {
        self.presented.cursor
    }

    #[must_use]
    pub fn draft(&self) -> &DraftText {
        &self.presented.draft
    }

    /// Mutable draft access, only while a text question is on screen.
    pub fn draft_mut(&mut self) -> Option<&mut DraftText> {
        if self.input_mode() == InputMode::Typing {
            Some(&mut self.presented.draft)
        } else {
            None
        }
    }

    /// Whole seconds left on the countdown; `Some(0)` once expired,
    /// `None` for untimed questions.
    #[must_use]
    pub fn time_left_secs(&self) -> Option<u64> {
        let deadline = self.deadline?;
        let now = Instant::now();
        if now >= deadline {
            return Some(0);
        }
        let remaining = deadline - now;
        let mut secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            secs += 1;
        }
        Some(secs)
    }

    #[must_use]
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The recorded run, once the session completed and export succeeded.
    #[must_use]
    pub fn outcome(&self) -> Option<&RunRecord> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn export_error(&self) -> Option<&str> {
        self.export_error.as_deref()
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    // ------------------------------------------------------------------
    // Choice navigation
    // ------------------------------------------------------------------

    pub fn move_choice_up(&mut self) {
        if self.input_mode() == InputMode::Choosing {
            self.presented.cursor = self.presented.cursor.saturating_sub(1);
        }
    }

    pub fn move_choice_down(&mut self) {
        if self.input_mode() == InputMode::Choosing
            && self.presented.cursor + 1 < self.presented.order.len()
        {
            self.presented.cursor += 1;
        }
    }

    /// Toggle the highlighted choice. Single-select questions clear any other
    /// selection first, so re-toggling the selected choice deselects it.
    pub fn toggle_choice(&mut self) {
        if self.input_mode() != InputMode::Choosing {
            return;
        }
        let multiple = self.questions[self.current].multiple;
        let cursor = self.presented.cursor;
        if multiple {
            self.presented.selected[cursor] = !self.presented.selected[cursor];
        } else {
            let was_selected = self.presented.selected[cursor];
            self.presented.selected.fill(false);
            self.presented.selected[cursor] = !was_selected;
        }
    }

    // ------------------------------------------------------------------
    // The walk
    // ------------------------------------------------------------------

    /// Advance time-dependent state. Expired countdowns submit the current
    /// answer state as-is.
    pub fn tick(&mut self) {
        if self.stage == Stage::Asking
            && let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            tracing::debug!(question = self.current, "Countdown expired, auto-submitting");
            self.submit_answer();
        }
    }

    /// Record the current answer state and move on.
    pub fn submit_answer(&mut self) {
        if self.stage != Stage::Asking {
            return;
        }
        self.deadline = None;

        let q = &self.questions[self.current];
        let response = match q.kind {
            QuestionKind::Choice => {
                let selected: Vec<&str> = self
                    .presented
                    .order
                    .iter()
                    .enumerate()
                    .filter(|&(pos, _)| self.presented.selected[pos])
                    .map(|(_, &orig)| q.choices[orig].as_str())
                    .collect();
                Response::choices(q.prompt.clone(), &selected)
            }
            QuestionKind::Text => Response::text(q.prompt.clone(), self.presented.draft.text()),
        };
        self.responses.push(response);

        self.current += 1;
        if self.current < self.questions.len() {
            self.present_current();
        } else {
            self.finish();
        }
    }

    fn present_current(&mut self) {
        self.present_current_with(&mut rand::rng());
    }

    fn present_current_with<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        let q = &self.questions[self.current];

        let mut order: Vec<usize> = (0..q.choices.len()).collect();
        if q.kind == QuestionKind::Choice && q.randomize {
            order.shuffle(rng);
        }

        self.presented = Presented {
            selected: vec![false; order.len()],
            order,
            cursor: 0,
            draft: DraftText::default(),
        };
        self.deadline = q
            .is_timed()
            .then(|| Instant::now() + Duration::from_secs(u64::from(q.time_limit_secs)));
    }

    fn finish(&mut self) {
        self.stage = Stage::Complete;
        match self.exporter.record_run(&self.questions, &self.responses) {
            Ok(record) => {
                self.status = Some(format!(
                    "Run #{} saved to {}",
                    record.index,
                    record.export_path.display()
                ));
                self.outcome = Some(record);
            }
            Err(e) => {
                tracing::error!("Failed to export survey results: {e}");
                self.export_error = Some(e.to_string());
                self.status = Some("Export failed - see log".to_string());
            }
        }
    }
}
