//! Input handling for the Canvass TUI.
//!
//! A blocking input thread feeds a bounded channel; [`handle_events`] drains
//! it once per frame so rendering never blocks on the terminal.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tokio::sync::mpsc;

use canvass_engine::{App, InputMode};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

enum InputMsg {
    Event(Event),
    Error(String),
}

pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so the input thread unblocks if it is
        // currently backpressured on a send (e.g., during a large paste).
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Bounded queue: apply backpressure instead of dropping
                    // events, so pasted text arrives intact.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued input and apply it to the app. Returns `true` to quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev) {
            return Ok(true);
        }

        processed += 1;
    }
    Ok(app.should_quit())
}

fn apply_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            // Handle press + repeat events (ignore releases)
            if matches!(key.kind, KeyEventKind::Release) {
                return app.should_quit();
            }

            // Ctrl+C quits from anywhere
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return true;
            }

            match app.input_mode() {
                InputMode::Choosing => handle_choosing(app, key),
                InputMode::Typing => handle_typing(app, key),
                InputMode::Finished => handle_finished(app, key),
            }
        }
        Event::Paste(text) => {
            if let Some(draft) = app.draft_mut() {
                draft.insert_str(&normalize_line_endings(&text));
            }
            app.should_quit()
        }
        _ => app.should_quit(),
    }
}

fn handle_choosing(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_choice_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_choice_down(),
        KeyCode::Char(' ') => app.toggle_choice(),
        KeyCode::Enter => app.submit_answer(),
        KeyCode::Esc => app.request_quit(),
        _ => {}
    }
    app.should_quit()
}

fn handle_typing(app: &mut App, key: KeyEvent) -> bool {
    // Alt+Enter inserts a line break; bare Enter submits.
    if key.code == KeyCode::Enter {
        if key.modifiers.contains(KeyModifiers::ALT) {
            if let Some(draft) = app.draft_mut() {
                draft.insert_char('\n');
            }
        } else {
            app.submit_answer();
        }
        return app.should_quit();
    }

    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(draft) = app.draft_mut() {
                draft.insert_char(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(draft) = app.draft_mut() {
                draft.backspace();
            }
        }
        KeyCode::Delete => {
            if let Some(draft) = app.draft_mut() {
                draft.delete();
            }
        }
        KeyCode::Left => {
            if let Some(draft) = app.draft_mut() {
                draft.move_left();
            }
        }
        KeyCode::Right => {
            if let Some(draft) = app.draft_mut() {
                draft.move_right();
            }
        }
        KeyCode::Home => {
            if let Some(draft) = app.draft_mut() {
                draft.move_home();
            }
        }
        KeyCode::End => {
            if let Some(draft) = app.draft_mut() {
                draft.move_end();
            }
        }
        KeyCode::Esc => app.request_quit(),
        _ => {}
    }
    app.should_quit()
}

fn handle_finished(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => app.request_quit(),
        _ => {}
    }
    app.should_quit()
}
