//! TUI rendering for Canvass using ratatui.

mod input;
mod theme;

pub use input::{InputPump, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Padding, Paragraph, Wrap},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use canvass_engine::{App, DraftText, InputMode, QuestionKind, Stage, UiOptions};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    if app.stage() == Stage::Complete {
        draw_complete(frame, app, &palette, &glyphs);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header: position + progress
            Constraint::Min(5),    // Question + answer widget
            Constraint::Length(1), // Countdown
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0], &palette);
    draw_question(frame, app, chunks[1], &palette, &glyphs);
    draw_countdown(frame, app, chunks[2], &palette, &glyphs, options);
    draw_hints(frame, app, chunks[3], &palette, options);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let (pos, total) = app.position();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(Span::styled(
            format!(" canvass · {} ", app.set_name()),
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(palette.accent).bg(palette.bg_highlight))
        .ratio(app.progress())
        .label(Span::styled(
            format!("{pos} / {total}"),
            Style::default().fg(palette.text_primary),
        ));
    frame.render_widget(gauge, inner);
}

fn draw_question(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let Some(question) = app.current_question() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::new(2, 2, 1, 1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Size the prompt to its wrapped height so long prompts don't push the
    // answer widget off screen entirely.
    let prompt_height = wrapped_height(&question.prompt, inner.width).min(4);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(prompt_height),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let prompt = Paragraph::new(question.prompt.as_str())
        .style(styles::prompt(palette))
        .wrap(Wrap { trim: false });
    frame.render_widget(prompt, chunks[0]);

    match question.kind {
        QuestionKind::Choice => draw_choices(frame, app, chunks[2], palette, glyphs),
        QuestionKind::Text => draw_text_input(frame, app, chunks[2], palette),
    }
}

fn draw_choices(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let Some(question) = app.current_question() else {
        return;
    };
    let cursor = app.choice_cursor();

    let lines: Vec<Line> = app
        .displayed_choices()
        .into_iter()
        .enumerate()
        .map(|(idx, (text, selected))| {
            let marker = if idx == cursor { glyphs.cursor } else { " " };
            let state = match (question.multiple, selected) {
                (true, true) => glyphs.checked,
                (true, false) => glyphs.unchecked,
                (false, true) => glyphs.radio_on,
                (false, false) => glyphs.radio_off,
            };
            let text_style = if selected {
                styles::choice_selected(palette)
            } else {
                styles::choice(palette)
            };

            let line = Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(palette.accent)),
                Span::styled(format!("{state} "), text_style),
                Span::styled(text.to_string(), text_style),
            ]);
            if idx == cursor {
                line.style(styles::choice_highlight(palette))
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_text_input(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let paragraph = Paragraph::new(draft_lines(app.draft(), palette)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Render the draft with an inverted-cell cursor. The cursor sits on the
/// grapheme after the edit position, or on a trailing space at line end.
fn draft_lines<'a>(draft: &'a DraftText, palette: &Palette) -> Vec<Line<'a>> {
    let text_style = Style::default().fg(palette.text_primary);
    let cursor_style = Style::default().fg(palette.bg_dark).bg(palette.text_primary);

    if draft.text().is_empty() {
        return vec![Line::from(vec![
            Span::styled(" ", cursor_style),
            Span::styled(" Type your answer here...", styles::key_hint(palette)),
        ])];
    }

    let cursor = draft.cursor();
    let mut lines = Vec::new();
    let mut offset = 0;

    for raw in draft.text().split('\n') {
        let start = offset;
        let end = offset + raw.len();
        offset = end + 1; // account for the '\n'

        if cursor < start || cursor > end {
            lines.push(Line::styled(raw, text_style));
            continue;
        }

        let col = cursor - start;
        let before = &raw[..col];
        let mut rest = raw[col..].graphemes(true);
        let at = rest.next().unwrap_or(" ");
        let after = rest.as_str();

        lines.push(Line::from(vec![
            Span::styled(before, text_style),
            Span::styled(at, cursor_style),
            Span::styled(after, text_style),
        ]));
    }

    lines
}

fn draw_countdown(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    options: UiOptions,
) {
    let Some(left) = app.time_left_secs() else {
        return;
    };

    let (label, style) = if left == 0 {
        ("Time's up!".to_string(), styles::countdown_urgent(palette))
    } else if left <= 5 {
        // Pulse on alternating seconds to draw the eye.
        let style = if options.reduced_motion || left % 2 == 0 {
            styles::countdown_urgent(palette)
        } else {
            styles::countdown_urgent(palette).add_modifier(Modifier::REVERSED)
        };
        (format!("{} Time left: {left}s", glyphs.timer), style)
    } else {
        (
            format!("{} Time left: {left}s", glyphs.timer),
            styles::countdown(palette),
        )
    };

    frame.render_widget(
        Paragraph::new(Span::styled(label, style)).alignment(Alignment::Right),
        area,
    );
}

fn draw_hints(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, options: UiOptions) {
    let arrows = if options.ascii_only { "up/down" } else { "↑↓" };
    let hint = match app.input_mode() {
        InputMode::Choosing => {
            format!("{arrows} move  ·  space toggle  ·  enter submit  ·  esc quit")
        }
        InputMode::Typing => {
            "type your answer  ·  alt+enter newline  ·  enter submit  ·  esc quit".to_string()
        }
        InputMode::Finished => "enter exit".to_string(),
    };

    frame.render_widget(
        Paragraph::new(Span::styled(hint, styles::key_hint(palette))),
        area,
    );
}

fn draw_complete(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let area = centered_rect(60, 50, frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::new(2, 2, 1, 1))
        .title(Span::styled(
            " Survey Completed ",
            Style::default()
                .fg(palette.success)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "{} Thank you for completing the {} survey!",
                glyphs.done,
                app.set_name()
            ),
            Style::default().fg(palette.text_primary),
        )),
        Line::from(Span::styled(
            "Your responses have been recorded.",
            Style::default().fg(palette.text_secondary),
        )),
        Line::default(),
    ];

    if let Some(record) = app.outcome() {
        lines.push(Line::from(Span::styled(
            format!("Run #{}", record.index),
            Style::default().fg(palette.accent),
        )));
        lines.push(Line::from(Span::styled(
            format!("Exported to {}", record.export_path.display()),
            Style::default().fg(palette.text_secondary),
        )));
        if !record.store_saved {
            lines.push(Line::from(Span::styled(
                "Warning: history store could not be saved",
                Style::default().fg(palette.warning),
            )));
        }
    } else if let Some(err) = app.export_error() {
        lines.push(Line::from(Span::styled(
            format!("Export failed: {err}"),
            Style::default().fg(palette.error),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "press enter to exit",
        styles::key_hint(palette),
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Height of `text` wrapped to `width` columns, at least 1.
fn wrapped_height(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    let cols = text.width() as u16;
    cols.div_ceil(width).max(1)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
