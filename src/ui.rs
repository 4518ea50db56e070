use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use ripasso::trainer::Mode;
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Menu => render_menu(self, area, buf),
            AppState::Typing => render_typing(self, area, buf),
            AppState::Conjugation => render_conjugation(self, area, buf),
            AppState::Results => match self.trainer.mode() {
                Mode::Typing => render_typing_results(self, area, buf),
                Mode::Conjugation => render_conjugation_results(self, area, buf),
            },
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn hint_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let marker = |mode: Mode| {
        if app.trainer.mode() == mode {
            "» "
        } else {
            "  "
        }
    };

    let mut lines = vec![
        Line::from(Span::styled("ripasso", bold().fg(Color::Magenta))),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}(t) typing drill", marker(Mode::Typing)),
            if app.trainer.mode() == Mode::Typing {
                bold()
            } else {
                dim()
            },
        )),
        Line::from(Span::styled(
            format!("{}(c) conjugation quiz", marker(Mode::Conjugation)),
            if app.trainer.mode() == Mode::Conjugation {
                bold()
            } else {
                dim()
            },
        )),
        Line::from(""),
        Line::from(Span::styled("(enter) start  (esc) quit", hint_style())),
    ];

    if let Some(notice) = &app.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    centered_paragraph(lines, area, buf);
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(session) = app.trainer.typing() else {
        return;
    };
    let (done, total) = session.progress();
    let word = session.current_word().unwrap_or("");

    let input_style = if app.flash {
        bold().fg(Color::Red)
    } else {
        bold().fg(Color::Green)
    };

    let timer_line = match app.timer {
        Some(view) => format!("{:.1}s  {:.0} wpm", view.elapsed_secs, view.wpm),
        None => String::new(),
    };

    let lines = vec![
        Line::from(Span::styled(format!("{}/{}", done, total), dim())),
        Line::from(""),
        Line::from(Span::styled(word.to_string(), bold())),
        Line::from(Span::styled(format!("> {}", app.input), input_style)),
        Line::from(""),
        Line::from(Span::styled(timer_line, dim())),
        Line::from(""),
        Line::from(Span::styled("(enter) submit  (esc) menu", hint_style())),
    ];

    centered_paragraph(lines, area, buf);
}

fn render_conjugation(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(session) = app.trainer.conjugation() else {
        return;
    };
    let forms = session.forms();
    let persons = session.persons();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        session.verb().to_string(),
        bold().fg(Color::Magenta),
    ))
    .block(Block::default().borders(Borders::ALL).title("conjugate"))
    .alignment(Alignment::Center);
    title.render(chunks[0], buf);

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(forms.iter().map(|f| Cell::from(f.to_string())))
            .collect::<Vec<_>>(),
    )
    .style(bold().fg(Color::Yellow));

    let rows: Vec<Row> = persons
        .iter()
        .enumerate()
        .map(|(p_idx, person)| {
            let mut cells = vec![Cell::from(person.to_string()).style(bold())];
            for f_idx in 0..forms.len() {
                let idx = p_idx * forms.len() + f_idx;
                let value = app.grid.values.get(idx).map(String::as_str).unwrap_or("");
                let mut style = Style::default();
                if idx == app.grid.focus {
                    style = style.bg(Color::DarkGray);
                }
                cells.push(Cell::from(value.to_string()).style(style));
            }
            Row::new(cells)
        })
        .collect();

    // Size the answer columns to the widest content they hold
    let person_width = persons.iter().map(|p| p.width()).max().unwrap_or(4) as u16 + 2;
    let answer_width = forms
        .iter()
        .map(|f| f.width())
        .chain(app.grid.values.iter().map(|v| v.width()))
        .max()
        .unwrap_or(12)
        .max(12) as u16
        + 2;

    let mut widths = vec![Constraint::Length(person_width)];
    widths.extend(forms.iter().map(|_| Constraint::Length(answer_width)));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL));
    Widget::render(table, chunks[1], buf);

    let instructions = Paragraph::new(Span::styled(
        "(tab) next cell  (enter) submit grid  (esc) menu",
        hint_style(),
    ))
    .alignment(Alignment::Center);
    instructions.render(chunks[2], buf);
}

fn render_typing_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(result) = &app.round_result else {
        return;
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("{:.0} wpm", result.wpm),
            bold().fg(Color::Magenta),
        )),
        Line::from(Span::styled(
            format!("{:.0}% acc", result.accuracy),
            bold().fg(Color::Green),
        )),
        Line::from(Span::styled(
            format!(
                "{} words in {:.1}s",
                result.correct_count, result.elapsed_secs
            ),
            dim(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(r)etry  (m)enu  (esc)ape",
            hint_style(),
        )),
    ];

    centered_paragraph(lines, area, buf);
}

fn render_conjugation_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(report) = app.trainer.conjugation().and_then(|s| s.report()) else {
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("{}/{} correct", report.correct, report.total),
        bold().fg(if report.mismatches.is_empty() {
            Color::Green
        } else {
            Color::Yellow
        }),
    ))];

    if report.mismatches.is_empty() {
        lines.push(Line::from(Span::styled(
            "perfetto!",
            bold().fg(Color::Green),
        )));
    } else {
        lines.push(Line::from(""));
        for m in &report.mismatches {
            lines.push(Line::from(vec![
                Span::styled(format!("{} / {}: ", m.person, m.form), dim()),
                Span::styled(m.expected.clone(), Style::default().fg(Color::Red)),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "(r)etry  (m)enu  (esc)ape",
        hint_style(),
    )));

    centered_paragraph(lines, area, buf);
}

/// Vertically centers a block of lines, the layout used by every
/// full-screen message in the app.
fn centered_paragraph(lines: Vec<Line>, area: Rect, buf: &mut Buffer) {
    let content_height = lines.len() as u16;
    let top_pad = area.height.saturating_sub(content_height) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(top_pad),
            Constraint::Length(content_height),
            Constraint::Min(0),
        ])
        .split(area);

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    widget.render(chunks[1], buf);
}
