pub mod pie;

use chrono::NaiveDateTime;
use pomotimer::{
    chart,
    timer::{Controls, DisplayState},
    util::sec_to_str,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use crate::{ui::pie::ClockChart, App, AppState, SettingsField};

const COUNTER_WIDTH: u16 = 18;

pub fn draw(app: &App, f: &mut Frame, now: NaiveDateTime) {
    let area = f.area();
    f.render_widget(Dashboard { app, now }, area);
    if app.state == AppState::Settings {
        let popup = centered_rect(60, 50, area);
        f.render_widget(Clear, popup);
        f.render_widget(SettingsDialog { app }, popup);
    }
}

pub fn display_color(state: DisplayState) -> Color {
    match state {
        DisplayState::Idle => Color::Rgb(0xc0, 0xc0, 0xc0),
        DisplayState::Paused => Color::Rgb(0x80, 0x80, 0x80),
        DisplayState::Running => Color::Rgb(0x00, 0x50, 0x90),
        DisplayState::Overdue => Color::Rgb(0xff, 0x50, 0x00),
    }
}

fn state_label(state: DisplayState) -> &'static str {
    match state {
        DisplayState::Idle => "idle",
        DisplayState::Paused => "paused",
        DisplayState::Running => "running",
        DisplayState::Overdue => "time's up",
    }
}

/// Counter, today's chart and the control legend
pub struct Dashboard<'a> {
    pub app: &'a App,
    pub now: NaiveDateTime,
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let timer = &self.app.timer;
        let state = timer.display_state(self.now);
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let border_style = if self.app.alerting {
            Style::default()
                .fg(display_color(DisplayState::Overdue))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" PomoTimer ")
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // counter + chart
                Constraint::Length(1), // controls
                Constraint::Length(1), // notice
            ])
            .split(inner);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(COUNTER_WIDTH), Constraint::Min(4)])
            .split(chunks[0]);

        let counter_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(body[0]);

        let counter = Paragraph::new(vec![
            Line::from(Span::styled(
                timer.display_text(self.now),
                bold_style.fg(display_color(state)),
            )),
            Line::from(Span::styled(
                state_label(state),
                Style::default().fg(display_color(state)),
            )),
            Line::from(Span::styled(
                format!("timeout {}", sec_to_str(timer.timeout_seconds())),
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center);
        counter.render(counter_rows[1], buf);

        let arcs = chart::arcs(timer.history(), self.now);
        ClockChart { arcs: &arcs }.render(body[1], buf);

        Paragraph::new(controls_line(timer.controls()))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        if let Some(notice) = &self.app.notice {
            Paragraph::new(Span::styled(notice.as_str(), Style::default().fg(Color::Red)))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
        }
    }
}

/// Legend of the timer keys; unavailable actions are dimmed
pub fn controls_line(controls: Controls) -> Line<'static> {
    let pause_label = if controls.pause_pushed {
        "resume"
    } else {
        "pause"
    };
    let entries = [
        ("s", "start", controls.start),
        ("p", pause_label, controls.pause),
        ("x", "stop", controls.stop),
        ("c", "settings", true),
        ("q", "quit", true),
    ];

    let mut spans = Vec::new();
    for (idx, (key, label, enabled)) in entries.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if enabled {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(format!("({key}) {label}"), style));
    }
    Line::from(spans)
}

struct SettingsDialog<'a> {
    app: &'a App,
}

impl Widget for SettingsDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let settings = &self.app.settings;
        let field_style = |field: SettingsField| {
            if settings.field == field {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default()
            }
        };
        let sound = if settings.sound_input.is_empty() && settings.field != SettingsField::Sound {
            "(none)".to_string()
        } else {
            settings.sound_input.clone()
        };

        let mut lines = vec![
            Line::from(vec![
                Span::raw("Timeout (minutes): "),
                Span::styled(
                    settings.timeout_input.clone(),
                    field_style(SettingsField::Timeout),
                ),
            ]),
            Line::from(vec![
                Span::raw("Sound file:        "),
                Span::styled(sound, field_style(SettingsField::Sound)),
            ]),
            Line::from(""),
        ];
        if let Some(err) = &settings.error {
            lines.push(Line::from(Span::styled(
                err.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(Span::styled(
            "(tab) switch  (enter) save  (esc) cancel",
            Style::default().add_modifier(Modifier::ITALIC),
        )));

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Settings ")
                    .style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
