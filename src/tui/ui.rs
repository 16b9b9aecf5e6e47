//! Screen layout and chrome (header/status bars, overlay ordering).

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use super::app::{App, Screen};
use super::chat;
use super::compose;
use super::debug_log;
use super::emoji;
use super::help;
use super::roster;

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app);

    match app.screen {
        Screen::Roster => {
            roster::render(main_area, frame, &app.roster, !app.debug_log.visible);
        }
        Screen::Chat => {
            if let Some(chat_state) = app.chat.as_ref() {
                let [messages_area, compose_area] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(compose::COMPOSE_HEIGHT),
                ])
                .areas(main_area);

                let focused = !app.emoji.visible && !app.debug_log.visible;
                chat::render(messages_area, frame.buffer_mut(), chat_state, focused);
                compose::render(
                    compose_area,
                    frame,
                    &chat_state.compose,
                    chat_state.staged_image.as_ref(),
                    &chat_state.title,
                    focused,
                );
            }
        }
    }

    render_status(status_area, frame.buffer_mut(), app);

    // Overlays, topmost last.
    emoji::render(frame, &app.emoji);
    debug_log::render(frame, &app.debug_log);
    if app.show_help {
        help::render(frame);
    }
}

/// Header bar: app title left, user name right.
fn render_header(area: Rect, buf: &mut Buffer, app: &App) {
    let title = " chat-tui";
    let right = format!("{} ", app.user_name);

    let padding = (area.width as usize)
        .saturating_sub(title.chars().count())
        .saturating_sub(right.chars().count());

    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, Style::default().fg(Color::Cyan)),
    ]);

    Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

/// Status bar: screen name, context, key hints.
fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    let sep_style = Style::default().fg(Color::DarkGray);

    let screen_label = match app.screen {
        Screen::Roster => "roster".to_string(),
        Screen::Chat => match app.chat.as_ref() {
            Some(c) => format!("chat #{}", c.conversation_id),
            None => "chat".to_string(),
        },
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", screen_label),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled("| ", sep_style),
        Span::styled("C-h: help", Style::default().fg(Color::Gray)),
        Span::styled(" | ", sep_style),
        Span::styled("C-l: log", Style::default().fg(Color::Gray)),
    ];

    if let Some(busy) = app.picker_busy() {
        spans.push(Span::styled(" | ", sep_style));
        spans.push(Span::styled(
            busy,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    }

    Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}
