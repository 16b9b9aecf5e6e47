//! Help popup overlay: keyboard shortcuts by screen.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const POPUP_WIDTH: u16 = 52;

/// A shortcut entry: key binding and its description.
struct Shortcut {
    key: &'static str,
    desc: &'static str,
}

struct Category {
    title: &'static str,
    shortcuts: &'static [Shortcut],
}

const ROSTER: Category = Category {
    title: "ROSTER",
    shortcuts: &[
        Shortcut { key: "type", desc: "Filter conversations" },
        Shortcut { key: "Up/Down", desc: "Select conversation" },
        Shortcut { key: "Enter", desc: "Open chat" },
        Shortcut { key: "C-u", desc: "Clear search" },
        Shortcut { key: "Esc", desc: "Quit" },
    ],
};

const CHAT: Category = Category {
    title: "CHAT",
    shortcuts: &[
        Shortcut { key: "type", desc: "Compose message" },
        Shortcut { key: "Enter", desc: "Send" },
        Shortcut { key: "C-e", desc: "Emoji picker" },
        Shortcut { key: "C-g", desc: "Attach image (stages for send)" },
        Shortcut { key: "C-f", desc: "Attach file (sends immediately)" },
        Shortcut { key: "PgUp/PgDn", desc: "Scroll messages" },
        Shortcut { key: "Esc", desc: "Back to roster" },
    ],
};

const GLOBAL: Category = Category {
    title: "GLOBAL",
    shortcuts: &[
        Shortcut { key: "C-h", desc: "Toggle this help" },
        Shortcut { key: "C-l", desc: "Toggle debug log" },
        Shortcut { key: "C-c", desc: "Quit" },
    ],
};

const CATEGORIES: &[&Category] = &[&ROSTER, &CHAT, &GLOBAL];

/// Render the help popup centered on the screen.
pub fn render(frame: &mut Frame) {
    let area = frame.area();

    let line_count: u16 = CATEGORIES
        .iter()
        .map(|c| c.shortcuts.len() as u16 + 2)
        .sum();
    let height = (line_count + 2).min(area.height);
    let width = POPUP_WIDTH.min(area.width);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let popup = Rect::new(x, y, width, height);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines: Vec<Line> = Vec::new();
    for category in CATEGORIES {
        lines.push(Line::from(Span::styled(
            format!(" {}", category.title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
        for s in category.shortcuts {
            lines.push(Line::from(vec![
                Span::styled(format!("   {:<12}", s.key), Style::default().fg(Color::Yellow)),
                Span::styled(s.desc, Style::default().fg(Color::Gray)),
            ]));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
