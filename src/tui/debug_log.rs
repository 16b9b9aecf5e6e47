//! Debug log pane: shows captured tracing output inside the TUI.
//!
//! This is where swallowed picker failures become visible to a developer
//! without ever surfacing to the user.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use super::log_capture::LogRing;

/// Scroll history kept by the pane, larger than the write-path ring.
const HISTORY_LIMIT: usize = 1000;

/// State for the debug log pane.
pub struct DebugLogState {
    ring: LogRing,
    lines: Vec<String>,
    pub visible: bool,
    /// 0 = pinned to the newest line.
    scroll_offset: usize,
}

impl DebugLogState {
    pub fn new(ring: LogRing) -> Self {
        Self {
            ring,
            lines: Vec::new(),
            visible: false,
            scroll_offset: 0,
        }
    }

    /// Pull new lines out of the ring. Called every loop iteration so the
    /// ring never grows unbounded.
    pub fn pump(&mut self) {
        let fresh = self.ring.drain();
        if fresh.is_empty() {
            return;
        }
        self.lines.extend(fresh);
        if self.lines.len() > HISTORY_LIMIT {
            let excess = self.lines.len() - HISTORY_LIMIT;
            self.lines.drain(..excess);
            self.scroll_offset = self.scroll_offset.saturating_sub(excess);
        }
    }

    /// Toggle the pane; opening snaps to the newest lines.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            self.scroll_offset = 0;
        }
    }

    /// Scroll toward older lines.
    pub fn scroll_up(&mut self, n: usize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add(n).min(max);
    }

    /// Scroll toward newer lines.
    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    #[cfg(test)]
    fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Render the pane as an overlay across the lower half of the screen.
pub fn render(frame: &mut Frame, state: &DebugLogState) {
    if !state.visible {
        return;
    }

    let area = frame.area();
    let height = (area.height / 2).max(4).min(area.height);
    let pane = Rect::new(
        area.x,
        area.y + area.height - height,
        area.width,
        height,
    );

    frame.render_widget(Clear, pane);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Debug Log (C-l to close) ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(pane);
    frame.render_widget(block, pane);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let visible = inner.height as usize;
    let total = state.lines.len();
    let end = total.saturating_sub(state.scroll_offset);
    let start = end.saturating_sub(visible);

    let shown: Vec<Line> = state.lines[start..end]
        .iter()
        .map(|l| colorize(l))
        .collect();
    Paragraph::new(shown).render(inner, frame.buffer_mut());
}

/// Color a formatted tracing line by its level token.
fn colorize(line: &str) -> Line<'static> {
    let color = if line.contains(" ERROR ") {
        Color::Red
    } else if line.contains(" WARN ") {
        Color::Yellow
    } else if line.contains(" INFO ") {
        Color::Green
    } else {
        Color::DarkGray
    };
    Line::from(Span::styled(line.to_owned(), Style::default().fg(color)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pump_accumulates() {
        let ring = LogRing::new();
        let mut state = DebugLogState::new(ring.clone());

        state.pump();
        assert_eq!(state.line_count(), 0);

        use std::io::Write;
        use tracing_subscriber::fmt::MakeWriter;
        write!(ring.make_writer(), "a\nb\n").unwrap();

        state.pump();
        assert_eq!(state.line_count(), 2);
    }

    #[test]
    fn test_toggle_snaps_to_bottom() {
        let mut state = DebugLogState::new(LogRing::new());
        state.scroll_offset = 7;

        state.toggle();
        assert!(state.visible);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_scroll_clamps_to_history() {
        let ring = LogRing::new();
        let mut state = DebugLogState::new(ring.clone());

        use std::io::Write;
        use tracing_subscriber::fmt::MakeWriter;
        let mut w = ring.make_writer();
        for i in 0..5 {
            writeln!(w, "line {}", i).unwrap();
        }
        state.pump();

        state.scroll_up(100);
        assert_eq!(state.scroll_offset, 4);

        state.scroll_down(100);
        assert_eq!(state.scroll_offset, 0);
    }
}
