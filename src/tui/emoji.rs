//! Emoji picker overlay: a small glyph grid drawn on top of the chat screen.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// The selectable glyph set.
pub const EMOJI: &[&str] = &[
    "\u{1F600}", "\u{1F602}", "\u{1F60A}", "\u{1F60D}", "\u{1F60E}", "\u{1F914}",
    "\u{1F622}", "\u{1F621}", "\u{1F44D}", "\u{1F44E}", "\u{1F64F}", "\u{1F44F}",
    "\u{1F389}", "\u{1F525}", "\u{2764}\u{FE0F}", "\u{1F4AF}", "\u{1F64C}", "\u{2728}",
];

/// Grid columns in the popup.
const COLS: usize = 6;

/// Cell width per glyph (two-column glyph plus padding), in columns.
const CELL_WIDTH: u16 = 5;

/// State for the emoji picker overlay.
#[derive(Default)]
pub struct EmojiPickerState {
    /// Whether the overlay is visible.
    pub visible: bool,
    /// Index of the highlighted glyph.
    pub selected: usize,
}

impl EmojiPickerState {
    /// Flip visibility. No other state changes.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Pick the highlighted glyph.
    ///
    /// A selection always closes the picker, whatever the prior visibility;
    /// picking several emoji in a row means reopening each time.
    pub fn select(&mut self) -> &'static str {
        self.visible = false;
        EMOJI[self.selected.min(EMOJI.len() - 1)]
    }

    pub fn move_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.selected + 1 < EMOJI.len() {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(COLS);
    }

    pub fn move_down(&mut self) {
        if self.selected + COLS < EMOJI.len() {
            self.selected += COLS;
        }
    }
}

/// Render the picker as a centered popup over the chat screen.
pub fn render(frame: &mut Frame, state: &EmojiPickerState) {
    if !state.visible {
        return;
    }

    let area = frame.area();
    let rows = EMOJI.len().div_ceil(COLS) as u16;
    let width = (COLS as u16 * CELL_WIDTH + 2).min(area.width);
    let height = (rows + 2).min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let popup = Rect::new(x, y, width, height);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Emoji (Enter: pick, Esc: close) ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    for row in 0..rows as usize {
        let mut spans: Vec<Span> = Vec::new();
        for col in 0..COLS {
            let idx = row * COLS + col;
            let Some(glyph) = EMOJI.get(idx) else {
                break;
            };
            let style = if idx == state.selected {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!(" {} ", glyph), style));
            spans.push(Span::raw(" "));
        }
        let row_area = Rect::new(
            inner.x,
            inner.y + row as u16,
            inner.width,
            1,
        );
        if row_area.y < inner.y + inner.height {
            frame.render_widget(Paragraph::new(Line::from(spans)), row_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_only_visibility() {
        let mut picker = EmojiPickerState::default();
        picker.selected = 3;

        picker.toggle();
        assert!(picker.visible);
        assert_eq!(picker.selected, 3);

        picker.toggle();
        assert!(!picker.visible);
    }

    #[test]
    fn test_select_closes_regardless_of_visibility() {
        let mut picker = EmojiPickerState::default();

        picker.visible = true;
        let glyph = picker.select();
        assert_eq!(glyph, EMOJI[0]);
        assert!(!picker.visible);

        // Selecting while already closed still reports closed.
        let glyph = picker.select();
        assert_eq!(glyph, EMOJI[0]);
        assert!(!picker.visible);
    }

    #[test]
    fn test_grid_navigation_clamps() {
        let mut picker = EmojiPickerState::default();
        picker.move_left();
        assert_eq!(picker.selected, 0);

        for _ in 0..100 {
            picker.move_right();
        }
        assert_eq!(picker.selected, EMOJI.len() - 1);

        picker.move_down();
        assert_eq!(picker.selected, EMOJI.len() - 1);

        picker.move_up();
        assert_eq!(picker.selected, EMOJI.len() - 1 - COLS);
    }
}
