//! Compose box: text input line with attachment/emoji hints.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};

use crate::picker::ImageSelection;

/// State for the compose box: the not-yet-sent text the user is typing.
#[derive(Default)]
pub struct ComposeState {
    /// Current input text.
    pub input: String,
    /// Cursor position (character offset into `input`).
    pub cursor_pos: usize,
}

impl ComposeState {
    /// Insert a character at the current cursor position.
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.char_to_byte(self.cursor_pos);
        self.input.insert(byte_pos, c);
        self.cursor_pos += 1;
    }

    /// Append a glyph (possibly multi-char, e.g. an emoji) at the end of the
    /// buffer and move the cursor after it. Emoji selection always appends at
    /// the end, regardless of where the cursor was.
    pub fn append_glyph(&mut self, glyph: &str) {
        self.input.push_str(glyph);
        self.cursor_pos = self.input.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            let byte_pos = self.char_to_byte(self.cursor_pos);
            let prev_byte_pos = self.char_to_byte(self.cursor_pos - 1);
            self.input.drain(prev_byte_pos..byte_pos);
            self.cursor_pos -= 1;
        }
    }

    /// Delete the character at the cursor (delete key).
    pub fn delete(&mut self) {
        if self.cursor_pos < self.input.chars().count() {
            let byte_pos = self.char_to_byte(self.cursor_pos);
            let next_byte_pos = self.char_to_byte(self.cursor_pos + 1);
            self.input.drain(byte_pos..next_byte_pos);
        }
    }

    /// Move cursor left by one character.
    pub fn move_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    /// Move cursor right by one character.
    pub fn move_right(&mut self) {
        if self.cursor_pos < self.input.chars().count() {
            self.cursor_pos += 1;
        }
    }

    /// Move cursor to the beginning of the input.
    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    /// Move cursor to the end of the input.
    pub fn move_end(&mut self) {
        self.cursor_pos = self.input.chars().count();
    }

    /// Clear all input text (Ctrl+U).
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Convert a char-based cursor position to a byte offset.
    fn char_to_byte(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Height of the compose box: border + hint line + input line + border.
pub const COMPOSE_HEIGHT: u16 = 4;

/// Render the compose box into the given area.
///
/// Uses `Frame` directly so we can both write to the buffer and set cursor.
pub fn render(
    area: Rect,
    frame: &mut Frame,
    state: &ComposeState,
    staged_image: Option<&ImageSelection>,
    recipient: &str,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_type = if focused {
        BorderType::Double
    } else {
        BorderType::Plain
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let hint_area = Rect::new(inner.x, inner.y, inner.width, 1);
    render_hint_line(hint_area, frame.buffer_mut(), staged_image, focused);

    if inner.height >= 2 {
        let input_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
        let cursor = compute_cursor_position(input_area, state, focused);

        render_input(input_area, frame.buffer_mut(), state, staged_image, recipient);

        if let Some((cx, cy)) = cursor {
            frame.set_cursor_position((cx, cy));
        }
    }
}

/// Render the hint line: staged attachment if present, otherwise key hints.
fn render_hint_line(
    area: Rect,
    buf: &mut Buffer,
    staged_image: Option<&ImageSelection>,
    focused: bool,
) {
    let w = area.width as usize;

    let line = if let Some(img) = staged_image {
        let text = format!(" [image staged] {}", img.uri);
        let truncated: String = text.chars().take(w).collect();
        Line::from(Span::styled(
            truncated,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        let style = if focused {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text = " Enter: send | C-e: emoji | C-g: image | C-f: file";
        let truncated: String = text.chars().take(w).collect();
        Line::from(Span::styled(truncated, style))
    };

    Paragraph::new(line).render(area, buf);
}

/// Render the input line (with placeholder or text).
fn render_input(
    area: Rect,
    buf: &mut Buffer,
    state: &ComposeState,
    staged_image: Option<&ImageSelection>,
    recipient: &str,
) {
    let w = area.width as usize;

    if state.input.is_empty() {
        let placeholder = if staged_image.is_some() {
            " Press Enter to send the staged image".to_string()
        } else {
            format!(" Message {}...", recipient)
        };
        let truncated: String = placeholder.chars().take(w).collect();
        let line = Line::from(Span::styled(
            truncated,
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(line).render(area, buf);
    } else {
        let display = visible_window(&state.input, state.cursor_pos, w);
        let line = Line::from(Span::styled(
            format!(" {}", display.text),
            Style::default().fg(Color::White),
        ));
        Paragraph::new(line).render(area, buf);
    }
}

/// Compute the cursor position if the compose box is focused.
fn compute_cursor_position(
    input_area: Rect,
    state: &ComposeState,
    focused: bool,
) -> Option<(u16, u16)> {
    if !focused {
        return None;
    }

    if state.input.is_empty() {
        return Some((input_area.x + 1, input_area.y));
    }

    let display = visible_window(&state.input, state.cursor_pos, input_area.width as usize);
    Some((input_area.x + 1 + display.cursor_offset as u16, input_area.y))
}

/// The visible slice of input text and the cursor column within it.
struct VisibleWindow {
    text: String,
    cursor_offset: usize,
}

/// Horizontal scrolling for a single-line input: keep the cursor visible.
fn visible_window(input: &str, cursor_pos: usize, width: usize) -> VisibleWindow {
    // One column of left margin is taken by the leading space.
    let avail = width.saturating_sub(1);
    if avail == 0 {
        return VisibleWindow {
            text: String::new(),
            cursor_offset: 0,
        };
    }

    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= avail {
        return VisibleWindow {
            text: input.to_string(),
            cursor_offset: cursor_pos,
        };
    }

    let scroll_start = if cursor_pos < avail {
        0
    } else {
        cursor_pos - avail + 1
    };
    let end = (scroll_start + avail).min(chars.len());

    VisibleWindow {
        text: chars[scroll_start..end].iter().collect(),
        cursor_offset: cursor_pos - scroll_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor() {
        let mut c = ComposeState::default();
        c.insert_char('h');
        c.insert_char('i');
        assert_eq!(c.input, "hi");
        assert_eq!(c.cursor_pos, 2);

        c.move_left();
        c.insert_char('e');
        assert_eq!(c.input, "hei");
        assert_eq!(c.cursor_pos, 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut c = ComposeState::default();
        for ch in "abc".chars() {
            c.insert_char(ch);
        }

        c.backspace();
        assert_eq!(c.input, "ab");

        c.move_home();
        c.delete();
        assert_eq!(c.input, "b");

        // Backspace at the start is a no-op.
        c.backspace();
        assert_eq!(c.input, "b");
        assert_eq!(c.cursor_pos, 0);
    }

    #[test]
    fn test_append_glyph_goes_to_end() {
        let mut c = ComposeState::default();
        for ch in "hello".chars() {
            c.insert_char(ch);
        }
        c.move_home();

        c.append_glyph("\u{1F600}");
        assert_eq!(c.input, "hello\u{1F600}");
        assert_eq!(c.cursor_pos, 6);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut c = ComposeState::default();
        c.insert_char('\u{00E9}'); // é
        c.insert_char('x');
        c.move_left();
        c.backspace();
        assert_eq!(c.input, "x");
        assert_eq!(c.cursor_pos, 0);
    }

    #[test]
    fn test_visible_window_scrolls_to_cursor() {
        let input: String = "abcdefghij".to_string();
        let win = visible_window(&input, 10, 6); // avail = 5, cursor past the last char
        assert_eq!(win.text, "ghij");
        assert_eq!(win.cursor_offset, 4);

        let win = visible_window(&input, 0, 6);
        assert_eq!(win.text, "abcde");
        assert_eq!(win.cursor_offset, 0);
    }
}
