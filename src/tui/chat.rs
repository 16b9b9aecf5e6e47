//! Chat screen: per-mount message list with compose and attachment handling.
//!
//! All message state lives here and only here; navigating away drops it.

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use super::compose::ComposeState;
use crate::models::{MessageContent, MessageRecord, Sender};
use crate::picker::{FileSelection, ImageSelection};

/// State for the chat screen, scoped to one mount.
pub struct ChatState {
    /// The id handed over by the roster on navigation. Read-only.
    pub conversation_id: String,
    /// Display name of the other party, for the header line.
    pub title: String,
    /// Append-only message list, oldest first.
    pub messages: Vec<MessageRecord>,
    /// The compose buffer.
    pub compose: ComposeState,
    /// A picked image waiting for send. Becomes a record only on send.
    pub staged_image: Option<ImageSelection>,
    /// Scroll offset in rendered lines, counted from the bottom (0 = newest
    /// visible).
    pub scroll_offset: usize,
    /// Next record id. Ids are monotonically increasing per mount.
    next_id: u64,
}

impl ChatState {
    /// Mount the chat screen with injected seed messages.
    ///
    /// Seed record ids are expected to be sequential ("1", "2", ...); new
    /// records continue the sequence.
    pub fn new(conversation_id: String, title: String, seed: Vec<MessageRecord>) -> Self {
        let next_id = seed.len() as u64 + 1;
        Self {
            conversation_id,
            title,
            messages: seed,
            compose: ComposeState::default(),
            staged_image: None,
            scroll_offset: 0,
            next_id,
        }
    }

    /// Send the current compose state.
    ///
    /// The single validation rule: a no-op when the buffer is empty or
    /// whitespace-only and no image is staged. A staged image wins over any
    /// buffer text (the text is discarded; the two cannot combine into one
    /// record). On append, buffer and staged slot are cleared in the same
    /// transition.
    pub fn send_message(&mut self) -> Option<&MessageRecord> {
        if let Some(img) = self.staged_image.take() {
            self.compose.clear();
            return Some(self.append_record(Sender::Me, MessageContent::Image { uri: img.uri }));
        }

        let body = self.compose.input.trim().to_string();
        if body.is_empty() {
            return None;
        }

        self.compose.clear();
        Some(self.append_record(Sender::Me, MessageContent::Text { body }))
    }

    /// Stage a picked image for the next send. Does not append a record.
    pub fn stage_image(&mut self, selection: ImageSelection) {
        self.staged_image = Some(selection);
    }

    /// Append a file record immediately.
    ///
    /// Unlike image picking, a file selection bypasses compose/send entirely.
    pub fn append_file(&mut self, selection: FileSelection) -> &MessageRecord {
        self.append_record(
            Sender::Me,
            MessageContent::File {
                display_name: selection.display_name,
                uri: selection.uri,
            },
        )
    }

    fn append_record(&mut self, sender: Sender, content: MessageContent) -> &MessageRecord {
        let record = MessageRecord {
            id: self.next_id.to_string(),
            sender,
            timestamp_label: now_label(),
            content,
        };
        self.next_id += 1;
        let idx = self.messages.len();
        self.messages.push(record);
        // A new record means the user wants to see the newest line.
        self.scroll_offset = 0;
        &self.messages[idx]
    }

    /// Scroll toward older messages.
    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(n);
    }

    /// Scroll toward newer messages.
    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }
}

/// Pre-formatted display label for a freshly created record.
fn now_label() -> String {
    Local::now().format("%-I:%M %p").to_string()
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Fixed display width of an image placeholder block, in columns.
const IMAGE_BLOCK_WIDTH: usize = 26;

/// Render the chat screen body (header + message list) into the given area.
///
/// Pure projection of the record list; never mutates it.
pub fn render(area: Rect, buf: &mut Buffer, state: &ChatState, focused: bool) {
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
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let header_area = Rect::new(inner.x, inner.y, inner.width, 1);
    render_header(header_area, buf, state);

    let list_area = Rect::new(
        inner.x,
        inner.y + 1,
        inner.width,
        inner.height.saturating_sub(1),
    );
    if list_area.height == 0 {
        return;
    }

    let all_lines = build_message_lines(&state.messages, list_area.width as usize);
    let total = all_lines.len();
    let visible = list_area.height as usize;

    // Bottom-anchored: offset 0 shows the newest lines.
    let max_offset = total.saturating_sub(visible);
    let offset = state.scroll_offset.min(max_offset);
    let end = total - offset;
    let start = end.saturating_sub(visible);

    for (row, line) in all_lines[start..end].iter().enumerate() {
        let line_area = Rect::new(list_area.x, list_area.y + row as u16, list_area.width, 1);
        Paragraph::new(line.clone()).render(line_area, buf);
    }
}

/// Header line: "Chat with <name>".
fn render_header(area: Rect, buf: &mut Buffer, state: &ChatState) {
    let line = Line::from(Span::styled(
        format!(" Chat with {} ", state.title),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

/// Project every record into display lines, oldest first.
fn build_message_lines(messages: &[MessageRecord], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for record in messages {
        push_record_lines(&mut lines, record, width);
        lines.push(Line::from(""));
    }
    lines
}

/// Render one record as a bubble: self-sent right-aligned and accented,
/// other-sent left-aligned and neutral.
fn push_record_lines(lines: &mut Vec<Line<'static>>, record: &MessageRecord, width: usize) {
    let own = record.sender == Sender::Me;
    let body_style = if own {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let meta_style = Style::default().fg(Color::DarkGray);

    // Bubbles take at most two thirds of the pane width.
    let bubble_width = (width.saturating_mul(2) / 3).max(12).min(width.saturating_sub(2));

    match &record.content {
        MessageContent::Text { body } => {
            for wrapped in wrap_text(body, bubble_width) {
                lines.push(aligned_line(&wrapped, width, own, body_style));
            }
        }
        MessageContent::Image { uri } => {
            // Fixed-size placeholder block standing in for the rendered image.
            let inner = IMAGE_BLOCK_WIDTH.min(bubble_width).saturating_sub(2);
            let top = format!("+{}+", "-".repeat(inner));
            let label: String = format!("[image] {}", uri).chars().take(inner).collect();
            let mid = format!("|{}{}|", label, " ".repeat(inner - label.chars().count()));
            let bottom = format!("+{}+", "-".repeat(inner));
            lines.push(aligned_line(&top, width, own, body_style));
            lines.push(aligned_line(&mid, width, own, body_style));
            lines.push(aligned_line(&bottom, width, own, body_style));
        }
        MessageContent::File { display_name, .. } => {
            let label = format!("[file] {}", display_name);
            for wrapped in wrap_text(&label, bubble_width) {
                lines.push(aligned_line(&wrapped, width, own, body_style));
            }
        }
    }

    lines.push(aligned_line(&record.timestamp_label, width, own, meta_style));
}

/// Build a single display line, padded left when right-aligned.
///
/// Uses display width, not char count; emoji take two columns.
fn aligned_line(text: &str, width: usize, right: bool, style: Style) -> Line<'static> {
    let len = unicode_width::UnicodeWidthStr::width(text);
    if right {
        let pad = width.saturating_sub(len + 1);
        Line::from(vec![
            Span::raw(" ".repeat(pad)),
            Span::styled(text.to_string(), style),
        ])
    } else {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(text.to_string(), style),
        ])
    }
}

/// Word-wrapping: split by newlines first, then wrap long lines.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![];
    }
    let mut result = Vec::new();
    for line in text.lines() {
        if line.chars().count() <= max_width {
            result.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                result.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    fn mounted() -> ChatState {
        ChatState::new(
            "1".to_string(),
            "Kanika Singh".to_string(),
            fixtures::seed_messages(),
        )
    }

    #[test]
    fn test_send_empty_is_noop() {
        let mut chat = mounted();
        let before = chat.messages.len();

        assert!(chat.send_message().is_none());
        chat.compose.append_glyph("   \t ");
        assert!(chat.send_message().is_none());

        assert_eq!(chat.messages.len(), before);
    }

    #[test]
    fn test_send_text_appends_and_clears() {
        let mut chat = mounted();
        let before = chat.messages.len();
        for ch in "hello".chars() {
            chat.compose.insert_char(ch);
        }

        let record = chat.send_message().expect("text send appends");
        assert_eq!(record.sender, Sender::Me);
        assert_eq!(
            record.content,
            MessageContent::Text {
                body: "hello".to_string()
            }
        );

        assert_eq!(chat.messages.len(), before + 1);
        assert!(chat.compose.input.is_empty());
    }

    #[test]
    fn test_staged_image_wins_over_buffer_text() {
        let mut chat = mounted();
        for ch in "caption that gets discarded".chars() {
            chat.compose.insert_char(ch);
        }
        chat.stage_image(ImageSelection {
            uri: "file:///tmp/photo.png".to_string(),
        });

        let record = chat.send_message().expect("image send appends");
        assert_eq!(
            record.content,
            MessageContent::Image {
                uri: "file:///tmp/photo.png".to_string()
            }
        );
        assert_eq!(record.sender, Sender::Me);

        // Buffer and staged slot are both cleared by the same transition.
        assert!(chat.compose.input.is_empty());
        assert!(chat.staged_image.is_none());
    }

    #[test]
    fn test_append_file_bypasses_compose() {
        let mut chat = mounted();
        for ch in "draft text stays".chars() {
            chat.compose.insert_char(ch);
        }
        let before = chat.messages.len();

        chat.append_file(FileSelection {
            display_name: "notes.pdf".to_string(),
            uri: "file:///tmp/notes.pdf".to_string(),
        });

        assert_eq!(chat.messages.len(), before + 1);
        let last = chat.messages.last().unwrap();
        assert_eq!(
            last.content,
            MessageContent::File {
                display_name: "notes.pdf".to_string(),
                uri: "file:///tmp/notes.pdf".to_string()
            }
        );
        // The compose buffer is untouched by the file path.
        assert_eq!(chat.compose.input, "draft text stays");
    }

    #[test]
    fn test_ids_stay_monotonic() {
        let mut chat = mounted();
        for ch in "one".chars() {
            chat.compose.insert_char(ch);
        }
        chat.send_message();
        chat.append_file(FileSelection {
            display_name: "a.txt".to_string(),
            uri: "file:///a.txt".to_string(),
        });

        let ids: Vec<u64> = chat
            .messages
            .iter()
            .map(|m| m.id.parse().expect("numeric id"))
            .collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted, "ids are unique and increasing in list order");
    }

    #[test]
    fn test_wrap_text_keeps_words() {
        let wrapped = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(wrapped, vec!["the quick", "brown fox", "jumps"]);
    }
}
