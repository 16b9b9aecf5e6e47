//! Roster screen: scrollable conversation list with live search filtering.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};

use crate::models::Conversation;

/// Case-insensitive substring filter over display name OR preview.
///
/// An empty query returns the full source unchanged, preserving order. The
/// roster re-evaluates this on every query keystroke; no debounce.
pub fn filter_conversations<'a>(
    query: &str,
    source: &'a [Conversation],
) -> Vec<&'a Conversation> {
    if query.is_empty() {
        return source.iter().collect();
    }
    let needle = query.to_lowercase();
    source
        .iter()
        .filter(|c| {
            c.display_name.to_lowercase().contains(&needle)
                || c.last_message_preview.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Fallback avatar glyph: initials derived from the display name.
///
/// Total for any name, including single-word names; an all-whitespace name
/// degrades to "?".
pub fn initials(display_name: &str) -> String {
    let mut words = display_name.split_whitespace();
    let first = words.next().and_then(|w| w.chars().next());
    let last = words.last().and_then(|w| w.chars().next());

    match (first, last) {
        (Some(f), Some(l)) => format!("{}{}", f, l).to_uppercase(),
        (Some(f), None) => f.to_uppercase().to_string(),
        _ => "?".to_string(),
    }
}

/// State for the roster screen. Owns the injected conversation seed.
pub struct RosterState {
    conversations: Vec<Conversation>,
    /// Live search query.
    pub query: String,
    /// Cursor position within the query (character offset).
    pub cursor_pos: usize,
    /// Selection index into the *filtered* view.
    pub selected: usize,
}

impl RosterState {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            query: String::new(),
            cursor_pos: 0,
            selected: 0,
        }
    }

    /// The conversations visible under the current query, in seed order.
    pub fn visible(&self) -> Vec<&Conversation> {
        filter_conversations(&self.query, &self.conversations)
    }

    /// The currently selected conversation, if any row is visible.
    pub fn selected_conversation(&self) -> Option<&Conversation> {
        self.visible().get(self.selected).copied()
    }

    /// Type a character into the search query.
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.char_to_byte(self.cursor_pos);
        self.query.insert(byte_pos, c);
        self.cursor_pos += 1;
        self.clamp_selection();
    }

    /// Delete the query character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            let byte_pos = self.char_to_byte(self.cursor_pos);
            let prev_byte_pos = self.char_to_byte(self.cursor_pos - 1);
            self.query.drain(prev_byte_pos..byte_pos);
            self.cursor_pos -= 1;
            self.clamp_selection();
        }
    }

    /// Clear the whole query (Ctrl+U).
    pub fn clear_query(&mut self) {
        self.query.clear();
        self.cursor_pos = 0;
        self.clamp_selection();
    }

    /// Move selection up.
    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down.
    pub fn move_down(&mut self) {
        let count = self.visible().len();
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    /// Keep the selection inside the filtered view after the query changes.
    fn clamp_selection(&mut self) {
        let count = self.visible().len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }

    fn char_to_byte(&self, char_pos: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Height of the search bar: border + input + border.
pub const SEARCH_BAR_HEIGHT: u16 = 3;

/// Render the roster screen (search bar + conversation list).
pub fn render(area: Rect, frame: &mut Frame, state: &RosterState, focused: bool) {
    let [search_area, list_area] = ratatui::layout::Layout::vertical([
        ratatui::layout::Constraint::Length(SEARCH_BAR_HEIGHT),
        ratatui::layout::Constraint::Fill(1),
    ])
    .areas(area);

    render_search_bar(search_area, frame, state, focused);
    render_list(list_area, frame.buffer_mut(), state, focused);
}

/// Render the search input bar with a live cursor.
fn render_search_bar(area: Rect, frame: &mut Frame, state: &RosterState, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            " Chats ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if state.query.is_empty() {
        let line = Line::from(Span::styled(
            " Search",
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(line).render(inner, frame.buffer_mut());
        if focused {
            frame.set_cursor_position((inner.x + 1, inner.y));
        }
        return;
    }

    let line = Line::from(Span::styled(
        format!(" {}", state.query),
        Style::default().fg(Color::White),
    ));
    Paragraph::new(line).render(inner, frame.buffer_mut());

    if focused {
        let cx = inner.x + 1 + state.cursor_pos as u16;
        frame.set_cursor_position((cx.min(inner.x + inner.width.saturating_sub(1)), inner.y));
    }
}

/// Render the filtered conversation rows, or the empty-state placeholder.
fn render_list(area: Rect, buf: &mut Buffer, state: &RosterState, _focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let visible = state.visible();

    // Zero matches is a display branch, not an error.
    if visible.is_empty() {
        let line = Line::from(Span::styled(
            format!(" No conversations match \"{}\"", state.query),
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(line).render(Rect::new(inner.x, inner.y, inner.width, 1), buf);
        return;
    }

    let height = inner.height as usize;
    let scroll = scroll_offset(state.selected, height, visible.len());

    for (row, idx) in (scroll..visible.len()).take(height).enumerate() {
        let row_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        render_row(row_area, buf, visible[idx], idx == state.selected);
    }
}

/// Keep the selected row visible.
fn scroll_offset(selected: usize, height: usize, total: usize) -> usize {
    if total <= height || selected < height {
        return 0;
    }
    let max_offset = total.saturating_sub(height);
    selected.saturating_sub(height - 1).min(max_offset)
}

/// One conversation row: avatar cell, name, preview, right-aligned timestamp.
fn render_row(area: Rect, buf: &mut Buffer, conversation: &Conversation, selected: bool) {
    let w = area.width as usize;
    if w == 0 {
        return;
    }

    let bg = if selected { Color::DarkGray } else { Color::Reset };
    let cursor = if selected { "\u{25BA}" } else { " " };

    // Avatar cell: picture marker when a remote avatar exists, otherwise the
    // initials fallback badge.
    let (avatar, avatar_color) = match conversation.avatar_url {
        Some(_) => ("[@]".to_string(), Color::Magenta),
        None => (format!("({})", initials(&conversation.display_name)), Color::Blue),
    };

    let name_style = Style::default()
        .fg(Color::White)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let preview_style = Style::default().fg(Color::Gray).bg(bg);
    let time_style = Style::default().fg(Color::DarkGray).bg(bg);
    let avatar_style = Style::default().fg(avatar_color).bg(bg);

    let prefix = format!("{}{} ", cursor, avatar);
    let name = conversation.display_name.clone();
    let time = conversation.timestamp_label.clone();

    // Truncate the preview so the timestamp stays right-aligned.
    let fixed = prefix.chars().count() + name.chars().count() + 2 + time.chars().count() + 1;
    let max_preview = w.saturating_sub(fixed);
    let mut preview: String = conversation
        .last_message_preview
        .chars()
        .take(max_preview)
        .collect();
    if preview.chars().count() < conversation.last_message_preview.chars().count()
        && !preview.is_empty()
    {
        preview.pop();
        preview.push('\u{2026}');
    }

    let used = prefix.chars().count()
        + name.chars().count()
        + 2
        + preview.chars().count()
        + time.chars().count()
        + 1;
    let pad = w.saturating_sub(used);

    let line = Line::from(vec![
        Span::styled(prefix, avatar_style),
        Span::styled(name, name_style),
        Span::styled("  ".to_string(), preview_style),
        Span::styled(preview, preview_style),
        Span::styled(" ".repeat(pad), preview_style),
        Span::styled(time, time_style),
        Span::styled(" ".to_string(), time_style),
    ]);

    Paragraph::new(line).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    #[test]
    fn test_empty_query_is_identity() {
        let seed = fixtures::seed_conversations();
        let filtered = filter_conversations("", &seed);
        assert_eq!(filtered.len(), seed.len());
        for (got, want) in filtered.iter().zip(seed.iter()) {
            assert_eq!(got.id, want.id, "order preserved");
        }
    }

    #[test]
    fn test_filter_matches_name_case_insensitive() {
        let seed = fixtures::seed_conversations();
        for query in ["kanika", "KANIKA", "kAnIkA"] {
            let filtered = filter_conversations(query, &seed);
            assert_eq!(filtered.len(), 1);
            assert_eq!(filtered[0].display_name, "Kanika Singh");
        }
    }

    #[test]
    fn test_filter_matches_preview() {
        let seed = fixtures::seed_conversations();
        let filtered = filter_conversations("dinner", &seed);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].display_name, "Abhishek M.");
    }

    #[test]
    fn test_filter_no_matches() {
        let seed = fixtures::seed_conversations();
        assert!(filter_conversations("zzz", &seed).is_empty());
    }

    #[test]
    fn test_initials_is_total() {
        assert_eq!(initials("Kanika Singh"), "KS");
        assert_eq!(initials("Aman"), "A");
        assert_eq!(initials("Abhishek M."), "AM");
        assert_eq!(initials("  himanshi  "), "H");
        assert_eq!(initials(""), "?");
        assert_eq!(initials("   "), "?");
    }

    #[test]
    fn test_selection_clamps_when_query_narrows() {
        let mut roster = RosterState::new(fixtures::seed_conversations());
        roster.move_down();
        roster.move_down();
        roster.move_down();
        assert_eq!(roster.selected, 3);

        // "kanika" leaves one visible row; selection must follow.
        for c in "kanika".chars() {
            roster.insert_char(c);
        }
        assert_eq!(roster.visible().len(), 1);
        assert_eq!(roster.selected, 0);
        assert_eq!(
            roster.selected_conversation().unwrap().display_name,
            "Kanika Singh"
        );
    }

    #[test]
    fn test_selection_none_when_no_matches() {
        let mut roster = RosterState::new(fixtures::seed_conversations());
        for c in "zzz".chars() {
            roster.insert_char(c);
        }
        assert!(roster.visible().is_empty());
        assert!(roster.selected_conversation().is_none());
    }
}
