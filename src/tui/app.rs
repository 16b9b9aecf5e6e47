//! Application state and main event loop.

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::backend::{PickerBridge, PickerEvent, PickerRequest};
use super::chat::ChatState;
use super::debug_log::DebugLogState;
use super::emoji::EmojiPickerState;
use super::log_capture::LogRing;
use super::roster::RosterState;
use super::ui;
use crate::config::Config;
use crate::models::fixtures;
use crate::picker::{DialogFilePicker, DialogImagePicker, PickOutcome};

/// Redraw interval while idle, so the debug-log pane stays fresh.
const TICK_MS: u64 = 250;

/// Which screen is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Roster,
    Chat,
}

/// Application state.
///
/// The two screens communicate only through `open_selected_chat`: the roster
/// hands over a conversation id, nothing flows back.
pub struct App {
    pub should_exit: bool,
    /// Local user's display name, from config.
    pub user_name: String,
    pub screen: Screen,
    pub roster: RosterState,
    /// Chat screen state, present only while mounted.
    pub chat: Option<ChatState>,
    pub emoji: EmojiPickerState,
    pub debug_log: DebugLogState,
    pub show_help: bool,
    image_pick_in_flight: bool,
    file_pick_in_flight: bool,
}

impl App {
    pub fn new(user_name: String, ring: LogRing) -> Self {
        Self {
            should_exit: false,
            user_name,
            screen: Screen::Roster,
            roster: RosterState::new(fixtures::seed_conversations()),
            chat: None,
            emoji: EmojiPickerState::default(),
            debug_log: DebugLogState::new(ring),
            show_help: false,
            image_pick_in_flight: false,
            file_pick_in_flight: false,
        }
    }

    /// Navigate to the chat screen for the selected roster row.
    ///
    /// Every mount starts from the same two-message seed regardless of the
    /// handed-over id. That matches the behavior this prototype reproduces;
    /// keying the message store by conversation id is a deliberate product
    /// decision left open (see DESIGN.md).
    pub fn open_selected_chat(&mut self) {
        let Some(conversation) = self.roster.selected_conversation() else {
            return;
        };
        let id = conversation.id.clone();
        let title = conversation.display_name.clone();

        tracing::info!(conversation = %id, "opening chat");
        self.chat = Some(ChatState::new(id, title, fixtures::seed_messages()));
        self.screen = Screen::Chat;
    }

    /// Leave the chat screen, discarding its state.
    pub fn close_chat(&mut self) {
        self.chat = None;
        self.emoji.visible = false;
        self.screen = Screen::Roster;
    }

    /// Reserve the image picker. Refuses while a dialog is already open.
    pub fn begin_image_pick(&mut self) -> bool {
        if self.image_pick_in_flight {
            tracing::warn!("image picker already open -- request refused");
            return false;
        }
        self.image_pick_in_flight = true;
        true
    }

    /// Reserve the file picker. Refuses while a dialog is already open.
    pub fn begin_file_pick(&mut self) -> bool {
        if self.file_pick_in_flight {
            tracing::warn!("file picker already open -- request refused");
            return false;
        }
        self.file_pick_in_flight = true;
        true
    }

    /// Short status label while a dialog is open.
    pub fn picker_busy(&self) -> Option<&'static str> {
        if self.image_pick_in_flight {
            Some("image dialog open")
        } else if self.file_pick_in_flight {
            Some("file dialog open")
        } else {
            None
        }
    }

    /// Apply one picker completion atomically to state.
    ///
    /// Cancellation is a no-op; a failure is logged and swallowed with no
    /// user-visible indication, per the error-handling design.
    pub fn apply_picker_event(&mut self, event: PickerEvent) {
        match event {
            PickerEvent::Image(result) => {
                self.image_pick_in_flight = false;
                match result {
                    Ok(PickOutcome::Selected(selection)) => {
                        if let Some(chat) = self.chat.as_mut() {
                            tracing::info!(uri = %selection.uri, "image staged for send");
                            chat.stage_image(selection);
                        } else {
                            tracing::debug!("image selection arrived after leaving chat");
                        }
                    }
                    Ok(PickOutcome::Cancelled) => {
                        tracing::debug!("image pick cancelled");
                    }
                    Err(e) => {
                        tracing::warn!("image picker failed: {e}");
                    }
                }
            }
            PickerEvent::File(result) => {
                self.file_pick_in_flight = false;
                match result {
                    Ok(PickOutcome::Selected(selection)) => {
                        if let Some(chat) = self.chat.as_mut() {
                            let record = chat.append_file(selection);
                            tracing::info!(id = %record.id, "file message appended");
                        } else {
                            tracing::debug!("file selection arrived after leaving chat");
                        }
                    }
                    Ok(PickOutcome::Cancelled) => {
                        tracing::debug!("file pick cancelled");
                    }
                    Err(e) => {
                        tracing::warn!("file picker failed: {e}");
                    }
                }
            }
        }
    }

    /// Handle one key press. Returns a picker request for the bridge when
    /// the key starts an attachment dialog.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PickerRequest> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global bindings first.
        if ctrl {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_exit = true;
                    return None;
                }
                KeyCode::Char('h') => {
                    self.show_help = !self.show_help;
                    return None;
                }
                KeyCode::Char('l') => {
                    self.debug_log.toggle();
                    return None;
                }
                _ => {}
            }
        }

        if self.show_help {
            // Any key dismisses the help popup.
            self.show_help = false;
            return None;
        }

        if self.debug_log.visible {
            match key.code {
                KeyCode::PageUp => self.debug_log.scroll_up(10),
                KeyCode::PageDown => self.debug_log.scroll_down(10),
                KeyCode::Up => self.debug_log.scroll_up(1),
                KeyCode::Down => self.debug_log.scroll_down(1),
                KeyCode::Esc => self.debug_log.toggle(),
                _ => {}
            }
            return None;
        }

        match self.screen {
            Screen::Roster => self.handle_roster_key(key, ctrl),
            Screen::Chat => self.handle_chat_key(key, ctrl),
        }
    }

    fn handle_roster_key(&mut self, key: KeyEvent, ctrl: bool) -> Option<PickerRequest> {
        if ctrl {
            if key.code == KeyCode::Char('u') {
                self.roster.clear_query();
            }
            return None;
        }

        match key.code {
            KeyCode::Char(c) => self.roster.insert_char(c),
            KeyCode::Backspace => self.roster.backspace(),
            KeyCode::Up => self.roster.move_up(),
            KeyCode::Down => self.roster.move_down(),
            KeyCode::Enter => self.open_selected_chat(),
            KeyCode::Esc => {
                if self.roster.query.is_empty() {
                    self.should_exit = true;
                } else {
                    self.roster.clear_query();
                }
            }
            _ => {}
        }
        None
    }

    fn handle_chat_key(&mut self, key: KeyEvent, ctrl: bool) -> Option<PickerRequest> {
        // The emoji overlay captures keys while open.
        if self.emoji.visible {
            match key.code {
                KeyCode::Left => self.emoji.move_left(),
                KeyCode::Right => self.emoji.move_right(),
                KeyCode::Up => self.emoji.move_up(),
                KeyCode::Down => self.emoji.move_down(),
                KeyCode::Enter => {
                    let glyph = self.emoji.select();
                    if let Some(chat) = self.chat.as_mut() {
                        chat.compose.append_glyph(glyph);
                    }
                }
                KeyCode::Esc => self.emoji.visible = false,
                KeyCode::Char('e') if ctrl => self.emoji.toggle(),
                _ => {}
            }
            return None;
        }

        if ctrl {
            match key.code {
                KeyCode::Char('e') => self.emoji.toggle(),
                KeyCode::Char('u') => {
                    if let Some(chat) = self.chat.as_mut() {
                        chat.compose.clear();
                    }
                }
                KeyCode::Char('g') => {
                    if self.begin_image_pick() {
                        return Some(PickerRequest::Image);
                    }
                }
                KeyCode::Char('f') => {
                    if self.begin_file_pick() {
                        return Some(PickerRequest::File);
                    }
                }
                _ => {}
            }
            return None;
        }

        if key.code == KeyCode::Esc {
            self.close_chat();
            return None;
        }

        let Some(chat) = self.chat.as_mut() else {
            return None;
        };

        match key.code {
            KeyCode::Char(c) => chat.compose.insert_char(c),
            KeyCode::Backspace => chat.compose.backspace(),
            KeyCode::Delete => chat.compose.delete(),
            KeyCode::Left => chat.compose.move_left(),
            KeyCode::Right => chat.compose.move_right(),
            KeyCode::Home => chat.compose.move_home(),
            KeyCode::End => chat.compose.move_end(),
            KeyCode::Enter => {
                if let Some(record) = chat.send_message() {
                    tracing::info!(id = %record.id, kind = record.kind_label(), "message sent");
                }
            }
            KeyCode::PageUp => chat.scroll_up(5),
            KeyCode::PageDown => chat.scroll_down(5),
            KeyCode::Up => chat.scroll_up(1),
            KeyCode::Down => chat.scroll_down(1),
            _ => {}
        }
        None
    }
}

/// Run the TUI with panic-safe terminal restore.
pub async fn run(verbose: bool) -> Result<()> {
    let ring = LogRing::new();
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(ring.clone()),
        )
        .init();

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {e:#}");
        Config::default()
    });

    // Restore the terminal before the default hook prints a panic.
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        prev_hook(info);
    }));

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, ring, config).await;
    ratatui::restore();
    result
}

async fn run_app(terminal: &mut DefaultTerminal, ring: LogRing, config: Config) -> Result<()> {
    let mut app = App::new(config.display_name(), ring);
    let mut bridge = PickerBridge::start(DialogImagePicker, DialogFilePicker);
    let mut events = EventStream::new();

    while !app.should_exit {
        app.debug_log.pump();
        terminal.draw(|frame| ui::render(frame, &app))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(request) = app.handle_key(key) {
                            bridge.request(request);
                        }
                    }
                    Some(Ok(_)) => {
                        // Resize etc. -- handled by the next draw.
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
            Some(event) = bridge.recv() => {
                app.apply_picker_event(event);
            }
            _ = tokio::time::sleep(Duration::from_millis(TICK_MS)) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageContent;
    use crate::picker::{FileSelection, ImageSelection, PickerError};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new("You".to_string(), LogRing::new())
    }

    #[test]
    fn test_same_seed_regardless_of_conversation_id() {
        let mut app = app();

        app.open_selected_chat();
        let first: Vec<String> = app
            .chat
            .as_ref()
            .unwrap()
            .messages
            .iter()
            .map(|m| format!("{:?}", m.content))
            .collect();
        let first_id = app.chat.as_ref().unwrap().conversation_id.clone();
        app.close_chat();

        app.roster.move_down();
        app.roster.move_down();
        app.open_selected_chat();
        let second: Vec<String> = app
            .chat
            .as_ref()
            .unwrap()
            .messages
            .iter()
            .map(|m| format!("{:?}", m.content))
            .collect();
        let second_id = app.chat.as_ref().unwrap().conversation_id.clone();

        assert_ne!(first_id, second_id);
        assert_eq!(first, second, "every mount starts from the same seed");
    }

    #[test]
    fn test_navigation_drops_chat_state() {
        let mut app = app();
        app.open_selected_chat();
        app.chat.as_mut().unwrap().compose.append_glyph("draft");

        app.close_chat();
        assert!(app.chat.is_none());
        assert_eq!(app.screen, Screen::Roster);

        app.open_selected_chat();
        assert!(app.chat.as_ref().unwrap().compose.input.is_empty());
    }

    #[test]
    fn test_file_event_appends_record() {
        let mut app = app();
        app.open_selected_chat();
        let before = app.chat.as_ref().unwrap().messages.len();

        app.begin_file_pick();
        app.apply_picker_event(PickerEvent::File(Ok(PickOutcome::Selected(FileSelection {
            display_name: "report.pdf".to_string(),
            uri: "file:///tmp/report.pdf".to_string(),
        }))));

        let chat = app.chat.as_ref().unwrap();
        assert_eq!(chat.messages.len(), before + 1);
        assert_eq!(
            chat.messages.last().unwrap().content,
            MessageContent::File {
                display_name: "report.pdf".to_string(),
                uri: "file:///tmp/report.pdf".to_string()
            }
        );
    }

    #[test]
    fn test_cancelled_and_failed_picks_change_nothing() {
        let mut app = app();
        app.open_selected_chat();
        let before = app.chat.as_ref().unwrap().messages.len();

        app.begin_file_pick();
        app.apply_picker_event(PickerEvent::File(Ok(PickOutcome::Cancelled)));
        assert_eq!(app.chat.as_ref().unwrap().messages.len(), before);

        app.begin_file_pick();
        app.apply_picker_event(PickerEvent::File(Err(PickerError::Backend(
            "no display".to_string(),
        ))));
        let chat = app.chat.as_ref().unwrap();
        assert_eq!(chat.messages.len(), before);
        assert!(chat.staged_image.is_none());
        assert!(app.picker_busy().is_none(), "flag cleared after failure");
    }

    #[test]
    fn test_image_event_stages_without_appending() {
        let mut app = app();
        app.open_selected_chat();
        let before = app.chat.as_ref().unwrap().messages.len();

        app.begin_image_pick();
        app.apply_picker_event(PickerEvent::Image(Ok(PickOutcome::Selected(
            ImageSelection {
                uri: "file:///tmp/pic.png".to_string(),
            },
        ))));

        let chat = app.chat.as_ref().unwrap();
        assert_eq!(chat.messages.len(), before, "staging appends nothing");
        assert!(chat.staged_image.is_some());
    }

    #[test]
    fn test_in_flight_guard_refuses_reentry() {
        let mut app = app();

        assert!(app.begin_image_pick());
        assert!(!app.begin_image_pick(), "second tap refused while open");
        // The other picker has its own flag.
        assert!(app.begin_file_pick());

        app.apply_picker_event(PickerEvent::Image(Ok(PickOutcome::Cancelled)));
        assert!(app.begin_image_pick(), "completion re-arms the picker");
    }

    #[test]
    fn test_emoji_selection_appends_and_closes() {
        let mut app = app();
        app.open_selected_chat();
        app.chat.as_mut().unwrap().compose.append_glyph("hi ");

        app.emoji.visible = true;
        app.handle_key(key(KeyCode::Enter));

        let chat = app.chat.as_ref().unwrap();
        assert_eq!(
            chat.compose.input,
            format!("hi {}", super::super::emoji::EMOJI[0])
        );
        assert!(!app.emoji.visible);
    }

    #[test]
    fn test_roster_search_end_to_end() {
        let mut app = app();
        for c in "KANIKA".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.roster.visible().len(), 1);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Chat);
        assert_eq!(app.chat.as_ref().unwrap().conversation_id, "1");
    }

    #[test]
    fn test_send_via_keys() {
        let mut app = app();
        app.open_selected_chat();
        let before = app.chat.as_ref().unwrap().messages.len();

        // Whitespace only: no-op.
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.chat.as_ref().unwrap().messages.len(), before);

        for c in "hello".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        let chat = app.chat.as_ref().unwrap();
        assert_eq!(chat.messages.len(), before + 1);
        assert_eq!(
            chat.messages.last().unwrap().content,
            MessageContent::Text {
                body: "hello".to_string()
            }
        );
    }
}
