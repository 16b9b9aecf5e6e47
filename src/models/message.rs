//! Message-related models

use serde::{Deserialize, Serialize};

/// Who produced a message, relative to the local user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sender {
    /// The local user (rendered right-aligned, accented).
    Me,
    /// The remote party (rendered left-aligned, neutral).
    Other,
}

/// Message payload, tagged by kind.
///
/// An explicit variant type so an invalid field combination (say, an image
/// with a text body but no uri) is unrepresentable. Every render site
/// matches exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MessageContent {
    Text { body: String },
    Image { uri: String },
    File { display_name: String, uri: String },
}

/// One unit of chat content.
///
/// Records are append-only: once in a message list they are never mutated or
/// removed, and list order is send order (oldest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    /// Unique within its conversation, monotonically increasing by creation
    /// time.
    pub id: String,
    pub sender: Sender,
    /// Pre-formatted display string ("3:04 PM"). Never parsed.
    pub timestamp_label: String,
    #[serde(flatten)]
    pub content: MessageContent,
}

impl MessageRecord {
    /// Short label for the record kind, used in status/log lines.
    pub fn kind_label(&self) -> &'static str {
        match self.content {
            MessageContent::Text { .. } => "text",
            MessageContent::Image { .. } => "image",
            MessageContent::File { .. } => "file",
        }
    }
}
