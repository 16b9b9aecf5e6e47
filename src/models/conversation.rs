//! Conversation summary shown on the roster screen

use serde::{Deserialize, Serialize};

/// One entry in the conversation roster: a chat thread summary.
///
/// Immutable seed data for the lifetime of the roster screen; there is no
/// creation/mutation/deletion lifecycle in this prototype.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique, stable identifier. Handed to the chat screen on selection.
    pub id: String,
    pub display_name: String,
    /// First line of the most recent message, for the roster row.
    pub last_message_preview: String,
    /// Pre-formatted display string ("12:42 PM", "Yesterday"). Never parsed.
    pub timestamp_label: String,
    /// Remote avatar reference. `None` means render the initials fallback.
    pub avatar_url: Option<String>,
}
