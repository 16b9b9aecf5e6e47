//! Mock seed data for the prototype screens.
//!
//! Returned as fresh values and injected into screen-state constructors, so
//! no screen shares mutable state with another through a process-wide
//! singleton.

use super::{Conversation, MessageContent, MessageRecord, Sender};

/// The fixed five-entry conversation roster.
pub fn seed_conversations() -> Vec<Conversation> {
    vec![
        Conversation {
            id: "1".to_string(),
            display_name: "Kanika Singh".to_string(),
            last_message_preview: "Alright, I have booked our tickets. See you at the movies."
                .to_string(),
            timestamp_label: "12:42 PM".to_string(),
            avatar_url: Some("https://via.placeholder.com/50".to_string()),
        },
        Conversation {
            id: "2".to_string(),
            display_name: "Abhishek M.".to_string(),
            last_message_preview: "Hey! Just a reminder about dinner plans.".to_string(),
            timestamp_label: "Yesterday".to_string(),
            avatar_url: Some("https://via.placeholder.com/50".to_string()),
        },
        Conversation {
            id: "3".to_string(),
            display_name: "Himanshi".to_string(),
            last_message_preview: "Good morning! Hope you're doing well.".to_string(),
            timestamp_label: "Wed".to_string(),
            avatar_url: None,
        },
        Conversation {
            id: "4".to_string(),
            display_name: "Aman".to_string(),
            last_message_preview: "I came across an interesting article.".to_string(),
            timestamp_label: "19/09".to_string(),
            avatar_url: Some("https://via.placeholder.com/50".to_string()),
        },
        Conversation {
            id: "5".to_string(),
            display_name: "Nikita".to_string(),
            last_message_preview: "Let's choose the first option.".to_string(),
            timestamp_label: "19/09".to_string(),
            avatar_url: None,
        },
    ]
}

/// The two-message seed every chat mount starts from.
pub fn seed_messages() -> Vec<MessageRecord> {
    vec![
        MessageRecord {
            id: "1".to_string(),
            sender: Sender::Other,
            timestamp_label: "12:40 PM".to_string(),
            content: MessageContent::Text {
                body: "Alright, I have booked our tickets. See you at the movies.".to_string(),
            },
        },
        MessageRecord {
            id: "2".to_string(),
            sender: Sender::Me,
            timestamp_label: "12:42 PM".to_string(),
            content: MessageContent::Text {
                body: "Perfect, see you there!".to_string(),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_conversations_are_unique() {
        let seed = seed_conversations();
        assert_eq!(seed.len(), 5);

        let mut ids: Vec<&str> = seed.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_seed_messages_order() {
        let seed = seed_messages();
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].sender, Sender::Other);
        assert_eq!(seed[1].sender, Sender::Me);
    }
}
