//! Conversation display-name resolution.
//!
//! A conversation with an explicit display name keeps it verbatim. Otherwise
//! the name is derived from participant display names, compacted for group
//! chats.

use crate::model::{Conversation, SELF_SENDER_LABEL};

/// Name used when a conversation has no participants besides the owner.
pub const EMPTY_CHAT_NAME: &str = "Empty Chat";

/// Group chats list at most this many participants before collapsing to a
/// head-count suffix.
const MAX_NAMED_PARTICIPANTS: usize = 3;

/// Resolve the display name for a conversation. Total, never fails.
///
/// Priority: explicit override first; otherwise participant display names
/// in id order with the self label removed, joined per the group-size rules.
#[must_use]
pub fn conversation_name(conversation: &Conversation) -> String {
    if let Some(name) = &conversation.display_name {
        if !name.is_empty() {
            return name.clone();
        }
    }

    // The owner's own label never counts toward the derived name.
    let names: Vec<&str> = conversation
        .participants
        .values()
        .map(String::as_str)
        .filter(|name| *name != SELF_SENDER_LABEL)
        .collect();

    match names.len() {
        0 => EMPTY_CHAT_NAME.to_string(),
        1 => names[0].to_string(),
        n if n <= MAX_NAMED_PARTICIPANTS => names.join(", "),
        n => format!(
            "{} ... ({n} people)",
            names[..MAX_NAMED_PARTICIPANTS].join(", ")
        ),
    }
}
