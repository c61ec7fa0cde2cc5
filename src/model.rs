//! Data models for message-backup data.
//!
//! These structures represent the normalized form of a backup after parsing
//! the per-conversation JSON documents produced by the extractor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display name substituted for the backup owner's own messages.
pub const SELF_SENDER_LABEL: &str = "Me";

/// A conversation as read from one backup JSON document.
///
/// Message order in `messages` is whatever the extractor emitted; the
/// pipeline sorts before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Stable, file-name-safe identifier; output pages are named
    /// `chat_<id>.html`.
    pub id: String,
    /// Explicit user-assigned name from the source platform, if any.
    /// Always wins over a derived name.
    pub display_name: Option<String>,
    /// Participant identifier (phone number, handle) to display name.
    /// Keyed map iteration is id-ordered, which keeps derived names
    /// deterministic.
    pub participants: BTreeMap<String, String>,
    pub messages: Vec<Message>,
}

/// A single message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Participant identifier of the sender. Ignored when `is_from_me`.
    pub sender_id: Option<String>,
    pub is_from_me: bool,
    /// Backup-native timestamp; see [`crate::dates::normalize_timestamp`].
    pub timestamp_raw: i64,
    /// Message body. `None` or empty means no text bubble is rendered.
    pub text: Option<String>,
    /// Relative file name under the backup's `attachments/` directory.
    pub attachment_ref: Option<String>,
}

/// Rendering hint for an attachment, derived from its file name suffix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// Inlined as an `<img>` tag.
    Image,
    /// Rendered as a download link.
    Generic,
}

/// File extensions inlined as images. Classification is name-based only;
/// a mislabeled extension renders incorrectly and that is accepted.
const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

impl AttachmentKind {
    /// Classify an attachment by file name, case-insensitively.
    #[must_use]
    pub fn classify(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            Self::Image
        } else {
            Self::Generic
        }
    }
}

/// An attachment resolved for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub kind: AttachmentKind,
}

impl Attachment {
    #[must_use]
    pub fn from_ref(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            kind: AttachmentKind::classify(file_name),
        }
    }
}

/// Which side of the chat a message renders on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageSide {
    Incoming,
    Outgoing,
}

impl std::fmt::Display for MessageSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incoming => write!(f, "incoming"),
            Self::Outgoing => write!(f, "outgoing"),
        }
    }
}

/// A message after sequencing: chronological position resolved, sender name
/// and side resolved, date-bucket boundary annotated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencedMessage {
    /// Normalized Unix timestamp in seconds.
    pub timestamp: i64,
    /// True on the first message and whenever the UTC calendar date changes
    /// from the previous message.
    pub starts_new_date: bool,
    pub sender_name: String,
    pub side: MessageSide,
    pub text: Option<String>,
    pub attachment: Option<Attachment>,
}

/// Per-conversation summary data for the index page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub name: String,
    /// Normalized timestamp of the newest message; `None` for an empty
    /// conversation, which sorts after everything else on the index.
    pub last_message_at: Option<i64>,
    /// Newest non-empty message text, truncated for display.
    pub preview: String,
    pub message_count: usize,
}

/// Backup-wide statistics for the `stats` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupStats {
    pub conversation_count: usize,
    pub message_count: usize,
    pub attachment_count: usize,
    pub image_attachment_count: usize,
    pub first_message_at: Option<i64>,
    pub last_message_at: Option<i64>,
}
