//! Core transformation pipeline.
//!
//! Per conversation: sort messages chronologically, annotate date-bucket
//! boundaries, resolve sender names and sides ([`sequence_messages`]), then
//! derive the index summary ([`build_summary`]). Across conversations:
//! order summaries by recency ([`order_index`]) and aggregate backup-wide
//! stats ([`backup_stats`]).
//!
//! Every function here is pure and total: missing optional fields degrade
//! (empty preview, raw id as sender name) rather than failing, and an empty
//! conversation produces an empty sequence.

use crate::dates::{calendar_date, normalize_timestamp};
use crate::model::{
    Attachment, BackupStats, Conversation, ConversationSummary, Message, MessageSide,
    SELF_SENDER_LABEL, SequencedMessage,
};
use crate::naming::conversation_name;
use crate::truncate_chars;

/// Maximum preview length on the index page, in characters.
pub const PREVIEW_MAX_CHARS: usize = 50;

/// Suffix appended to a truncated preview.
const PREVIEW_ELLIPSIS: &str = "...";

/// Produce the chronologically ordered render sequence for a conversation.
///
/// The sort is stable, so messages with equal normalized timestamps keep
/// their original relative order. `starts_new_date` is set on the first
/// message and wherever the UTC calendar date changes.
#[must_use]
pub fn sequence_messages(conversation: &Conversation) -> Vec<SequencedMessage> {
    let mut ordered: Vec<&Message> = conversation.messages.iter().collect();
    ordered.sort_by_key(|m| normalize_timestamp(m.timestamp_raw));

    let mut sequence = Vec::with_capacity(ordered.len());
    let mut previous_date = None;

    for message in ordered {
        let timestamp = normalize_timestamp(message.timestamp_raw);
        let date = calendar_date(timestamp);
        let starts_new_date = previous_date != Some(date);
        previous_date = Some(date);

        sequence.push(SequencedMessage {
            timestamp,
            starts_new_date,
            sender_name: resolve_sender_name(conversation, message),
            side: if message.is_from_me {
                MessageSide::Outgoing
            } else {
                MessageSide::Incoming
            },
            text: message.text.clone().filter(|t| !t.is_empty()),
            attachment: message
                .attachment_ref
                .as_deref()
                .filter(|r| !r.is_empty())
                .map(Attachment::from_ref),
        });
    }

    sequence
}

/// Resolve the display name shown on a message bubble.
///
/// The owner's messages always get the fixed self label. Other senders are
/// looked up in the participant map, falling back to the raw identifier for
/// an unknown sender.
fn resolve_sender_name(conversation: &Conversation, message: &Message) -> String {
    if message.is_from_me {
        return SELF_SENDER_LABEL.to_string();
    }
    let sender_id = message.sender_id.as_deref().unwrap_or_default();
    conversation
        .participants
        .get(sender_id)
        .cloned()
        .unwrap_or_else(|| sender_id.to_string())
}

/// Build the index summary for a conversation, reusing the sequencer's
/// ordering.
#[must_use]
pub fn build_summary(conversation: &Conversation) -> ConversationSummary {
    let sequence = sequence_messages(conversation);
    summary_from_sequence(conversation, &sequence)
}

/// Build the index summary from an already-computed sequence, avoiding a
/// second sort when the caller also renders the chat page.
#[must_use]
pub fn summary_from_sequence(
    conversation: &Conversation,
    sequence: &[SequencedMessage],
) -> ConversationSummary {
    let preview = sequence
        .iter()
        .rev()
        .find_map(|m| m.text.as_deref())
        .map(truncate_preview)
        .unwrap_or_default();

    ConversationSummary {
        id: conversation.id.clone(),
        name: conversation_name(conversation),
        last_message_at: sequence.last().map(|m| m.timestamp),
        preview,
        message_count: sequence.len(),
    }
}

/// Truncate preview text to [`PREVIEW_MAX_CHARS`] characters, appending an
/// ellipsis marker only when something was cut.
fn truncate_preview(text: &str) -> String {
    match truncate_chars(text, PREVIEW_MAX_CHARS) {
        Some(cut) => format!("{cut}{PREVIEW_ELLIPSIS}"),
        None => text.to_string(),
    }
}

/// Order conversation summaries for the index page: most recent first,
/// empty conversations last, ties keeping original input order.
#[must_use]
pub fn order_index(mut summaries: Vec<ConversationSummary>) -> Vec<ConversationSummary> {
    // Descending on Option<i64> puts None last; the sort is stable.
    summaries.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
    summaries
}

/// Aggregate backup-wide statistics across all conversations.
#[must_use]
pub fn backup_stats(conversations: &[Conversation]) -> BackupStats {
    let mut stats = BackupStats {
        conversation_count: conversations.len(),
        ..BackupStats::default()
    };

    for conversation in conversations {
        for message in &conversation.messages {
            stats.message_count += 1;

            let timestamp = normalize_timestamp(message.timestamp_raw);
            stats.first_message_at = Some(match stats.first_message_at {
                Some(t) => t.min(timestamp),
                None => timestamp,
            });
            stats.last_message_at = Some(match stats.last_message_at {
                Some(t) => t.max(timestamp),
                None => timestamp,
            });

            if let Some(attachment_ref) = message.attachment_ref.as_deref() {
                if !attachment_ref.is_empty() {
                    stats.attachment_count += 1;
                    if Attachment::from_ref(attachment_ref).kind
                        == crate::model::AttachmentKind::Image
                    {
                        stats.image_attachment_count += 1;
                    }
                }
            }
        }
    }

    stats
}
