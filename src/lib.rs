//! chatsite - Static website generator for message backups
//!
//! This library transforms an extracted messaging-backup dataset (one JSON
//! document per conversation plus a directory of attachment files) into a
//! static, browsable website.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`config`] - Layered configuration
//! - [`dates`] - Timestamp normalization and calendar bucketing
//! - [`error`] - Custom error types
//! - [`model`] - Data models for backup data
//! - [`naming`] - Conversation display-name resolution
//! - [`parser`] - Backup source resolution and JSON parsing
//! - [`pipeline`] - Message sequencing, summaries, and index ordering
//! - [`render`] - Static site emission

pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod model;
pub mod naming;
pub mod parser;
pub mod pipeline;
pub mod render;

pub use cli::*;
pub use config::Config;
pub use error::{Result, SUPPORTED_ARCHIVE_EXTENSIONS, SiteError};
pub use model::*;
pub use naming::{EMPTY_CHAT_NAME, conversation_name};
pub use parser::BackupParser;
pub use pipeline::{backup_stats, build_summary, order_index, sequence_messages};
pub use render::SiteRenderer;

/// Return the prefix of `text` holding at most `max_chars` characters, or
/// `None` when nothing needs cutting. Operates on character counts, never
/// splitting a multi-byte character.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> Option<&str> {
    text.char_indices()
        .nth(max_chars)
        .map(|(idx, _)| &text[..idx])
}

#[cfg(test)]
mod tests {
    use super::truncate_chars;

    #[test]
    fn truncate_chars_returns_none_when_short_enough() {
        assert_eq!(truncate_chars("short", 50), None);
        assert_eq!(truncate_chars("", 0), None);
        assert_eq!(truncate_chars("exact", 5), None);
    }

    #[test]
    fn truncate_chars_cuts_at_character_count() {
        assert_eq!(truncate_chars("abcdef", 3), Some("abc"));
    }

    #[test]
    fn truncate_chars_respects_multibyte_boundaries() {
        let text = "héllo wörld, this has accents";
        assert_eq!(truncate_chars(text, 4), Some("héll"));
    }
}
