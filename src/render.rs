//! Static site emission.
//!
//! Consumes the pipeline's normalized per-conversation sequences and the
//! ordered index list, and writes the site: `index.html`, one
//! `chats/chat_<id>.html` per conversation, copied attachments, and the
//! CSS/JS assets. All user-provided text is HTML-escaped on the way out.

use crate::dates::{format_date, format_date_time, format_time};
use crate::error::{Result, SiteError};
use crate::model::{AttachmentKind, ConversationSummary, SequencedMessage};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const STYLE_CSS: &str = include_str!("assets/style.css");
const SCRIPT_JS: &str = include_str!("assets/script.js");

/// Writes the generated site under a fixed output layout.
pub struct SiteRenderer {
    out_dir: PathBuf,
}

impl SiteRenderer {
    /// Create a renderer and the output directory structure.
    pub fn create(out_dir: impl AsRef<Path>) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        for dir in ["css", "js", "attachments", "chats"] {
            let path = out_dir.join(dir);
            fs::create_dir_all(&path)
                .map_err(|e| SiteError::path_error("create directory", path, e))?;
        }
        Ok(Self { out_dir })
    }

    /// Path the generated index page will be written to.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.out_dir.join("index.html")
    }

    /// Write the CSS and JS assets.
    pub fn write_assets(&self) -> Result<()> {
        let css = self.out_dir.join("css").join("style.css");
        fs::write(&css, STYLE_CSS).map_err(|e| SiteError::path_error("write", css, e))?;
        let js = self.out_dir.join("js").join("script.js");
        fs::write(&js, SCRIPT_JS).map_err(|e| SiteError::path_error("write", js, e))?;
        Ok(())
    }

    /// Copy every attachment file into the site's `attachments/` directory.
    /// Returns the number of files copied; unreadable files are logged and
    /// skipped, matching the extractor's own print-and-continue policy.
    pub fn copy_attachments(&self, source_dir: &Path) -> Result<usize> {
        if !source_dir.is_dir() {
            debug!("No attachments directory at {}", source_dir.display());
            return Ok(0);
        }

        let dest_dir = self.out_dir.join("attachments");
        let mut copied = 0;
        for entry in WalkDir::new(source_dir).max_depth(1) {
            let entry = entry.map_err(|e| SiteError::Other(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let dest = dest_dir.join(entry.file_name());
            match fs::copy(entry.path(), &dest) {
                Ok(_) => copied += 1,
                Err(e) => warn!(
                    "Failed to copy attachment {}: {}",
                    entry.path().display(),
                    e
                ),
            }
        }
        Ok(copied)
    }

    /// Write the page for one conversation.
    ///
    /// References to attachments with no backing file under
    /// `attachments_src` are logged but still rendered, so one missing
    /// file never breaks a page.
    pub fn write_chat_page(
        &self,
        id: &str,
        name: &str,
        participant_names: &[String],
        sequence: &[SequencedMessage],
        attachments_src: &Path,
    ) -> Result<()> {
        for message in sequence {
            if let Some(attachment) = &message.attachment {
                if !attachments_src.join(&attachment.file_name).is_file() {
                    warn!(
                        "Attachment '{}' referenced by chat {} has no backing file",
                        attachment.file_name, id
                    );
                }
            }
        }
        let html = chat_page_html(name, participant_names, sequence);
        let path = self.out_dir.join("chats").join(format!("chat_{id}.html"));
        fs::write(&path, html).map_err(|e| SiteError::path_error("write", path, e))
    }

    /// Write the index page from already-ordered summaries.
    pub fn write_index(&self, summaries: &[ConversationSummary]) -> Result<()> {
        let html = index_html(summaries);
        let path = self.index_path();
        fs::write(&path, html).map_err(|e| SiteError::path_error("write", path, e))
    }
}

/// Escape text for inclusion in HTML element content and attribute values.
#[must_use]
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn chat_page_html(name: &str, participant_names: &[String], sequence: &[SequencedMessage]) -> String {
    let escaped_name = html_escape(name);
    let participants = html_escape(&participant_names.join(", "));

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Chat: {escaped_name}</title>
    <link rel="stylesheet" href="../css/style.css">
</head>
<body>
    <div class="chat-container">
        <header>
            <a href="../index.html" class="back-button">&larr; Back to Chats</a>
            <h1>{escaped_name}</h1>
            <div class="participants">
                {participants}
            </div>
        </header>
        <div class="messages">
"#
    );

    for message in sequence {
        if message.starts_new_date {
            let _ = writeln!(
                html,
                r#"            <div class="date-divider">{}</div>"#,
                format_date(message.timestamp)
            );
        }

        let _ = writeln!(html, r#"            <div class="message-{}">"#, message.side);
        html.push_str("                <div class=\"message-header\">\n");
        let _ = writeln!(
            html,
            r#"                    <span class="sender">{}</span>"#,
            html_escape(&message.sender_name)
        );
        let _ = writeln!(
            html,
            r#"                    <span class="time">{}</span>"#,
            format_time(message.timestamp)
        );
        html.push_str("                </div>\n");
        html.push_str("                <div class=\"message-content\">\n");

        if let Some(text) = &message.text {
            let _ = writeln!(html, "                    <p>{}</p>", html_escape(text));
        }

        if let Some(attachment) = &message.attachment {
            let href = format!("../attachments/{}", html_escape(&attachment.file_name));
            match attachment.kind {
                AttachmentKind::Image => {
                    let _ = writeln!(
                        html,
                        r#"                    <img src="{href}" alt="Attachment" class="message-image">"#
                    );
                }
                AttachmentKind::Generic => {
                    let _ = writeln!(
                        html,
                        r#"                    <a href="{href}" class="attachment-link">Attachment: {}</a>"#,
                        html_escape(&attachment.file_name)
                    );
                }
            }
        }

        html.push_str("                </div>\n");
        html.push_str("            </div>\n");
    }

    html.push_str(
        r#"        </div>
    </div>
    <script src="../js/script.js"></script>
</body>
</html>"#,
    );

    html
}

fn index_html(summaries: &[ConversationSummary]) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Message Backup</title>
    <link rel="stylesheet" href="css/style.css">
</head>
<body>
    <div class="container">
        <header class="main-header">
            <h1>Message Backup</h1>
            <p>Your backed up conversations</p>
        </header>
        <div class="search-bar">
            <input type="text" id="chat-search" placeholder="Search chats...">
        </div>
        <div class="chat-list">
"#,
    );

    for summary in summaries {
        let date = summary
            .last_message_at
            .map(format_date_time)
            .unwrap_or_default();
        let _ = writeln!(
            html,
            r#"            <a href="chats/chat_{id}.html" class="chat-item">
                <div class="chat-info">
                    <h2 class="chat-name">{name}</h2>
                    <p class="chat-preview">{preview}</p>
                </div>
                <div class="chat-date">{date}</div>
            </a>"#,
            id = html_escape(&summary.id),
            name = html_escape(&summary.name),
            preview = html_escape(&summary.preview),
        );
    }

    html.push_str(
        r#"        </div>
    </div>
    <script src="js/script.js"></script>
</body>
</html>"#,
    );

    html
}
