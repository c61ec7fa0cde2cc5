//! Backup source resolution and conversation parsing.
//!
//! A backup source is either an already-extracted directory or a `.zip`
//! archive of one; both contain a `chats/` directory of per-conversation
//! JSON documents and an `attachments/` directory of files. Parsing is
//! tolerant: malformed fields degrade to defaults and malformed chat files
//! are logged and skipped.

use crate::error::{Result, SiteError};
use crate::model::{Conversation, Message};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const CHATS_DIR: &str = "chats";
const ATTACHMENTS_DIR: &str = "attachments";

/// Parser for an extracted (or archived) message backup.
#[derive(Debug)]
pub struct BackupParser {
    backup_root: PathBuf,
    // Keeps the extraction directory alive for archive sources.
    _extracted: Option<TempDir>,
}

impl BackupParser {
    /// Open a backup source.
    ///
    /// Directories are used in place. A `.zip` file is extracted to a
    /// temporary directory that lives as long as the parser. Any other
    /// file extension is rejected with [`SiteError::UnsupportedFormat`].
    pub fn open(source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref();
        if !source.exists() {
            return Err(SiteError::backup_not_found(source));
        }

        let (backup_root, extracted) = if source.is_dir() {
            (source.to_path_buf(), None)
        } else {
            let extension = source
                .extension()
                .and_then(|e| e.to_str())
                .map_or_else(|| "(none)".to_string(), |e| format!(".{}", e.to_lowercase()));
            if extension != ".zip" {
                return Err(SiteError::unsupported_format(extension));
            }
            let temp = Self::extract_zip(source)?;
            let root = temp.path().to_path_buf();
            (root, Some(temp))
        };

        let chats_dir = backup_root.join(CHATS_DIR);
        if !chats_dir.is_dir() {
            return Err(SiteError::missing_backup_dir(CHATS_DIR, &backup_root));
        }

        Ok(Self {
            backup_root,
            _extracted: extracted,
        })
    }

    fn extract_zip(path: &Path) -> Result<TempDir> {
        info!("Extracting backup archive {}", path.display());
        let file =
            fs::File::open(path).map_err(|e| SiteError::path_error("open archive", path, e))?;
        let mut archive = zip::ZipArchive::new(file)?;
        let temp = TempDir::new()?;
        archive.extract(temp.path())?;
        debug!("Extracted {} entries", archive.len());
        Ok(temp)
    }

    /// Directory holding the backup's attachment files.
    #[must_use]
    pub fn attachments_dir(&self) -> PathBuf {
        self.backup_root.join(ATTACHMENTS_DIR)
    }

    /// List the conversation JSON files, sorted by file name so input order
    /// is deterministic across runs.
    pub fn list_chat_files(&self) -> Result<Vec<PathBuf>> {
        let chats_dir = self.backup_root.join(CHATS_DIR);
        let mut files = Vec::new();

        for entry in WalkDir::new(&chats_dir).max_depth(1) {
            let entry = entry.map_err(|e| SiteError::Other(e.into()))?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "json")
            {
                files.push(entry.path().to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Load all conversations from the backup.
    ///
    /// Files that fail to read or parse are skipped with a warning rather
    /// than aborting the run.
    pub fn load_conversations(&self) -> Result<Vec<Conversation>> {
        let files = self.list_chat_files()?;
        info!("Loading {} conversation files", files.len());

        let mut conversations = Vec::with_capacity(files.len());
        for file in &files {
            let content = match fs::read_to_string(file) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable chat file {}: {}", file.display(), e);
                    continue;
                }
            };
            let value: Value = match serde_json::from_str(&content) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Skipping malformed chat file {}: {}", file.display(), e);
                    continue;
                }
            };
            match parse_conversation(&value) {
                Some(conversation) => conversations.push(conversation),
                None => warn!("Skipping chat file without chat_id: {}", file.display()),
            }
        }

        info!("Loaded {} conversations", conversations.len());
        Ok(conversations)
    }
}

/// Parse one conversation document. Returns `None` only when the record has
/// no usable `chat_id`; everything else degrades to defaults.
fn parse_conversation(value: &Value) -> Option<Conversation> {
    // The extractor writes chat_id as a number; accept strings too.
    let id = match &value["chat_id"] {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let display_name = value["display_name"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from);

    let participants: BTreeMap<String, String> = value["participants"]
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(id, name)| {
                    (
                        id.clone(),
                        name.as_str().unwrap_or(id.as_str()).to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let messages: Vec<Message> = value["messages"]
        .as_array()
        .map(|items| items.iter().map(parse_message).collect())
        .unwrap_or_default();

    Some(Conversation {
        id,
        display_name,
        participants,
        messages,
    })
}

fn parse_message(value: &Value) -> Message {
    Message {
        sender_id: value["sender"].as_str().map(String::from),
        is_from_me: value["is_from_me"].as_bool().unwrap_or(false),
        timestamp_raw: value["date"].as_i64().unwrap_or(0),
        text: value["text"].as_str().map(String::from),
        attachment_ref: value["attachment_path"].as_str().map(String::from),
    }
}
