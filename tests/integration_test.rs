//! Integration tests for chatsite.
//!
//! These tests verify end-to-end functionality including:
//! - Backup parsing from a fixture directory tree
//! - Sequencing, summarizing, and index ordering
//! - Site rendering to disk

use chatsite::{
    dates::PLATFORM_EPOCH_OFFSET,
    model::*,
    parser::BackupParser,
    pipeline::{build_summary, order_index, sequence_messages},
    render::SiteRenderer,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const DAY: i64 = 86_400;

/// Create a backup directory with two conversations and one attachment.
fn create_test_backup(dir: &TempDir) -> PathBuf {
    let chats_dir = dir.path().join("chats");
    let attachments_dir = dir.path().join("attachments");
    fs::create_dir_all(&chats_dir).unwrap();
    fs::create_dir_all(&attachments_dir).unwrap();

    // A one-on-one chat spanning two days with an image attachment.
    let chat_1 = r#"{
        "chat_id": 1,
        "chat_identifier": "+15551234567",
        "display_name": null,
        "last_message_date": 86400,
        "participants": {"+15551234567": "Alice"},
        "messages": [
            {
                "id": 11,
                "date": 86400,
                "sender": "+15551234567",
                "is_from_me": false,
                "text": "see you tomorrow",
                "attachment_path": null
            },
            {
                "id": 10,
                "date": 60,
                "sender": "+15551234567",
                "is_from_me": false,
                "text": "hello there",
                "attachment_path": null
            },
            {
                "id": 12,
                "date": 90000,
                "sender": null,
                "is_from_me": true,
                "text": null,
                "attachment_path": "ABCD-photo.jpg"
            }
        ]
    }"#;
    fs::write(chats_dir.join("chat_1.json"), chat_1).unwrap();

    // A named group chat, more recent than chat 1.
    let chat_2 = r#"{
        "chat_id": 2,
        "chat_identifier": "chat200000002",
        "display_name": "Weekend Plans",
        "last_message_date": 200000,
        "participants": {"+15551234567": "Alice", "+15559876543": "Bob"},
        "messages": [
            {
                "id": 20,
                "date": 200000,
                "sender": "+15559876543",
                "is_from_me": false,
                "text": "who is bringing the snacks to the party on saturday afternoon?",
                "attachment_path": null
            }
        ]
    }"#;
    fs::write(chats_dir.join("chat_2.json"), chat_2).unwrap();

    // A conversation with no messages sorts last on the index.
    let chat_3 = r#"{
        "chat_id": 3,
        "chat_identifier": "+15550000000",
        "display_name": null,
        "last_message_date": 0,
        "participants": {"+15550000000": "Me"},
        "messages": []
    }"#;
    fs::write(chats_dir.join("chat_3.json"), chat_3).unwrap();

    fs::write(attachments_dir.join("ABCD-photo.jpg"), b"not a real jpeg").unwrap();

    dir.path().to_path_buf()
}

#[test]
fn test_full_pipeline_from_backup_dir() {
    let temp_dir = TempDir::new().unwrap();
    let backup_path = create_test_backup(&temp_dir);

    let parser = BackupParser::open(&backup_path).unwrap();
    let conversations = parser.load_conversations().unwrap();
    assert_eq!(conversations.len(), 3);

    // Chat files are loaded in name order.
    let chat_1 = &conversations[0];
    assert_eq!(chat_1.id, "1");

    let sequence = sequence_messages(chat_1);
    assert_eq!(sequence.len(), 3);

    // Chronological despite the shuffled input order.
    let texts: Vec<_> = sequence.iter().map(|m| m.text.as_deref()).collect();
    assert_eq!(texts, [Some("hello there"), Some("see you tomorrow"), None]);

    // Dividers on days one and two; the third message shares day two.
    let boundaries: Vec<_> = sequence.iter().map(|m| m.starts_new_date).collect();
    assert_eq!(boundaries, [true, true, false]);

    assert_eq!(sequence[0].sender_name, "Alice");
    assert_eq!(sequence[2].sender_name, "Me");
    assert_eq!(sequence[2].side, MessageSide::Outgoing);
    let attachment = sequence[2].attachment.as_ref().unwrap();
    assert_eq!(attachment.kind, AttachmentKind::Image);
}

#[test]
fn test_summaries_and_index_ordering() {
    let temp_dir = TempDir::new().unwrap();
    let backup_path = create_test_backup(&temp_dir);

    let parser = BackupParser::open(&backup_path).unwrap();
    let conversations = parser.load_conversations().unwrap();

    let summaries: Vec<_> = conversations.iter().map(build_summary).collect();
    let ordered = order_index(summaries);

    // Most recent first, empty conversation last.
    let ids: Vec<_> = ordered.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["2", "1", "3"]);

    let weekend = &ordered[0];
    assert_eq!(weekend.name, "Weekend Plans");
    assert_eq!(
        weekend.last_message_at,
        Some(200_000 + PLATFORM_EPOCH_OFFSET)
    );
    // 62-character text truncates to 50 plus the marker.
    assert_eq!(
        weekend.preview,
        "who is bringing the snacks to the party on saturda..."
    );

    let alice = &ordered[1];
    assert_eq!(alice.name, "Alice");
    // The attachment-only message contributes no preview text.
    assert_eq!(alice.preview, "see you tomorrow");

    let empty = &ordered[2];
    assert_eq!(empty.name, "Empty Chat");
    assert_eq!(empty.last_message_at, None);
    assert_eq!(empty.preview, "");
}

#[test]
fn test_site_rendering_writes_all_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let backup_path = create_test_backup(&temp_dir);
    let out_dir = temp_dir.path().join("site");

    let parser = BackupParser::open(&backup_path).unwrap();
    let conversations = parser.load_conversations().unwrap();
    let renderer = SiteRenderer::create(&out_dir).unwrap();

    let copied = renderer.copy_attachments(&parser.attachments_dir()).unwrap();
    assert_eq!(copied, 1);
    assert!(out_dir.join("attachments").join("ABCD-photo.jpg").exists());

    let mut summaries = Vec::new();
    for conversation in &conversations {
        let sequence = sequence_messages(conversation);
        let participant_names: Vec<String> =
            conversation.participants.values().cloned().collect();
        renderer
            .write_chat_page(
                &conversation.id,
                &chatsite::conversation_name(conversation),
                &participant_names,
                &sequence,
                &parser.attachments_dir(),
            )
            .unwrap();
        summaries.push(build_summary(conversation));
    }
    renderer.write_index(&order_index(summaries)).unwrap();
    renderer.write_assets().unwrap();

    assert!(out_dir.join("index.html").exists());
    assert!(out_dir.join("css").join("style.css").exists());
    assert!(out_dir.join("js").join("script.js").exists());
    for id in ["1", "2", "3"] {
        assert!(out_dir.join("chats").join(format!("chat_{id}.html")).exists());
    }

    let index = fs::read_to_string(out_dir.join("index.html")).unwrap();
    let weekend_pos = index.find("Weekend Plans").unwrap();
    let alice_pos = index.find("Alice").unwrap();
    let empty_pos = index.find("Empty Chat").unwrap();
    assert!(weekend_pos < alice_pos);
    assert!(alice_pos < empty_pos);

    let chat_page = fs::read_to_string(out_dir.join("chats").join("chat_1.html")).unwrap();
    assert!(chat_page.contains("message-incoming"));
    assert!(chat_page.contains("message-outgoing"));
    assert!(chat_page.contains(r#"<img src="../attachments/ABCD-photo.jpg""#));
    assert_eq!(chat_page.matches("date-divider").count(), 2);
}

#[test]
fn test_zip_backup_source() {
    let temp_dir = TempDir::new().unwrap();
    let backup_path = create_test_backup(&temp_dir);

    // Zip the backup tree the way the extractor would.
    let archive_path = temp_dir.path().join("backup.zip");
    let file = fs::File::create(&archive_path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for entry in walkdir::WalkDir::new(&backup_path).min_depth(1) {
        let entry = entry.unwrap();
        let relative = entry.path().strip_prefix(&backup_path).unwrap();
        if entry.file_type().is_dir() {
            zip.add_directory(relative.to_string_lossy(), options).unwrap();
        } else {
            use std::io::Write;
            zip.start_file(relative.to_string_lossy(), options).unwrap();
            zip.write_all(&fs::read(entry.path()).unwrap()).unwrap();
        }
    }
    zip.finish().unwrap();

    let parser = BackupParser::open(&archive_path).unwrap();
    let conversations = parser.load_conversations().unwrap();
    assert_eq!(conversations.len(), 3);
    assert!(parser.attachments_dir().join("ABCD-photo.jpg").exists());
}

#[test]
fn test_empty_backup() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("chats")).unwrap();

    let parser = BackupParser::open(temp_dir.path()).unwrap();
    let conversations = parser.load_conversations().unwrap();
    assert!(conversations.is_empty());

    let ordered = order_index(vec![]);
    assert!(ordered.is_empty());
}

#[test]
fn test_equal_timestamps_keep_input_order() {
    let temp_dir = TempDir::new().unwrap();
    let chats_dir = temp_dir.path().join("chats");
    fs::create_dir_all(&chats_dir).unwrap();

    let chat = format!(
        r#"{{
            "chat_id": 5,
            "participants": {{"+15551234567": "Alice"}},
            "messages": [
                {{"id": 1, "date": {d}, "sender": "+15551234567", "is_from_me": false, "text": "first", "attachment_path": null}},
                {{"id": 2, "date": {d}, "sender": "+15551234567", "is_from_me": false, "text": "second", "attachment_path": null}}
            ]
        }}"#,
        d = DAY
    );
    fs::write(chats_dir.join("chat_5.json"), chat).unwrap();

    let parser = BackupParser::open(temp_dir.path()).unwrap();
    let conversations = parser.load_conversations().unwrap();
    let sequence = sequence_messages(&conversations[0]);
    let texts: Vec<_> = sequence.iter().map(|m| m.text.as_deref().unwrap()).collect();
    assert_eq!(texts, ["first", "second"]);
}
