//! Mailbox-archive (mbox) adapter.
//!
//! Entries are delimited by `From ` escape lines at column zero. Each entry
//! goes through the same extraction as the single-message adapters, but with
//! batch semantics: a malformed entry is logged and skipped so the rest of
//! the archive still parses. Requires the whole archive materialized in
//! memory (the router buffers the stream before dispatch), since entry
//! boundaries are only known after scanning.

use crate::error::IngestError;
use crate::ingest::message::extract_message;
use crate::model::NormalizedMessage;

pub fn adapt(raw: &[u8]) -> Result<Vec<NormalizedMessage>, IngestError> {
    let text = String::from_utf8_lossy(raw);
    let entries = split_entries(&text);
    if entries.is_empty() {
        return Err(IngestError::MalformedMessage(
            "no mbox entries found".to_string(),
        ));
    }

    let mut records = Vec::new();
    for (idx, entry) in entries.iter().enumerate() {
        match extract_message(entry.as_bytes()) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Skipping malformed mbox entry {idx}: {e}");
            }
        }
    }
    Ok(records)
}

/// Split the archive at `From ` separator lines, dropping the separators and
/// un-escaping `>From ` body lines.
fn split_entries(text: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        if line.starts_with("From ") {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(String::new());
        } else if let Some(entry) = current.as_mut() {
            let unescaped = line.strip_prefix('>').filter(|r| r.starts_with("From "));
            match unescaped {
                Some(rest) => entry.push_str(rest),
                None => entry.push_str(line),
            }
            entry.push('\n');
        }
        // content before the first separator is not an entry
    }
    if let Some(entry) = current.take() {
        entries.push(entry);
    }
    entries
}
