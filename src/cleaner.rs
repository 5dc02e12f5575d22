//! Post-ingestion cleanup: whitespace normalization, blank-message drop, and
//! exact-duplicate removal. Output satisfies the [`NormalizedMessage`]
//! invariant and cleaning is idempotent.

use crate::model::NormalizedMessage;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse newlines and runs of whitespace to single spaces, then trim.
pub fn clean_text(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").trim().to_string()
}

/// Clean a parsed batch, in order: normalize text fields, drop records with
/// an empty message, dedup by exact post-normalization message equality
/// (first occurrence wins, stable), re-index contiguously.
pub fn clean(records: Vec<NormalizedMessage>) -> Vec<NormalizedMessage> {
    let before = records.len();
    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(before);

    for mut record in records {
        record.sender = clean_text(&record.sender);
        record.receiver = clean_text(&record.receiver);
        record.subject = clean_text(&record.subject);
        record.message = clean_text(&record.message);
        record.timestamp = clean_text(&record.timestamp);
        record.ip = clean_text(&record.ip);
        record.label = clean_text(&record.label);

        if record.message.is_empty() {
            continue;
        }
        if !seen.insert(record.message.clone()) {
            continue;
        }
        cleaned.push(record);
    }

    if cleaned.len() < before {
        log::debug!(
            "Cleaner dropped {} of {before} record(s)",
            before - cleaned.len()
        );
    }
    cleaned
}
