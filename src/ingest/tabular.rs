//! Tabular (CSV) adapter.
//!
//! Column names are matched after trim + lowercase. A row missing a
//! recognized column yields the absent sentinel for that field instead of
//! failing the whole parse; unrecognized columns are dropped.

use crate::error::IngestError;
use crate::model::{NormalizedMessage, UNLABELED};

pub fn adapt(raw: &[u8]) -> Result<Vec<NormalizedMessage>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(raw);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::ParseFailure {
            format: crate::ingest::InputFormat::Csv,
            source: Box::new(e),
        })?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let col_sender = column("sender");
    let col_receiver = column("receiver");
    let col_subject = column("subject");
    let col_message = column("message");
    let col_timestamp = column("timestamp");
    let col_ip = column("ip");
    let col_label = column("label");

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| IngestError::ParseFailure {
            format: crate::ingest::InputFormat::Csv,
            source: Box::new(e),
        })?;
        let field = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(|v| v.to_string())
                .unwrap_or_default()
        };
        let label = match field(col_label) {
            l if l.is_empty() => UNLABELED.to_string(),
            l => l,
        };
        records.push(NormalizedMessage {
            sender: field(col_sender),
            receiver: field(col_receiver),
            subject: field(col_subject),
            message: field(col_message),
            timestamp: field(col_timestamp),
            ip: field(col_ip),
            label,
        });
    }
    Ok(records)
}
