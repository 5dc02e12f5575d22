pub mod mailbox;
pub mod message;
pub mod structured;
pub mod tabular;

use crate::error::IngestError;
use crate::model::NormalizedMessage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

/// The closed set of supported source formats.
///
/// The router matches exhaustively over this enum, so a new format is a
/// compile-visible extension point rather than a silent fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    /// Tabular export (CSV).
    Csv,
    /// Raw JSON chat dump: an array of objects or a single object.
    Json,
    /// Single RFC 5322 email message.
    Eml,
    /// Single Outlook-style message.
    Msg,
    /// Multi-message mbox archive.
    Mbox,
}

impl InputFormat {
    /// Derive the format tag from a file extension (with or without the
    /// leading dot). Unknown extensions are rejected whole.
    pub fn from_extension(ext: &str) -> Result<Self, IngestError> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Ok(InputFormat::Csv),
            "json" => Ok(InputFormat::Json),
            "eml" => Ok(InputFormat::Eml),
            "msg" => Ok(InputFormat::Msg),
            "mbox" => Ok(InputFormat::Mbox),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Csv => "csv",
            InputFormat::Json => "json",
            InputFormat::Eml => "eml",
            InputFormat::Msg => "msg",
            InputFormat::Mbox => "mbox",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dispatch a fully materialized input to the adapter for `format`.
///
/// Adapter failures come back wrapped as [`IngestError::ParseFailure`] with
/// the format attached; the original cause stays in the source chain.
pub fn parse(raw: &[u8], format: InputFormat) -> Result<Vec<NormalizedMessage>, IngestError> {
    log::debug!("Parsing {} byte input as {format}", raw.len());
    let result = match format {
        InputFormat::Csv => tabular::adapt(raw),
        InputFormat::Json => structured::adapt(raw),
        InputFormat::Eml => message::adapt_eml(raw),
        InputFormat::Msg => message::adapt_msg(raw),
        InputFormat::Mbox => mailbox::adapt(raw),
    };
    match result {
        Ok(records) => {
            log::info!("Parsed {} record(s) from {format} input", records.len());
            Ok(records)
        }
        Err(e) => Err(e.into_parse_failure(format)),
    }
}

/// Read a stream to completion, then dispatch.
///
/// The underlying stream may not be seekable more than once, so the router
/// materializes a local in-memory copy before any adapter runs. The mbox
/// adapter in particular needs multi-pass access; the copy is scoped to this
/// call and dropped on every exit path.
pub fn parse_stream<R: Read>(
    mut reader: R,
    format: InputFormat,
) -> Result<Vec<NormalizedMessage>, IngestError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse(&buf, format)
}
