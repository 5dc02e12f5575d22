use crate::ingest::InputFormat;
use thiserror::Error;

/// Failures raised by the ingestion layer.
///
/// Everything past the Cleaner is a total function over well-formed input;
/// a failure there is an upstream invariant violation, not a recoverable
/// condition, so no error variants exist for the scoring stages.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The declared format tag is not in the supported set. Fatal for the
    /// whole input.
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// An adapter could not make structural sense of the input. Fatal for
    /// single-message formats; archive formats skip per-message instead.
    #[error("failed to parse {format} input")]
    ParseFailure {
        format: InputFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A single message's headers or body could not be decoded.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Wrap an adapter failure with the format it occurred in, unless it is
    /// already format-tagged.
    pub fn into_parse_failure(self, format: InputFormat) -> IngestError {
        match self {
            IngestError::ParseFailure { .. } | IngestError::UnsupportedFormat(_) => self,
            other => IngestError::ParseFailure {
                format,
                source: Box::new(other),
            },
        }
    }
}
