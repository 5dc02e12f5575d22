//! Structured-record (JSON) adapter.
//!
//! Accepts either an array of objects (one record each) or a single object.
//! Keys are matched after trim + lowercase; unrecognized keys are dropped.

use crate::error::IngestError;
use crate::model::{NormalizedMessage, UNLABELED};
use serde_json::Value;

pub fn adapt(raw: &[u8]) -> Result<Vec<NormalizedMessage>, IngestError> {
    let value: Value = serde_json::from_slice(raw).map_err(|e| IngestError::ParseFailure {
        format: crate::ingest::InputFormat::Json,
        source: Box::new(e),
    })?;

    match value {
        Value::Array(items) => items.into_iter().map(object_to_record).collect(),
        obj @ Value::Object(_) => Ok(vec![object_to_record(obj)?]),
        other => Err(IngestError::MalformedMessage(format!(
            "expected JSON object or array of objects, got {}",
            json_type_name(&other)
        ))),
    }
}

fn object_to_record(value: Value) -> Result<NormalizedMessage, IngestError> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(IngestError::MalformedMessage(format!(
                "expected JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let mut record = NormalizedMessage::default();
    for (key, val) in map {
        let text = scalar_to_string(&val);
        match key.trim().to_lowercase().as_str() {
            "sender" => record.sender = text,
            "receiver" => record.receiver = text,
            "subject" => record.subject = text,
            "message" => record.message = text,
            "timestamp" => record.timestamp = text,
            "ip" => record.ip = text,
            "label" => {
                if !text.is_empty() {
                    record.label = text;
                }
            }
            _ => {} // unrecognized fields dropped
        }
    }
    Ok(record)
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // nested structures carry no recognized field content
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
