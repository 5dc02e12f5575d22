//! Single-message adapters (EML and Outlook-style MSG).
//!
//! Header values are copied verbatim (`From`→sender, `To`→receiver,
//! `Subject`→subject, `Date`→timestamp); date normalization is deferred to
//! the feature stage. Body extraction concatenates every plain-text part,
//! top-level and nested, in document order without deduplication. These
//! formats carry no network-origin metadata, so `ip` stays empty and `label`
//! defaults to the unlabeled sentinel.

use crate::error::IngestError;
use crate::model::NormalizedMessage;
use mail_parser::MessageParser;

pub fn adapt_eml(raw: &[u8]) -> Result<Vec<NormalizedMessage>, IngestError> {
    Ok(vec![extract(raw, false)?])
}

/// Outlook-style messages use the same header/body extraction; exports write
/// `Sent` where RFC messages write `Date`, so that alias fills a missing
/// timestamp.
pub fn adapt_msg(raw: &[u8]) -> Result<Vec<NormalizedMessage>, IngestError> {
    Ok(vec![extract(raw, true)?])
}

/// Shared per-message extraction, also used entry-by-entry by the mbox
/// adapter.
pub(crate) fn extract_message(raw: &[u8]) -> Result<NormalizedMessage, IngestError> {
    extract(raw, false)
}

fn extract(raw: &[u8], sent_alias: bool) -> Result<NormalizedMessage, IngestError> {
    let msg = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| IngestError::MalformedMessage("undecodable message structure".to_string()))?;

    let header = |name: &str| {
        msg.header_raw(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    // All plain-text parts, document order, no deduplication. The text-body
    // part list also carries HTML parts (converted to text), which do not
    // belong in the message body.
    let mut body = String::new();
    for id in &msg.text_body {
        if let Some(part) = msg.part(*id) {
            if part.is_text_html() {
                continue;
            }
            if let Some(text) = part.text_contents() {
                body.push_str(text);
            }
        }
    }

    let mut timestamp = header("Date");
    if timestamp.is_empty() && sent_alias {
        timestamp = header("Sent");
    }

    let record = NormalizedMessage {
        sender: header("From"),
        receiver: header("To"),
        subject: header("Subject"),
        message: body.trim().to_string(),
        timestamp,
        ..NormalizedMessage::default()
    };

    if record.message.is_empty() && msg.headers().is_empty() {
        return Err(IngestError::MalformedMessage(
            "no decodable headers or body".to_string(),
        ));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNLABELED;

    const SIMPLE_EML: &str = "From: alice@example.com\r\n\
                              To: bob@example.com\r\n\
                              Subject: Quarterly invoice\r\n\
                              Date: Mon, 01 Jan 2024 23:15:00 +0000\r\n\
                              Content-Type: text/plain\r\n\
                              \r\n\
                              Please see the attached invoice.\r\n";

    #[test]
    fn eml_yields_exactly_one_record() {
        let records = adapt_eml(SIMPLE_EML.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.sender, "alice@example.com");
        assert_eq!(r.receiver, "bob@example.com");
        assert_eq!(r.subject, "Quarterly invoice");
        assert_eq!(r.timestamp, "Mon, 01 Jan 2024 23:15:00 +0000");
        assert_eq!(r.message, "Please see the attached invoice.");
        assert_eq!(r.ip, "");
        assert_eq!(r.label, UNLABELED);
    }

    #[test]
    fn multipart_text_parts_concatenated_in_order() {
        let eml = "From: a@x.com\r\n\
                   Subject: parts\r\n\
                   Content-Type: multipart/mixed; boundary=\"b\"\r\n\
                   \r\n\
                   --b\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   first part\r\n\
                   --b\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   <p>ignored html</p>\r\n\
                   --b\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   second part\r\n\
                   --b--\r\n";
        let records = adapt_eml(eml.as_bytes()).unwrap();
        let body = &records[0].message;
        let first = body.find("first part").expect("first part present");
        let second = body.find("second part").expect("second part present");
        assert!(first < second);
        assert!(!body.contains("ignored html"));
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(adapt_eml(b"").is_err());
    }

    #[test]
    fn msg_sent_header_fills_timestamp() {
        let export = "From: carol@corp.example\r\n\
                      To: dave@corp.example\r\n\
                      Subject: Wire transfer\r\n\
                      Sent: 2024-02-02 23:30:00\r\n\
                      \r\n\
                      Please wire the funds immediately.\r\n";
        let records = adapt_msg(export.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.sender, "carol@corp.example");
        assert_eq!(r.timestamp, "2024-02-02 23:30:00");
        assert_eq!(r.message, "Please wire the funds immediately.");
    }

    #[test]
    fn msg_prefers_date_over_sent() {
        let export = "From: carol@corp.example\r\n\
                      Date: Fri, 02 Feb 2024 10:00:00 +0000\r\n\
                      Sent: 2024-02-02 23:30:00\r\n\
                      \r\n\
                      body\r\n";
        let records = adapt_msg(export.as_bytes()).unwrap();
        assert_eq!(records[0].timestamp, "Fri, 02 Feb 2024 10:00:00 +0000");
    }
}
