//! Metadata feature extraction: pure, order-preserving derivation of the
//! sender domain and the three heuristic flags from a cleaned batch.
//!
//! Defaulting directions here are security policy, not accidents: a missing
//! or unparseable IP counts as external (fail-open toward suspicion), while
//! an unparseable timestamp counts as on-hours (fail-safe toward low).

use crate::config::TriageConfig;
use crate::model::{FeatureRecord, NormalizedMessage};
use chrono::Timelike;

/// Second-level suffixes where the registrable domain spans three labels
/// (`mail.example.co.uk` → `example.co.uk`).
const MULTI_PART_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "com.au", "net.au", "org.au", "co.nz", "co.jp",
    "or.jp", "ne.jp", "co.in", "com.br", "com.mx", "com.cn", "com.sg", "com.hk", "co.za",
    "com.tr", "com.ar",
];

pub fn extract(records: &[NormalizedMessage], config: &TriageConfig) -> Vec<FeatureRecord> {
    records
        .iter()
        .map(|record| FeatureRecord {
            base: record.clone(),
            sender_domain: sender_domain(&record.sender),
            off_hours_flag: off_hours_flag(&record.timestamp, config),
            keyword_flag: keyword_flag(&record.message, config),
            external_ip_flag: external_ip_flag(&record.ip, config),
        })
        .collect()
}

/// Lowercased registrable domain of the sender address. Takes the part after
/// the last `@` (the whole value when there is none), then keeps the
/// rightmost two labels, or three when the rightmost two form a known
/// multi-part public suffix. Unparseable input yields an empty string.
pub fn sender_domain(sender: &str) -> String {
    let host = match sender.rfind('@') {
        Some(pos) => &sender[pos + 1..],
        None => sender,
    };
    let host = host
        .trim()
        .trim_end_matches('>')
        .trim_end_matches('.')
        .to_lowercase();

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.is_empty() {
        return String::new();
    }
    if labels.len() <= 2 {
        return labels.join(".");
    }

    let last_two = labels[labels.len() - 2..].join(".");
    let take = if MULTI_PART_SUFFIXES.contains(&last_two.as_str()) {
        3
    } else {
        2
    };
    labels[labels.len() - take..].join(".")
}

/// 1 when the message hour falls in the configured late-night window,
/// 0 otherwise. An unparseable timestamp yields 0.
pub fn off_hours_flag(timestamp: &str, config: &TriageConfig) -> u8 {
    match parse_hour(timestamp) {
        Some(hour) if hour >= config.off_hours_start || hour <= config.off_hours_end => 1,
        _ => 0,
    }
}

/// Best-effort local hour from a loosely formatted timestamp. Email `Date`
/// headers flow through verbatim, so RFC 2822 is tried alongside the ISO
/// forms.
fn parse_hour(timestamp: &str) -> Option<u32> {
    let ts = timestamp.trim();
    if ts.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
        return Some(dt.hour());
    }
    let naive = ts.trim_end_matches('Z');
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt.hour());
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(ts) {
        return Some(dt.hour());
    }
    None
}

/// 1 when any configured phishing keyword occurs as a lowercase substring.
pub fn keyword_flag(message: &str, config: &TriageConfig) -> u8 {
    let lower = message.to_lowercase();
    config
        .keywords
        .iter()
        .any(|k| lower.contains(k.as_str()))
        .into()
}

/// 0 only when the IP starts with a configured private-range prefix; absent
/// or empty IPs are treated as external.
pub fn external_ip_flag(ip: &str, config: &TriageConfig) -> u8 {
    let private = config
        .private_ip_prefixes
        .iter()
        .any(|prefix| ip.starts_with(prefix.as_str()));
    (!private).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TriageConfig {
        TriageConfig::default()
    }

    #[test]
    fn domain_from_plain_address() {
        assert_eq!(sender_domain("user@example.com"), "example.com");
        assert_eq!(sender_domain("user@MAIL.Example.COM"), "example.com");
    }

    #[test]
    fn domain_respects_multi_part_suffixes() {
        assert_eq!(sender_domain("user@mail.example.co.uk"), "example.co.uk");
        assert_eq!(sender_domain("user@a.b.example.com.au"), "example.com.au");
    }

    #[test]
    fn domain_from_bare_host_or_angle_form() {
        assert_eq!(sender_domain("example.org"), "example.org");
        assert_eq!(sender_domain("Alice <alice@sub.example.net>"), "example.net");
        assert_eq!(sender_domain("localhost"), "localhost");
    }

    #[test]
    fn empty_sender_yields_empty_domain() {
        assert_eq!(sender_domain(""), "");
        assert_eq!(sender_domain("user@"), "");
    }

    #[test]
    fn off_hours_window_boundaries() {
        let c = config();
        assert_eq!(off_hours_flag("2024-01-01T23:00:00", &c), 1);
        assert_eq!(off_hours_flag("2024-01-01T22:00:00", &c), 1);
        assert_eq!(off_hours_flag("2024-01-01T06:00:00", &c), 1);
        assert_eq!(off_hours_flag("2024-01-01T07:00:00", &c), 0);
        assert_eq!(off_hours_flag("2024-01-01T12:30:00", &c), 0);
    }

    #[test]
    fn off_hours_accepts_common_timestamp_forms() {
        let c = config();
        assert_eq!(off_hours_flag("2024-01-01T23:00:00Z", &c), 1);
        assert_eq!(off_hours_flag("2024-01-01 23:00:00", &c), 1);
        assert_eq!(off_hours_flag("Mon, 01 Jan 2024 23:15:00 +0000", &c), 1);
    }

    #[test]
    fn unparseable_timestamp_is_on_hours() {
        let c = config();
        assert_eq!(off_hours_flag("", &c), 0);
        assert_eq!(off_hours_flag("yesterday-ish", &c), 0);
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let c = config();
        assert_eq!(keyword_flag("URGENT: act now", &c), 1);
        assert_eq!(keyword_flag("please buy a gift card today", &c), 1);
        assert_eq!(keyword_flag("see you at lunch", &c), 0);
    }

    #[test]
    fn private_ranges_are_internal_everything_else_external() {
        let c = config();
        assert_eq!(external_ip_flag("10.1.2.3", &c), 0);
        assert_eq!(external_ip_flag("192.168.0.1", &c), 0);
        assert_eq!(external_ip_flag("172.16.5.5", &c), 0);
        assert_eq!(external_ip_flag("8.8.8.8", &c), 1);
        assert_eq!(external_ip_flag("", &c), 1);
    }

    #[test]
    fn extraction_is_pure_and_order_preserving() {
        let c = config();
        let records = vec![
            NormalizedMessage {
                sender: "a@one.example".to_string(),
                message: "urgent wire".to_string(),
                timestamp: "2024-01-01T23:00:00".to_string(),
                ip: "8.8.8.8".to_string(),
                ..NormalizedMessage::default()
            },
            NormalizedMessage {
                sender: "b@two.example".to_string(),
                message: "lunch?".to_string(),
                ..NormalizedMessage::default()
            },
        ];
        let first = extract(&records, &c);
        let second = extract(&records, &c);
        assert_eq!(first, second);
        assert_eq!(first[0].base.sender, "a@one.example");
        assert_eq!(first[0].off_hours_flag, 1);
        assert_eq!(first[0].keyword_flag, 1);
        assert_eq!(first[0].external_ip_flag, 1);
        assert_eq!(first[1].keyword_flag, 0);
        assert_eq!(first[1].off_hours_flag, 0);
        assert_eq!(first[1].external_ip_flag, 1);
    }
}
