//! Export of a scored record set: flat CSV, JSON, and a plain-text summary.

use crate::model::{RiskLevel, ScoredRecord};
use anyhow::Context;

const CSV_HEADER: &str = "sender,receiver,subject,message,timestamp,ip,label,\
                          sender_domain,off_hours_flag,keyword_flag,external_ip_flag,\
                          nlp_prob,metadata_score,threat_score,risk";

pub fn to_csv(records: &[ScoredRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for r in records {
        let base = &r.features.base;
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{:.4},{:.4},{:.4},{}\n",
            escape(&base.sender),
            escape(&base.receiver),
            escape(&base.subject),
            escape(&base.message),
            escape(&base.timestamp),
            escape(&base.ip),
            escape(&base.label),
            escape(&r.features.sender_domain),
            r.features.off_hours_flag,
            r.features.keyword_flag,
            r.features.external_ip_flag,
            r.nlp_prob,
            r.metadata_score,
            r.threat_score,
            r.risk,
        ));
    }
    out
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn to_json(records: &[ScoredRecord]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize scored records")
}

/// Human-readable pass summary: bucket counts, mean threat score, and the
/// highest-scoring sender domains.
pub fn summary(records: &[ScoredRecord]) -> String {
    let count_of = |risk: RiskLevel| records.iter().filter(|r| r.risk == risk).count();
    let mean = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.threat_score).sum::<f64>() / records.len() as f64
    };

    let mut top: Vec<&ScoredRecord> = records.iter().collect();
    top.sort_by(|a, b| {
        b.threat_score
            .partial_cmp(&a.threat_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut out = String::new();
    out.push_str(&format!("Messages scored: {}\n", records.len()));
    out.push_str(&format!(
        "Risk buckets: {} High / {} Medium / {} Low\n",
        count_of(RiskLevel::High),
        count_of(RiskLevel::Medium),
        count_of(RiskLevel::Low),
    ));
    out.push_str(&format!("Mean threat score: {mean:.4}\n"));
    for r in top.iter().take(5) {
        let domain = if r.features.sender_domain.is_empty() {
            "(no domain)"
        } else {
            r.features.sender_domain.as_str()
        };
        out.push_str(&format!(
            "  {:.4} [{}] {}\n",
            r.threat_score, r.risk, domain
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureRecord, NormalizedMessage};

    fn scored(message: &str, threat: f64, risk: RiskLevel) -> ScoredRecord {
        ScoredRecord {
            features: FeatureRecord {
                base: NormalizedMessage {
                    message: message.to_string(),
                    sender: "a@example.com".to_string(),
                    ..NormalizedMessage::default()
                },
                sender_domain: "example.com".to_string(),
                off_hours_flag: 0,
                keyword_flag: 1,
                external_ip_flag: 1,
            },
            nlp_prob: 0.5,
            metadata_score: threat,
            threat_score: threat,
            risk,
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let records = vec![
            scored("hello", 0.2, RiskLevel::Low),
            scored("urgent, wire now", 0.9, RiskLevel::High),
        ];
        let csv = to_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("sender,receiver"));
        assert!(lines[2].contains("\"urgent, wire now\""));
    }

    #[test]
    fn csv_quotes_carriage_returns() {
        let records = vec![scored("line one\rline two", 0.1, RiskLevel::Low)];
        let csv = to_csv(&records);
        assert!(csv.contains("\"line one\rline two\""));
    }

    #[test]
    fn csv_escapes_quotes() {
        let records = vec![scored("say \"hi\"", 0.1, RiskLevel::Low)];
        let csv = to_csv(&records);
        assert!(csv.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn json_round_trips() {
        let records = vec![scored("hello", 0.2, RiskLevel::Low)];
        let json = to_json(&records).unwrap();
        let parsed: Vec<ScoredRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn summary_counts_buckets() {
        let records = vec![
            scored("a", 0.1, RiskLevel::Low),
            scored("b", 0.5, RiskLevel::Medium),
            scored("c", 0.9, RiskLevel::High),
        ];
        let text = summary(&records);
        assert!(text.contains("Messages scored: 3"));
        assert!(text.contains("1 High / 1 Medium / 1 Low"));
    }
}
