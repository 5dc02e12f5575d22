use serde::{Deserialize, Serialize};
use std::fmt;

/// The unified per-message record every format adapter produces.
///
/// Absent values are represented explicitly: empty string for text fields,
/// the `"Unlabeled"` sentinel for `label`. Downstream stages may assume every
/// field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub receiver: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default = "unlabeled")]
    pub label: String,
}

pub const UNLABELED: &str = "Unlabeled";

fn unlabeled() -> String {
    UNLABELED.to_string()
}

impl Default for NormalizedMessage {
    fn default() -> Self {
        Self {
            sender: String::new(),
            receiver: String::new(),
            subject: String::new(),
            message: String::new(),
            timestamp: String::new(),
            ip: String::new(),
            label: unlabeled(),
        }
    }
}

impl NormalizedMessage {
    /// True when the record carries a ground-truth class, i.e. anything other
    /// than the `"Unlabeled"` sentinel.
    pub fn is_labeled(&self) -> bool {
        self.label != UNLABELED && !self.label.is_empty()
    }
}

/// A [`NormalizedMessage`] extended with derived metadata signals.
///
/// All four derived fields are pure functions of the base record, so
/// re-extracting from an unchanged record is idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(flatten)]
    pub base: NormalizedMessage,
    pub sender_domain: String,
    pub off_hours_flag: u8,
    pub keyword_flag: u8,
    pub external_ip_flag: u8,
}

/// Discrete risk bucket for a blended threat score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Final per-message output of one scoring pass.
///
/// Created once per pass and never mutated; re-scoring with different
/// weighting produces a fresh set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub features: FeatureRecord,
    pub nlp_prob: f64,
    pub metadata_score: f64,
    pub threat_score: f64,
    pub risk: RiskLevel,
}
