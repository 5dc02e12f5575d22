use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Relative weights for the three metadata signals. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetadataWeights {
    pub off_hours: f64,
    pub keyword: f64,
    pub external_ip: f64,
}

impl Default for MetadataWeights {
    fn default() -> Self {
        // Keyword hits are the strongest single indicator.
        Self {
            off_hours: 0.3,
            keyword: 0.5,
            external_ip: 0.2,
        }
    }
}

/// Tunable parameters for one scoring pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Phishing / social-engineering phrases matched as lowercase substrings.
    pub keywords: Vec<String>,
    pub weights: MetadataWeights,
    /// Default classifier-vs-metadata blend factor, overridable per pass.
    pub alpha: f64,
    /// Messages sent at or after this local hour count as off-hours.
    pub off_hours_start: u32,
    /// Messages sent at or before this local hour count as off-hours.
    pub off_hours_end: u32,
    /// IP prefixes treated as internal; anything else (including a missing
    /// IP) is flagged external.
    pub private_ip_prefixes: Vec<String>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "urgent",
                "invoice",
                "password",
                "verify",
                "reset",
                "immediately",
                "gift card",
                "wire",
                "otp",
                "click",
                "link",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            weights: MetadataWeights::default(),
            alpha: 0.7,
            off_hours_start: 22,
            off_hours_end: 6,
            private_ip_prefixes: vec![
                "10.".to_string(),
                "192.168.".to_string(),
                "172.16.".to_string(),
            ],
        }
    }
}

impl TriageConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let config: TriageConfig =
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let sum = self.weights.off_hours + self.weights.keyword + self.weights.external_ip;
        if (sum - 1.0).abs() > 1e-6 {
            anyhow::bail!("metadata weights must sum to 1.0, got {sum}");
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            anyhow::bail!("alpha must be in [0, 1], got {}", self.alpha);
        }
        if self.off_hours_start > 23 || self.off_hours_end > 23 {
            anyhow::bail!("off-hours bounds must be valid hours (0-23)");
        }
        if self.keywords.is_empty() {
            anyhow::bail!("keyword list must not be empty");
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}
