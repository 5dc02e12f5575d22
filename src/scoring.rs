//! Metadata scoring, classifier/metadata blending, and risk bucketing.
//!
//! The metadata score is batch-relative: per-record raw weighted scores are
//! min-max normalized across the whole batch, so re-scoring a record inside a
//! different batch can change its score. That is the documented contract, and
//! the reason scoring is an explicit two-phase pass rather than streaming.

use crate::config::MetadataWeights;
use crate::model::{FeatureRecord, RiskLevel};

const MINMAX_EPSILON: f64 = 1e-9;

/// Raw weighted score for one record, before batch normalization.
pub fn raw_metadata_score(record: &FeatureRecord, weights: &MetadataWeights) -> f64 {
    weights.off_hours * f64::from(record.off_hours_flag)
        + weights.keyword * f64::from(record.keyword_flag)
        + weights.external_ip * f64::from(record.external_ip_flag)
}

/// Batch metadata scores in [0, 1]: raw weighted scores, then min-max
/// normalization over the batch. A degenerate batch where every raw score is
/// equal (including a single-record batch) normalizes to 0.0 for every
/// record.
pub fn metadata_scores(records: &[FeatureRecord], weights: &MetadataWeights) -> Vec<f64> {
    let raw: Vec<f64> = records
        .iter()
        .map(|r| raw_metadata_score(r, weights))
        .collect();
    if raw.is_empty() {
        return raw;
    }

    let min = raw.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    raw.iter()
        .map(|score| (score - min) / (max - min + MINMAX_EPSILON))
        .collect()
}

/// Blend the classifier probability with the metadata score. Both inputs are
/// bounded, so the result is in [0, 1] by construction; alpha 1.0 returns the
/// probability exactly and alpha 0.0 the metadata score exactly.
pub fn blend(nlp_prob: f64, metadata_score: f64, alpha: f64) -> f64 {
    alpha * nlp_prob + (1.0 - alpha) * metadata_score
}

/// Map a threat score to its risk bucket. Upper edges are closed: exactly
/// 0.33 is Low, exactly 0.66 is Medium. Callers must not pass scores outside
/// [0, 1].
pub fn bucketize(threat_score: f64) -> RiskLevel {
    if threat_score <= 0.33 {
        RiskLevel::Low
    } else if threat_score <= 0.66 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
