//! End-to-end scoring pass: ingest → clean → features → {metadata score,
//! classifier probability} → blend → bucket.
//!
//! One pass processes one input to completion; passes share no mutable
//! state, and a re-run with different tuning produces a fresh record set.
//! All feature records of a batch are materialized before the metadata
//! scorer runs, since its min-max normalization needs the whole batch.

use crate::classifier::{ClassifierAdapter, KeywordFrequencyClassifier};
use crate::config::TriageConfig;
use crate::ingest::{self, InputFormat};
use crate::model::ScoredRecord;
use crate::{cleaner, features, scoring};
use std::collections::HashSet;

/// Probability substituted for every record when fewer than two label
/// classes are available to train on.
const NEUTRAL_PROBABILITY: f64 = 0.5;

pub struct ScoringPipeline {
    config: TriageConfig,
    classifier: Box<dyn ClassifierAdapter>,
}

impl ScoringPipeline {
    pub fn new(config: TriageConfig) -> Self {
        Self::with_classifier(config, Box::new(KeywordFrequencyClassifier))
    }

    pub fn with_classifier(config: TriageConfig, classifier: Box<dyn ClassifierAdapter>) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Run one full ingestion+scoring pass over a materialized input.
    /// `alpha` is the per-pass blend knob; ingestion failures surface their
    /// original cause through the error chain.
    pub fn run(
        &self,
        raw: &[u8],
        format: InputFormat,
        alpha: f64,
    ) -> anyhow::Result<Vec<ScoredRecord>> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&alpha),
            "alpha must be in [0, 1], got {alpha}"
        );

        let records = ingest::parse(raw, format)?;
        let records = cleaner::clean(records);
        let features = features::extract(&records, &self.config);

        let metadata = scoring::metadata_scores(&features, &self.config.weights);

        let texts: Vec<String> = records.iter().map(|r| r.message.clone()).collect();
        let labels: Vec<String> = records.iter().map(|r| r.label.clone()).collect();
        let classes: HashSet<&String> = records
            .iter()
            .filter(|r| r.is_labeled())
            .map(|r| &r.label)
            .collect();
        let probabilities = if classes.len() < 2 {
            // Required fallback, not an error: without two classes there is
            // nothing to train on.
            log::debug!(
                "{} label class(es) in batch, substituting neutral probability",
                classes.len()
            );
            vec![NEUTRAL_PROBABILITY; records.len()]
        } else {
            self.classifier.predict(&texts, &labels)?
        };

        log::info!(
            "Scoring {} record(s) with alpha={alpha} classifier={}",
            records.len(),
            self.classifier.name()
        );

        let scored = features
            .into_iter()
            .zip(metadata)
            .zip(probabilities)
            .map(|((features, metadata_score), nlp_prob)| {
                let threat_score = scoring::blend(nlp_prob, metadata_score, alpha);
                ScoredRecord {
                    features,
                    nlp_prob,
                    metadata_score,
                    threat_score,
                    risk: scoring::bucketize(threat_score),
                }
            })
            .collect();
        Ok(scored)
    }
}
