//! Pluggable text-classification seam.
//!
//! The pipeline only depends on the probability-output contract: given the
//! batch texts and their (possibly sentinel) labels, return one probability
//! per text, aligned index-for-index. The algorithm behind it is deliberately
//! unspecified; [`KeywordFrequencyClassifier`] is the built-in baseline and
//! any other implementation can be injected.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::model::UNLABELED;

pub trait ClassifierAdapter {
    fn name(&self) -> &str;

    /// Per-text probability of the positive class, in [0, 1], aligned
    /// index-for-index with `texts`. `labels` has the same length; records
    /// without ground truth carry the `"Unlabeled"` sentinel.
    fn predict(&self, texts: &[String], labels: &[String]) -> anyhow::Result<Vec<f64>>;
}

/// Constant 0.5 for every text. Used when no classifier signal is wanted;
/// the pipeline also falls back to this value on its own when fewer than two
/// label classes are available.
#[derive(Debug, Default)]
pub struct NeutralClassifier;

impl ClassifierAdapter for NeutralClassifier {
    fn name(&self) -> &str {
        "neutral"
    }

    fn predict(&self, texts: &[String], _labels: &[String]) -> anyhow::Result<Vec<f64>> {
        Ok(vec![0.5; texts.len()])
    }
}

/// Token log-odds baseline trained on the labeled subset of the batch.
///
/// Tokens are counted once per document. The positive class is the
/// lexicographically greatest label (one-vs-rest when more than two classes
/// appear), matching the column ordering of the usual two-class baseline.
/// Probabilities come from a sigmoid over the summed log-likelihood ratios,
/// so they are bounded in (0, 1) by construction.
#[derive(Debug, Default)]
pub struct KeywordFrequencyClassifier;

impl KeywordFrequencyClassifier {
    fn tokenize(text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() >= 2)
            .map(|t| t.to_string())
            .collect()
    }
}

impl ClassifierAdapter for KeywordFrequencyClassifier {
    fn name(&self) -> &str {
        "keyword-frequency"
    }

    fn predict(&self, texts: &[String], labels: &[String]) -> anyhow::Result<Vec<f64>> {
        anyhow::ensure!(
            texts.len() == labels.len(),
            "texts and labels must be aligned: {} vs {}",
            texts.len(),
            labels.len()
        );

        let classes: BTreeSet<&str> = labels
            .iter()
            .map(|l| l.as_str())
            .filter(|l| *l != UNLABELED && !l.is_empty())
            .collect();
        if classes.len() < 2 {
            return Ok(vec![0.5; texts.len()]);
        }
        let positive = *classes.iter().next_back().unwrap_or(&"");

        let mut positive_docs = 0u64;
        let mut negative_docs = 0u64;
        let mut token_counts: HashMap<String, (u64, u64)> = HashMap::new();

        for (text, label) in texts.iter().zip(labels) {
            if label == UNLABELED || label.is_empty() {
                continue;
            }
            let is_positive = label == positive;
            if is_positive {
                positive_docs += 1;
            } else {
                negative_docs += 1;
            }
            for token in Self::tokenize(text) {
                let entry = token_counts.entry(token).or_insert((0, 0));
                if is_positive {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
        }

        let prior = (positive_docs as f64 / negative_docs as f64).ln();
        let probabilities = texts
            .iter()
            .map(|text| {
                let mut log_odds = prior;
                for token in Self::tokenize(text) {
                    if let Some(&(pos, neg)) = token_counts.get(&token) {
                        let p_pos = (pos as f64 + 1.0) / (positive_docs as f64 + 2.0);
                        let p_neg = (neg as f64 + 1.0) / (negative_docs as f64 + 2.0);
                        log_odds += (p_pos / p_neg).ln();
                    }
                }
                1.0 / (1.0 + (-log_odds).exp())
            })
            .collect();
        Ok(probabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn neutral_classifier_returns_half_everywhere() {
        let texts = strings(&["a", "b", "c"]);
        let labels = strings(&["Phishing", "Safe", UNLABELED]);
        let probs = NeutralClassifier.predict(&texts, &labels).unwrap();
        assert_eq!(probs, vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn single_class_batch_falls_back_to_neutral() {
        let texts = strings(&["wire money now", "lunch plans"]);
        let labels = strings(&["Safe", "Safe"]);
        let probs = KeywordFrequencyClassifier.predict(&texts, &labels).unwrap();
        assert_eq!(probs, vec![0.5, 0.5]);
    }

    #[test]
    fn phishing_like_text_scores_higher() {
        let texts = strings(&[
            "urgent verify your password immediately",
            "urgent wire transfer verify account",
            "reset your password now urgent",
            "lunch tomorrow at noon",
            "meeting notes attached",
            "see you at the gym",
            "urgent password verify",
            "weekend hiking plans",
        ]);
        let labels = strings(&[
            "Phishing", "Phishing", "Phishing", "Benign", "Benign", "Benign", UNLABELED,
            UNLABELED,
        ]);
        let probs = KeywordFrequencyClassifier.predict(&texts, &labels).unwrap();
        for p in &probs {
            assert!((0.0..=1.0).contains(p));
        }
        // unlabeled phishing-looking text above unlabeled benign-looking text
        assert!(probs[6] > probs[7]);
        assert!(probs[0] > probs[3]);
    }

    #[test]
    fn probabilities_align_with_texts() {
        let texts = strings(&["a b", "c d", "e f"]);
        let labels = strings(&["X", "Y", UNLABELED]);
        let probs = KeywordFrequencyClassifier.predict(&texts, &labels).unwrap();
        assert_eq!(probs.len(), 3);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let texts = strings(&["a"]);
        let labels = strings(&["X", "Y"]);
        assert!(KeywordFrequencyClassifier.predict(&texts, &labels).is_err());
    }
}
