pub mod classifier;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod scoring;

pub use classifier::{ClassifierAdapter, KeywordFrequencyClassifier, NeutralClassifier};
pub use config::{MetadataWeights, TriageConfig};
pub use error::IngestError;
pub use ingest::InputFormat;
pub use model::{FeatureRecord, NormalizedMessage, RiskLevel, ScoredRecord};
pub use pipeline::ScoringPipeline;
