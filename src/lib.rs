//! Iris species classification with k-nearest-neighbors.
//!
//! Labeled samples are split by a [`partition::Partitioner`] into training
//! and testing records. A [`Hyperparameter`] set pairs `k` with a
//! [`knn::DistanceMetric`] and observes the training records without owning
//! them; evaluating it against the testing records yields a quality score.
//! [`TrainingData`] ties the pieces together.

pub mod error;
pub mod hyperparameter;
pub mod knn;
pub mod partition;
pub mod samples;
pub mod training;

#[cfg(feature = "python")]
mod python;

pub use error::{ErrorKind, IrisError, Result};
pub use hyperparameter::Hyperparameter;
pub use knn::{classify, DistanceMetric, KnnDistance};
pub use partition::{
    DealingPartition, DealingPartitioner, Partition, Partitioner, RulePartitioner, ShufflingPartitioner,
    SplitRatio,
};
pub use samples::{LabeledSample, Sample, Species, TestingRecord, TrainingRecord, UnknownSample};
pub use training::TrainingData;
