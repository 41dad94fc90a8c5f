//! The `TrainingData` aggregate: owns a named training/testing split and the
//! history of hyperparameter sets tested against it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::Result;
use crate::hyperparameter::Hyperparameter;
use crate::knn::{DistanceMetric, KnnDistance};
use crate::partition::Partitioner;
use crate::samples::{LabeledSample, TestingRecord, TrainingList, UnknownSample};

/// Training and testing samples for one model, plus every hyperparameter set
/// tested against them.
///
/// The training list is shared with hyperparameter sets only through weak
/// handles. Loading new samples replaces it, which leaves sets created
/// against the previous list stale.
#[derive(Debug)]
pub struct TrainingData<D = KnnDistance> {
    name: String,
    uploaded: Option<DateTime<Utc>>,
    tested: Option<DateTime<Utc>>,
    training: Arc<TrainingList>,
    testing: Vec<TestingRecord>,
    tuning: Vec<Hyperparameter<D>>,
}

impl<D: DistanceMetric> TrainingData<D> {
    pub fn new(name: impl Into<String>) -> Self {
        TrainingData {
            name: name.into(),
            uploaded: None,
            tested: None,
            training: Arc::new(Vec::new()),
            testing: Vec::new(),
            tuning: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uploaded(&self) -> Option<DateTime<Utc>> {
        self.uploaded
    }

    pub fn tested(&self) -> Option<DateTime<Utc>> {
        self.tested
    }

    pub fn training(&self) -> &Arc<TrainingList> {
        &self.training
    }

    pub fn testing(&self) -> &[TestingRecord] {
        &self.testing
    }

    pub fn tuning(&self) -> &[Hyperparameter<D>] {
        &self.tuning
    }

    /// Partitions `samples` and takes ownership of the result, replacing any
    /// previously loaded data.
    pub fn load<I, P>(&mut self, samples: I, partitioner: &P)
    where
        I: IntoIterator<Item = LabeledSample>,
        P: Partitioner,
    {
        let (training, testing) = partitioner.partition(samples).into_parts();
        info!(
            name = %self.name,
            training = training.len(),
            testing = testing.len(),
            "loaded samples"
        );
        self.training = Arc::new(training);
        self.testing = testing;
        self.uploaded = Some(Utc::now());
    }

    /// A hyperparameter set observing the currently loaded training list.
    pub fn hyperparameter(&self, k: usize, metric: D) -> Hyperparameter<D> {
        Hyperparameter::new(k, metric, &self.training)
    }

    /// Evaluates `parameter` against the testing records, recording each
    /// record's classification, and appends it to the tuning history.
    pub fn test(&mut self, mut parameter: Hyperparameter<D>) -> Result<f64> {
        let quality = parameter.evaluate_records(&mut self.testing)?;
        self.tuning.push(parameter);
        self.tested = Some(Utc::now());
        Ok(quality)
    }

    /// Classifies `sample` with `parameter`, returning it with its
    /// classification filled in.
    pub fn classify(&self, parameter: &Hyperparameter<D>, mut sample: UnknownSample) -> Result<UnknownSample> {
        let species = parameter.classify(sample.sample())?;
        sample.classify(species);
        Ok(sample)
    }

    /// Tests every combination of `ks` and `metrics` in order and returns the
    /// best one. Earlier combinations win ties.
    pub fn tune<K>(&mut self, ks: K, metrics: &[D]) -> Result<Option<&Hyperparameter<D>>>
    where
        K: IntoIterator<Item = usize>,
        D: Clone,
    {
        let first = self.tuning.len();
        for k in ks {
            for metric in metrics {
                let candidate = self.hyperparameter(k, metric.clone());
                let quality = self.test(candidate)?;
                debug!(k, quality, "tuning step");
            }
        }
        Ok(best_of(&self.tuning[first..]))
    }

    /// Highest-quality set in the tuning history.
    pub fn best(&self) -> Option<&Hyperparameter<D>> {
        best_of(&self.tuning)
    }
}

fn best_of<D: DistanceMetric>(candidates: &[Hyperparameter<D>]) -> Option<&Hyperparameter<D>> {
    let mut best: Option<(&Hyperparameter<D>, f64)> = None;
    for candidate in candidates {
        let Some(quality) = candidate.quality() else {
            continue;
        };
        if best.is_none_or(|(_, top)| quality > top) {
            best = Some((candidate, quality));
        }
    }
    best.map(|(candidate, _)| candidate)
}
