//! Hyperparameter sets: a `(k, metric)` pair bound to training data it does
//! not own, and the quality score it achieves on a testing set.

use std::borrow::Borrow;
use std::sync::{Arc, Weak};

use tracing::{debug, warn};

use crate::error::{IrisError, Result};
use crate::knn::{self, DistanceMetric, KnnDistance};
use crate::samples::{LabeledSample, Sample, Species, TestingRecord, TrainingList};

/// A candidate configuration of the classifier.
///
/// The training collection is observed through a [`Weak`] handle. Its owner
/// (usually [`TrainingData`](crate::training::TrainingData)) decides how long
/// it lives; once it is dropped or replaced, every evaluation and
/// classification through this set fails with `StaleReference`.
#[derive(Debug, Clone)]
pub struct Hyperparameter<D = KnnDistance> {
    k: usize,
    metric: D,
    training: Weak<TrainingList>,
    quality: Option<f64>,
}

impl<D: DistanceMetric> Hyperparameter<D> {
    pub fn new(k: usize, metric: D, training: &Arc<TrainingList>) -> Self {
        Hyperparameter { k, metric, training: Arc::downgrade(training), quality: None }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn metric(&self) -> &D {
        &self.metric
    }

    /// Score from the last successful [`evaluate`](Self::evaluate); `None`
    /// before the first one.
    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    /// True while the observed training collection is still alive.
    pub fn is_bound(&self) -> bool {
        self.training.strong_count() > 0
    }

    fn training(&self) -> Result<Arc<TrainingList>> {
        self.training.upgrade().ok_or_else(|| {
            warn!(k = self.k, "training data dropped before use");
            IrisError::StaleReference
        })
    }

    /// Classifies a single unlabeled sample. Does not touch `quality`.
    pub fn classify(&self, sample: &Sample) -> Result<Species> {
        let training = self.training()?;
        knn::classify(self.k, &self.metric, training.as_slice(), sample)
    }

    /// Fraction of `testing` whose classification matches its known species,
    /// without recording anything.
    pub fn score<T>(&self, testing: &[T]) -> Result<f64>
    where
        T: Borrow<LabeledSample>,
    {
        let training = self.training()?;
        if testing.is_empty() {
            return Err(IrisError::EmptyTestingSet);
        }

        let mut matches = 0usize;
        for record in testing {
            let sample = <T as Borrow<LabeledSample>>::borrow(record);
            if knn::classify(self.k, &self.metric, training.as_slice(), sample.sample())? == sample.species() {
                matches += 1;
            }
        }
        let quality = matches as f64 / testing.len() as f64;
        debug!(k = self.k, matches, total = testing.len(), quality, "scored hyperparameter");
        Ok(quality)
    }

    /// Scores `testing` and stores the result as this set's quality.
    pub fn evaluate<T>(&mut self, testing: &[T]) -> Result<f64>
    where
        T: Borrow<LabeledSample>,
    {
        let quality = self.score(testing)?;
        self.quality = Some(quality);
        Ok(quality)
    }

    /// Like [`evaluate`](Self::evaluate), but also records each record's
    /// classification.
    pub fn evaluate_records(&mut self, testing: &mut [TestingRecord]) -> Result<f64> {
        let training = self.training()?;
        if testing.is_empty() {
            return Err(IrisError::EmptyTestingSet);
        }

        let mut matches = 0usize;
        for record in testing.iter_mut() {
            let species = knn::classify(self.k, &self.metric, training.as_slice(), record.sample().sample())?;
            record.classify(species);
            if record.matches() {
                matches += 1;
            }
        }
        let quality = matches as f64 / testing.len() as f64;
        debug!(k = self.k, matches, total = testing.len(), quality, "evaluated hyperparameter");
        self.quality = Some(quality);
        Ok(quality)
    }
}
