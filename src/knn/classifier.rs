//! Majority-vote k-NN classification over a training slice.

use std::borrow::Borrow;

use super::heap_utils::KBestNeighbors;
use super::DistanceMetric;
use crate::error::{IrisError, Result};
use crate::samples::{LabeledSample, Sample, Species};

/// One of the k nearest training samples to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub distance: f64,
    pub sample: &'a LabeledSample,
}

fn check_k(k: usize, available: usize) -> Result<()> {
    if k == 0 || k > available {
        return Err(IrisError::InsufficientTrainingData { k, available });
    }
    Ok(())
}

/// Returns the `k` training samples closest to `query`, nearest first.
///
/// Equal distances keep their training-list order, so the result is the
/// first `k` entries of a stable sort by distance.
pub fn nearest_neighbors<'a, D, T>(
    k: usize,
    metric: &D,
    training: &'a [T],
    query: &Sample,
) -> Result<Vec<Neighbor<'a>>>
where
    D: DistanceMetric + ?Sized,
    T: Borrow<LabeledSample>,
{
    check_k(k, training.len())?;

    let mut best = KBestNeighbors::new(k);
    for record in training {
        let sample = <T as Borrow<LabeledSample>>::borrow(record);
        best.add(metric.distance(sample.sample(), query), sample);
    }
    Ok(best
        .into_sorted_elements()
        .into_iter()
        .map(|elem| Neighbor { distance: elem.distance.0, sample: elem.data })
        .collect())
}

/// Classifies `query` by majority vote among its `k` nearest training samples.
///
/// A tie in the vote goes to the tied species whose first neighbor is
/// nearest. Fails with `InsufficientTrainingData` when `k` is zero or exceeds
/// the number of training samples.
pub fn classify<D, T>(k: usize, metric: &D, training: &[T], query: &Sample) -> Result<Species>
where
    D: DistanceMetric + ?Sized,
    T: Borrow<LabeledSample>,
{
    let neighbors = nearest_neighbors(k, metric, training, query)?;
    majority_vote(neighbors.iter().map(|n| n.sample.species())).ok_or(
        IrisError::InsufficientTrainingData { k, available: training.len() },
    )
}

/// Mode of `votes`, keeping the first species to reach the top count.
fn majority_vote<I>(votes: I) -> Option<Species>
where
    I: Iterator<Item = Species> + Clone,
{
    let mut counts = [0usize; Species::ALL.len()];
    for species in votes.clone() {
        counts[species.index()] += 1;
    }
    let top = counts.iter().copied().max()?;
    votes.into_iter().find(|species| counts[species.index()] == top)
}
