//! Splitting labeled samples into disjoint training and testing subsets.
//!
//! Three policies are provided:
//! - [`ShufflingPartitioner`] buffers everything, shuffles, and cuts at
//!   `floor(len * n / d)`.
//! - [`DealingPartitioner`] deals records in arrival order: the i-th record
//!   seen goes to training when `i mod d < n`. It can run as a stream through
//!   [`DealingPartition`].
//! - [`RulePartitioner`] asks a caller-supplied predicate per record.
//!
//! The shuffling and dealing policies give different counts for the same
//! nominal ratio on inputs that are not a multiple of `d`: 7 records at 8/10
//! give 5 training records when shuffled but 7 when dealt.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::error::{IrisError, Result};
use crate::samples::{LabeledSample, TestingRecord, TrainingRecord};

/// Fraction `numerator / denominator` of records that go to training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RatioFields", into = "RatioFields")
)]
pub struct SplitRatio {
    numerator: usize,
    denominator: usize,
}

impl SplitRatio {
    /// Fails with `AmbiguousRatio` when `denominator` is zero or smaller than
    /// `numerator`.
    pub fn new(numerator: usize, denominator: usize) -> Result<Self> {
        if denominator == 0 || numerator > denominator {
            warn!(numerator, denominator, "rejecting partition ratio");
            return Err(IrisError::AmbiguousRatio { numerator, denominator });
        }
        Ok(SplitRatio { numerator, denominator })
    }

    pub fn numerator(&self) -> usize {
        self.numerator
    }

    pub fn denominator(&self) -> usize {
        self.denominator
    }

    /// `floor(total * n / d)`.
    pub fn training_count(&self, total: usize) -> usize {
        total * self.numerator / self.denominator
    }

    /// Whether the record at `position` in arrival order is dealt to training.
    pub fn deals_to_training(&self, position: usize) -> bool {
        position % self.denominator < self.numerator
    }
}

impl Default for SplitRatio {
    fn default() -> Self {
        SplitRatio { numerator: 8, denominator: 10 }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RatioFields {
    numerator: usize,
    denominator: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RatioFields> for SplitRatio {
    type Error = IrisError;

    fn try_from(f: RatioFields) -> Result<Self> {
        SplitRatio::new(f.numerator, f.denominator)
    }
}

#[cfg(feature = "serde")]
impl From<SplitRatio> for RatioFields {
    fn from(r: SplitRatio) -> Self {
        RatioFields { numerator: r.numerator, denominator: r.denominator }
    }
}

/// The result of partitioning: role-tagged records whose union is the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    training: Vec<TrainingRecord>,
    testing: Vec<TestingRecord>,
}

impl Partition {
    pub fn training(&self) -> &[TrainingRecord] {
        &self.training
    }

    pub fn testing(&self) -> &[TestingRecord] {
        &self.testing
    }

    pub fn len(&self) -> usize {
        self.training.len() + self.testing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_parts(self) -> (Vec<TrainingRecord>, Vec<TestingRecord>) {
        (self.training, self.testing)
    }
}

/// A policy that splits a finite stream of labeled samples.
pub trait Partitioner {
    fn partition<I>(&self, samples: I) -> Partition
    where
        I: IntoIterator<Item = LabeledSample>;
}

/// Shuffles the whole input, then cuts it at the configured ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShufflingPartitioner {
    ratio: SplitRatio,
    seed: Option<u64>,
}

impl ShufflingPartitioner {
    pub fn new(ratio: SplitRatio) -> Self {
        ShufflingPartitioner { ratio, seed: None }
    }

    /// Fixes the shuffle so repeated partitions of the same input agree.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn ratio(&self) -> SplitRatio {
        self.ratio
    }
}

impl Partitioner for ShufflingPartitioner {
    fn partition<I>(&self, samples: I) -> Partition
    where
        I: IntoIterator<Item = LabeledSample>,
    {
        let mut buffered: Vec<LabeledSample> = samples.into_iter().collect();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        buffered.shuffle(&mut rng);

        let split = self.ratio.training_count(buffered.len());
        let testing = buffered.split_off(split);
        let partition = Partition {
            training: buffered.into_iter().map(TrainingRecord::new).collect(),
            testing: testing.into_iter().map(TestingRecord::new).collect(),
        };
        debug!(
            training = partition.training.len(),
            testing = partition.testing.len(),
            seed = ?self.seed,
            "shuffled partition"
        );
        partition
    }
}

/// Deals records round-robin in arrival order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DealingPartitioner {
    ratio: SplitRatio,
}

impl DealingPartitioner {
    pub fn new(ratio: SplitRatio) -> Self {
        DealingPartitioner { ratio }
    }

    /// An empty streaming dealer using this ratio.
    pub fn dealer(&self) -> DealingPartition {
        DealingPartition::new(self.ratio)
    }
}

impl Partitioner for DealingPartitioner {
    fn partition<I>(&self, samples: I) -> Partition
    where
        I: IntoIterator<Item = LabeledSample>,
    {
        let mut dealer = self.dealer();
        dealer.extend(samples);
        dealer.finish()
    }
}

/// Streaming state of a dealing partition. Records are assigned as they
/// arrive and never move afterwards.
#[derive(Debug, Clone)]
pub struct DealingPartition {
    ratio: SplitRatio,
    counter: usize,
    training: Vec<TrainingRecord>,
    testing: Vec<TestingRecord>,
}

impl DealingPartition {
    pub fn new(ratio: SplitRatio) -> Self {
        DealingPartition { ratio, counter: 0, training: Vec::new(), testing: Vec::new() }
    }

    pub fn append(&mut self, item: LabeledSample) {
        if self.ratio.deals_to_training(self.counter) {
            self.training.push(TrainingRecord::new(item));
        } else {
            self.testing.push(TestingRecord::new(item));
        }
        self.counter += 1;
    }

    pub fn training(&self) -> &[TrainingRecord] {
        &self.training
    }

    pub fn testing(&self) -> &[TestingRecord] {
        &self.testing
    }

    pub fn finish(self) -> Partition {
        debug!(
            training = self.training.len(),
            testing = self.testing.len(),
            "dealt partition"
        );
        Partition { training: self.training, testing: self.testing }
    }
}

impl Extend<LabeledSample> for DealingPartition {
    fn extend<I: IntoIterator<Item = LabeledSample>>(&mut self, items: I) {
        for item in items {
            self.append(item);
        }
    }
}

/// Sends a record to training when `rule(sample, index)` holds.
#[derive(Debug, Clone, Copy)]
pub struct RulePartitioner<F> {
    rule: F,
}

impl<F> RulePartitioner<F>
where
    F: Fn(&LabeledSample, usize) -> bool,
{
    pub fn new(rule: F) -> Self {
        RulePartitioner { rule }
    }
}

impl<F> Partitioner for RulePartitioner<F>
where
    F: Fn(&LabeledSample, usize) -> bool,
{
    fn partition<I>(&self, samples: I) -> Partition
    where
        I: IntoIterator<Item = LabeledSample>,
    {
        let mut partition = Partition::default();
        for (index, sample) in samples.into_iter().enumerate() {
            if (self.rule)(&sample, index) {
                partition.training.push(TrainingRecord::new(sample));
            } else {
                partition.testing.push(TestingRecord::new(sample));
            }
        }
        debug!(
            training = partition.training.len(),
            testing = partition.testing.len(),
            "rule partition"
        );
        partition
    }
}

pub fn partition_by_rule<I, F>(samples: I, rule: F) -> Partition
where
    I: IntoIterator<Item = LabeledSample>,
    F: Fn(&LabeledSample, usize) -> bool,
{
    RulePartitioner::new(rule).partition(samples)
}

/// Every third record to testing.
pub fn training_67(_: &LabeledSample, index: usize) -> bool {
    index % 3 != 0
}

/// Every fourth record to testing.
pub fn training_75(_: &LabeledSample, index: usize) -> bool {
    index % 4 != 0
}

/// Every fifth record to testing.
pub fn training_80(_: &LabeledSample, index: usize) -> bool {
    index % 5 != 0
}

/// Every tenth record to testing.
pub fn training_90(_: &LabeledSample, index: usize) -> bool {
    index % 10 != 0
}
