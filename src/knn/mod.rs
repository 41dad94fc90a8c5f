//! k-nearest-neighbors classification: distance metrics, the bounded
//! neighbor heap and the majority-vote classifier.

use std::num::NonZeroU32;

use crate::samples::Sample;

pub mod classifier;
pub mod heap_utils;

pub use classifier::{classify, nearest_neighbors, Neighbor};

/// Anything that can score the dissimilarity of two samples.
///
/// Implementations must be symmetric and non-negative, and return zero when
/// both samples carry identical measurements. Plain closures qualify, so a
/// caller can plug in a metric without defining a type.
pub trait DistanceMetric {
    fn distance(&self, a: &Sample, b: &Sample) -> f64;
}

impl<F> DistanceMetric for F
where
    F: Fn(&Sample, &Sample) -> f64,
{
    fn distance(&self, a: &Sample, b: &Sample) -> f64 {
        self(a, b)
    }
}

/// The built-in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KnnDistance {
    Euclidean,
    Manhattan,
    Chebyshev,
    Sorensen,
    Minkowski { p: NonZeroU32 }, // p is the order; 1 is Manhattan, 2 is Euclidean
}

impl KnnDistance {
    pub const ALL_BASIC: [KnnDistance; 4] = [
        KnnDistance::Euclidean,
        KnnDistance::Manhattan,
        KnnDistance::Chebyshev,
        KnnDistance::Sorensen,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            KnnDistance::Euclidean => "euclidean",
            KnnDistance::Manhattan => "manhattan",
            KnnDistance::Chebyshev => "chebyshev",
            KnnDistance::Sorensen => "sorensen",
            KnnDistance::Minkowski { .. } => "minkowski",
        }
    }
}

impl DistanceMetric for KnnDistance {
    fn distance(&self, a: &Sample, b: &Sample) -> f64 {
        match *self {
            KnnDistance::Euclidean => euclidean_distance(a, b),
            KnnDistance::Manhattan => manhattan_distance(a, b),
            KnnDistance::Chebyshev => chebyshev_distance(a, b),
            KnnDistance::Sorensen => sorensen_distance(a, b),
            KnnDistance::Minkowski { p } => minkowski_distance(a, b, p),
        }
    }
}

fn abs_diffs(a: &Sample, b: &Sample) -> impl Iterator<Item = f64> {
    a.measurements()
        .into_iter()
        .zip(b.measurements())
        .map(|(x, y)| (x - y).abs())
}

/// Square root of the summed squared per-axis differences.
pub fn euclidean_distance(a: &Sample, b: &Sample) -> f64 {
    abs_diffs(a, b).map(|d| d * d).sum::<f64>().sqrt()
}

/// Sum of absolute per-axis differences.
pub fn manhattan_distance(a: &Sample, b: &Sample) -> f64 {
    abs_diffs(a, b).sum()
}

/// Largest absolute per-axis difference.
pub fn chebyshev_distance(a: &Sample, b: &Sample) -> f64 {
    abs_diffs(a, b).fold(0.0, f64::max)
}

/// Sum of absolute differences over the sum of absolute sums.
///
/// Measurements are non-negative, so the denominator is zero only when both
/// samples are all-zero. Those samples are identical and the distance is
/// defined as `0.0`.
pub fn sorensen_distance(a: &Sample, b: &Sample) -> f64 {
    let numerator: f64 = abs_diffs(a, b).sum();
    let denominator: f64 = a
        .measurements()
        .into_iter()
        .zip(b.measurements())
        .map(|(x, y)| (x + y).abs())
        .sum();
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// `(sum |a_i - b_i|^p)^(1/p)`.
///
/// Differences are scaled by the largest one before raising them to `p`, so
/// high orders approach the Chebyshev distance instead of overflowing.
pub fn minkowski_distance(a: &Sample, b: &Sample, p: NonZeroU32) -> f64 {
    match p.get() {
        1 => manhattan_distance(a, b),
        2 => euclidean_distance(a, b),
        p => {
            let largest = chebyshev_distance(a, b);
            if largest == 0.0 {
                return 0.0;
            }
            let p = f64::from(p);
            let sum_of_powers: f64 = abs_diffs(a, b).map(|d| (d / largest).powf(p)).sum();
            largest * sum_of_powers.powf(1.0 / p)
        }
    }
}
