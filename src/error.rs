//! Error types shared by every part of the classifier.

use thiserror::Error;

/// Fieldless discriminant of [`IrisError`], for callers that only care about
/// which kind of failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedSample,
    OutOfRangeSample,
    UnrecognizedSpecies,
    InsufficientTrainingData,
    StaleReference,
    AmbiguousRatio,
    EmptyTestingSet,
}

/// Everything that can go wrong while building samples, partitioning them,
/// or classifying against them.
///
/// Validation errors (`MalformedSample`, `OutOfRangeSample`,
/// `UnrecognizedSpecies`) are reported per record so the ingestion layer can
/// decide whether to skip the row. The rest abort the call that raised them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IrisError {
    /// A measurement field is missing or is not a number.
    #[error("malformed sample: field `{field}` {reason}")]
    MalformedSample { field: &'static str, reason: String },

    /// A measurement is negative or not finite.
    #[error("measurement `{field}` out of range: {value}")]
    OutOfRangeSample { field: &'static str, value: f64 },

    /// The species label is not one of the three known iris species.
    #[error("unrecognized species {0:?}")]
    UnrecognizedSpecies(String),

    /// `k` is zero or larger than the number of training records.
    #[error("insufficient training data: k = {k} but {available} training records available")]
    InsufficientTrainingData { k: usize, available: usize },

    /// The training collection a hyperparameter set observes has been dropped
    /// or replaced by its owner.
    #[error("training data is no longer available (stale reference)")]
    StaleReference,

    /// Partition ratio with a zero denominator or a numerator above it.
    #[error("ambiguous partition ratio {numerator}/{denominator}")]
    AmbiguousRatio { numerator: usize, denominator: usize },

    /// Quality is undefined when there is nothing to test against.
    #[error("cannot evaluate quality against an empty testing set")]
    EmptyTestingSet,
}

impl IrisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IrisError::MalformedSample { .. } => ErrorKind::MalformedSample,
            IrisError::OutOfRangeSample { .. } => ErrorKind::OutOfRangeSample,
            IrisError::UnrecognizedSpecies(_) => ErrorKind::UnrecognizedSpecies,
            IrisError::InsufficientTrainingData { .. } => ErrorKind::InsufficientTrainingData,
            IrisError::StaleReference => ErrorKind::StaleReference,
            IrisError::AmbiguousRatio { .. } => ErrorKind::AmbiguousRatio,
            IrisError::EmptyTestingSet => ErrorKind::EmptyTestingSet,
        }
    }

    /// True for the per-record validation errors an ingestion layer may skip.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MalformedSample | ErrorKind::OutOfRangeSample | ErrorKind::UnrecognizedSpecies
        )
    }
}

pub type Result<T> = std::result::Result<T, IrisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(IrisError::StaleReference.kind(), ErrorKind::StaleReference);
        assert_eq!(
            IrisError::InsufficientTrainingData { k: 5, available: 2 }.kind(),
            ErrorKind::InsufficientTrainingData
        );
        assert_eq!(
            IrisError::AmbiguousRatio { numerator: 1, denominator: 0 }.kind(),
            ErrorKind::AmbiguousRatio
        );
    }

    #[test]
    fn test_validation_errors_are_skippable() {
        assert!(IrisError::UnrecognizedSpecies("Iris-rosa".into()).is_validation());
        assert!(IrisError::OutOfRangeSample { field: "sepal_length", value: -1.0 }.is_validation());
        assert!(!IrisError::StaleReference.is_validation());
        assert!(!IrisError::EmptyTestingSet.is_validation());
    }

    #[test]
    fn test_messages_name_the_problem() {
        let err = IrisError::InsufficientTrainingData { k: 7, available: 3 };
        assert_eq!(
            err.to_string(),
            "insufficient training data: k = 7 but 3 training records available"
        );
        let err = IrisError::MalformedSample { field: "petal_width", reason: "is missing".into() };
        assert_eq!(err.to_string(), "malformed sample: field `petal_width` is missing");
    }
}
