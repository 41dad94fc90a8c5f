//! Iris samples: raw measurements, labeled samples and the role-tagged records
//! produced by partitioning.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{IrisError, Result};

/// Record keys of the four measurements, in vector order.
pub const MEASUREMENT_FIELDS: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// The closed set of species a labeled sample can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum Species {
    Setosa,
    Versicolor,
    Virginica,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    /// Canonical label as it appears in the Bezdek iris data.
    pub fn label(self) -> &'static str {
        match self {
            Species::Setosa => "Iris-setosa",
            Species::Versicolor => "Iris-versicolor",
            Species::Virginica => "Iris-virginica",
        }
    }

    /// Dense index, used for vote tallies.
    pub(crate) fn index(self) -> usize {
        match self {
            Species::Setosa => 0,
            Species::Versicolor => 1,
            Species::Virginica => 2,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts `Iris-setosa` style labels as well as bare names, case-insensitively.
impl FromStr for Species {
    type Err = IrisError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        let name = lower.strip_prefix("iris-").unwrap_or(&lower);
        match name {
            "setosa" => Ok(Species::Setosa),
            "versicolor" => Ok(Species::Versicolor),
            "virginica" => Ok(Species::Virginica),
            _ => Err(IrisError::UnrecognizedSpecies(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for Species {
    type Error = IrisError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Species> for String {
    fn from(species: Species) -> Self {
        species.label().to_string()
    }
}

/// Four non-negative, finite measurements of one flower, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SampleFields", into = "SampleFields")
)]
pub struct Sample {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
}

impl Sample {
    pub fn new(sepal_length: f64, sepal_width: f64, petal_length: f64, petal_width: f64) -> Result<Self> {
        Self::from_measurements([sepal_length, sepal_width, petal_length, petal_width])
    }

    /// Builds a sample from a measurement vector in [`MEASUREMENT_FIELDS`] order.
    pub fn from_measurements(values: [f64; 4]) -> Result<Self> {
        for (field, value) in MEASUREMENT_FIELDS.into_iter().zip(values) {
            check_range(field, value)?;
        }
        let [sepal_length, sepal_width, petal_length, petal_width] = values;
        Ok(Sample { sepal_length, sepal_width, petal_length, petal_width })
    }

    /// Parses the four measurement fields out of an untyped record.
    ///
    /// All fields are parsed before any is range-checked, so a record that is
    /// both malformed and out of range reports `MalformedSample`.
    pub fn from_record<K, V>(record: &HashMap<K, V>) -> Result<Self>
    where
        K: Borrow<str> + Eq + Hash,
        V: AsRef<str>,
    {
        let mut values = [0.0; 4];
        for (slot, field) in values.iter_mut().zip(MEASUREMENT_FIELDS) {
            *slot = parse_field(record, field)?;
        }
        Self::from_measurements(values)
    }

    pub fn sepal_length(&self) -> f64 {
        self.sepal_length
    }

    pub fn sepal_width(&self) -> f64 {
        self.sepal_width
    }

    pub fn petal_length(&self) -> f64 {
        self.petal_length
    }

    pub fn petal_width(&self) -> f64 {
        self.petal_width
    }

    pub fn measurements(&self) -> [f64; 4] {
        [self.sepal_length, self.sepal_width, self.petal_length, self.petal_width]
    }
}

impl AsRef<Sample> for Sample {
    fn as_ref(&self) -> &Sample {
        self
    }
}

fn check_range(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(IrisError::OutOfRangeSample { field, value })
    }
}

fn parse_field<K, V>(record: &HashMap<K, V>, field: &'static str) -> Result<f64>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
{
    let raw = record.get(field).ok_or_else(|| IrisError::MalformedSample {
        field,
        reason: "is missing".to_string(),
    })?;
    let raw = raw.as_ref().trim();
    raw.parse::<f64>().map_err(|err| IrisError::MalformedSample {
        field,
        reason: format!("is not a number ({raw:?}: {err})"),
    })
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SampleFields {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<SampleFields> for Sample {
    type Error = IrisError;

    fn try_from(f: SampleFields) -> Result<Self> {
        Sample::new(f.sepal_length, f.sepal_width, f.petal_length, f.petal_width)
    }
}

#[cfg(feature = "serde")]
impl From<Sample> for SampleFields {
    fn from(s: Sample) -> Self {
        SampleFields {
            sepal_length: s.sepal_length,
            sepal_width: s.sepal_width,
            petal_length: s.petal_length,
            petal_width: s.petal_width,
        }
    }
}

/// A sample whose species is known.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabeledSample {
    sample: Sample,
    species: Species,
}

impl LabeledSample {
    pub fn new(sample: Sample, species: Species) -> Self {
        LabeledSample { sample, species }
    }

    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    pub fn species(&self) -> Species {
        self.species
    }

    /// Validates an untyped record with the four measurement keys plus
    /// `species` (or `class`, the column name used by the iris CSV).
    pub fn from_record<K, V>(record: &HashMap<K, V>) -> Result<Self>
    where
        K: Borrow<str> + Eq + Hash,
        V: AsRef<str>,
    {
        let sample = Sample::from_record(record)?;
        let label = record
            .get("species")
            .or_else(|| record.get("class"))
            .ok_or_else(|| IrisError::MalformedSample {
                field: "species",
                reason: "is missing".to_string(),
            })?;
        let species = label.as_ref().parse()?;
        Ok(LabeledSample { sample, species })
    }
}

impl AsRef<Sample> for LabeledSample {
    fn as_ref(&self) -> &Sample {
        &self.sample
    }
}

/// A labeled sample assigned to the training subset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingRecord {
    sample: LabeledSample,
}

impl TrainingRecord {
    pub fn new(sample: LabeledSample) -> Self {
        TrainingRecord { sample }
    }

    pub fn sample(&self) -> &LabeledSample {
        &self.sample
    }

    pub fn species(&self) -> Species {
        self.sample.species
    }

    pub fn into_inner(self) -> LabeledSample {
        self.sample
    }
}

impl Borrow<LabeledSample> for TrainingRecord {
    fn borrow(&self) -> &LabeledSample {
        &self.sample
    }
}

/// A labeled sample assigned to the testing subset. `classification` stays
/// `None` until an evaluation records the classifier's answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestingRecord {
    sample: LabeledSample,
    classification: Option<Species>,
}

impl TestingRecord {
    pub fn new(sample: LabeledSample) -> Self {
        TestingRecord { sample, classification: None }
    }

    pub fn sample(&self) -> &LabeledSample {
        &self.sample
    }

    pub fn species(&self) -> Species {
        self.sample.species
    }

    pub fn classification(&self) -> Option<Species> {
        self.classification
    }

    pub fn classify(&mut self, classification: Species) {
        self.classification = Some(classification);
    }

    /// True once classified, and only if the classification is the known species.
    pub fn matches(&self) -> bool {
        self.classification == Some(self.sample.species)
    }

    pub fn into_inner(self) -> LabeledSample {
        self.sample
    }
}

impl Borrow<LabeledSample> for TestingRecord {
    fn borrow(&self) -> &LabeledSample {
        &self.sample
    }
}

pub type TrainingList = Vec<TrainingRecord>;
pub type TestingList = Vec<TestingRecord>;

/// A query sample with no species of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnknownSample {
    sample: Sample,
    classification: Option<Species>,
}

impl UnknownSample {
    pub fn new(sample: Sample) -> Self {
        UnknownSample { sample, classification: None }
    }

    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    pub fn classification(&self) -> Option<Species> {
        self.classification
    }

    pub fn classify(&mut self, classification: Species) {
        self.classification = Some(classification);
    }
}

/// Random labeled samples with measurements in `[0, 10)`, for load tests and
/// benchmarks.
pub fn synthetic_samples(n: usize, seed: u64) -> Vec<LabeledSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let sample = Sample {
                sepal_length: rng.gen_range(0.0..10.0),
                sepal_width: rng.gen_range(0.0..10.0),
                petal_length: rng.gen_range(0.0..10.0),
                petal_width: rng.gen_range(0.0..10.0),
            };
            let species = Species::ALL[rng.gen_range(0..Species::ALL.len())];
            LabeledSample { sample, species }
        })
        .collect()
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    fn rejects_with<T: serde::de::DeserializeOwned + fmt::Debug>(json: &str, expected: IrisError) {
        let err = serde_json::from_str::<T>(json).unwrap_err();
        assert!(err.to_string().contains(&expected.to_string()), "{err}");
    }

    #[test]
    fn test_sample_deserialization_is_range_checked() {
        rejects_with::<Sample>(
            r#"{"sepal_length":5.1,"sepal_width":-3.0,"petal_length":1.4,"petal_width":0.2}"#,
            IrisError::OutOfRangeSample { field: "sepal_width", value: -3.0 },
        );
    }

    #[test]
    fn test_species_deserialization_rejects_unknown_label() {
        rejects_with::<Species>(r#""Iris-rosa""#, IrisError::UnrecognizedSpecies("Iris-rosa".to_string()));
        assert_eq!(serde_json::from_str::<Species>(r#""virginica""#).unwrap(), Species::Virginica);
    }

    #[test]
    fn test_labeled_sample_round_trips_through_json() {
        let labeled = LabeledSample::new(Sample::new(6.3, 3.3, 6.0, 2.5).unwrap(), Species::Virginica);
        let json = serde_json::to_string(&labeled).unwrap();
        assert!(json.contains(r#""species":"Iris-virginica""#), "{json}");
        assert_eq!(serde_json::from_str::<LabeledSample>(&json).unwrap(), labeled);
    }

    #[test]
    fn test_labeled_sample_deserialization_validates_nested_sample() {
        rejects_with::<LabeledSample>(
            r#"{"sample":{"sepal_length":5.1,"sepal_width":3.5,"petal_length":1.4,"petal_width":-0.2},"species":"Iris-setosa"}"#,
            IrisError::OutOfRangeSample { field: "petal_width", value: -0.2 },
        );
    }
}
