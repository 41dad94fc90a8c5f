use std::collections::HashMap;

use iris_knn::{
    DealingPartitioner, ErrorKind, IrisError, KnnDistance, LabeledSample, Sample, ShufflingPartitioner, Species,
    SplitRatio, TrainingData, UnknownSample,
};

const HEADER: [&str; 5] = ["sepal_length", "sepal_width", "petal_length", "petal_width", "class"];

// Ten rows of each species from the Bezdek iris data, then three bad rows.
const IRIS_CSV: &str = "\
5.1,3.5,1.4,0.2,Iris-setosa
4.9,3.0,1.4,0.2,Iris-setosa
4.7,3.2,1.3,0.2,Iris-setosa
4.6,3.1,1.5,0.2,Iris-setosa
5.0,3.6,1.4,0.2,Iris-setosa
5.4,3.9,1.7,0.4,Iris-setosa
4.6,3.4,1.4,0.3,Iris-setosa
5.0,3.4,1.5,0.2,Iris-setosa
4.4,2.9,1.4,0.2,Iris-setosa
4.9,3.1,1.5,0.1,Iris-setosa
7.0,3.2,4.7,1.4,Iris-versicolor
6.4,3.2,4.5,1.5,Iris-versicolor
6.9,3.1,4.9,1.5,Iris-versicolor
5.5,2.3,4.0,1.3,Iris-versicolor
6.5,2.8,4.6,1.5,Iris-versicolor
5.7,2.8,4.5,1.3,Iris-versicolor
6.3,3.3,4.7,1.6,Iris-versicolor
4.9,2.4,3.3,1.0,Iris-versicolor
6.6,2.9,4.6,1.3,Iris-versicolor
5.2,2.7,3.9,1.4,Iris-versicolor
6.3,3.3,6.0,2.5,Iris-virginica
5.8,2.7,5.1,1.9,Iris-virginica
7.1,3.0,5.9,2.1,Iris-virginica
6.3,2.9,5.6,1.8,Iris-virginica
6.5,3.0,5.8,2.2,Iris-virginica
7.6,3.0,6.6,2.1,Iris-virginica
4.9,2.5,4.5,1.7,Iris-virginica
7.3,2.9,6.3,1.8,Iris-virginica
6.7,2.5,5.8,1.8,Iris-virginica
7.2,3.6,6.1,2.5,Iris-virginica
5.0,-3.0,1.4,0.2,Iris-setosa
5.0,3.0,1.4,0.2,Iris-rosa
5.0,three,1.4,0.2,Iris-setosa";

fn raw_records() -> Vec<HashMap<&'static str, &'static str>> {
    IRIS_CSV
        .lines()
        .map(|line| HEADER.into_iter().zip(line.split(',')).collect())
        .collect()
}

/// Mimics an ingestion layer that skips invalid rows and counts them by kind.
fn ingest() -> (Vec<LabeledSample>, HashMap<ErrorKind, usize>) {
    let mut samples = Vec::new();
    let mut rejected = HashMap::new();
    for record in raw_records() {
        match LabeledSample::from_record(&record) {
            Ok(sample) => samples.push(sample),
            Err(err) if err.is_validation() => *rejected.entry(err.kind()).or_insert(0) += 1,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }
    (samples, rejected)
}

#[test]
fn ingestion_reports_each_bad_row_by_kind() {
    let (samples, rejected) = ingest();
    assert_eq!(samples.len(), 30);
    assert_eq!(rejected.get(&ErrorKind::OutOfRangeSample), Some(&1));
    assert_eq!(rejected.get(&ErrorKind::UnrecognizedSpecies), Some(&1));
    assert_eq!(rejected.get(&ErrorKind::MalformedSample), Some(&1));
}

#[test]
fn dealt_iris_is_classified_perfectly() {
    let (samples, _) = ingest();
    let mut data: TrainingData = TrainingData::new("bezdek");
    data.load(samples, &DealingPartitioner::default());
    assert_eq!(data.training().len(), 24);
    assert_eq!(data.testing().len(), 6);

    for k in [1, 3, 5, 7] {
        for metric in KnnDistance::ALL_BASIC {
            let quality = data.test(data.hyperparameter(k, metric)).unwrap();
            assert_eq!(quality, 1.0, "k={} metric={:?}", k, metric);
        }
    }
    assert_eq!(data.tuning().len(), 16);
}

#[test]
fn two_thirds_split_misses_one_sample() {
    let (samples, _) = ingest();
    let mut data: TrainingData = TrainingData::new("bezdek");
    data.load(samples, &DealingPartitioner::new(SplitRatio::new(2, 3).unwrap()));
    assert_eq!(data.testing().len(), 10);

    let quality = data.test(data.hyperparameter(3, KnnDistance::Euclidean)).unwrap();
    assert_eq!(quality, 0.9);
    let misses = data.testing().iter().filter(|r| !r.matches()).count();
    assert_eq!(misses, 1);
}

#[test]
fn unknown_samples_get_expected_species() {
    let (samples, _) = ingest();
    let mut data: TrainingData = TrainingData::new("bezdek");
    data.load(samples, &DealingPartitioner::default());
    let queries = [
        ([5.0, 3.3, 1.4, 0.2], Species::Setosa),
        ([6.0, 2.9, 4.5, 1.5], Species::Versicolor),
        ([6.9, 3.1, 5.4, 2.1], Species::Virginica),
    ];
    for metric in KnnDistance::ALL_BASIC {
        let h = data.hyperparameter(3, metric);
        for (measurements, expected) in queries {
            let unknown = UnknownSample::new(Sample::from_measurements(measurements).unwrap());
            let classified = data.classify(&h, unknown).unwrap();
            assert_eq!(classified.classification(), Some(expected), "{:?}", metric);
        }
    }
}

#[test]
fn shuffled_split_keeps_every_sample() {
    let (samples, _) = ingest();
    let mut data: TrainingData = TrainingData::new("shuffled");
    data.load(samples.clone(), &ShufflingPartitioner::new(SplitRatio::new(9, 10).unwrap()).with_seed(2024));
    assert_eq!(data.training().len(), 27);
    assert_eq!(data.testing().len(), 3);

    let mut seen: Vec<LabeledSample> = data
        .training()
        .iter()
        .map(|r| *r.sample())
        .chain(data.testing().iter().map(|r| *r.sample()))
        .collect();
    let key = |s: &LabeledSample| (s.species(), s.sample().measurements().map(f64::to_bits));
    seen.sort_by_key(key);
    let mut expected = samples;
    expected.sort_by_key(key);
    assert_eq!(seen, expected);
}

#[test]
fn evaluation_after_owner_is_gone_fails_loudly() {
    let (samples, _) = ingest();
    let mut data: TrainingData = TrainingData::new("short-lived");
    data.load(samples, &DealingPartitioner::default());
    let testing = data.testing().to_vec();
    let mut h = data.hyperparameter(3, KnnDistance::Manhattan);
    drop(data);

    let err = h.evaluate(&testing).unwrap_err();
    assert_eq!(err, IrisError::StaleReference);
    assert_eq!(h.quality(), None);
}
