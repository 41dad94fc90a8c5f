//! Python bindings, compiled with the `python` feature.

use std::collections::HashMap;
use std::sync::Arc;

use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::error::IrisError;
use crate::hyperparameter::Hyperparameter;
use crate::knn::{self, DistanceMetric, KnnDistance};
use crate::samples::{LabeledSample, Sample, Species, TrainingList, TrainingRecord};

impl From<IrisError> for PyErr {
    fn from(err: IrisError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Python-friendly representation of KnnDistance
#[pyclass(name = "KnnDistance")]
#[derive(Clone)]
enum PyKnnDistance {
    Euclidean,
    Manhattan,
    Chebyshev,
    Sorensen,
}

impl From<PyKnnDistance> for KnnDistance {
    fn from(val: PyKnnDistance) -> Self {
        match val {
            PyKnnDistance::Euclidean => KnnDistance::Euclidean,
            PyKnnDistance::Manhattan => KnnDistance::Manhattan,
            PyKnnDistance::Chebyshev => KnnDistance::Chebyshev,
            PyKnnDistance::Sorensen => KnnDistance::Sorensen,
        }
    }
}

fn sample_from_features(features: Vec<f64>) -> PyResult<Sample> {
    let values: [f64; 4] = features.try_into().map_err(|v: Vec<f64>| {
        PyValueError::new_err(format!("expected 4 measurements, got {}", v.len()))
    })?;
    Ok(Sample::from_measurements(values)?)
}

// Items are dicts with the record keys, e.g. {'sepal_length': 5.1, ..., 'species': 'Iris-setosa'},
// or tuples like ([5.1, 3.5, 1.4, 0.2], 'Iris-setosa')
fn labeled_from_py(item: &Bound<'_, PyAny>) -> PyResult<LabeledSample> {
    if let Ok(dict) = item.downcast::<PyDict>() {
        let mut record: HashMap<String, String> = HashMap::with_capacity(dict.len());
        for (key, value) in dict.iter() {
            record.insert(key.extract::<String>()?, value.str()?.to_string());
        }
        Ok(LabeledSample::from_record(&record)?)
    } else if let Ok((features, species)) = item.extract::<(Vec<f64>, String)>() {
        let species: Species = species.parse()?;
        Ok(LabeledSample::new(sample_from_features(features)?, species))
    } else {
        Err(PyTypeError::new_err(
            "samples must be dicts of measurements plus 'species', or ([4 floats], species) tuples",
        ))
    }
}

fn labeled_list(items: &Bound<'_, PyList>) -> PyResult<Vec<LabeledSample>> {
    items.iter().map(|item| labeled_from_py(&item)).collect()
}

/// Distance between two 4-measurement vectors under `metric`.
#[pyfunction]
fn distance(metric: PyKnnDistance, a: Vec<f64>, b: Vec<f64>) -> PyResult<f64> {
    let a = sample_from_features(a)?;
    let b = sample_from_features(b)?;
    Ok(KnnDistance::from(metric).distance(&a, &b))
}

/// One-shot classification of `query` against `training`.
#[pyfunction]
fn classify(k: usize, metric: PyKnnDistance, training: &Bound<'_, PyList>, query: Vec<f64>) -> PyResult<String> {
    let training = labeled_list(training)?;
    let query = sample_from_features(query)?;
    let species = knn::classify(k, &KnnDistance::from(metric), &training, &query)?;
    Ok(species.to_string())
}

#[pyclass(name = "KnnClassifier")]
struct PyKnnClassifier {
    metric: KnnDistance,
    training: Arc<TrainingList>, // the Python object owns the training list
    parameter: Hyperparameter,
}

#[pymethods]
impl PyKnnClassifier {
    #[new]
    fn new(k: usize, distance_metric: PyKnnDistance) -> Self {
        let metric = KnnDistance::from(distance_metric);
        let training = Arc::new(Vec::new());
        PyKnnClassifier { metric, parameter: Hyperparameter::new(k, metric, &training), training }
    }

    fn fit(&mut self, training_data: &Bound<'_, PyList>) -> PyResult<()> {
        let samples = labeled_list(training_data)?;
        self.training = Arc::new(samples.into_iter().map(TrainingRecord::new).collect());
        self.parameter = Hyperparameter::new(self.parameter.k(), self.metric, &self.training);
        Ok(())
    }

    fn predict_single(&self, features: Vec<f64>) -> PyResult<String> {
        let sample = sample_from_features(features)?;
        Ok(self.parameter.classify(&sample)?.to_string())
    }

    /// Fraction of `testing_data` classified correctly; also stored as `quality`.
    fn score(&mut self, testing_data: &Bound<'_, PyList>) -> PyResult<f64> {
        let testing = labeled_list(testing_data)?;
        Ok(self.parameter.evaluate(&testing)?)
    }

    #[getter]
    fn quality(&self) -> Option<f64> {
        self.parameter.quality()
    }
}

#[pymodule]
fn iris_knn(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(distance, m)?)?;
    m.add_function(wrap_pyfunction!(classify, m)?)?;
    m.add_class::<PyKnnDistance>()?;
    m.add_class::<PyKnnClassifier>()?;
    Ok(())
}
