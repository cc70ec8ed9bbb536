use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One raw dataset row, keyed by CSV header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub fields: HashMap<String, String>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// A validated Service A request, trimmed and coerced, ready for encoding.
/// Column names and casing follow the trained pipeline's schema verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub location: String,
    pub time: String,
    pub soil_condition: String,
    pub ph: f64,
}

/// Service B's seven numeric inputs, in the column order the model was
/// trained with.
#[derive(Debug, Clone, PartialEq)]
pub struct AgroFeatures {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl AgroFeatures {
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.n,
            self.p,
            self.k,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

/// Bidirectional mapping between dense class ids and crop names.
///
/// Classes are stored sorted, so ids are deterministic for a given class set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: Vec<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn transform(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .ok()
    }

    pub fn inverse_transform(&self, id: usize) -> Option<&str> {
        self.classes.get(id).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// One crop with its estimated probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropScore {
    pub crop: String,
    pub prob: f64,
}

/// Prediction result: top-1 crop plus, when the classifier estimates
/// probabilities, the top-3 crops ranked by descending probability.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub recommended_crop: String,
    pub top3: Option<Vec<CropScore>>,
}

/// Output of a training pipeline's transform stage: the encoded feature
/// matrix plus every encoder fitted along the way.
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    pub columns: Vec<String>,
    pub features: Array2<f64>,
    pub targets: Array1<usize>,
    pub labels: LabelEncoder,
    pub feature_encoders: Vec<(String, LabelEncoder)>,
}

/// Summary returned by a completed training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub algorithm: String,
    pub samples: usize,
    pub classes: usize,
    pub holdout_accuracy: Option<f64>,
    pub model_path: String,
    pub label_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_encoder_sorts_and_dedups() {
        let encoder = LabelEncoder::fit(["Rice", "Tea", "Rice", "Coconut"]);
        assert_eq!(encoder.classes(), &["Coconut", "Rice", "Tea"]);
        assert_eq!(encoder.len(), 3);
    }

    #[test]
    fn label_encoder_round_trips() {
        let encoder = LabelEncoder::fit(["Rice", "Tea", "Coconut"]);
        for class in encoder.classes() {
            let id = encoder.transform(class).unwrap();
            assert_eq!(encoder.inverse_transform(id), Some(class.as_str()));
        }
    }

    #[test]
    fn label_encoder_rejects_unknown() {
        let encoder = LabelEncoder::fit(["Rice", "Tea"]);
        assert_eq!(encoder.transform("Cabbage"), None);
        assert_eq!(encoder.inverse_transform(7), None);
    }

    #[test]
    fn agro_features_order_matches_training_columns() {
        let features = AgroFeatures {
            n: 90.0,
            p: 42.0,
            k: 43.0,
            temperature: 20.8,
            humidity: 82.0,
            ph: 6.5,
            rainfall: 202.9,
        };
        assert_eq!(
            features.to_vec(),
            vec![90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]
        );
    }
}
