use crate::core::artifact::{load_artifact, AgroModel, ArtifactMeta, RecommenderModel};
use crate::domain::model::{AgroFeatures, CropScore, FeatureRow, LabelEncoder, Prediction};
use crate::domain::ports::ArtifactStore;
use crate::utils::error::{CropError, Result};
use ndarray::Array2;

/// How many ranked alternatives a prediction carries.
pub const TOP_K: usize = 3;

/// The loaded Service A predictor: pipeline artifact plus target label
/// encoder, checked against each other once at load time and read-only
/// afterwards.
pub struct Recommender {
    model: RecommenderModel,
    labels: LabelEncoder,
    supports_proba: bool,
}

impl Recommender {
    pub fn new(model: RecommenderModel, labels: LabelEncoder) -> Result<Self> {
        if labels.is_empty() {
            return Err(CropError::ArtifactMismatchError {
                message: "label encoder has no classes".to_string(),
            });
        }
        if labels.len() != model.classifier.n_classes() {
            return Err(CropError::ArtifactMismatchError {
                message: format!(
                    "label encoder knows {} classes but the classifier predicts {}",
                    labels.len(),
                    model.classifier.n_classes()
                ),
            });
        }

        let supports_proba = model.classifier.supports_probability();
        Ok(Self {
            model,
            labels,
            supports_proba,
        })
    }

    pub async fn load<S: ArtifactStore>(
        store: &S,
        model_path: &str,
        label_path: &str,
    ) -> Result<Self> {
        let model: RecommenderModel = load_artifact(store, model_path).await?;
        let labels: LabelEncoder = load_artifact(store, label_path).await?;
        Self::new(model, labels)
    }

    pub fn meta(&self) -> &ArtifactMeta {
        &self.model.meta
    }

    pub fn classes(&self) -> &[String] {
        self.labels.classes()
    }

    pub fn supports_probability(&self) -> bool {
        self.supports_proba
    }

    pub fn recommend(&self, row: &FeatureRow) -> Result<Prediction> {
        let features = self.encode(row)?;
        let x = Array2::from_shape_vec((1, features.len()), features)
            .map_err(|e| CropError::training(format!("bad feature row shape: {}", e)))?;

        let class_id = self.model.classifier.predict_row(&x)?;
        let recommended_crop = self
            .labels
            .inverse_transform(class_id)
            .ok_or(CropError::UnknownClassError { id: class_id })?
            .to_string();

        let top3 = if self.supports_proba {
            let probabilities = self.model.classifier.predict_proba_row(&x)?;
            Some(top_k(&probabilities, TOP_K, &self.labels)?)
        } else {
            None
        };

        Ok(Prediction {
            recommended_crop,
            top3,
        })
    }

    fn encode(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let location = self.model.locations.transform(&row.location).ok_or_else(|| {
            CropError::UnknownCategoryError {
                column: "Location".to_string(),
                value: row.location.clone(),
            }
        })?;
        let season = self.model.seasons.transform(&row.time).ok_or_else(|| {
            CropError::UnknownCategoryError {
                column: "Time".to_string(),
                value: row.time.clone(),
            }
        })?;
        let soil = self
            .model
            .soils
            .transform(&row.soil_condition)
            .ok_or_else(|| CropError::UnknownCategoryError {
                column: "Soil Condition".to_string(),
                value: row.soil_condition.clone(),
            })?;

        Ok(vec![location as f64, season as f64, soil as f64, row.ph])
    }
}

/// The loaded Service B predictor.
pub struct AgroRecommender {
    model: AgroModel,
}

impl AgroRecommender {
    pub fn new(model: AgroModel) -> Result<Self> {
        if model.labels.len() != model.classifier.n_classes() {
            return Err(CropError::ArtifactMismatchError {
                message: format!(
                    "label encoder knows {} classes but the classifier predicts {}",
                    model.labels.len(),
                    model.classifier.n_classes()
                ),
            });
        }
        Ok(Self { model })
    }

    pub async fn load<S: ArtifactStore>(store: &S, model_path: &str) -> Result<Self> {
        let model: AgroModel = load_artifact(store, model_path).await?;
        Self::new(model)
    }

    pub fn meta(&self) -> &ArtifactMeta {
        &self.model.meta
    }

    pub fn classes(&self) -> &[String] {
        self.model.labels.classes()
    }

    pub fn predict(&self, features: &AgroFeatures) -> Result<String> {
        let values = features.to_vec();
        let x = Array2::from_shape_vec((1, values.len()), values)
            .map_err(|e| CropError::training(format!("bad feature row shape: {}", e)))?;

        let class_id = self.model.classifier.predict_row(&x)?;
        self.model
            .labels
            .inverse_transform(class_id)
            .map(str::to_string)
            .ok_or(CropError::UnknownClassError { id: class_id })
    }
}

/// The k highest-probability classes, decoded and ordered by descending
/// probability. The sort is stable, so exact ties keep ascending-id order;
/// that tie order is implementation-defined, not a contract.
pub fn top_k(probabilities: &[f64], k: usize, labels: &LabelEncoder) -> Result<Vec<CropScore>> {
    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|a, b| probabilities[*b].total_cmp(&probabilities[*a]));
    order.truncate(k);

    order
        .into_iter()
        .map(|id| {
            let crop = labels
                .inverse_transform(id)
                .ok_or(CropError::UnknownClassError { id })?
                .to_string();
            Ok(CropScore {
                crop,
                prob: probabilities[id],
            })
        })
        .collect()
}
