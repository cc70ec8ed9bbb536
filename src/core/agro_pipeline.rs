use crate::core::artifact::{save_artifact, AgroModel, ArtifactMeta};
use crate::core::classifier::{Classifier, TreeClassifier};
use crate::core::dataset::{read_csv_records, require_field, require_numeric};
use crate::core::payload::AGRO_KEYS;
use crate::domain::model::{EncodedDataset, LabelEncoder, Record, TrainReport};
use crate::domain::ports::{ArtifactStore, TrainOptions, TrainPipeline};
use crate::utils::error::{CropError, Result};
use async_trait::async_trait;
use chrono::Utc;
use ndarray::{Array1, Array2};

/// Trains Service B's artifact: a single decision tree over the seven
/// numeric columns, with the label encoder embedded alongside it.
pub struct AgroTrainPipeline<S: ArtifactStore, C: TrainOptions> {
    store: S,
    config: C,
}

impl<S: ArtifactStore, C: TrainOptions> AgroTrainPipeline<S, C> {
    pub fn new(store: S, config: C) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl<S: ArtifactStore, C: TrainOptions> TrainPipeline for AgroTrainPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        read_csv_records(self.config.dataset_path())
    }

    async fn transform(&self, records: Vec<Record>) -> Result<EncodedDataset> {
        if records.is_empty() {
            return Err(CropError::training("dataset is empty"));
        }

        let target_column = self.config.target_column();
        let n_samples = records.len();
        let mut flat = Vec::with_capacity(n_samples * AGRO_KEYS.len());
        let mut target_values = Vec::with_capacity(n_samples);

        for (row, record) in records.iter().enumerate() {
            for column in AGRO_KEYS {
                flat.push(require_numeric(record, column, row)?);
            }
            target_values.push(require_field(record, target_column, row)?.to_string());
        }

        let labels = LabelEncoder::fit(&target_values);
        if labels.len() < 2 {
            return Err(CropError::training(format!(
                "need at least two target classes, got {}",
                labels.len()
            )));
        }

        let targets: Vec<usize> = target_values
            .iter()
            .map(|value| {
                labels
                    .transform(value)
                    .ok_or_else(|| CropError::training("label encoder lost a fitted value"))
            })
            .collect::<Result<_>>()?;

        let features = Array2::from_shape_vec((n_samples, AGRO_KEYS.len()), flat)
            .map_err(|e| CropError::training(format!("bad feature matrix shape: {}", e)))?;

        Ok(EncodedDataset {
            columns: AGRO_KEYS.iter().map(|c| c.to_string()).collect(),
            features,
            targets: Array1::from_vec(targets),
            labels,
            feature_encoders: Vec::new(),
        })
    }

    async fn load(&self, dataset: EncodedDataset) -> Result<TrainReport> {
        let n_samples = dataset.targets.len();
        let n_classes = dataset.labels.len();

        let tree = TreeClassifier::fit(
            &dataset.features,
            &dataset.targets,
            n_classes,
            self.config.max_depth(),
        )?;
        tracing::info!("Fitted decision tree over {} classes", n_classes);

        let model = AgroModel {
            meta: ArtifactMeta {
                algorithm: "decision-tree".to_string(),
                feature_columns: dataset.columns.clone(),
                n_classes,
                trained_at: Utc::now(),
            },
            labels: dataset.labels.clone(),
            classifier: Classifier::Tree(tree),
        };

        save_artifact(&self.store, self.config.model_output(), &model).await?;

        Ok(TrainReport {
            algorithm: "decision-tree".to_string(),
            samples: n_samples,
            classes: n_classes,
            holdout_accuracy: None,
            model_path: self.config.model_output().to_string(),
            label_path: None,
        })
    }
}
