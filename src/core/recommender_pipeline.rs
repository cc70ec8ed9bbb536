use crate::core::artifact::{save_artifact, ArtifactMeta, RecommenderModel};
use crate::core::classifier::{Classifier, VoteForest};
use crate::core::dataset::{encoder_for, read_csv_records, require_field, require_numeric};
use crate::core::payload::REQUIRED_KEYS;
use crate::domain::model::{EncodedDataset, LabelEncoder, Record, TrainReport};
use crate::domain::ports::{ArtifactStore, ForestOptions, TrainPipeline};
use crate::utils::error::{CropError, Result};
use async_trait::async_trait;
use chrono::Utc;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Trains Service A's artifacts: per-column category encoders, a bagged
/// voting forest over the four-column schema, and the target label encoder.
pub struct RecommenderTrainPipeline<S: ArtifactStore, C: ForestOptions> {
    store: S,
    config: C,
}

impl<S: ArtifactStore, C: ForestOptions> RecommenderTrainPipeline<S, C> {
    pub fn new(store: S, config: C) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl<S: ArtifactStore, C: ForestOptions> TrainPipeline for RecommenderTrainPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        read_csv_records(self.config.dataset_path())
    }

    async fn transform(&self, records: Vec<Record>) -> Result<EncodedDataset> {
        if records.is_empty() {
            return Err(CropError::training("dataset is empty"));
        }

        let target_column = self.config.target_column();
        let mut locations = Vec::with_capacity(records.len());
        let mut seasons = Vec::with_capacity(records.len());
        let mut soils = Vec::with_capacity(records.len());
        let mut ph_values = Vec::with_capacity(records.len());
        let mut target_values = Vec::with_capacity(records.len());

        for (row, record) in records.iter().enumerate() {
            locations.push(require_field(record, "Location", row)?.to_string());
            seasons.push(require_field(record, "Time", row)?.to_string());
            soils.push(require_field(record, "Soil Condition", row)?.to_string());
            ph_values.push(require_numeric(record, "pH", row)?);
            target_values.push(require_field(record, target_column, row)?.to_string());
        }

        let location_encoder = LabelEncoder::fit(&locations);
        let season_encoder = LabelEncoder::fit(&seasons);
        let soil_encoder = LabelEncoder::fit(&soils);
        let labels = LabelEncoder::fit(&target_values);

        if labels.len() < 2 {
            return Err(CropError::training(format!(
                "need at least two target classes, got {}",
                labels.len()
            )));
        }

        let n_samples = records.len();
        let mut flat = Vec::with_capacity(n_samples * REQUIRED_KEYS.len());
        let mut targets = Vec::with_capacity(n_samples);
        for i in 0..n_samples {
            let location = location_encoder
                .transform(&locations[i])
                .ok_or_else(|| CropError::training("location encoder lost a fitted value"))?;
            let season = season_encoder
                .transform(&seasons[i])
                .ok_or_else(|| CropError::training("season encoder lost a fitted value"))?;
            let soil = soil_encoder
                .transform(&soils[i])
                .ok_or_else(|| CropError::training("soil encoder lost a fitted value"))?;
            flat.extend_from_slice(&[location as f64, season as f64, soil as f64, ph_values[i]]);

            let target = labels
                .transform(&target_values[i])
                .ok_or_else(|| CropError::training("label encoder lost a fitted value"))?;
            targets.push(target);
        }

        let features = Array2::from_shape_vec((n_samples, REQUIRED_KEYS.len()), flat)
            .map_err(|e| CropError::training(format!("bad feature matrix shape: {}", e)))?;

        Ok(EncodedDataset {
            columns: REQUIRED_KEYS.iter().map(|c| c.to_string()).collect(),
            features,
            targets: Array1::from_vec(targets),
            labels,
            feature_encoders: vec![
                ("Location".to_string(), location_encoder),
                ("Time".to_string(), season_encoder),
                ("Soil Condition".to_string(), soil_encoder),
            ],
        })
    }

    async fn load(&self, dataset: EncodedDataset) -> Result<TrainReport> {
        let n_samples = dataset.targets.len();
        let n_classes = dataset.labels.len();
        let seed = self.config.seed();

        let (train_idx, test_idx) = split_indices(n_samples, self.config.holdout(), seed);
        tracing::debug!(
            "Split: {} training rows, {} holdout rows",
            train_idx.len(),
            test_idx.len()
        );

        let train_features = dataset.features.select(Axis(0), &train_idx);
        let train_targets = dataset.targets.select(Axis(0), &train_idx);

        let forest = VoteForest::fit(
            &train_features,
            &train_targets,
            n_classes,
            self.config.trees(),
            self.config.max_depth(),
            seed,
        )?;
        tracing::info!("Fitted {} trees over {} classes", forest.n_trees(), n_classes);

        let holdout_accuracy = if test_idx.is_empty() {
            None
        } else {
            let mut correct = 0usize;
            for &i in &test_idx {
                let row = dataset.features.select(Axis(0), &[i]);
                if forest.predict_row(&row)? == dataset.targets[i] {
                    correct += 1;
                }
            }
            Some(correct as f64 / test_idx.len() as f64)
        };
        if let Some(accuracy) = holdout_accuracy {
            tracing::info!("Holdout accuracy: {:.3}", accuracy);
        }

        let meta = ArtifactMeta {
            algorithm: "voting-forest".to_string(),
            feature_columns: dataset.columns.clone(),
            n_classes,
            trained_at: Utc::now(),
        };
        let model = RecommenderModel {
            meta,
            locations: encoder_for(&dataset, "Location")?.clone(),
            seasons: encoder_for(&dataset, "Time")?.clone(),
            soils: encoder_for(&dataset, "Soil Condition")?.clone(),
            classifier: Classifier::Forest(forest),
        };

        save_artifact(&self.store, self.config.model_output(), &model).await?;
        save_artifact(&self.store, self.config.label_output(), &dataset.labels).await?;

        Ok(TrainReport {
            algorithm: "voting-forest".to_string(),
            samples: n_samples,
            classes: n_classes,
            holdout_accuracy,
            model_path: self.config.model_output().to_string(),
            label_path: Some(self.config.label_output().to_string()),
        })
    }
}

/// Seeded shuffle-and-split. A holdout share that rounds to zero rows, or
/// that would leave nothing to train on, disables the split.
fn split_indices(n_samples: usize, holdout: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    if holdout <= 0.0 {
        return (indices, Vec::new());
    }

    let test_len = (n_samples as f64 * holdout).round() as usize;
    if test_len == 0 || test_len >= n_samples {
        return (indices, Vec::new());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let test_idx = indices.split_off(n_samples - test_len);
    (indices, test_idx)
}
