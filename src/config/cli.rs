use crate::config::toml_config::TrainFileConfig;
use crate::domain::ports::{ArtifactStore, ForestOptions, TrainOptions};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use clap::Parser;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "crop-api")]
#[command(about = "Crop recommendation API server")]
pub struct ServeConfig {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Path to the serialized recommendation pipeline
    #[arg(long, env = "CROP_MODEL_PATH", default_value = "crop_model.bin")]
    pub model_path: String,

    /// Path to the serialized label encoder
    #[arg(long, env = "CROP_LABEL_PATH", default_value = "crop_label_encoder.bin")]
    pub label_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for ServeConfig {
    fn validate(&self) -> Result<()> {
        validate_path("model_path", &self.model_path)?;
        validate_path("label_path", &self.label_path)?;
        validate_non_empty_string("host", &self.host)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "agro-api")]
#[command(about = "Agronomic crop prediction API server")]
pub struct AgroServeConfig {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Path to the serialized classifier
    #[arg(long, env = "AGRO_MODEL_PATH", default_value = "crop_recommendation_model.bin")]
    pub model_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for AgroServeConfig {
    fn validate(&self) -> Result<()> {
        validate_path("model_path", &self.model_path)?;
        validate_non_empty_string("host", &self.host)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "train-recommender")]
#[command(about = "One-shot trainer for the crop recommendation pipeline")]
pub struct TrainRecommenderConfig {
    /// Training dataset (CSV with Location, Time, Soil Condition, pH and a
    /// target column)
    #[arg(long, default_value = "crop_dataset.csv")]
    pub dataset: String,

    /// Name of the target column in the dataset
    #[arg(long, default_value = "Crop")]
    pub target_column: String,

    /// Where to write the pipeline artifact
    #[arg(long, default_value = "crop_model.bin")]
    pub model_out: String,

    /// Where to write the label encoder artifact
    #[arg(long, default_value = "crop_label_encoder.bin")]
    pub label_out: String,

    /// Number of bagged trees in the forest
    #[arg(long, default_value_t = 100)]
    pub trees: usize,

    /// Maximum tree depth (unlimited when omitted)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Share of rows held out for the accuracy report (0 disables)
    #[arg(long, default_value_t = 0.2)]
    pub holdout: f64,

    /// Seed for the bootstrap sampling and the holdout split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Optional TOML file whose values replace the defaults above
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

impl TrainRecommenderConfig {
    /// Folds a TOML training config into this one; file values win where
    /// present.
    pub fn apply_file(&mut self, file: &TrainFileConfig) {
        if let Some(dataset) = &file.dataset {
            if let Some(path) = &dataset.path {
                self.dataset = path.clone();
            }
            if let Some(target_column) = &dataset.target_column {
                self.target_column = target_column.clone();
            }
        }
        if let Some(model) = &file.model {
            if let Some(trees) = model.trees {
                self.trees = trees;
            }
            if model.max_depth.is_some() {
                self.max_depth = model.max_depth;
            }
            if let Some(holdout) = model.holdout {
                self.holdout = holdout;
            }
            if let Some(seed) = model.seed {
                self.seed = seed;
            }
        }
        if let Some(output) = &file.output {
            if let Some(model_path) = &output.model_path {
                self.model_out = model_path.clone();
            }
            if let Some(label_path) = &output.label_path {
                self.label_out = label_path.clone();
            }
        }
    }
}

impl TrainOptions for TrainRecommenderConfig {
    fn dataset_path(&self) -> &str {
        &self.dataset
    }

    fn target_column(&self) -> &str {
        &self.target_column
    }

    fn model_output(&self) -> &str {
        &self.model_out
    }

    fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

impl ForestOptions for TrainRecommenderConfig {
    fn label_output(&self) -> &str {
        &self.label_out
    }

    fn trees(&self) -> usize {
        self.trees
    }

    fn holdout(&self) -> f64 {
        self.holdout
    }
}

impl Validate for TrainRecommenderConfig {
    fn validate(&self) -> Result<()> {
        validate_path("dataset", &self.dataset)?;
        validate_path("model_out", &self.model_out)?;
        validate_path("label_out", &self.label_out)?;
        validate_non_empty_string("target_column", &self.target_column)?;
        validate_positive_number("trees", self.trees, 1)?;
        validate_range("holdout", self.holdout, 0.0, 0.9)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "train-agro")]
#[command(about = "One-shot trainer for the agronomic crop classifier")]
pub struct TrainAgroConfig {
    /// Training dataset (CSV with N, P, K, temperature, humidity, ph,
    /// rainfall and a label column)
    #[arg(long, default_value = "Crop_recommendation.csv")]
    pub dataset: String,

    /// Name of the target column in the dataset
    #[arg(long, default_value = "label")]
    pub target_column: String,

    /// Where to write the classifier artifact
    #[arg(long, default_value = "crop_recommendation_model.bin")]
    pub model_out: String,

    /// Maximum tree depth (unlimited when omitted)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Seed reserved for sampling; the tree fit itself is deterministic
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

impl TrainOptions for TrainAgroConfig {
    fn dataset_path(&self) -> &str {
        &self.dataset
    }

    fn target_column(&self) -> &str {
        &self.target_column
    }

    fn model_output(&self) -> &str {
        &self.model_out
    }

    fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

impl Validate for TrainAgroConfig {
    fn validate(&self) -> Result<()> {
        validate_path("dataset", &self.dataset)?;
        validate_path("model_out", &self.model_out)?;
        validate_non_empty_string("target_column", &self.target_column)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    base_path: String,
}

impl LocalStore {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl ArtifactStore for LocalStore {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
