use crate::utils::error::{CropError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, Validate};
use serde::{Deserialize, Serialize};

/// TOML training configuration for the recommender trainer. Every field is
/// optional; present values replace the CLI defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainFileConfig {
    pub dataset: Option<DatasetSection>,
    pub model: Option<ModelSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetSection {
    pub path: Option<String>,
    pub target_column: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSection {
    pub trees: Option<usize>,
    pub max_depth: Option<usize>,
    pub holdout: Option<f64>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub model_path: Option<String>,
    pub label_path: Option<String>,
}

impl TrainFileConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: TrainFileConfig =
            toml::from_str(&raw).map_err(|e| CropError::ConfigError {
                message: format!("invalid TOML config: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for TrainFileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(model) = &self.model {
            if let Some(trees) = model.trees {
                validate_positive_number("model.trees", trees, 1)?;
            }
            if let Some(holdout) = model.holdout {
                validate_range("model.holdout", holdout, 0.0, 0.9)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let raw = r#"
            [dataset]
            path = "data/crop_dataset.csv"
            target_column = "Crop"

            [model]
            trees = 150
            max_depth = 12
            holdout = 0.25
            seed = 7

            [output]
            model_path = "out/crop_model.bin"
            label_path = "out/crop_label_encoder.bin"
        "#;
        let config: TrainFileConfig = toml::from_str(raw).unwrap();
        assert!(config.validate().is_ok());

        let model = config.model.unwrap();
        assert_eq!(model.trees, Some(150));
        assert_eq!(model.max_depth, Some(12));
        assert_eq!(config.dataset.unwrap().path.as_deref(), Some("data/crop_dataset.csv"));
    }

    #[test]
    fn empty_config_is_valid() {
        let config: TrainFileConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.dataset.is_none());
    }

    #[test]
    fn rejects_invalid_holdout() {
        let raw = "[model]\nholdout = 2.0\n";
        let config: TrainFileConfig = toml::from_str(raw).unwrap();
        assert!(config.validate().is_err());
    }
}
