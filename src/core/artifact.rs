use crate::core::classifier::Classifier;
use crate::domain::model::LabelEncoder;
use crate::domain::ports::ArtifactStore;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Descriptive header carried by every model artifact; logged at startup and
/// used for the class-space check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub algorithm: String,
    pub feature_columns: Vec<String>,
    pub n_classes: usize,
    pub trained_at: DateTime<Utc>,
}

/// Service A's pipeline artifact: fitted per-column category encoders plus
/// the classifier. The paired target label encoder is persisted separately.
#[derive(Serialize, Deserialize)]
pub struct RecommenderModel {
    pub meta: ArtifactMeta,
    pub locations: LabelEncoder,
    pub seasons: LabelEncoder,
    pub soils: LabelEncoder,
    pub classifier: Classifier,
}

/// Service B's artifact: a single classifier with its label encoder embedded.
#[derive(Serialize, Deserialize)]
pub struct AgroModel {
    pub meta: ArtifactMeta,
    pub labels: LabelEncoder,
    pub classifier: Classifier,
}

pub async fn save_artifact<T, S>(store: &S, path: &str, artifact: &T) -> Result<()>
where
    T: Serialize,
    S: ArtifactStore,
{
    let bytes = bincode::serialize(artifact)?;
    store.write_file(path, &bytes).await
}

pub async fn load_artifact<T, S>(store: &S, path: &str) -> Result<T>
where
    T: DeserializeOwned,
    S: ArtifactStore,
{
    let bytes = store.read_file(path).await?;
    Ok(bincode::deserialize(&bytes)?)
}
