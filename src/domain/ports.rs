use crate::domain::model::{EncodedDataset, Record, TrainReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ArtifactStore: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Settings shared by every trainer.
pub trait TrainOptions: Send + Sync {
    fn dataset_path(&self) -> &str;
    fn target_column(&self) -> &str;
    fn model_output(&self) -> &str;
    fn max_depth(&self) -> Option<usize>;
    fn seed(&self) -> u64;
}

/// Extra settings for the bagged-forest trainer.
pub trait ForestOptions: TrainOptions {
    fn label_output(&self) -> &str;
    fn trees(&self) -> usize;
    fn holdout(&self) -> f64;
}

#[async_trait]
pub trait TrainPipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, records: Vec<Record>) -> Result<EncodedDataset>;
    async fn load(&self, dataset: EncodedDataset) -> Result<TrainReport>;
}
