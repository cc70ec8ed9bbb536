pub mod agro_pipeline;
pub mod artifact;
pub mod classifier;
pub mod dataset;
pub mod payload;
pub mod recommender;
pub mod recommender_pipeline;
pub mod train;

pub use crate::domain::model::{
    AgroFeatures, CropScore, EncodedDataset, FeatureRow, LabelEncoder, Prediction, Record,
    TrainReport,
};
pub use crate::domain::ports::{ArtifactStore, ForestOptions, TrainOptions, TrainPipeline};
pub use crate::utils::error::Result;
