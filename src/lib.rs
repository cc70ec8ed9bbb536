pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{
    AgroServeConfig, LocalStore, ServeConfig, TrainAgroConfig, TrainRecommenderConfig,
};

pub use crate::core::agro_pipeline::AgroTrainPipeline;
pub use crate::core::recommender::{AgroRecommender, Recommender};
pub use crate::core::recommender_pipeline::RecommenderTrainPipeline;
pub use crate::core::train::TrainEngine;
pub use utils::error::{CropError, Result};
