use clap::Parser;
use crop_recommender::config::toml_config::TrainFileConfig;
use crop_recommender::utils::{logger, validation::Validate};
use crop_recommender::{LocalStore, RecommenderTrainPipeline, TrainEngine, TrainRecommenderConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = TrainRecommenderConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting crop recommender training");

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TrainFileConfig::from_file(&path) {
            Ok(file) => config.apply_file(&file),
            Err(e) => {
                tracing::error!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                std::process::exit(1);
            }
        }
    }

    if config.verbose {
        tracing::debug!("Training config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let store = LocalStore::default();
    let monitor_enabled = config.monitor;
    let pipeline = RecommenderTrainPipeline::new(store, config);
    let engine = TrainEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Training completed successfully!");
            tracing::info!("📁 Model saved to: {}", report.model_path);
            if let Some(path) = &report.label_path {
                tracing::info!("📁 Label encoder saved to: {}", path);
            }
            if let Some(accuracy) = report.holdout_accuracy {
                tracing::info!("Holdout accuracy: {:.3}", accuracy);
            }
            println!(
                "✅ Trained {} on {} samples across {} classes",
                report.algorithm, report.samples, report.classes
            );
        }
        Err(e) => {
            tracing::error!("❌ Training failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
