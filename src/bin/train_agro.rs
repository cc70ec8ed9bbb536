use clap::Parser;
use crop_recommender::utils::{logger, validation::Validate};
use crop_recommender::{AgroTrainPipeline, LocalStore, TrainAgroConfig, TrainEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TrainAgroConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting agronomic classifier training");

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let store = LocalStore::default();
    let monitor_enabled = config.monitor;
    let pipeline = AgroTrainPipeline::new(store, config);
    let engine = TrainEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Training completed successfully!");
            tracing::info!("📁 Model saved to: {}", report.model_path);
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
