use clap::Parser;
use crop_recommender::server::state::AgroState;
use crop_recommender::server::{agro_app, serve};
use crop_recommender::utils::{logger, validation::Validate};
use crop_recommender::{AgroRecommender, AgroServeConfig, LocalStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AgroServeConfig::parse();

    logger::init_server_logger(config.verbose);

    tracing::info!("Starting agronomic crop prediction API");

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let store = LocalStore::default();
    let recommender = match AgroRecommender::load(&store, &config.model_path).await {
        Ok(recommender) => recommender,
        Err(e) => {
            tracing::error!("❌ Failed to load model artifact: {}", e);
            eprintln!("❌ Failed to load model artifact: {}", e);
            std::process::exit(1);
        }
    };

    let meta = recommender.meta();
    tracing::info!(
        "Loaded model: {} ({} classes, trained {})",
        meta.algorithm,
        meta.n_classes,
        meta.trained_at
    );

    let state = Arc::new(AgroState { recommender });
    let app = agro_app(state);

    serve(app, &config.host, config.port).await?;

    Ok(())
}
