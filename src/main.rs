use clap::Parser;
use crop_recommender::server::state::RecommenderState;
use crop_recommender::server::{recommender_app, serve};
use crop_recommender::utils::{logger, validation::Validate};
use crop_recommender::{LocalStore, Recommender, ServeConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServeConfig::parse();

    logger::init_server_logger(config.verbose);

    tracing::info!("Starting crop recommendation API");
    if config.verbose {
        tracing::debug!("Serve config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // Artifacts are loaded exactly once; a failure here is fatal before any
    // request is served.
    let store = LocalStore::default();
    let recommender = match Recommender::load(&store, &config.model_path, &config.label_path).await
    {
        Ok(recommender) => recommender,
        Err(e) => {
            tracing::error!("❌ Failed to load model artifacts: {}", e);
            eprintln!("❌ Failed to load model artifacts: {}", e);
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
    if recommender.supports_probability() {
        tracing::info!("Probability estimation available, responses include top-3");
    } else {
        tracing::info!("Probability estimation unavailable, responses are top-1 only");
    }

    let state = Arc::new(RecommenderState { recommender });
    let app = recommender_app(state);

    serve(app, &config.host, config.port).await?;

    Ok(())
}
