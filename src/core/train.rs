use crate::domain::model::TrainReport;
use crate::domain::ports::TrainPipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives a training pipeline through its extract, transform and load
/// stages, with optional system-resource reporting per stage.
pub struct TrainEngine<P: TrainPipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: TrainPipeline> TrainEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(enabled),
        }
    }

    pub async fn run(&self) -> Result<TrainReport> {
        tracing::info!("Extracting dataset...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", records.len());
        self.monitor.log_stats("Extract");

        tracing::info!("Encoding dataset...");
        let dataset = self.pipeline.transform(records).await?;
        tracing::info!(
            "Encoded {} samples across {} classes",
            dataset.targets.len(),
            dataset.labels.len()
        );
        self.monitor.log_stats("Transform");

        tracing::info!("Fitting and persisting model...");
        let report = self.pipeline.load(dataset).await?;
        tracing::info!("Model saved to: {}", report.model_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(report)
    }
}
