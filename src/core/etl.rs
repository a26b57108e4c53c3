use crate::core::{Pipeline, PublishResponse, Record, RunSummary};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Rank → enrich → write → publish. Any failure stops the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = Utc::now();
        tracing::info!("Starting ETL process...");

        // Extract
        tracing::info!("Ranking characters by film appearances...");
        let ranked = self.pipeline.extract().await?;
        tracing::info!("Ranked {} characters", ranked.len());
        self.monitor.log_stats("Rank");

        // Transform
        tracing::info!("Enriching characters...");
        let records = self.pipeline.transform(ranked).await?;
        tracing::info!("Enriched {} characters", records.len());
        self.monitor.log_stats("Enrich");

        // Load
        tracing::info!("Writing CSV artifact...");
        let artifact_path = self.pipeline.load(records.clone()).await?;
        self.monitor.log_stats("Write");

        self.finish(started_at, artifact_path, records).await
    }

    /// Writes and publishes previously saved records, skipping the API lookups.
    pub async fn replay(&self, values: Vec<serde_json::Value>) -> Result<RunSummary> {
        let started_at = Utc::now();
        tracing::info!("Replaying {} saved records...", values.len());

        let (artifact_path, records) = self.pipeline.load_values(values).await?;
        self.monitor.log_stats("Write");

        self.finish(started_at, artifact_path, records).await
    }

    async fn finish(
        &self,
        started_at: chrono::DateTime<Utc>,
        artifact_path: String,
        records: Vec<Record>,
    ) -> Result<RunSummary> {
        let publish = if self.pipeline.publish_enabled() {
            tracing::info!("Publishing artifact...");
            let response = self.pipeline.publish().await?;
            log_publish_response(&response);
            self.monitor.log_stats("Publish");
            Some(response)
        } else {
            tracing::info!("Publishing disabled, artifact kept at {}", artifact_path);
            None
        };

        self.monitor.log_final_stats();

        let summary = RunSummary {
            artifact_path,
            records,
            publish,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::debug!(
            "Run finished in {}ms",
            summary.elapsed().num_milliseconds()
        );
        Ok(summary)
    }
}

fn log_publish_response(response: &PublishResponse) {
    if response.is_success() {
        tracing::info!("✅ Upload accepted with status {}", response.status);
    } else {
        tracing::warn!("⚠️ Upload answered with status {}", response.status);
    }
    tracing::debug!("Upload response body: {}", response.body);
}
