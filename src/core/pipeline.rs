use crate::adapters::http::ApiClient;
use crate::core::enricher::Enricher;
use crate::core::publisher::Publisher;
use crate::core::ranker::Ranker;
use crate::core::writer::Writer;
use crate::core::{ConfigProvider, Pipeline, PublishResponse, RankedReference, Record, Storage};
use crate::utils::error::Result;

/// Wires the four stages against one storage backend and one configuration source.
pub struct SwapiPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: ApiClient,
}

impl<S: Storage, C: ConfigProvider> SwapiPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = ApiClient::with_timeout_seconds(config.timeout_seconds())?;
        Ok(Self {
            storage,
            config,
            client,
        })
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn writer(&self) -> Writer<'_, S> {
        Writer::new(
            &self.storage,
            self.config.artifact_name(),
            self.config.top_n(),
        )
        .with_snapshot(self.config.snapshot_name())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SwapiPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RankedReference>> {
        Ranker::new(
            self.client.clone(),
            self.config.films_endpoint(),
            self.config.top_n(),
        )
        .rank()
        .await
    }

    async fn transform(&self, ranked: Vec<RankedReference>) -> Result<Vec<Record>> {
        Enricher::new(self.client.clone())
            .with_concurrency(self.config.concurrent_requests())
            .with_species_fallback(self.config.species_fallback().map(str::to_string))
            .enrich(ranked)
            .await
    }

    async fn load(&self, records: Vec<Record>) -> Result<String> {
        self.writer().write(&records).await
    }

    async fn load_values(&self, values: Vec<serde_json::Value>) -> Result<(String, Vec<Record>)> {
        self.writer().write_values(&values).await
    }

    async fn publish(&self) -> Result<PublishResponse> {
        Publisher::new(&self.client, &self.storage, self.config.upload_endpoint())
            .with_field(self.config.upload_field())
            .publish(self.config.artifact_name())
            .await
    }

    fn publish_enabled(&self) -> bool {
        self.config.publish_enabled()
    }
}
