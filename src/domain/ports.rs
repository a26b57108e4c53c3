use crate::domain::model::{PublishResponse, RankedReference, Record};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Display form of `path` inside this storage, used in logs and summaries.
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn films_endpoint(&self) -> &str;
    fn upload_endpoint(&self) -> &str;
    fn upload_field(&self) -> &str;
    fn output_path(&self) -> &str;
    fn artifact_name(&self) -> &str;
    fn snapshot_name(&self) -> Option<&str>;
    fn top_n(&self) -> usize;
    fn concurrent_requests(&self) -> usize;
    fn timeout_seconds(&self) -> u64;
    fn species_fallback(&self) -> Option<&str>;
    fn publish_enabled(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RankedReference>>;
    async fn transform(&self, ranked: Vec<RankedReference>) -> Result<Vec<Record>>;
    async fn load(&self, records: Vec<Record>) -> Result<String>;
    async fn load_values(&self, values: Vec<serde_json::Value>) -> Result<(String, Vec<Record>)>;
    async fn publish(&self) -> Result<PublishResponse>;
    fn publish_enabled(&self) -> bool;
}
