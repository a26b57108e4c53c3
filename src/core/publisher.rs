use crate::adapters::http::ApiClient;
use crate::domain::model::PublishResponse;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};

/// Uploads the CSV artifact as a multipart form.
pub struct Publisher<'a, S: Storage> {
    client: &'a ApiClient,
    storage: &'a S,
    endpoint: &'a str,
    field: &'a str,
}

impl<'a, S: Storage> Publisher<'a, S> {
    pub fn new(client: &'a ApiClient, storage: &'a S, endpoint: &'a str) -> Self {
        Self {
            client,
            storage,
            endpoint,
            field: "file",
        }
    }

    pub fn with_field(mut self, field: &'a str) -> Self {
        self.field = field;
        self
    }

    /// Reads `artifact_name` back from storage and posts it.
    ///
    /// The response is returned whatever its status; only transport failures are errors.
    pub async fn publish(&self, artifact_name: &str) -> Result<PublishResponse> {
        let data = match self.storage.read_file(artifact_name).await {
            Ok(data) => data,
            Err(EtlError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EtlError::MissingArtifactError {
                    path: self.storage.location(artifact_name),
                })
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            "📤 Uploading {} ({} bytes) to {}",
            artifact_name,
            data.len(),
            self.endpoint
        );
        let response = self
            .client
            .post_file(self.endpoint, self.field, artifact_name, data)
            .await?;
        tracing::debug!("Upload response status: {}", response.status);

        Ok(response)
    }
}
