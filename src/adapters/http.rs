use crate::domain::model::PublishResponse;
use crate::utils::error::{EtlError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("swapi-etl/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over `reqwest::Client` with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_timeout_seconds(seconds: u64) -> Result<Self> {
        Self::new(Duration::from_secs(seconds))
    }

    /// GET `url` and decode the body as `T`.
    ///
    /// Non-2xx statuses become `ApiError`; a body that does not decode becomes `ParseError`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let body = response.error_for_status()?.text().await?;
        serde_json::from_str(&body).map_err(|e| EtlError::ParseError {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// POST `data` as a single-part multipart upload.
    pub async fn post_file(
        &self,
        url: &str,
        field: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<PublishResponse> {
        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part(field.to_string(), part);

        tracing::debug!("Uploading {} as '{}' to: {}", file_name, field, url);
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(PublishResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[tokio::test]
    async fn test_get_json_decodes_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/species/3/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"name": "Wookiee", "classification": "mammal"}));
        });

        let client = ApiClient::with_timeout_seconds(5).unwrap();
        let named: Named = client.get_json(&server.url("/species/3/")).await.unwrap();

        api_mock.assert();
        assert_eq!(named.name, "Wookiee");
    }

    #[tokio::test]
    async fn test_get_json_non_success_is_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing/");
            then.status(404);
        });

        let client = ApiClient::with_timeout_seconds(5).unwrap();
        let err = client
            .get_json::<Named>(&server.url("/missing/"))
            .await
            .unwrap_err();

        match err {
            EtlError::ApiError(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(404)),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_json_malformed_body_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/broken/");
            then.status(200).body("<html>not json</html>");
        });

        let client = ApiClient::with_timeout_seconds(5).unwrap();
        let err = client
            .get_json::<Named>(&server.url("/broken/"))
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::ParseError { ref url, .. } if url.ends_with("/broken/")));
    }

    #[tokio::test]
    async fn test_slow_response_surfaces_as_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow/");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(serde_json::json!({"name": "late"}));
        });

        let client = ApiClient::new(Duration::from_millis(200)).unwrap();
        let err = client
            .get_json::<Named>(&server.url("/slow/"))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }
}
