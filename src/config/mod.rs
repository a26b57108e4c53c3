pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_FILMS_ENDPOINT: &str = "https://swapi.dev/api/films/";
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://httpbin.org/post";
pub const DEFAULT_ARTIFACT_NAME: &str = "answer.csv";
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "swapi-etl")]
#[command(about = "Rank Star Wars characters by film appearances and publish them as CSV")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_FILMS_ENDPOINT)]
    pub films_endpoint: String,

    #[arg(long, default_value = DEFAULT_UPLOAD_ENDPOINT)]
    pub upload_endpoint: String,

    #[arg(long, default_value = "file", help = "Multipart field name for the upload")]
    pub upload_field: String,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_ARTIFACT_NAME)]
    pub artifact_name: String,

    #[arg(long, help = "Also save the records as JSON under this name")]
    pub snapshot_name: Option<String>,

    #[arg(long, help = "Write and publish records from a JSON snapshot instead of the API")]
    pub records_input: Option<String>,

    #[arg(long, default_value = "10")]
    pub top_n: usize,

    #[arg(long, default_value = "1")]
    pub concurrent_requests: usize,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Species name for characters that list none")]
    pub species_fallback: Option<String>,

    #[arg(long, help = "Write the CSV without uploading it")]
    pub skip_publish: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl Default for CliConfig {
    fn default() -> Self {
        Self {
            films_endpoint: DEFAULT_FILMS_ENDPOINT.to_string(),
            upload_endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            upload_field: "file".to_string(),
            output_path: ".".to_string(),
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            snapshot_name: None,
            records_input: None,
            top_n: DEFAULT_TOP_N,
            concurrent_requests: 1,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            species_fallback: None,
            skip_publish: false,
            verbose: false,
            json_logs: false,
            monitor: false,
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn films_endpoint(&self) -> &str {
        &self.films_endpoint
    }

    fn upload_endpoint(&self) -> &str {
        &self.upload_endpoint
    }

    fn upload_field(&self) -> &str {
        &self.upload_field
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn artifact_name(&self) -> &str {
        &self.artifact_name
    }

    fn snapshot_name(&self) -> Option<&str> {
        self.snapshot_name.as_deref()
    }

    fn top_n(&self) -> usize {
        self.top_n
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn species_fallback(&self) -> Option<&str> {
        self.species_fallback.as_deref()
    }

    fn publish_enabled(&self) -> bool {
        !self.skip_publish
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_settings(self)?;
        if let Some(input) = &self.records_input {
            validation::validate_path("records_input", input)?;
        }
        Ok(())
    }
}
