use crate::config::{
    DEFAULT_ARTIFACT_NAME, DEFAULT_FILMS_ENDPOINT, DEFAULT_TIMEOUT_SECONDS, DEFAULT_TOP_N,
    DEFAULT_UPLOAD_ENDPOINT,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub rank: RankConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_films_endpoint")]
    pub films_endpoint: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichConfig {
    pub species_fallback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_artifact_name")]
    pub artifact_name: String,
    pub snapshot_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_upload_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_upload_field")]
    pub field_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

fn default_films_endpoint() -> String {
    DEFAULT_FILMS_ENDPOINT.to_string()
}

fn default_upload_endpoint() -> String {
    DEFAULT_UPLOAD_ENDPOINT.to_string()
}

fn default_upload_field() -> String {
    "file".to_string()
}

fn default_output_path() -> String {
    ".".to_string()
}

fn default_artifact_name() -> String {
    DEFAULT_ARTIFACT_NAME.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_true() -> bool {
    true
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            films_endpoint: default_films_endpoint(),
            timeout_seconds: default_timeout_seconds(),
            concurrent_requests: default_concurrent_requests(),
        }
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            artifact_name: default_artifact_name(),
            snapshot_name: None,
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_upload_endpoint(),
            field_name: default_upload_field(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${UPLOAD_URL})，未設定的變數保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn films_endpoint(&self) -> &str {
        &self.source.films_endpoint
    }

    fn upload_endpoint(&self) -> &str {
        &self.publish.endpoint
    }

    fn upload_field(&self) -> &str {
        &self.publish.field_name
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn artifact_name(&self) -> &str {
        &self.load.artifact_name
    }

    fn snapshot_name(&self) -> Option<&str> {
        self.load.snapshot_name.as_deref()
    }

    fn top_n(&self) -> usize {
        self.rank.top_n
    }

    fn concurrent_requests(&self) -> usize {
        self.source.concurrent_requests
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds
    }

    fn species_fallback(&self) -> Option<&str> {
        self.enrich.species_fallback.as_deref()
    }

    fn publish_enabled(&self) -> bool {
        self.publish.enabled
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_settings(self)?;

        if let Some(level) = self.log_level() {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "monitoring.log_level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }
}
