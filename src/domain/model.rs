use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A character reference (API url) and the number of films it appears in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedReference {
    pub reference: String,
    pub count: u32,
}

impl RankedReference {
    pub fn new(reference: impl Into<String>, count: u32) -> Self {
        Self {
            reference: reference.into(),
            count,
        }
    }
}

/// 富化後的角色資料，對應 CSV 的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub name: String,
    pub species: String,
    pub height: u32,
    pub appearances: u32,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        species: impl Into<String>,
        height: u32,
        appearances: u32,
    ) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            height,
            appearances,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResponse {
    pub status: u16,
    pub body: String,
}

impl PublishResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub artifact_path: String,
    pub records: Vec<Record>,
    pub publish: Option<PublishResponse>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
