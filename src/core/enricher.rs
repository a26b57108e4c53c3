use crate::adapters::http::ApiClient;
use crate::domain::model::{RankedReference, Record};
use crate::utils::error::{EtlError, Result};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterResponse {
    pub name: String,
    pub height: HeightField,
    pub species: Vec<String>,
}

/// The API reports height as a string ("172", "unknown"); some mirrors send a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HeightField {
    Number(u32),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesResponse {
    pub name: String,
}

impl CharacterResponse {
    pub fn height_cm(&self) -> Result<u32> {
        match &self.height {
            HeightField::Number(value) => Ok(*value),
            HeightField::Text(text) => {
                text.trim()
                    .parse()
                    .map_err(|_| EtlError::InvalidValueError {
                        entity: self.name.clone(),
                        field: "height".to_string(),
                        value: text.clone(),
                    })
            }
        }
    }
}

/// Resolves ranked character references into height-sorted records.
pub struct Enricher {
    client: ApiClient,
    concurrent_requests: usize,
    species_fallback: Option<String>,
}

impl Enricher {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            concurrent_requests: 1,
            species_fallback: None,
        }
    }

    pub fn with_concurrency(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    pub fn with_species_fallback(mut self, species: Option<String>) -> Self {
        self.species_fallback = species;
        self
    }

    /// Looks up every ranked reference, then sorts by height descending.
    ///
    /// Results are placed by input position before sorting, so the outcome does not depend
    /// on the order lookups finish in. Equal heights keep the ranking order.
    ///
    /// The first failed lookup stops the batch: no further lookups are started and the
    /// ones still in flight are cancelled.
    pub async fn enrich(&self, ranked: Vec<RankedReference>) -> Result<Vec<Record>> {
        let total = ranked.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrent_requests));
        let failed = Arc::new(AtomicBool::new(false));
        let mut tasks = JoinSet::new();

        tracing::debug!(
            "Enriching {} characters with up to {} concurrent lookups",
            total,
            self.concurrent_requests
        );

        for (index, reference) in ranked.into_iter().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| EtlError::ProcessingError {
                    message: format!("Lookup pool closed: {}", e),
                })?;
            if failed.load(Ordering::Acquire) {
                tracing::debug!(
                    "Lookup failed, skipping the remaining {} characters",
                    total - index
                );
                break;
            }

            let client = self.client.clone();
            let fallback = self.species_fallback.clone();
            let failed = failed.clone();

            tasks.spawn(async move {
                let record = lookup(&client, &reference, fallback.as_deref()).await;
                // 先標記失敗再釋放 permit，等待中的迴圈才看得到
                if record.is_err() {
                    failed.store(true, Ordering::Release);
                }
                drop(permit);
                (index, record)
            });
        }

        let mut slots: Vec<Option<Record>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            let (index, record) = joined.map_err(|e| EtlError::ProcessingError {
                message: format!("Lookup task failed: {}", e),
            })?;
            // 任一查詢失敗即中止，JoinSet 被丟棄時會取消其餘任務
            slots[index] = Some(record?);
        }

        let mut records: Vec<Record> = slots.into_iter().flatten().collect();
        sort_by_height(&mut records);

        tracing::info!("🧬 Enriched {} characters", records.len());
        Ok(records)
    }
}

/// Stable sort, tallest first.
pub fn sort_by_height(records: &mut [Record]) {
    records.sort_by(|a, b| b.height.cmp(&a.height));
}

async fn lookup(
    client: &ApiClient,
    reference: &RankedReference,
    species_fallback: Option<&str>,
) -> Result<Record> {
    let character: CharacterResponse = client.get_json(&reference.reference).await?;
    let height = character.height_cm()?;

    let species = match character.species.first() {
        Some(species_url) => {
            let species: SpeciesResponse = client.get_json(species_url).await?;
            species.name
        }
        None => match species_fallback {
            Some(fallback) => {
                tracing::warn!(
                    "⚠️ {} lists no species, using '{}'",
                    character.name,
                    fallback
                );
                fallback.to_string()
            }
            None => {
                return Err(EtlError::EmptyReferenceError {
                    entity: character.name,
                    field: "species".to_string(),
                })
            }
        },
    };

    tracing::debug!(
        "{} -> {} ({}, {}cm)",
        reference.reference,
        character.name,
        species,
        height
    );

    Ok(Record {
        name: character.name,
        species,
        height,
        appearances: reference.count,
    })
}
