use crate::adapters::http::ApiClient;
use crate::domain::model::RankedReference;
use crate::utils::error::Result;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// 電影清單的一頁
#[derive(Debug, Clone, Deserialize)]
pub struct FilmsPage {
    pub results: Vec<Film>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Film {
    #[serde(default)]
    pub title: Option<String>,
    pub characters: Vec<String>,
}

/// Counts character appearances across the films listing and keeps the top N.
pub struct Ranker {
    client: ApiClient,
    films_endpoint: String,
    top_n: usize,
}

impl Ranker {
    pub fn new(client: ApiClient, films_endpoint: impl Into<String>, top_n: usize) -> Self {
        Self {
            client,
            films_endpoint: films_endpoint.into(),
            top_n,
        }
    }

    /// Fetches every page of the films listing, following `next` links.
    pub async fn fetch_films(&self) -> Result<Vec<Film>> {
        let mut films = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(self.films_endpoint.clone());

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                tracing::warn!("Films listing links back to {}, stopping", url);
                break;
            }

            let page: FilmsPage = self.client.get_json(&url).await?;
            tracing::debug!("Fetched {} films from {}", page.results.len(), url);
            films.extend(page.results);
            next = page.next;
        }

        Ok(films)
    }

    pub async fn rank(&self) -> Result<Vec<RankedReference>> {
        let films = self.fetch_films().await?;
        let ranked = tally(&films, self.top_n);

        tracing::info!(
            "🎬 Ranked {} characters across {} films",
            ranked.len(),
            films.len()
        );
        if let Some(first) = ranked.first() {
            tracing::debug!("Most frequent: {} ({} films)", first.reference, first.count);
        }

        Ok(ranked)
    }
}

/// Tallies how many films list each character and returns the `top_n` most frequent.
///
/// A character listed twice in one film counts once. Equal counts keep the order in which
/// the characters were first seen.
pub fn tally(films: &[Film], top_n: usize) -> Vec<RankedReference> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for film in films {
        let mut in_film = HashSet::new();
        for reference in &film.characters {
            if !in_film.insert(reference.as_str()) {
                continue;
            }
            let count = counts.entry(reference.as_str()).or_insert_with(|| {
                first_seen.push(reference.as_str());
                0
            });
            *count += 1;
        }
    }

    let mut ranked: Vec<RankedReference> = first_seen
        .into_iter()
        .map(|reference| RankedReference::new(reference, counts[reference]))
        .collect();

    // sort_by 是穩定排序，同分保留首次出現順序
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked
}
