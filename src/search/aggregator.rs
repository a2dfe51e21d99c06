//! Cross-service aggregation of endpoint matches.
//!
//! Documents are fetched from the store concurrently (bounded by a
//! semaphore, each fetch under its own timeout), then ranked in listing
//! order so the output never depends on which fetch finished first.

use super::keywords::ParsedQuery;
use super::matcher::{match_service, Match};
use crate::document::Document;
use crate::error::{AppError, Result};
use crate::persistence::DocumentStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default number of matches reported per service
pub const DEFAULT_MAX_MATCHES: usize = 5;

/// Tuning knobs for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_matches_per_service: usize,
    /// A fetch exceeding this is treated as an unavailable service
    pub fetch_timeout: Duration,
    /// Maximum document fetches in flight at once
    pub fetch_concurrency: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_matches_per_service: DEFAULT_MAX_MATCHES,
            fetch_timeout: Duration::from_millis(2000),
            fetch_concurrency: 8,
        }
    }
}

/// Matches from one service, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResult {
    #[serde(rename = "service")]
    pub service_name: String,
    pub description: String,
    pub base_url: String,
    pub matches: Vec<Match>,
}

impl ServiceResult {
    /// Relevance of the strongest match.
    pub fn best_relevance(&self) -> u32 {
        self.matches.iter().map(|m| m.relevance).max().unwrap_or(0)
    }
}

/// Rank services whose documents are already resolved.
///
/// `documents` is consumed in order. Failed lookups are logged and skipped,
/// services without matches are dropped, and the rest are ordered by their
/// best match (ties keep input order).
pub fn rank_services<I>(query: &ParsedQuery, documents: I, limit: usize) -> Vec<ServiceResult>
where
    I: IntoIterator<Item = (String, Result<Document>)>,
{
    if query.is_blank() {
        return Vec::new();
    }

    let mut results = Vec::new();

    for (service_id, outcome) in documents {
        let document = match outcome {
            Ok(document) => document,
            Err(e) => {
                if e.is_service_local() {
                    tracing::warn!(service = %service_id, error = %e, "Skipping service during search");
                } else {
                    tracing::error!(service = %service_id, error = %e, "Skipping service during search");
                }
                metrics::counter!("search_services_skipped_total").increment(1);
                continue;
            }
        };

        let matches = match_service(&document, query, limit);
        if matches.is_empty() {
            continue;
        }

        results.push(ServiceResult {
            service_name: document.display_name(&service_id),
            description: document.description,
            base_url: document.base_url,
            matches,
        });
    }

    results.sort_by_key(|r| std::cmp::Reverse(r.best_relevance()));
    results
}

/// Search `service_ids` in order, resolving each through `fetch`.
///
/// Synchronous counterpart of [`SearchEngine::search`] for callers that
/// already hold their documents.
pub fn search_with<F>(
    raw_query: &str,
    service_ids: &[String],
    mut fetch: F,
    limit: usize,
) -> Vec<ServiceResult>
where
    F: FnMut(&str) -> Result<Document>,
{
    let query = ParsedQuery::parse(raw_query);
    if query.is_blank() {
        return Vec::new();
    }

    let documents = service_ids.iter().map(|id| (id.clone(), fetch(id.as_str())));
    rank_services(&query, documents, limit)
}

/// The one search engine behind every route that ranks endpoints.
#[derive(Clone)]
pub struct SearchEngine {
    store: Arc<dyn DocumentStore>,
    options: SearchOptions,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn DocumentStore>, options: SearchOptions) -> Self {
        Self { store, options }
    }

    /// Rank endpoints across every stored service.
    ///
    /// Only a failure to enumerate services is returned as an error;
    /// per-service failures drop that service from the results.
    pub async fn search(&self, raw_query: &str) -> Result<Vec<ServiceResult>> {
        let query = ParsedQuery::parse(raw_query);
        if query.is_blank() {
            tracing::debug!("Blank query, returning no results");
            return Ok(Vec::new());
        }

        let service_ids = self.store.list_service_ids().await?;
        Ok(self.search_services(&query, service_ids).await)
    }

    /// Rank endpoints across the given services only.
    pub async fn search_services(
        &self,
        query: &ParsedQuery,
        service_ids: Vec<String>,
    ) -> Vec<ServiceResult> {
        if query.is_blank() {
            return Vec::new();
        }

        let documents = self.fetch_all(service_ids).await;
        let results = rank_services(query, documents, self.options.max_matches_per_service);

        tracing::debug!(
            keywords = query.keywords.len(),
            services = results.len(),
            "Services ranked"
        );

        results
    }

    /// Fetch every document, returning outcomes in the order of `service_ids`.
    async fn fetch_all(&self, service_ids: Vec<String>) -> Vec<(String, Result<Document>)> {
        let semaphore = Arc::new(Semaphore::new(self.options.fetch_concurrency.max(1)));
        let fetch_timeout = self.options.fetch_timeout;
        let mut tasks = JoinSet::new();

        for (index, service_id) in service_ids.iter().cloned().enumerate() {
            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();

                let fetched =
                    tokio::time::timeout(fetch_timeout, store.fetch_document(&service_id)).await;
                let outcome = match fetched {
                    Ok(result) => result,
                    Err(_) => Err(AppError::FetchTimeout(service_id)),
                };

                (index, outcome)
            });
        }

        let mut outcomes: Vec<Option<Result<Document>>> =
            service_ids.iter().map(|_| None).collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => tracing::error!(error = %e, "Document fetch task failed"),
            }
        }

        service_ids
            .into_iter()
            .zip(outcomes)
            .map(|(service_id, outcome)| {
                let outcome = outcome.unwrap_or_else(|| {
                    Err(AppError::StorageError(format!(
                        "fetch task for {} did not complete",
                        service_id
                    )))
                });
                (service_id, outcome)
            })
            .collect()
    }
}
