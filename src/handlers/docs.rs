//! Documentation lookup for AI assistants.
//!
//! One route serves three lookups, chosen by which parameters are present:
//! a single service (optionally filtered), a ranked search across every
//! service, or the list of stored services.

use crate::document::Document;
use crate::error::Result;
use crate::persistence::{collect_metadata, validate_service_id, ServiceMetadata};
use crate::search::{EndpointFilter, ServiceResult};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct DocsParams {
    /// Natural language query
    #[serde(default)]
    pub query: Option<String>,
    /// Service id for exact retrieval
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DocsResponse {
    Service {
        success: bool,
        data: Document,
    },
    Search {
        success: bool,
        query: String,
        results: Vec<ServiceResult>,
    },
    Services {
        success: bool,
        services: Vec<ServiceMetadata>,
    },
}

/// GET /api/docs - Retrieve one service's documentation, search all of them,
/// or list what is stored.
pub async fn docs_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DocsParams>,
) -> Result<Json<DocsResponse>> {
    metrics::counter!("docs_requests_total").increment(1);

    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if let Some(service) = non_empty(&params.service) {
        let service_id = service.to_lowercase();
        let document = state.store.fetch_document(&service_id).await?;

        let filter = EndpointFilter::new(
            params.method.as_deref(),
            params.path.as_deref(),
            params.query.as_deref(),
        );
        let data = filter.apply(&document);

        tracing::debug!(
            service = %service_id,
            total = document.endpoints.len(),
            kept = data.endpoints.len(),
            "Service documentation retrieved"
        );

        return Ok(Json(DocsResponse::Service {
            success: true,
            data,
        }));
    }

    if let Some(query) = non_empty(&params.query) {
        let start_time = std::time::Instant::now();
        let results = state.engine.search(&query).await?;
        let elapsed = start_time.elapsed();

        tracing::info!(
            query = %query,
            services = results.len(),
            total_ms = elapsed.as_millis() as u64,
            "Search completed"
        );

        metrics::counter!("search_requests_total").increment(1);
        metrics::histogram!("search_latency_ms").record(elapsed.as_millis() as f64);

        return Ok(Json(DocsResponse::Search {
            success: true,
            query,
            results,
        }));
    }

    let services = collect_metadata(state.store.as_ref()).await?;
    Ok(Json(DocsResponse::Services {
        success: true,
        services,
    }))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub service: String,
    pub endpoints: usize,
}

/// PUT /api/docs/:service - Store or replace a service's documentation.
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    Path(service): Path<String>,
    Json(document): Json<Document>,
) -> Result<Json<UploadResponse>> {
    let service_id = service.to_lowercase();
    validate_service_id(&service_id)?;

    state.store.save_document(&service_id, &document).await?;

    Ok(Json(UploadResponse {
        success: true,
        service: service_id,
        endpoints: document.endpoints.len(),
    }))
}
