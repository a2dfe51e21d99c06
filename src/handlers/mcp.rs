//! Model Context Protocol query route.
//!
//! Assistants either ask for one endpoint of a named API, describe a task
//! in natural language, or ask what is available. Natural language queries
//! go through the same search engine as `/api/docs`.

use crate::document::Endpoint;
use crate::error::Result;
use crate::search::{find_endpoint, ServiceResult};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub query: Option<String>,
    /// Service id of the API being asked about
    #[serde(default)]
    pub api: Option<String>,
    /// Path or description fragment of the wanted endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum McpResponse {
    Docs {
        docs: EndpointLookup,
    },
    Recommendations {
        recommendations: Vec<Recommendation>,
    },
    Available {
        available_apis: Vec<String>,
        suggestion: &'static str,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EndpointLookup {
    Found(Endpoint),
    Missing {
        error: String,
        available_endpoints: Vec<EndpointSummary>,
    },
}

#[derive(Debug, Serialize)]
pub struct EndpointSummary {
    pub path: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub api: String,
    /// Best match score within the API
    pub relevance: u32,
    pub matched_endpoints: Vec<MatchedEndpoint>,
}

#[derive(Debug, Serialize)]
pub struct MatchedEndpoint {
    pub path: String,
    pub description: String,
    pub relevance: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl From<ServiceResult> for Recommendation {
    fn from(result: ServiceResult) -> Self {
        let relevance = result.best_relevance();
        Self {
            api: result.service_name,
            relevance,
            matched_endpoints: result
                .matches
                .into_iter()
                .map(|m| MatchedEndpoint {
                    path: m.endpoint.path,
                    description: m.endpoint.description,
                    relevance: m.relevance,
                    example: m.endpoint.example,
                })
                .collect(),
        }
    }
}

/// POST /api/mcp - Answer an assistant's documentation query.
pub async fn mcp_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<McpRequest>,
) -> Result<Json<McpResponse>> {
    metrics::counter!("mcp_requests_total").increment(1);

    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    let api = present(request.api);
    let endpoint = present(request.endpoint);
    let query = present(request.query);

    if let (Some(api), Some(endpoint)) = (api, endpoint) {
        tracing::info!(api = %api, endpoint = %endpoint, "Looking up specific endpoint");
        let docs = lookup_endpoint(&state, &api, &endpoint).await?;
        return Ok(Json(McpResponse::Docs { docs }));
    }

    if let Some(query) = query {
        tracing::info!(query = %query, "Processing natural language query");
        let recommendations = state
            .engine
            .search(&query)
            .await?
            .into_iter()
            .map(Recommendation::from)
            .collect();
        return Ok(Json(McpResponse::Recommendations { recommendations }));
    }

    let available_apis = state.store.list_service_ids().await?;
    tracing::debug!(count = available_apis.len(), "Listing available APIs");

    Ok(Json(McpResponse::Available {
        available_apis,
        suggestion: "Try asking about a specific API or task",
    }))
}

async fn lookup_endpoint(state: &AppState, api: &str, needle: &str) -> Result<EndpointLookup> {
    let service_id = api.to_lowercase();
    let document = state.store.fetch_document(&service_id).await?;

    let lookup = match find_endpoint(&document, needle) {
        Some(endpoint) => EndpointLookup::Found(endpoint.clone()),
        None => EndpointLookup::Missing {
            error: format!("Endpoint {} not found in {} documentation", needle, api),
            available_endpoints: document
                .endpoints
                .iter()
                .map(|e| EndpointSummary {
                    path: e.path.clone(),
                    description: e.description.clone(),
                })
                .collect(),
        },
    };

    Ok(lookup)
}
