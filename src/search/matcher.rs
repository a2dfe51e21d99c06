//! Per-service matching: score every endpoint of one document and keep the best.

use super::keywords::ParsedQuery;
use super::scorer::score_endpoint;
use crate::document::{Document, Endpoint};
use serde::Serialize;

/// An endpoint that matched a query, with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    #[serde(flatten)]
    pub endpoint: Endpoint,
    pub relevance: u32,
}

/// Rank the endpoints of `document` against `query`.
///
/// Only endpoints scoring above zero are kept. They are ordered by score,
/// highest first, with ties left in document order, and cut to `limit`.
pub fn match_service(document: &Document, query: &ParsedQuery, limit: usize) -> Vec<Match> {
    let mut matches: Vec<Match> = document
        .endpoints
        .iter()
        .filter_map(|endpoint| {
            let relevance = score_endpoint(endpoint, query);
            (relevance > 0).then(|| Match {
                endpoint: endpoint.clone(),
                relevance,
            })
        })
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    matches.truncate(limit);
    matches
}
