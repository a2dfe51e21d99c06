//! Deterministic relevance scoring of a single endpoint.
//!
//! Matching is substring-based rather than token-exact so partial words
//! and compound paths still hit, e.g. `/v3/stats` for the keyword "stat".
//! The HTTP method leads the searchable text, so a query naming a verb
//! earns the hit, method and phrase points together. A bare allow-listed
//! verb such as "post" therefore scores 1 + 3 + 5 = 9 on every POST
//! endpoint, whatever its path or description says.

use super::keywords::ParsedQuery;
use crate::document::Endpoint;

/// Any keyword found anywhere in the endpoint text
const HAYSTACK_HIT: u32 = 1;
/// Keyword found in the path
const PATH_BONUS: u32 = 2;
/// Keyword equal to the HTTP method
const METHOD_BONUS: u32 = 3;
/// Keyword found in the category
const CATEGORY_BONUS: u32 = 1;
/// Whole query found verbatim in the endpoint text
const PHRASE_BONUS: u32 = 5;

/// Score one endpoint against a parsed query. Zero means no match.
pub fn score_endpoint(endpoint: &Endpoint, query: &ParsedQuery) -> u32 {
    if query.is_blank() || !endpoint.is_searchable() {
        return 0;
    }

    let haystack = build_haystack(endpoint);
    let path = endpoint.path.to_lowercase();
    let method = endpoint.method.trim().to_lowercase();
    let category = endpoint.category.as_deref().map(str::to_lowercase);

    let mut score = 0;

    for keyword in &query.keywords {
        let keyword = keyword.as_str();

        if !haystack.contains(keyword) {
            continue;
        }

        score += HAYSTACK_HIT;
        if path.contains(keyword) {
            score += PATH_BONUS;
        }
        if method == keyword {
            score += METHOD_BONUS;
        }
        if category.as_deref().is_some_and(|c| c.contains(keyword)) {
            score += CATEGORY_BONUS;
        }
    }

    if haystack.contains(query.normalized.as_str()) {
        score += PHRASE_BONUS;
    }

    score
}

/// Lower-cased searchable text: method, path, description, category, then
/// each parameter as "name description", joined by spaces.
fn build_haystack(endpoint: &Endpoint) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4 + endpoint.parameters.len());
    parts.push(endpoint.method.trim().to_lowercase());
    parts.push(endpoint.path.to_lowercase());
    parts.push(endpoint.description.to_lowercase());
    parts.push(
        endpoint
            .category
            .as_deref()
            .unwrap_or_default()
            .to_lowercase(),
    );
    parts.extend(endpoint.parameters.iter().map(|p| {
        format!("{} {}", p.name.to_lowercase(), p.description.to_lowercase())
    }));

    parts.join(" ")
}
