//! Keyword search and relevance ranking over stored API documentation.
//!
//! A query flows one way: keywords are extracted once, every endpoint of
//! every service is scored, each service keeps its best matches, and the
//! services are ordered by their strongest match.

pub mod aggregator;
pub mod filter;
pub mod keywords;
pub mod matcher;
pub mod scorer;

pub use aggregator::{
    rank_services, search_with, SearchEngine, SearchOptions, ServiceResult, DEFAULT_MAX_MATCHES,
};
pub use filter::{find_endpoint, EndpointFilter};
pub use keywords::{extract_keywords, ParsedQuery};
pub use matcher::{match_service, Match};
pub use scorer::score_endpoint;
