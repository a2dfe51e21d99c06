//! Ranking and isolation tests for the search engine.
//!
//! Uses an in-memory store that can be told to fail, stall, or refuse
//! to list, so per-service failure handling can be checked end to end.

use async_trait::async_trait;
use docsearch::search::{extract_keywords, match_service, score_endpoint, ParsedQuery};
use docsearch::{AppError, Document, DocumentStore, Endpoint, Result, SearchEngine, SearchOptions};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct MemoryStore {
    order: Vec<String>,
    documents: Mutex<HashMap<String, Document>>,
    broken: HashSet<String>,
    stalled: HashSet<String>,
    panicking: HashSet<String>,
    listing_fails: bool,
}

impl MemoryStore {
    fn with(mut self, id: &str, document: Document) -> Self {
        self.order.push(id.to_string());
        self.documents
            .lock()
            .unwrap()
            .insert(id.to_string(), document);
        self
    }

    fn broken(mut self, id: &str) -> Self {
        self.order.push(id.to_string());
        self.broken.insert(id.to_string());
        self
    }

    fn stalled(mut self, id: &str, document: Document) -> Self {
        self.stalled.insert(id.to_string());
        self.with(id, document)
    }

    fn panicking(mut self, id: &str) -> Self {
        self.order.push(id.to_string());
        self.panicking.insert(id.to_string());
        self
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_service_ids(&self) -> Result<Vec<String>> {
        if self.listing_fails {
            return Err(AppError::StorageError("listing unavailable".to_string()));
        }
        Ok(self.order.clone())
    }

    async fn fetch_document(&self, service_id: &str) -> Result<Document> {
        if self.broken.contains(service_id) {
            return Err(AppError::MalformedDocument {
                service: service_id.to_string(),
                reason: "missing endpoints".to_string(),
            });
        }
        if self.panicking.contains(service_id) {
            panic!("fetch for {} blew up", service_id);
        }
        if self.stalled.contains(service_id) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        self.documents
            .lock()
            .unwrap()
            .get(service_id)
            .cloned()
            .ok_or_else(|| AppError::DocumentNotFound(service_id.to_string()))
    }

    async fn save_document(&self, service_id: &str, document: &Document) -> Result<()> {
        self.documents
            .lock()
            .unwrap()
            .insert(service_id.to_string(), document.clone());
        Ok(())
    }
}

fn endpoint(method: &str, path: &str, description: &str, category: Option<&str>) -> Endpoint {
    Endpoint {
        method: method.to_string(),
        path: path.to_string(),
        description: description.to_string(),
        category: category.map(str::to_string),
        ..Default::default()
    }
}

fn document(name: &str, endpoints: Vec<Endpoint>) -> Document {
    Document {
        name: name.to_string(),
        description: format!("{} API", name),
        base_url: format!("https://api.{}.com", name.to_lowercase()),
        endpoints,
        ..Default::default()
    }
}

fn twilio() -> Document {
    document(
        "Twilio",
        vec![
            endpoint("GET", "/v3/accounts", "List accounts", None),
            endpoint("POST", "/v3/messages", "Send an SMS text message", Some("Messaging")),
        ],
    )
}

fn sendgrid() -> Document {
    document(
        "SendGrid",
        vec![
            endpoint("POST", "/v3/mail/send", "Send an email", Some("Mail Send")),
            endpoint("GET", "/v3/stats", "Retrieve global email statistics", None),
        ],
    )
}

fn engine(store: MemoryStore) -> SearchEngine {
    let options = SearchOptions {
        fetch_timeout: Duration::from_millis(100),
        ..SearchOptions::default()
    };
    SearchEngine::new(Arc::new(store), options)
}

fn service_names(results: &[docsearch::ServiceResult]) -> Vec<&str> {
    results.iter().map(|r| r.service_name.as_str()).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_text_message_ranks_messaging_endpoint_first() {
    let doc = twilio();
    let query = ParsedQuery::parse("send a text message");

    let messages = score_endpoint(&doc.endpoints[1], &query);
    let accounts = score_endpoint(&doc.endpoints[0], &query);
    assert!(messages > 0);
    assert!(messages > accounts);

    let matches = match_service(&doc, &query, 5);
    assert_eq!(matches[0].endpoint.path, "/v3/messages");
}

#[test]
fn test_stats_scores_at_least_three() {
    let doc = sendgrid();
    let query = ParsedQuery::parse("stats");

    let matches = match_service(&doc, &query, 5);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].endpoint.path, "/v3/stats");
    assert!(matches[0].relevance >= 3);
}

#[test]
fn test_get_query_favors_get_endpoints() {
    let doc = document(
        "Mixed",
        vec![
            endpoint("POST", "/v1/notes", "Create a note you can get later", None),
            endpoint("GET", "/v1/notes", "List notes", None),
            endpoint("GET", "/v1/users", "List users", None),
            endpoint("POST", "/v1/users", "Create a user", None),
        ],
    );
    let query = ParsedQuery::parse("GET");

    let matches = match_service(&doc, &query, 5);
    let methods: Vec<&str> = matches.iter().map(|m| m.endpoint.method.as_str()).collect();

    assert_eq!(methods, vec!["GET", "GET", "POST"]);
    assert_eq!(matches[0].relevance, matches[1].relevance);
    assert_eq!(matches[0].endpoint.path, "/v1/notes");
    assert!(matches[1].relevance > matches[2].relevance);
}

#[tokio::test]
async fn test_higher_best_match_service_comes_first() {
    // "email stats": first scores 4, second scores 9
    let first = document(
        "First",
        vec![endpoint("POST", "/v1/email", "Delivery stats", None)],
    );
    let second = document(
        "Second",
        vec![endpoint("GET", "/v3/stats", "Email stats overview", None)],
    );
    let engine = engine(
        MemoryStore::default()
            .with("first", first)
            .with("second", second),
    );

    let results = engine.search("email stats").await.unwrap();

    assert_eq!(service_names(&results), vec!["Second", "First"]);
    assert_eq!(results[0].best_relevance(), 9);
    assert_eq!(results[1].best_relevance(), 4);
}

// ============================================================================
// Failure isolation
// ============================================================================

#[tokio::test]
async fn test_one_unreachable_service_does_not_abort_search() {
    let engine = engine(
        MemoryStore::default()
            .with("twilio", twilio())
            .broken("mailchimp")
            .with("sendgrid", sendgrid())
            .with("plivo", document("Plivo", vec![endpoint("POST", "/Message", "Send SMS", None)])),
    );

    let results = engine.search("send sms").await.unwrap();

    let names = service_names(&results);
    assert!(names.contains(&"Twilio"));
    assert!(names.contains(&"Plivo"));
    assert!(!names.iter().any(|n| n.eq_ignore_ascii_case("mailchimp")));
}

#[tokio::test]
async fn test_listed_but_missing_service_is_skipped() {
    let mut store = MemoryStore::default().with("sendgrid", sendgrid());
    store.order.insert(0, "ghost".to_string());

    let results = engine(store).search("stats").await.unwrap();

    assert_eq!(service_names(&results), vec!["SendGrid"]);
}

#[tokio::test]
async fn test_stalled_fetch_times_out_and_is_skipped() {
    let engine = engine(
        MemoryStore::default()
            .stalled("slow", document("Slow", vec![endpoint("GET", "/stats", "Stats", None)]))
            .with("sendgrid", sendgrid()),
    );

    let results = engine.search("stats").await.unwrap();

    assert_eq!(service_names(&results), vec!["SendGrid"]);
}

#[tokio::test]
async fn test_panicked_fetch_task_is_skipped() {
    let engine = engine(
        MemoryStore::default()
            .with("twilio", twilio())
            .panicking("crashy")
            .with("sendgrid", sendgrid()),
    );

    let results = engine.search("send message").await.unwrap();

    // Twilio's best match scores 5, SendGrid's 4
    assert_eq!(service_names(&results), vec!["Twilio", "SendGrid"]);
}

#[tokio::test]
async fn test_listing_failure_is_returned() {
    let store = MemoryStore {
        listing_fails: true,
        ..MemoryStore::default()
    };

    let err = engine(store).search("stats").await.unwrap_err();
    assert!(matches!(err, AppError::StorageError(_)));
}

// ============================================================================
// Query edge cases and invariants
// ============================================================================

#[tokio::test]
async fn test_empty_query_returns_nothing() {
    let engine = engine(
        MemoryStore::default()
            .with("twilio", twilio())
            .with("sendgrid", sendgrid()),
    );

    assert!(engine.search("").await.unwrap().is_empty());
    assert!(engine.search(" \n\t ").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sequential_and_concurrent_fetch_agree() {
    let build = |concurrency: usize| {
        let store = MemoryStore::default()
            .with("twilio", twilio())
            .with("sendgrid", sendgrid())
            .with("mailgun", document("Mailgun", vec![endpoint("POST", "/v3/messages", "Send email message", None)]));
        let options = SearchOptions {
            fetch_concurrency: concurrency,
            ..SearchOptions::default()
        };
        SearchEngine::new(Arc::new(store), options)
    };

    let sequential = build(1).search("send message").await.unwrap();
    let concurrent = build(16).search("send message").await.unwrap();

    assert_eq!(sequential, concurrent);
    assert!(!sequential.is_empty());
}

#[tokio::test]
async fn test_match_cap_is_respected() {
    let endpoints = (0..20)
        .map(|i| endpoint("GET", &format!("/v1/email/{}", i), "Email lookup", None))
        .collect();
    let store = MemoryStore::default().with("bulk", document("Bulk", endpoints));
    let options = SearchOptions {
        max_matches_per_service: 3,
        ..SearchOptions::default()
    };

    let results = SearchEngine::new(Arc::new(store), options)
        .search("email")
        .await
        .unwrap();

    assert_eq!(results[0].matches.len(), 3);
}

#[test]
fn test_scores_are_never_negative_and_keyword_hits_match() {
    let queries = [
        "send a text message",
        "stats",
        "GET",
        "how do I delete a template?",
        "!!!",
        "upload image",
    ];
    let docs = [twilio(), sendgrid()];

    for raw in queries {
        let query = ParsedQuery::parse(raw);
        let keywords = extract_keywords(raw);

        for doc in &docs {
            for endpoint in &doc.endpoints {
                let score = score_endpoint(endpoint, &query);

                let text = format!(
                    "{} {} {}",
                    endpoint.path,
                    endpoint.description,
                    endpoint.category.as_deref().unwrap_or_default()
                )
                .to_lowercase();
                if !keywords.is_empty() && keywords.iter().all(|k| text.contains(k.as_str())) {
                    assert!(score > 0, "{:?} should match {}", raw, endpoint.path);
                }
            }

            assert!(match_service(doc, &query, 5).len() <= 5);
        }
    }
}
