//! Exact retrieval filters for a single service's document.

use crate::document::{Document, Endpoint};

/// Optional constraints on the endpoints returned for one service.
///
/// Every constraint that is set must hold; an unset filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointFilter {
    /// HTTP verb, compared case-insensitively
    pub method: Option<String>,
    /// Case-insensitive substring of the path
    pub path: Option<String>,
    /// Case-insensitive substring of path, description or category
    pub query: Option<String>,
}

impl EndpointFilter {
    /// Build a filter, treating empty strings as unset.
    pub fn new(method: Option<&str>, path: Option<&str>, query: Option<&str>) -> Self {
        let present = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_lowercase);
        Self {
            method: present(method),
            path: present(path),
            query: present(query),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.method.is_none() && self.path.is_none() && self.query.is_none()
    }

    pub fn matches(&self, endpoint: &Endpoint) -> bool {
        if let Some(method) = &self.method {
            if !endpoint.method.trim().eq_ignore_ascii_case(method) {
                return false;
            }
        }

        if let Some(path) = &self.path {
            if !endpoint.path.to_lowercase().contains(path.as_str()) {
                return false;
            }
        }

        if let Some(query) = &self.query {
            let query = query.as_str();
            let in_category = endpoint
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(query));
            if !endpoint.path.to_lowercase().contains(query)
                && !endpoint.description.to_lowercase().contains(query)
                && !in_category
            {
                return false;
            }
        }

        true
    }

    /// Copy of `document` holding only the endpoints this filter keeps.
    pub fn apply(&self, document: &Document) -> Document {
        let mut filtered = document.clone();
        if !self.is_empty() {
            filtered.endpoints.retain(|endpoint| self.matches(endpoint));
        }
        filtered
    }
}

/// First endpoint whose path or description mentions `needle`, ignoring case.
pub fn find_endpoint<'a>(document: &'a Document, needle: &str) -> Option<&'a Endpoint> {
    let needle = needle.to_lowercase();
    document.endpoints.iter().find(|endpoint| {
        endpoint.path.to_lowercase().contains(&needle)
            || endpoint.description.to_lowercase().contains(&needle)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sendgrid() -> Document {
        let endpoint = |method: &str, path: &str, description: &str, category: Option<&str>| Endpoint {
            method: method.to_string(),
            path: path.to_string(),
            description: description.to_string(),
            category: category.map(str::to_string),
            ..Default::default()
        };

        Document {
            name: "SendGrid".to_string(),
            endpoints: vec![
                endpoint("POST", "/v3/mail/send", "Send an email", Some("Mail Send")),
                endpoint("GET", "/v3/stats", "Retrieve global email statistics", Some("Stats")),
                endpoint("GET", "/v3/templates", "Retrieve paged transactional templates", None),
                endpoint("DELETE", "/v3/templates/{id}", "Delete a template", None),
            ],
            ..Default::default()
        }
    }

    fn paths(doc: &Document) -> Vec<&str> {
        doc.endpoints.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let doc = sendgrid();
        let filter = EndpointFilter::new(Some(""), None, Some(""));

        assert!(filter.is_empty());
        assert_eq!(filter.apply(&doc), doc);
    }

    #[test]
    fn test_method_filter_ignores_case() {
        let filtered = EndpointFilter::new(Some("get"), None, None).apply(&sendgrid());
        assert_eq!(paths(&filtered), vec!["/v3/stats", "/v3/templates"]);
    }

    #[test]
    fn test_path_filter_is_substring() {
        let filtered = EndpointFilter::new(None, Some("TEMPLATES"), None).apply(&sendgrid());
        assert_eq!(paths(&filtered), vec!["/v3/templates", "/v3/templates/{id}"]);
    }

    #[test]
    fn test_query_filter_checks_description_and_category() {
        let by_description = EndpointFilter::new(None, None, Some("Statistics")).apply(&sendgrid());
        assert_eq!(paths(&by_description), vec!["/v3/stats"]);

        let by_category = EndpointFilter::new(None, None, Some("mail send")).apply(&sendgrid());
        assert_eq!(paths(&by_category), vec!["/v3/mail/send"]);
    }

    #[test]
    fn test_filters_combine() {
        let filtered =
            EndpointFilter::new(Some("DELETE"), Some("/v3/templates"), None).apply(&sendgrid());
        assert_eq!(paths(&filtered), vec!["/v3/templates/{id}"]);

        let none = EndpointFilter::new(Some("PUT"), Some("/v3/templates"), None).apply(&sendgrid());
        assert!(none.endpoints.is_empty());
    }

    #[test]
    fn test_find_endpoint_by_path_or_description() {
        let doc = sendgrid();

        assert_eq!(find_endpoint(&doc, "/v3/STATS").map(|e| e.method.as_str()), Some("GET"));
        assert_eq!(
            find_endpoint(&doc, "delete a").map(|e| e.path.as_str()),
            Some("/v3/templates/{id}")
        );
        assert!(find_endpoint(&doc, "webhooks").is_none());
    }
}
