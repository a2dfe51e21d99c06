//! Persistence layer for stored service documentation.
//!
//! The search core only needs to enumerate service ids and fetch one
//! document per id. `FileStore` keeps one pretty-printed JSON file per
//! service under a data directory.

use crate::document::Document;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extension of stored documentation files.
const DOC_EXTENSION: &str = "json";

/// Source of service documentation for the search engine.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Identifiers of every service with stored documentation.
    async fn list_service_ids(&self) -> Result<Vec<String>>;

    /// Fetch one service's document.
    ///
    /// Fails with `DocumentNotFound` for unknown ids and `MalformedDocument`
    /// when the stored data has the wrong shape.
    async fn fetch_document(&self, service_id: &str) -> Result<Document>;

    /// Store or replace one service's document.
    async fn save_document(&self, service_id: &str, document: &Document) -> Result<()>;

    /// When the stored document last changed, if the store tracks it.
    async fn last_modified(&self, _service_id: &str) -> Option<DateTime<Utc>> {
        None
    }
}

/// Documentation stored as `<data_dir>/<service_id>.json`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            AppError::StorageError(format!(
                "Failed to create data directory {}: {}",
                root.display(),
                e
            ))
        })?;

        tracing::info!(path = %root.display(), "Document store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, service_id: &str) -> Result<PathBuf> {
        validate_service_id(service_id)?;
        Ok(self.root.join(format!("{}.{}", service_id, DOC_EXTENSION)))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn list_service_ids(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(|e| {
            AppError::StorageError(format!(
                "Failed to read data directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOC_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }

        // read_dir order is platform dependent
        ids.sort();
        Ok(ids)
    }

    async fn fetch_document(&self, service_id: &str) -> Result<Document> {
        let path = self.document_path(service_id)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::DocumentNotFound(service_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|e| AppError::MalformedDocument {
            service: service_id.to_string(),
            reason: e.to_string(),
        })
    }

    async fn save_document(&self, service_id: &str, document: &Document) -> Result<()> {
        let path = self.document_path(service_id)?;

        let json = serde_json::to_vec_pretty(document).map_err(|e| {
            AppError::StorageError(format!("Failed to serialize {}: {}", service_id, e))
        })?;
        tokio::fs::write(&path, json).await?;

        tracing::info!(
            service = service_id,
            path = %path.display(),
            endpoints = document.endpoints.len(),
            "Documentation saved"
        );
        Ok(())
    }

    async fn last_modified(&self, service_id: &str) -> Option<DateTime<Utc>> {
        let path = self.document_path(service_id).ok()?;

        match tokio::fs::metadata(&path).await.and_then(|m| m.modified()) {
            Ok(modified) => Some(DateTime::<Utc>::from(modified)),
            Err(e) => {
                tracing::debug!(service = service_id, error = %e, "No modification time");
                None
            }
        }
    }
}

/// Service ids double as file names, so only a conservative alphabet is allowed.
pub fn validate_service_id(service_id: &str) -> Result<()> {
    let valid = !service_id.is_empty()
        && !service_id.starts_with('.')
        && service_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Invalid service id: {:?}",
            service_id
        )))
    }
}

/// Summary of one stored service, without its endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    pub service: String,
    pub name: String,
    pub title: String,
    pub description: String,
    pub version: String,
    pub endpoint_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ServiceMetadata {
    pub fn from_document(service_id: &str, document: &Document) -> Self {
        Self {
            service: service_id.to_string(),
            name: document.display_name(service_id),
            title: document
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| service_id.to_string()),
            description: document.description.clone(),
            version: document.version.clone().unwrap_or_default(),
            endpoint_count: document.endpoints.len(),
            last_updated: document.last_updated,
        }
    }
}

/// Metadata for every readable service. Unreadable services are logged and skipped.
///
/// `lastUpdated` comes from the document, or from the store's modification
/// time when the document does not carry one.
pub async fn collect_metadata(store: &dyn DocumentStore) -> Result<Vec<ServiceMetadata>> {
    let mut metadata = Vec::new();

    for service_id in store.list_service_ids().await? {
        match store.fetch_document(&service_id).await {
            Ok(document) => {
                let mut entry = ServiceMetadata::from_document(&service_id, &document);
                if entry.last_updated.is_none() {
                    entry.last_updated = store.last_modified(&service_id).await;
                }
                metadata.push(entry);
            }
            Err(e) => {
                tracing::warn!(service = %service_id, error = %e, "Skipping unreadable service");
            }
        }
    }

    Ok(metadata)
}
