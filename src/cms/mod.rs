//! Content API
//!
//! All content lives behind an external REST API (`/api/{collection}`).
//! This module talks to it.
//!
//! ## Architecture
//!
//! - **CmsBackend**: raw JSON operations per collection
//! - **HttpBackend**: the real API over HTTP
//! - **MemoryBackend**: in-process stand-in with the same semantics, used by
//!   tests and demo mode
//! - **Cms**: typed facade handed to the rest of the application
//!
//! There are no retries: a failed call is reported to the caller once.

mod demo;
mod error;
mod http;
mod memory;

pub use demo::seed_demo_content;
pub use error::{CmsError, CmsResult};
pub use http::HttpBackend;
pub use memory::MemoryBackend;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::CmsConfig;
use crate::content::{CatalogFile, Id, Resource};

/// Equality filters sent as query parameters (`?brand_id=3`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pairs: Vec<(String, String)>,
}

impl Filter {
    /// An empty filter matching every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: require `field == value`
    pub fn eq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((field.into(), value.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Check a JSON record against every condition
    pub fn matches(&self, record: &Value) -> bool {
        self.pairs.iter().all(|(field, expected)| {
            record
                .get(field)
                .map(|v| scalar_to_string(v) == *expected)
                .unwrap_or(false)
        })
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A file sent to `/api/upload` or `/api/catalog`
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Response body of `/api/upload`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UploadReceipt {
    #[serde(alias = "path", alias = "location")]
    pub url: String,
}

/// Raw operations against the content API
#[async_trait]
pub trait CmsBackend: Send + Sync {
    /// List records of a collection matching `filter`
    async fn list(&self, collection: &str, filter: &Filter) -> CmsResult<Vec<Value>>;

    /// Fetch a single record; `CmsError::NotFound` if it does not exist
    async fn fetch(&self, collection: &str, id: Id) -> CmsResult<Value>;

    /// Create a record and return it as stored
    async fn create(&self, collection: &str, body: Value) -> CmsResult<Value>;

    /// Replace a record and return it as stored
    async fn update(&self, collection: &str, id: Id, body: Value) -> CmsResult<Value>;

    async fn delete(&self, collection: &str, id: Id) -> CmsResult<()>;

    /// Store a media file and return where it can be fetched from
    async fn upload(&self, file: UploadedFile) -> CmsResult<UploadReceipt>;

    /// The current catalog PDF, if one has been uploaded
    async fn catalog(&self) -> CmsResult<Option<CatalogFile>>;

    async fn store_catalog(&self, file: UploadedFile) -> CmsResult<()>;

    /// Check if the content API is reachable
    async fn health_check(&self) -> CmsResult<()>;
}

/// Typed access to the content API
#[derive(Clone)]
pub struct Cms {
    backend: Arc<dyn CmsBackend>,
}

impl Cms {
    pub fn new(backend: Arc<dyn CmsBackend>) -> Self {
        Self { backend }
    }

    /// Facade over the HTTP content API
    pub fn http(config: &CmsConfig) -> CmsResult<Self> {
        Ok(Self::new(Arc::new(HttpBackend::new(config.clone())?)))
    }

    /// List records of `T` matching `filter`
    pub async fn list<T: Resource>(&self, filter: &Filter) -> CmsResult<Vec<T>> {
        let values = self.backend.list(T::COLLECTION, filter).await?;
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(CmsError::from))
            .collect()
    }

    /// List every record of `T`
    pub async fn all<T: Resource>(&self) -> CmsResult<Vec<T>> {
        self.list(&Filter::new()).await
    }

    pub async fn get<T: Resource>(&self, id: Id) -> CmsResult<T> {
        let value = self.backend.fetch(T::COLLECTION, id).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Send a write-only submission (contact message, application, ...)
    pub async fn submit<T: Resource>(&self, record: &T) -> CmsResult<()> {
        let body = serde_json::to_value(record)?;
        self.backend.create(T::COLLECTION, body).await?;
        tracing::info!(collection = T::COLLECTION, "Submission stored");
        Ok(())
    }

    pub async fn fetch_raw(&self, collection: &str, id: Id) -> CmsResult<Value> {
        self.backend.fetch(collection, id).await
    }

    pub async fn list_raw(&self, collection: &str, filter: &Filter) -> CmsResult<Vec<Value>> {
        self.backend.list(collection, filter).await
    }

    pub async fn create_raw(&self, collection: &str, body: Value) -> CmsResult<Value> {
        self.backend.create(collection, body).await
    }

    pub async fn update_raw(&self, collection: &str, id: Id, body: Value) -> CmsResult<Value> {
        self.backend.update(collection, id, body).await
    }

    pub async fn delete(&self, collection: &str, id: Id) -> CmsResult<()> {
        self.backend.delete(collection, id).await
    }

    /// Upload a file and return its URL
    pub async fn upload(&self, file: UploadedFile) -> CmsResult<String> {
        let name = file.file_name.clone();
        let receipt = self.backend.upload(file).await?;
        tracing::debug!(file = %name, url = %receipt.url, "File uploaded");
        Ok(receipt.url)
    }

    pub async fn catalog(&self) -> CmsResult<Option<CatalogFile>> {
        self.backend.catalog().await
    }

    pub async fn store_catalog(&self, file: UploadedFile) -> CmsResult<()> {
        self.backend.store_catalog(file).await
    }

    pub async fn health_check(&self) -> CmsResult<()> {
        self.backend.health_check().await
    }
}
