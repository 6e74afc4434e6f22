//! In-memory content API
//!
//! Keeps every collection as a list of JSON records behind a `RwLock`.
//! Ids are assigned from a single counter shared by all collections.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::RwLock;

use super::error::{CmsError, CmsResult};
use super::{CmsBackend, Filter, UploadReceipt, UploadedFile};
use crate::content::{CatalogFile, Id};

/// Content API held in process memory
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    uploads: RwLock<Vec<UploadedFile>>,
    catalog: RwLock<Option<CatalogFile>>,
    next_id: AtomicI64,
    offline: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            uploads: RwLock::new(Vec::new()),
            catalog: RwLock::new(None),
            next_id: AtomicI64::new(1),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate an outage: every call fails with `CmsError::Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Files received through `upload`, oldest first
    pub async fn uploads(&self) -> Vec<UploadedFile> {
        self.uploads.read().await.clone()
    }

    fn ensure_online(&self) -> CmsResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(CmsError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn with_id(&self, body: Value, id: Id) -> CmsResult<Value> {
        match body {
            Value::Object(mut map) => {
                map.insert("id".to_string(), Value::from(id));
                Ok(Value::Object(map))
            }
            _ => Err(CmsError::Api {
                status: 422,
                message: "record body must be a JSON object".to_string(),
            }),
        }
    }
}

fn record_id(record: &Value) -> Option<Id> {
    record.get("id").and_then(Value::as_i64)
}

#[async_trait]
impl CmsBackend for MemoryBackend {
    async fn list(&self, collection: &str, filter: &Filter) -> CmsResult<Vec<Value>> {
        self.ensure_online()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filter.matches(r))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch(&self, collection: &str, id: Id) -> CmsResult<Value> {
        self.ensure_online()?;
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)))
            .cloned()
            .ok_or_else(|| CmsError::NotFound(format!("{}/{}", collection, id)))
    }

    async fn create(&self, collection: &str, body: Value) -> CmsResult<Value> {
        self.ensure_online()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = self.with_id(body, id)?;

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    async fn update(&self, collection: &str, id: Id, body: Value) -> CmsResult<Value> {
        self.ensure_online()?;
        let record = self.with_id(body, id)?;

        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| CmsError::NotFound(format!("{}/{}", collection, id)))?;
        *slot = record.clone();

        Ok(record)
    }

    async fn delete(&self, collection: &str, id: Id) -> CmsResult<()> {
        self.ensure_online()?;
        let mut collections = self.collections.write().await;
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| CmsError::NotFound(format!("{}/{}", collection, id)))?;

        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        if records.len() == before {
            return Err(CmsError::NotFound(format!("{}/{}", collection, id)));
        }
        Ok(())
    }

    async fn upload(&self, file: UploadedFile) -> CmsResult<UploadReceipt> {
        self.ensure_online()?;
        let mut uploads = self.uploads.write().await;
        let url = format!("/uploads/{}/{}", uploads.len() + 1, file.file_name);
        uploads.push(file);
        Ok(UploadReceipt { url })
    }

    async fn catalog(&self) -> CmsResult<Option<CatalogFile>> {
        self.ensure_online()?;
        Ok(self.catalog.read().await.clone())
    }

    async fn store_catalog(&self, file: UploadedFile) -> CmsResult<()> {
        self.ensure_online()?;
        *self.catalog.write().await = Some(CatalogFile {
            file_name: file.file_name,
            content_type: file.content_type,
            bytes: file.bytes,
        });
        Ok(())
    }

    async fn health_check(&self) -> CmsResult<()> {
        self.ensure_online()
    }
}
