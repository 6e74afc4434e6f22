//! In-memory draft storage
//!
//! Drafts live only in the server process and expire after a period of
//! inactivity. Expired drafts are swept whenever the store is touched.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::draft::Draft;

pub struct DraftStore {
    drafts: RwLock<HashMap<Uuid, Draft>>,
    ttl: Duration,
}

impl DraftStore {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            drafts: RwLock::new(HashMap::new()),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::hours(2)),
        }
    }

    /// Store a draft, replacing any previous version
    pub async fn save(&self, draft: Draft) -> Uuid {
        let id = draft.id;
        let mut drafts = self.drafts.write().await;
        self.sweep(&mut drafts);
        drafts.insert(id, draft);
        id
    }

    /// A copy of the draft, `None` if unknown or expired
    pub async fn get(&self, id: Uuid) -> Option<Draft> {
        let mut drafts = self.drafts.write().await;
        self.sweep(&mut drafts);
        drafts.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> Option<Draft> {
        self.drafts.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.read().await.is_empty()
    }

    fn sweep(&self, drafts: &mut HashMap<Uuid, Draft>) {
        let cutoff = Utc::now() - self.ttl;
        let before = drafts.len();
        drafts.retain(|_, d| d.updated_at > cutoff);
        let expired = before - drafts.len();
        if expired > 0 {
            tracing::debug!(expired, "Expired wizard drafts removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::EntityKind;

    #[tokio::test]
    async fn test_save_and_get() {
        let store = DraftStore::new(std::time::Duration::from_secs(60));
        let mut draft = Draft::new(EntityKind::Dish);
        let id = store.save(draft.clone()).await;

        draft.values.insert("name_en".to_string(), "Kabsa".to_string());
        store.save(draft).await;

        let loaded = store.get(id).await.unwrap();
        assert_eq!(loaded.value("name_en"), "Kabsa");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_drafts_swept() {
        let store = DraftStore::new(std::time::Duration::from_secs(60));
        let mut stale = Draft::new(EntityKind::Brand);
        stale.updated_at = Utc::now() - Duration::minutes(5);
        let stale_id = store.save(stale).await;

        let fresh_id = store.save(Draft::new(EntityKind::Brand)).await;

        assert!(store.get(stale_id).await.is_none());
        assert!(store.get(fresh_id).await.is_some());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = DraftStore::new(std::time::Duration::from_secs(60));
        let id = store.save(Draft::new(EntityKind::Recipe)).await;
        assert!(store.remove(id).await.is_some());
        assert!(store.is_empty().await);
    }
}
