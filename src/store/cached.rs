use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::debug;

use super::{DynRemoteStore, RemoteEntry, RemoteStore, StoreError};

struct CachedListing {
    fetched_at: Instant,
    entries: Vec<RemoteEntry>,
}

/// Serves repeated listings of the same folder from memory for `ttl`.
/// Failed listings are never cached.
pub struct CachedStore {
    inner: DynRemoteStore,
    ttl: Duration,
    listings: Arc<RwLock<HashMap<String, CachedListing>>>,
}

impl CachedStore {
    pub fn new(inner: DynRemoteStore, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            listings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn clear(&self) {
        self.listings.write().await.clear();
    }
}

#[async_trait]
impl RemoteStore for CachedStore {
    async fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        {
            let listings = self.listings.read().await;
            if let Some(cached) = listings.get(folder_id)
                && cached.fetched_at.elapsed() < self.ttl
            {
                debug!("Listing cache hit for {}", folder_id);
                return Ok(cached.entries.clone());
            }
        }

        let entries = self.inner.list_children(folder_id).await?;

        let mut listings = self.listings.write().await;
        listings.insert(
            folder_id.to_string(),
            CachedListing {
                fetched_at: Instant::now(),
                entries: entries.clone(),
            },
        );

        Ok(entries)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
