pub mod cached;
pub mod config;
pub mod error;
pub mod providers;

pub use cached::CachedStore;
pub use config::*;
pub use error::*;
pub use providers::{drive::DriveStore, memory::MemoryStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tracing::info;

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// One child of a remote folder as reported by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub id: String,
    pub name: String,
    pub is_folder: bool,
    pub mime_type: String,
    pub size_bytes: u64,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    pub web_view_url: Option<String>,
    pub web_content_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Folder names from the root down to and including this entry, attached by the walker
    #[serde(default)]
    pub virtual_path: Option<Vec<String>>,
}

impl RemoteEntry {
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_folder: true,
            mime_type: FOLDER_MIME_TYPE.to_string(),
            size_bytes: 0,
            created_at: DateTime::<Utc>::default(),
            web_view_url: None,
            web_content_url: None,
            thumbnail_url: None,
            virtual_path: None,
        }
    }

    pub fn file(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            is_folder: false,
            mime_type: mime_type.into(),
            ..Self::folder(id, name)
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(thumbnail_url.into());
        self
    }

    pub fn with_content_url(mut self, content_url: impl Into<String>) -> Self {
        self.web_content_url = Some(content_url.into());
        self
    }

    /// The virtual path joined as `/a/b/c`, or `None` when the walker did not attach one.
    pub fn path_string(&self) -> Option<String> {
        self.virtual_path
            .as_ref()
            .map(|segments| format!("/{}", segments.join("/")))
    }
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteEntry>, StoreError>;
    fn name(&self) -> &str;
}

pub type DynRemoteStore = Arc<dyn RemoteStore>;

/// Builds the credentialed Drive lister, wrapped in the listing cache when enabled.
pub async fn create_store(config: &StoreConfig) -> Result<DynRemoteStore, StoreError> {
    let api_key = config
        .resolved_api_key()
        .ok_or_else(|| StoreError::NotConfigured(format!("missing {}", API_KEY_ENV)))?;

    let drive: DynRemoteStore = Arc::new(DriveStore::new(config, api_key)?);

    if config.cache_ttl_seconds == 0 {
        info!("Listing cache disabled for {}", drive.name());
        return Ok(drive);
    }

    info!(
        "Caching {} listings for {} seconds",
        drive.name(),
        config.cache_ttl_seconds
    );
    Ok(Arc::new(CachedStore::new(
        drive,
        Duration::from_secs(config.cache_ttl_seconds),
    )))
}
