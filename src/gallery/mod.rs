// Gallery module - facade over the remote folder tree
pub mod classify;
mod error;
mod handlers;
pub mod queries;
mod record;
mod types;
pub mod walker;

// Re-export public items
pub use classify::{KindMatch, MediaKind, PathInfo, UNKNOWN, classify};
pub use error::GalleryError;
pub use handlers::{
    health_handler, hierarchy_handler, media_handler, search_handler, venues_handler,
    years_handler,
};
pub use record::{MediaRecord, strip_extension};
pub use types::*;

use crate::store::{DynRemoteStore, create_store};
use std::sync::Arc;
use tracing::{error, info, warn};
use walker::TreeWalker;

pub type SharedGallery = Arc<Gallery>;

/// Single entry point for the media queries. Every query walks the remote tree
/// afresh; nothing is cached here.
pub struct Gallery {
    config: crate::GalleryConfig,
    store: Option<DynRemoteStore>,
    root_folder_id: String,
}

impl Gallery {
    pub fn new(
        config: crate::GalleryConfig,
        store: DynRemoteStore,
        root_folder_id: impl Into<String>,
    ) -> Self {
        Self {
            config,
            store: Some(store),
            root_folder_id: root_folder_id.into(),
        }
    }

    /// A gallery whose every query answers empty.
    pub fn unavailable(config: crate::GalleryConfig) -> Self {
        Self {
            config,
            store: None,
            root_folder_id: String::new(),
        }
    }

    /// Builds the store from configuration. Missing credentials or root folder
    /// leave the gallery unavailable instead of failing startup.
    pub async fn from_config(config: &crate::Config) -> Self {
        let Some(root_folder_id) = config.store.resolved_root_folder_id() else {
            warn!("Remote store root folder id not configured, gallery will be empty");
            return Self::unavailable(config.gallery.clone());
        };

        match create_store(&config.store).await {
            Ok(store) => {
                info!("Gallery backed by {} (root {})", store.name(), root_folder_id);
                Self::new(config.gallery.clone(), store, root_folder_id)
            }
            Err(e) => {
                warn!("Remote store unavailable, gallery will be empty: {}", e);
                Self::unavailable(config.gallery.clone())
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    pub fn store_name(&self) -> Option<&str> {
        self.store.as_deref().map(|store| store.name())
    }

    fn walker(&self) -> Result<TreeWalker<'_>, GalleryError> {
        let store = self.store.as_deref().ok_or(GalleryError::Unavailable)?;
        Ok(TreeWalker::new(
            store,
            self.config.layout,
            &self.config.type_folders,
            self.config.max_concurrent_listings,
        ))
    }

    /// Walks the whole tree and builds a record per media file.
    pub async fn try_records(&self) -> Result<Vec<MediaRecord>, GalleryError> {
        let entries = self.walker()?.media_entries(&self.root_folder_id).await?;
        Ok(entries
            .iter()
            .map(|entry| MediaRecord::build(entry, self.config.layout))
            .collect())
    }

    pub async fn try_hierarchy(&self) -> Result<Hierarchy, GalleryError> {
        let folders = self.walker()?.event_folders(&self.root_folder_id).await?;
        Ok(queries::build_hierarchy(&folders, self.config.layout))
    }

    async fn records_or_empty(&self, operation: &str) -> Vec<MediaRecord> {
        match self.try_records().await {
            Ok(records) => records,
            Err(e) => {
                log_failure(operation, &e);
                Vec::new()
            }
        }
    }

    pub async fn media_by_kind(&self, kind: MediaKind) -> Vec<MediaRecord> {
        queries::by_kind(self.records_or_empty("media_by_kind").await, kind)
    }

    pub async fn search(&self, term: &str, kind: Option<MediaKind>) -> Vec<MediaRecord> {
        queries::search(self.records_or_empty("search").await, term, kind)
    }

    pub async fn available_years(&self) -> Vec<String> {
        queries::available_years(&self.records_or_empty("available_years").await)
    }

    pub async fn available_venues(&self) -> Vec<String> {
        queries::available_venues(&self.records_or_empty("available_venues").await)
    }

    pub async fn hierarchy(&self) -> Hierarchy {
        match self.try_hierarchy().await {
            Ok(hierarchy) => hierarchy,
            Err(e) => {
                log_failure("hierarchy", &e);
                Hierarchy::default()
            }
        }
    }

    /// Search when a term is given, otherwise list by kind; then narrow by year and venue.
    pub async fn filtered_media(&self, kind: MediaKind, filter: &MediaFilter) -> Vec<MediaRecord> {
        let base = match filter.search_term() {
            Some(term) => self.search(term, Some(kind)).await,
            None => self.media_by_kind(kind).await,
        };
        queries::apply_filter(base, filter)
    }
}

fn log_failure(operation: &str, e: &GalleryError) {
    match e {
        GalleryError::Unavailable => warn!("{}: {}", operation, e),
        _ => error!("{} failed, returning empty result: {}", operation, e),
    }
}

#[cfg(test)]
mod tests;
