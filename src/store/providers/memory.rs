use async_trait::async_trait;
use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicUsize, Ordering},
};
use tracing::debug;

use crate::store::{RemoteEntry, RemoteStore, StoreError};

/// Folder tree held in memory. Listing order is insertion order.
#[derive(Default)]
pub struct MemoryStore {
    children: HashMap<String, Vec<RemoteEntry>>,
    failing: HashSet<String>,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, parent_id: impl Into<String>, entry: RemoteEntry) -> &mut Self {
        self.children.entry(parent_id.into()).or_default().push(entry);
        self
    }

    pub fn with_child(mut self, parent_id: impl Into<String>, entry: RemoteEntry) -> Self {
        self.insert(parent_id, entry);
        self
    }

    /// Adds `entry` below `root_id`, creating the named folders on the way.
    /// Folder ids are the slash-joined trail from the root, e.g. `root/Slike/1999`.
    pub fn insert_at(&mut self, root_id: &str, folders: &[&str], entry: RemoteEntry) -> &mut Self {
        let mut parent = root_id.to_string();
        for name in folders {
            let folder_id = format!("{}/{}", parent, name);
            let siblings = self.children.entry(parent.clone()).or_default();
            if !siblings
                .iter()
                .any(|existing| existing.is_folder && existing.id == folder_id)
            {
                siblings.push(RemoteEntry::folder(folder_id.clone(), *name));
            }
            parent = folder_id;
        }
        self.insert(parent, entry)
    }

    pub fn with_file_at(mut self, root_id: &str, folders: &[&str], entry: RemoteEntry) -> Self {
        self.insert_at(root_id, folders, entry);
        self
    }

    /// Makes every listing of `folder_id` fail with a 503.
    pub fn fail_on(mut self, folder_id: impl Into<String>) -> Self {
        self.failing.insert(folder_id.into());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        if self.failing.contains(folder_id) {
            debug!("Memory store refusing to list {}", folder_id);
            return Err(StoreError::Status {
                status: 503,
                folder_id: folder_id.to_string(),
            });
        }

        Ok(self.children.get(folder_id).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "In-memory store"
    }
}
