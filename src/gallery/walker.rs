use super::FolderLayout;
use crate::store::{RemoteEntry, RemoteStore, StoreError};
use futures::{StreamExt, TryStreamExt, stream};
use mime_guess::mime;
use tracing::debug;

/// A folder reached by the walk together with the names leading to it from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFolder {
    pub id: String,
    pub trail: Vec<String>,
}

/// Level-by-level walk of `type/year/(venue/)event` folders.
///
/// Every folder at a level is listed once; siblings are listed concurrently
/// (at most `concurrency` at a time) and results keep listing order. Any failed
/// listing fails the whole walk.
pub struct TreeWalker<'a> {
    store: &'a dyn RemoteStore,
    layout: FolderLayout,
    type_folders: &'a [String],
    concurrency: usize,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        store: &'a dyn RemoteStore,
        layout: FolderLayout,
        type_folders: &'a [String],
        concurrency: usize,
    ) -> Self {
        Self {
            store,
            layout,
            type_folders,
            concurrency: concurrency.max(1),
        }
    }

    /// Lists the children of every folder in `frontier`, preserving frontier order.
    async fn list_level(
        &self,
        frontier: Vec<WalkedFolder>,
    ) -> Result<Vec<(WalkedFolder, Vec<RemoteEntry>)>, StoreError> {
        stream::iter(frontier)
            .map(|folder| async move {
                let children = self.store.list_children(&folder.id).await?;
                Ok::<_, StoreError>((folder, children))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    fn accepts_type_folder(&self, name: &str) -> bool {
        self.type_folders.is_empty()
            || self
                .type_folders
                .iter()
                .any(|allowed| allowed.trim().eq_ignore_ascii_case(name.trim()))
    }

    /// Event folders, the deepest folder level. Does not list their contents.
    pub async fn event_folders(&self, root_id: &str) -> Result<Vec<WalkedFolder>, StoreError> {
        let mut frontier = vec![WalkedFolder {
            id: root_id.to_string(),
            trail: Vec::new(),
        }];

        for depth in 0..self.layout.folder_depth() {
            let listed = self.list_level(frontier).await?;

            let mut next = Vec::new();
            for (parent, children) in listed {
                for child in children {
                    if !child.is_folder {
                        continue;
                    }
                    if depth == 0 && !self.accepts_type_folder(&child.name) {
                        debug!("Skipping type folder '{}'", child.name);
                        continue;
                    }
                    let mut trail = parent.trail.clone();
                    trail.push(child.name);
                    next.push(WalkedFolder {
                        id: child.id,
                        trail,
                    });
                }
            }
            frontier = next;

            debug!("Walk level {}: {} folders", depth + 1, frontier.len());
        }

        Ok(frontier)
    }

    /// Every media file below the event folders, each carrying its virtual path.
    pub async fn media_entries(&self, root_id: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        let event_folders = self.event_folders(root_id).await?;
        let listed = self.list_level(event_folders).await?;

        let mut entries = Vec::new();
        for (folder, children) in listed {
            for mut child in children.into_iter().filter(is_media_leaf) {
                let mut path = folder.trail.clone();
                path.push(child.name.clone());
                child.virtual_path = Some(path);
                entries.push(child);
            }
        }

        debug!("Walk found {} media entries", entries.len());
        Ok(entries)
    }
}

/// Plain files, plus folders whose name carries a media extension.
pub fn is_media_leaf(entry: &RemoteEntry) -> bool {
    !entry.is_folder || has_media_extension(&entry.name)
}

pub fn has_media_extension(name: &str) -> bool {
    if !name.contains('.') {
        return false;
    }
    mime_guess::from_path(name).iter().any(|guess| {
        let top = guess.type_();
        top == mime::IMAGE || top == mime::AUDIO || top == mime::VIDEO
    })
}
