use super::{
    FolderLayout, MediaKind,
    classify::{PathInfo, classify},
};
use crate::store::RemoteEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PROXY_IMAGE_PATH: &str = "/api/proxy-image";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: String,
    pub title: String,
    pub kind: MediaKind,
    pub year: String,
    pub venue: String,
    pub event: String,
    pub path: String,
    pub thumbnail_url: Option<String>,
    pub content_url: Option<String>,
    pub web_view_url: Option<String>,
    pub thumbnail_proxy_url: Option<String>,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub mime_type: String,
}

impl MediaRecord {
    /// Normalizes a walked entry. Entries without a virtual path become
    /// `Image` / `unknown` / `unknown`.
    pub fn build(entry: &RemoteEntry, layout: FolderLayout) -> Self {
        let path = entry.path_string();
        let info = match &path {
            Some(path) => classify(path, layout),
            None => PathInfo::missing(),
        };

        let preview = entry
            .thumbnail_url
            .as_deref()
            .or(entry.web_content_url.as_deref());

        MediaRecord {
            id: entry.id.clone(),
            title: strip_extension(&entry.name),
            kind: info.kind.kind(),
            year: info.year,
            venue: info.venue,
            event: info.event,
            path: path.unwrap_or_default(),
            thumbnail_url: entry.thumbnail_url.clone(),
            content_url: entry.web_content_url.clone(),
            web_view_url: entry.web_view_url.clone(),
            thumbnail_proxy_url: preview.map(proxied_url),
            size_bytes: entry.size_bytes,
            created_at: entry.created_at,
            mime_type: entry.mime_type.clone(),
        }
    }

    pub fn matches_term(&self, lowercase_term: &str) -> bool {
        self.title.to_lowercase().contains(lowercase_term)
            || self.path.to_lowercase().contains(lowercase_term)
    }
}

/// `photo1.jpg` -> `photo1`. Names that are only an extension (`.hidden`) are kept whole.
pub fn strip_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

pub fn proxied_url(target: &str) -> String {
    format!("{}?url={}", PROXY_IMAGE_PATH, urlencoding::encode(target))
}
