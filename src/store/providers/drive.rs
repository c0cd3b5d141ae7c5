use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::store::{FOLDER_MIME_TYPE, RemoteEntry, RemoteStore, StoreConfig, StoreError};

const LISTING_FIELDS: &str = "nextPageToken,files(id,name,mimeType,size,createdTime,webViewLink,webContentLink,thumbnailLink)";

pub struct DriveStore {
    client: Client,
    api_key: String,
    base_url: String,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    mime_type: String,
    size: Option<String>,
    created_time: Option<DateTime<Utc>>,
    web_view_link: Option<String>,
    web_content_link: Option<String>,
    thumbnail_link: Option<String>,
}

impl From<DriveFile> for RemoteEntry {
    fn from(file: DriveFile) -> Self {
        RemoteEntry {
            is_folder: file.mime_type == FOLDER_MIME_TYPE,
            size_bytes: file
                .size
                .as_deref()
                .and_then(|size| size.parse().ok())
                .unwrap_or(0),
            created_at: file.created_time.unwrap_or_default(),
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            web_view_url: file.web_view_link,
            web_content_url: file.web_content_link,
            thumbnail_url: file.thumbnail_link,
            virtual_path: None,
        }
    }
}

impl DriveStore {
    pub fn new(config: &StoreConfig, api_key: String) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    fn parents_query(folder_id: &str) -> String {
        format!(
            "'{}' in parents and trashed = false",
            folder_id.replace('\'', "\\'")
        )
    }

    async fn fetch_page(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> Result<FileList, StoreError> {
        let mut request = self
            .client
            .get(format!("{}/files", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("q", Self::parents_query(folder_id)),
                ("fields", LISTING_FIELDS.to_string()),
                ("pageSize", self.page_size.to_string()),
                ("key", self.api_key.clone()),
            ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::FolderNotFound(folder_id.to_string()));
        }
        if !status.is_success() {
            error!("Drive listing of {} failed with {}", folder_id, status);
            return Err(StoreError::Status {
                status: status.as_u16(),
                folder_id: folder_id.to_string(),
            });
        }

        response
            .json::<FileList>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RemoteStore for DriveStore {
    async fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(folder_id, page_token.as_deref()).await?;
            entries.extend(page.files.into_iter().map(RemoteEntry::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Listed {} children of {}", entries.len(), folder_id);
        Ok(entries)
    }

    fn name(&self) -> &str {
        "Google Drive"
    }
}
