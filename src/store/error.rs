use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Remote store is not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store returned status {status} for folder {folder_id}")]
    Status { status: u16, folder_id: String },

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Failed to decode listing: {0}")]
    Decode(String),
}
