use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("Remote store error: {0}")]
    Store(#[from] StoreError),

    #[error("Gallery unavailable: remote store credentials or root folder not configured")]
    Unavailable,

    #[error("Unknown media kind: {0}")]
    UnknownMediaKind(String),
}
