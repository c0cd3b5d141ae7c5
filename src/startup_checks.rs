use crate::Config;
use crate::gallery::KindMatch;
use crate::store::{API_KEY_ENV, ROOT_FOLDER_ENV};
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Remote store credentials missing: {0}")]
    CredentialsMissing(String),

    #[error("Remote store API base URL is invalid: {0}")]
    InvalidApiBaseUrl(String),

    #[error("Image proxy allow-list is empty")]
    ProxyAllowListEmpty,

    #[error("Type folder '{0}' does not name a known media kind")]
    UnrecognizedTypeFolder(String),
}

impl StartupCheckError {
    /// Critical failures stop the server; the rest only degrade it.
    pub fn is_critical(&self) -> bool {
        matches!(self, StartupCheckError::InvalidApiBaseUrl(_))
    }
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    if config.store.resolved_api_key().is_none() {
        warn!(
            "No API key configured (set store.api_key or {}), media lists will be empty",
            API_KEY_ENV
        );
        errors.push(StartupCheckError::CredentialsMissing(
            API_KEY_ENV.to_string(),
        ));
    } else {
        info!("Remote store API key present");
    }

    match config.store.resolved_root_folder_id() {
        Some(root) => info!("Remote store root folder: {}", root),
        None => {
            warn!(
                "No root folder configured (set store.root_folder_id or {}), media lists will be empty",
                ROOT_FOLDER_ENV
            );
            errors.push(StartupCheckError::CredentialsMissing(
                ROOT_FOLDER_ENV.to_string(),
            ));
        }
    }

    match Url::parse(&config.store.api_base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            info!("Remote store API base URL: {}", url);
        }
        _ => {
            error!(
                "Remote store API base URL is not an http(s) URL: {}",
                config.store.api_base_url
            );
            errors.push(StartupCheckError::InvalidApiBaseUrl(
                config.store.api_base_url.clone(),
            ));
        }
    }

    if config.proxy.allowed_hosts.is_empty() && config.proxy.allowed_host_suffixes.is_empty() {
        warn!("Image proxy allows no hosts, every proxied thumbnail will be rejected");
        errors.push(StartupCheckError::ProxyAllowListEmpty);
    }

    for name in &config.gallery.type_folders {
        if KindMatch::from_folder_name(name).is_fallback() {
            warn!(
                "Type folder '{}' matches no media kind and will be listed as video",
                name
            );
            errors.push(StartupCheckError::UnrecognizedTypeFolder(name.clone()));
        }
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        warn!("Startup checks reported {} problems", errors.len());
        Err(errors)
    }
}
