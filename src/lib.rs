use axum::Router;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

pub mod gallery;
pub mod proxy;
pub mod startup_checks;
pub mod store;

use gallery::FolderLayout;
use store::StoreConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub store: StoreConfig,
    pub gallery: GalleryConfig,
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub layout: FolderLayout,
    /// Type folders to descend into, matched case-insensitively. Empty means all.
    pub type_folders: Vec<String>,
    pub max_concurrent_listings: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub allowed_hosts: Vec<String>,
    pub allowed_host_suffixes: Vec<String>,
    pub user_agent: String,
    pub browser_max_age: u64,
    pub edge_max_age: u64,
    pub stale_while_revalidate: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Cere Gallery".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            layout: FolderLayout::Nested,
            type_folders: Vec::new(),
            max_concurrent_listings: 8,
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: [
                "lh3.googleusercontent.com",
                "lh4.googleusercontent.com",
                "lh5.googleusercontent.com",
                "lh6.googleusercontent.com",
                "drive.google.com",
                "www.googleapis.com",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            allowed_host_suffixes: vec![".googleusercontent.com".to_string()],
            user_agent: concat!("cere-gallery/", env!("CARGO_PKG_VERSION")).to_string(),
            browser_max_age: 3600,
            edge_max_age: 86400,
            stale_while_revalidate: 604800,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml_edit::de::Error),
}

impl Config {
    pub async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(toml_edit::de::from_str::<Config>(&content)?)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub gallery: gallery::SharedGallery,
    pub image_proxy: proxy::ImageProxy,
}

pub async fn create_app(config: Config) -> Router {
    let gallery = Arc::new(gallery::Gallery::from_config(&config).await);
    router(config, gallery)
}

/// App over an explicitly supplied store, bypassing credential lookup.
pub fn create_app_with_store(
    config: Config,
    store: store::DynRemoteStore,
    root_folder_id: &str,
) -> Router {
    let gallery = Arc::new(gallery::Gallery::new(
        config.gallery.clone(),
        store,
        root_folder_id,
    ));
    router(config, gallery)
}

pub fn router(config: Config, gallery: gallery::SharedGallery) -> Router {
    let app_state = AppState {
        gallery,
        image_proxy: proxy::ImageProxy::new(config.proxy),
    };

    Router::new()
        .route("/health", axum::routing::get(gallery::health_handler))
        .route(
            "/api/media/{kind}",
            axum::routing::get(gallery::media_handler),
        )
        .route("/api/search", axum::routing::get(gallery::search_handler))
        .route("/api/years", axum::routing::get(gallery::years_handler))
        .route("/api/venues", axum::routing::get(gallery::venues_handler))
        .route(
            "/api/hierarchy",
            axum::routing::get(gallery::hierarchy_handler),
        )
        .route(
            "/api/proxy-image",
            axum::routing::get(proxy::proxy_image_handler),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let method = request.method();
                    let uri = request.uri();
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::info_span!(
                        "http_request",
                        method = %method,
                        uri = %uri,
                        matched_path,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    let headers = request.headers();
                    let user_agent = headers
                        .get("user-agent")
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or("-");
                    let referer = headers
                        .get("referer")
                        .and_then(|h| h.to_str().ok())
                        .unwrap_or("-");

                    tracing::info!(
                        target: "access_log",
                        method = %request.method(),
                        path = %request.uri().path(),
                        query = ?request.uri().query(),
                        user_agent = %user_agent,
                        referer = %referer,
                        "request"
                    );
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            target: "access_log",
                            status = %response.status(),
                            latency_ms = %latency.as_millis(),
                            "response"
                        );
                    },
                ),
        )
        .with_state(app_state)
}
