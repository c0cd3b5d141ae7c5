use crate::{AppState, ProxyConfig};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

const UPSTREAM_ACCEPT: &str = "image/avif,image/webp,image/*,*/*;q=0.8";
const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Missing url parameter")]
    MissingUrl,

    #[error("Invalid url parameter: {0}")]
    InvalidUrl(String),

    #[error("Host not allowed: {0}")]
    HostNotAllowed(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream error: {0}")]
    UpstreamStatus(u16),

    #[error("Proxy HTTP client unavailable")]
    ClientUnavailable,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::MissingUrl => {
                (StatusCode::BAD_REQUEST, "Missing url parameter").into_response()
            }
            ProxyError::InvalidUrl(_) => {
                (StatusCode::BAD_REQUEST, "Invalid url parameter").into_response()
            }
            ProxyError::HostNotAllowed(_) => {
                (StatusCode::BAD_REQUEST, "Host not allowed").into_response()
            }
            ProxyError::UpstreamStatus(status) => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                format!("Upstream error: {}", status),
            )
                .into_response(),
            ProxyError::Upstream(_) | ProxyError::ClientUnavailable => {
                (StatusCode::BAD_GATEWAY, "Proxy error").into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// Fetches allow-listed images on behalf of the browser and re-serves them with
/// long-lived cache headers.
#[derive(Clone)]
pub struct ImageProxy {
    client: Option<reqwest::Client>,
    config: ProxyConfig,
}

impl ImageProxy {
    pub fn new(config: ProxyConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(redirect_policy(config.clone()))
            .build()
            .map_err(|e| error!("Image proxy disabled, HTTP client failed to build: {}", e))
            .ok();

        Self { client, config }
    }

    pub fn is_allowed_host(&self, host: &str) -> bool {
        host_allowed(&self.config, host)
    }

    pub fn validate_target(&self, raw: Option<&str>) -> Result<Url, ProxyError> {
        let raw = raw
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(ProxyError::MissingUrl)?;

        let target = Url::parse(raw).map_err(|e| ProxyError::InvalidUrl(e.to_string()))?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(ProxyError::InvalidUrl(format!(
                "unsupported scheme {}",
                target.scheme()
            )));
        }

        let host = target.host_str().unwrap_or_default();
        if !self.is_allowed_host(host) {
            return Err(ProxyError::HostNotAllowed(host.to_string()));
        }

        Ok(target)
    }

    /// Browser, edge and stale-while-revalidate lifetimes in one header value.
    pub fn cache_control(&self) -> String {
        format!(
            "public, max-age={}, s-maxage={}, stale-while-revalidate={}",
            self.config.browser_max_age,
            self.config.edge_max_age,
            self.config.stale_while_revalidate
        )
    }

    pub async fn fetch(&self, target: Url) -> Result<Response, ProxyError> {
        debug!("Proxying image from {}", target);

        let client = self.client.as_ref().ok_or(ProxyError::ClientUnavailable)?;
        let upstream = client
            .get(target.clone())
            .header(reqwest::header::ACCEPT, UPSTREAM_ACCEPT)
            .send()
            .await?;

        let status = upstream.status();
        if !status.is_success() {
            warn!("Upstream {} answered {}", target, status);
            return Err(ProxyError::UpstreamStatus(status.as_u16()));
        }

        let content_type = upstream
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CACHE_CONTROL, self.cache_control())
            .body(Body::from_stream(upstream.bytes_stream()))
            .map_err(|e| {
                error!("Failed to build proxy response: {}", e);
                ProxyError::UpstreamStatus(StatusCode::BAD_GATEWAY.as_u16())
            })
    }
}

fn host_allowed(config: &ProxyConfig, host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    !host.is_empty()
        && (config
            .allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&host))
            || config
                .allowed_host_suffixes
                .iter()
                .any(|suffix| host.ends_with(&suffix.to_ascii_lowercase())))
}

/// Follows redirects only while every hop stays on an allow-listed host.
fn redirect_policy(config: ProxyConfig) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let host = attempt.url().host_str().unwrap_or_default().to_string();
        if host_allowed(&config, &host) {
            attempt.follow()
        } else {
            warn!("Refusing upstream redirect to {}", attempt.url());
            attempt.error(format!("redirect to disallowed host '{}'", host))
        }
    })
}

pub async fn proxy_image_handler(
    State(app_state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Response {
    let proxy = &app_state.image_proxy;

    let target = match proxy.validate_target(query.url.as_deref()) {
        Ok(target) => target,
        Err(e) => {
            warn!("Rejected proxy request: {}", e);
            return e.into_response();
        }
    };

    match proxy.fetch(target).await {
        Ok(response) => response,
        Err(e) => {
            error!("Image proxy failed: {}", e);
            e.into_response()
        }
    }
}
