use super::{MediaFilter, MediaKind};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub kind: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    store_configured: bool,
    store: Option<String>,
}

fn parse_kind(raw: &str) -> Result<MediaKind, Response> {
    raw.parse::<MediaKind>().map_err(|e| {
        warn!("Rejected media kind '{}'", raw);
        (StatusCode::BAD_REQUEST, e.to_string()).into_response()
    })
}

pub async fn media_handler(
    State(app_state): State<AppState>,
    Path(kind): Path<String>,
    Query(filter): Query<MediaFilter>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };

    let items = app_state.gallery.filtered_media(kind, &filter).await;
    debug!("media {}: {} items for {:?}", kind, items.len(), filter);
    Json(items).into_response()
}

pub async fn search_handler(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let kind = match query.kind.as_deref().filter(|k| !k.is_empty()) {
        Some(raw) => match parse_kind(raw) {
            Ok(kind) => Some(kind),
            Err(response) => return response,
        },
        None => None,
    };

    let term = query.q.unwrap_or_default();
    Json(app_state.gallery.search(&term, kind).await).into_response()
}

pub async fn years_handler(State(app_state): State<AppState>) -> Json<Vec<String>> {
    Json(app_state.gallery.available_years().await)
}

pub async fn venues_handler(State(app_state): State<AppState>) -> Json<Vec<String>> {
    Json(app_state.gallery.available_venues().await)
}

pub async fn hierarchy_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.gallery.hierarchy().await)
}

pub async fn health_handler(State(app_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        store_configured: app_state.gallery.is_available(),
        store: app_state.gallery.store_name().map(str::to_string),
    })
}
