mod catalog;

pub use catalog::{CatalogError, RemoteCatalog};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use domain::RemoteVideoEntry;
use oauth_service::TokenStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct VideosListParams {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub part: String,
}

#[derive(Debug, Deserialize)]
pub struct VideosDeleteParams {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideosListResponse {
    pub kind: String,
    pub etag: String,
    pub page_info: PageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    pub items: Vec<Video>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_results: i32,
    pub results_per_page: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub kind: String,
    pub etag: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<VideoSnippet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VideoStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<VideoPlayer>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnails: Vec<ThumbnailDetails>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThumbnailDetails {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    /// "public" or "private"
    pub privacy_status: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPlayer {
    pub watch_url: Option<String>,
    pub swf_url: Option<String>,
}

/// Body of a snippet update
#[derive(Debug, Deserialize)]
pub struct VideoUpdateRequest {
    pub id: String,
    pub snippet: SnippetUpdate,
}

#[derive(Debug, Deserialize)]
pub struct SnippetUpdate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Shared state of the video API
#[derive(Debug, Clone)]
pub struct VideoApiState {
    pub catalog: Arc<RemoteCatalog>,
    pub tokens: Arc<TokenStore>,
}

fn error(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error: error.to_string(),
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

fn split_tags(keywords: Option<&str>) -> Vec<String> {
    keywords
        .map(|k| {
            k.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Wire representation of a catalog entry, restricted to the requested parts
fn to_resource(entry: RemoteVideoEntry, parts: &[&str]) -> Video {
    let wants = |part: &str| parts.is_empty() || parts.contains(&part);

    Video {
        kind: "youtube#video".to_string(),
        etag: format!("etag-{}", entry.video_id),
        snippet: wants("snippet").then(|| VideoSnippet {
            title: entry.title.clone(),
            description: entry.description.clone(),
            tags: split_tags(entry.keywords.as_deref()),
            thumbnails: entry
                .thumbnails
                .iter()
                .map(|url| ThumbnailDetails { url: url.clone() })
                .collect(),
        }),
        status: wants("status").then(|| VideoStatus {
            privacy_status: if entry.is_private { "private" } else { "public" }.to_string(),
        }),
        player: wants("player").then(|| VideoPlayer {
            watch_url: entry.youtube_url.clone(),
            swf_url: entry.swf_url.clone(),
        }),
        id: entry.video_id,
    }
}

async fn videos_list(
    State(state): State<VideoApiState>,
    Query(params): Query<VideosListParams>,
) -> impl IntoResponse {
    let parts: Vec<&str> = params
        .part
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let items: Vec<Video> = params
        .id
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter_map(|id| state.catalog.get(id))
        .map(|entry| to_resource(entry, &parts))
        .collect();
    tracing::debug!(ids = %params.id, found = items.len(), "videos.list");

    let response = VideosListResponse {
        kind: "youtube#videoListResponse".to_string(),
        etag: "etag-list-1".to_string(),
        page_info: PageInfo {
            total_results: items.len() as i32,
            results_per_page: items.len() as i32,
        },
        next_page_token: None,
        items,
    };

    (StatusCode::OK, Json(response))
}

async fn videos_update(
    State(state): State<VideoApiState>,
    headers: HeaderMap,
    Json(request): Json<VideoUpdateRequest>,
) -> Response {
    if let Err(e) = state.tokens.authorize(&headers) {
        return error(StatusCode::UNAUTHORIZED, "unauthorized", e.to_string());
    }

    let keywords = if request.snippet.tags.is_empty() {
        None
    } else {
        Some(request.snippet.tags.join(", "))
    };
    match state.catalog.update_snippet(
        &request.id,
        request.snippet.title,
        request.snippet.description,
        keywords,
    ) {
        Ok(entry) => {
            tracing::info!(video_id = %request.id, "videos.update");
            (StatusCode::OK, Json(to_resource(entry, &[]))).into_response()
        }
        Err(e) => error(StatusCode::NOT_FOUND, "videoNotFound", e.to_string()),
    }
}

async fn videos_delete(
    State(state): State<VideoApiState>,
    headers: HeaderMap,
    Query(params): Query<VideosDeleteParams>,
) -> Response {
    if let Err(e) = state.tokens.authorize(&headers) {
        return error(StatusCode::UNAUTHORIZED, "unauthorized", e.to_string());
    }

    match state.catalog.remove(&params.id) {
        Ok(()) => {
            tracing::info!(video_id = %params.id, "videos.delete");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e @ CatalogError::NotFound(_)) => {
            error(StatusCode::NOT_FOUND, "videoNotFound", e.to_string())
        }
        Err(e @ CatalogError::Refused(_)) => {
            error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
        }
    }
}

// Create the router for the video API
pub fn create_router(state: VideoApiState) -> Router {
    Router::new()
        .route(
            "/youtube/v3/videos",
            get(videos_list).put(videos_update).delete(videos_delete),
        )
        .with_state(state)
}
