use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use video_service::RemoteCatalog;

fn default_deletable() -> bool {
    true
}

/// Request body for seeding a video on the mock host
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    pub youtube_url: Option<String>,
    pub swf_url: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<String>,
    /// When false the host refuses to delete the video
    #[serde(default = "default_deletable")]
    pub deletable: bool,
}

/// Response for successful creation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    pub success: bool,
    pub message: String,
}

/// Handler for creating a new video
async fn create_video(
    State(catalog): State<Arc<RemoteCatalog>>,
    Json(request): Json<CreateVideoRequest>,
) -> impl IntoResponse {
    let entry = domain::RemoteVideoEntry {
        video_id: request.id.clone(),
        title: request.title,
        description: request.description,
        keywords: request.keywords,
        is_private: request.is_private,
        youtube_url: request.youtube_url,
        swf_url: request.swf_url,
        thumbnails: request.thumbnails,
    };

    catalog.insert(entry, request.deletable);
    tracing::info!(video_id = %request.id, deletable = request.deletable, "seeded video");

    let response = CreateResponse {
        success: true,
        message: format!("Video '{}' created successfully", request.id),
    };

    (StatusCode::CREATED, Json(response)).into_response()
}

/// Create the router for the control API
pub fn create_router(catalog: Arc<RemoteCatalog>) -> Router {
    Router::new()
        .route("/videos", post(create_video))
        .with_state(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header::CONTENT_TYPE};
    use tower::ServiceExt;

    #[tokio::test]
    async fn seeds_catalog() {
        let catalog = Arc::new(RemoteCatalog::new());
        let app = create_router(catalog.clone());
        let request = Request::builder()
            .method("POST")
            .uri("/videos")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"id":"abc123","title":"Demo","thumbnails":["t1.jpg","t2.jpg"],"deletable":false}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let entry = catalog.get("abc123").unwrap();
        assert_eq!(entry.title, "Demo");
        assert!(!entry.is_private);
        assert_eq!(entry.thumbnails, vec!["t1.jpg", "t2.jpg"]);
        assert!(catalog.remove("abc123").is_err());
    }
}
