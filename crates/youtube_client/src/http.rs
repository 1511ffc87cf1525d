use std::time::Duration;

use domain::RemoteVideoEntry;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::{AuthToken, ClientConfig, Credentials, RemoteError, RemoteVideoApi, VideoUpdate};

const VIDEO_PARTS: &str = "snippet,status,player";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    id: String,
    snippet: Option<SnippetResource>,
    status: Option<StatusResource>,
    player: Option<PlayerResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnippetResource {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    thumbnails: Vec<ThumbnailResource>,
}

#[derive(Debug, Deserialize)]
struct ThumbnailResource {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResource {
    privacy_status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResource {
    #[serde(default)]
    watch_url: Option<String>,
    #[serde(default)]
    swf_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    id: &'a str,
    snippet: UpdateSnippet<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateSnippet<'a> {
    title: &'a str,
    description: Option<&'a str>,
    tags: Vec<&'a str>,
}

impl VideoResource {
    fn into_entry(self) -> Result<RemoteVideoEntry, RemoteError> {
        let snippet = self
            .snippet
            .ok_or_else(|| RemoteError::transport(format!("video {} has no snippet", self.id)))?;
        let keywords = if snippet.tags.is_empty() {
            None
        } else {
            Some(snippet.tags.join(", "))
        };
        let (youtube_url, swf_url) = self
            .player
            .map(|p| (p.watch_url, p.swf_url))
            .unwrap_or_default();

        Ok(RemoteVideoEntry {
            video_id: self.id,
            title: snippet.title,
            description: snippet.description,
            keywords,
            is_private: self
                .status
                .is_some_and(|s| s.privacy_status.eq_ignore_ascii_case("private")),
            youtube_url,
            swf_url,
            thumbnails: snippet.thumbnails.into_iter().map(|t| t.url).collect(),
        })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        RemoteError::Transport(value.to_string())
    }
}

/// Map a non-success response onto the error taxonomy
fn check_status(response: Response, video_id: &str) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED => RemoteError::Auth(body),
        StatusCode::NOT_FOUND => RemoteError::NotFound(video_id.to_string()),
        _ => RemoteError::Transport(format!("unexpected status {status}: {body}")),
    })
}

/// Blocking client for the remote host's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpVideoApi {
    base_url: String,
    http: Client,
}

impl HttpVideoApi {
    /// Create a new client targeting the provided base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, RemoteError> {
        Self::new(&config.api_base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn videos_url(&self) -> String {
        format!("{}/youtube/v3/videos", self.base_url)
    }
}

impl RemoteVideoApi for HttpVideoApi {
    fn fetch_entry(&self, video_id: &str) -> Result<RemoteVideoEntry, RemoteError> {
        tracing::debug!(video_id, "fetching remote entry");
        let response = self
            .http
            .get(self.videos_url())
            .query(&[("id", video_id), ("part", VIDEO_PARTS)])
            .send()?;
        let list: VideoListResponse = check_status(response, video_id)?.json()?;

        list.items
            .into_iter()
            .find(|item| item.id == video_id)
            .ok_or_else(|| RemoteError::NotFound(video_id.to_string()))?
            .into_entry()
    }

    fn authenticate(&self, credentials: &Credentials) -> Result<AuthToken, RemoteError> {
        tracing::debug!(email = %credentials.email, "authenticating");
        let response = self
            .http
            .post(format!("{}/token", self.base_url))
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.email.as_str()),
                ("password", credentials.password.as_str()),
                ("client_id", credentials.client_id.as_str()),
            ])
            .send()?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let message = match response.json::<OAuthErrorResponse>() {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => format!("token endpoint answered {status}"),
            };
            return Err(RemoteError::Auth(message));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Transport(format!(
                "unexpected status {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json()?;
        Ok(AuthToken::bearer(token.access_token))
    }

    fn update_remote(
        &self,
        token: &AuthToken,
        video_id: &str,
        update: &VideoUpdate,
    ) -> Result<(), RemoteError> {
        tracing::debug!(video_id, "updating remote video");
        let body = UpdateRequest {
            id: video_id,
            snippet: UpdateSnippet {
                title: &update.title,
                description: update.description.as_deref(),
                tags: update
                    .keywords
                    .as_deref()
                    .map(|k| {
                        k.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        };
        let response = self
            .http
            .put(self.videos_url())
            .query(&[("part", "snippet")])
            .header(AUTHORIZATION, format!("Bearer {}", token.access_token()))
            .json(&body)
            .send()?;
        check_status(response, video_id)?;
        Ok(())
    }

    fn delete_remote(&self, token: &AuthToken, video_id: &str) -> Result<bool, RemoteError> {
        tracing::debug!(video_id, "deleting remote video");
        let response = self
            .http
            .delete(self.videos_url())
            .query(&[("id", video_id)])
            .header(AUTHORIZATION, format!("Bearer {}", token.access_token()))
            .send()?;

        if matches!(
            response.status(),
            StatusCode::FORBIDDEN | StatusCode::CONFLICT
        ) {
            tracing::debug!(video_id, status = %response.status(), "remote refused deletion");
            return Ok(false);
        }
        check_status(response, video_id)?;
        Ok(true)
    }
}
