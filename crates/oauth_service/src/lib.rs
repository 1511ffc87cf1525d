use axum::{
    Json, Router,
    extract::{Form, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Default token lifetime in seconds
pub const DEFAULT_EXPIRES_IN: i64 = 3600;

/// Request body for token generation
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Only "password" is supported
    pub grant_type: String,

    /// Account email
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub client_id: Option<String>,

    /// Custom expiry in seconds from now (for testing)
    /// Can be negative to create expired tokens
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Response for successful token generation
/// Follows Google OAuth2 token response format
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Expiry time in seconds from now
    pub expires_in: i64,
}

/// Error response for OAuth errors
/// Follows Google OAuth2 error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, description: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            error_description: Some(description.into()),
        }
    }
}

/// The single account the mock host accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockAccount {
    pub email: String,
    pub password: String,
    pub client_id: String,
}

impl MockAccount {
    fn matches(&self, request: &TokenRequest) -> bool {
        request.username.as_deref() == Some(self.email.as_str())
            && request.password.as_deref() == Some(self.password.as_str())
            && request.client_id.as_deref() == Some(self.client_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("missing bearer token")]
    Missing,
    #[error("unknown token")]
    Unknown,
    #[error("token has expired")]
    Expired,
}

/// Token metadata for tracking expiry
#[derive(Debug, Clone)]
struct TokenMetadata {
    issued_at: DateTime<Utc>,
    /// Can be negative for expired tokens
    expires_in: i64,
}

impl TokenMetadata {
    fn is_expired(&self) -> bool {
        let now = Utc::now();
        let expiry_time = self.issued_at + chrono::Duration::seconds(self.expires_in);
        now >= expiry_time
    }
}

/// Issued access tokens
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: RwLock<HashMap<String, TokenMetadata>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a token valid for `expires_in` seconds.
    ///
    /// Tokens that have already expired are dropped first.
    pub fn issue(&self, expires_in: i64) -> String {
        let access_token = format!("ya29.mock_{}", uuid::Uuid::new_v4());
        let metadata = TokenMetadata {
            issued_at: Utc::now(),
            expires_in,
        };
        let mut store = self
            .tokens
            .write()
            .expect("Failed to acquire write lock on tokens");
        store.retain(|_, m| !m.is_expired());
        store.insert(access_token.clone(), metadata);
        access_token
    }

    pub fn len(&self) -> usize {
        self.tokens
            .read()
            .expect("Failed to acquire read lock on tokens")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self, token: &str) -> Result<(), TokenError> {
        let store = self
            .tokens
            .read()
            .expect("Failed to acquire read lock on tokens");
        match store.get(token) {
            Some(metadata) if metadata.is_expired() => Err(TokenError::Expired),
            Some(_) => Ok(()),
            None => Err(TokenError::Unknown),
        }
    }

    /// Validate the `Authorization: Bearer` header of a request
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), TokenError> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(TokenError::Missing)?;
        self.validate(token)
    }
}

/// Shared state of the token endpoint
#[derive(Debug, Clone)]
pub struct OAuthState {
    pub account: Arc<MockAccount>,
    pub tokens: Arc<TokenStore>,
}

/// Handler for token generation
async fn token_handler(
    State(state): State<OAuthState>,
    Form(request): Form<TokenRequest>,
) -> impl IntoResponse {
    if request.grant_type != "password" {
        let error = ErrorResponse::new(
            "unsupported_grant_type",
            format!(
                "Grant type '{}' is not supported. Use 'password'",
                request.grant_type
            ),
        );
        return (StatusCode::BAD_REQUEST, Json(error)).into_response();
    }

    if !state.account.matches(&request) {
        tracing::info!(username = ?request.username, "rejected credentials");
        let error = ErrorResponse::new("invalid_grant", "Bad email, password or client id");
        return (StatusCode::UNAUTHORIZED, Json(error)).into_response();
    }

    let expires_in = request.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
    let access_token = state.tokens.issue(expires_in);
    tracing::debug!(expires_in, "issued access token");

    let response = TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Create the router for the OAuth service
pub fn create_router(state: OAuthState) -> Router {
    Router::new()
        .route("/token", post(token_handler))
        .with_state(state)
}
