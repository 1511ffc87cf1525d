//! Client side of the remote video host.
//!
//! [`RemoteVideoApi`] is the seam the sync layer talks to; [`HttpVideoApi`]
//! is the production implementation.

mod config;
mod http;

pub use config::{ClientConfig, ConfigError};
pub use http::HttpVideoApi;

use domain::{RemoteVideoEntry, Video};
use std::fmt;

/// Errors reported by the remote video host
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The host does not know this video id
    #[error("video not found on remote host: {0}")]
    NotFound(String),

    /// Credentials rejected or token no longer valid
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Network failure or a response we could not make sense of
    #[error("transport error: {0}")]
    Transport(String),

    /// The host refused to carry out the operation
    #[error("operation refused: {0}")]
    Operation(String),
}

impl RemoteError {
    pub fn operation(message: impl ToString) -> Self {
        Self::Operation(message.to_string())
    }

    pub fn transport(message: impl ToString) -> Self {
        Self::Transport(message.to_string())
    }
}

/// Account credentials for mutating calls
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub client_id: String,
}

impl Credentials {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            client_id: client_id.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// Proof of a successful [`RemoteVideoApi::authenticate`] call
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    access_token: String,
}

impl AuthToken {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Descriptive fields pushed to the host on update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUpdate {
    pub title: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

impl From<&Video> for VideoUpdate {
    fn from(video: &Video) -> Self {
        Self {
            title: video.title.clone(),
            description: video.description.clone(),
            keywords: video.keywords.clone(),
        }
    }
}

/// Operations the remote video host offers.
///
/// Mutating calls take an [`AuthToken`], so they cannot be made without
/// authenticating first. Every call blocks until the host answers.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait RemoteVideoApi: Send + Sync {
    /// Read-only, needs no token
    fn fetch_entry(&self, video_id: &str) -> Result<RemoteVideoEntry, RemoteError>;

    fn authenticate(&self, credentials: &Credentials) -> Result<AuthToken, RemoteError>;

    fn update_remote(
        &self,
        token: &AuthToken,
        video_id: &str,
        update: &VideoUpdate,
    ) -> Result<(), RemoteError>;

    /// Returns whether the host actually deleted the video
    fn delete_remote(&self, token: &AuthToken, video_id: &str) -> Result<bool, RemoteError>;
}
