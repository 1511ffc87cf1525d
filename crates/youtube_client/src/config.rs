use std::time::Duration;

use serde::Deserialize;

use crate::Credentials;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid YOUTUBE_* configuration: {0}")]
    Env(#[from] envy::Error),
}

fn default_timeout_secs() -> u64 {
    30
}

/// Remote host settings, read from `YOUTUBE_*` environment variables.
///
/// Loaded once and handed to the client and the sync layer; nothing reads
/// the environment after startup.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub auth_email: String,
    pub auth_password: String,
    pub client_id: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Reads the process environment, after loading `.env` if there is one
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::prefixed("YOUTUBE_").from_env::<Self>()?)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed("YOUTUBE_").from_iter(vars)?)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.auth_email, &self.auth_password, &self.client_id)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field("credentials", &self.credentials())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reads_prefixed_variables() {
        let config = ClientConfig::from_vars(vars(&[
            ("YOUTUBE_API_BASE_URL", "http://localhost:8080"),
            ("YOUTUBE_AUTH_EMAIL", "me@example.com"),
            ("YOUTUBE_AUTH_PASSWORD", "hunter2"),
            ("YOUTUBE_CLIENT_ID", "client-1"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(
            config.credentials(),
            Credentials::new("me@example.com", "hunter2", "client-1")
        );
        assert!(!format!("{config:?}").contains("hunter2"));

        let api = crate::HttpVideoApi::from_config(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080");
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let result = ClientConfig::from_vars(vars(&[
            ("YOUTUBE_API_BASE_URL", "http://localhost:8080"),
            ("YOUTUBE_TIMEOUT_SECS", "5"),
        ]));
        assert!(matches!(result, Err(ConfigError::Env(_))));
    }
}
