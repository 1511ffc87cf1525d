use std::sync::Arc;

use oauth_service::{MockAccount, OAuthState, TokenStore};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use video_service::{RemoteCatalog, VideoApiState};

fn default_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_email() -> String {
    "mock@example.com".to_string()
}

fn default_password() -> String {
    "mock-password".to_string()
}

fn default_client_id() -> String {
    "mock-client".to_string()
}

/// `MOCK_*` environment variables
#[derive(Debug, Deserialize)]
struct MockConfig {
    #[serde(default = "default_addr")]
    remote_addr: String,
    #[serde(default = "default_email")]
    auth_email: String,
    #[serde(default = "default_password")]
    auth_password: String,
    #[serde(default = "default_client_id")]
    client_id: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config: MockConfig = envy::prefixed("MOCK_").from_env()?;

    let catalog = Arc::new(RemoteCatalog::with_dummy_data());
    let tokens = Arc::new(TokenStore::new());
    let account = Arc::new(MockAccount {
        email: config.auth_email,
        password: config.auth_password,
        client_id: config.client_id,
    });

    let app = oauth_service::create_router(OAuthState {
        account,
        tokens: tokens.clone(),
    })
    .merge(video_service::create_router(VideoApiState {
        catalog: catalog.clone(),
        tokens,
    }))
    .merge(control_service::create_router(catalog));

    let listener = tokio::net::TcpListener::bind(&config.remote_addr).await?;
    tracing::info!("Mock remote listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
