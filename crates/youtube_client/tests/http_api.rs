use std::sync::Arc;
use std::thread;
use std::time::Duration;

use domain::RemoteVideoEntry;
use oauth_service::{MockAccount, OAuthState, TokenStore};
use video_service::{RemoteCatalog, VideoApiState};
use youtube_client::{AuthToken, Credentials, HttpVideoApi, RemoteError, RemoteVideoApi, VideoUpdate};

struct MockRemote {
    base_url: String,
    catalog: Arc<RemoteCatalog>,
}

/// Serve the mock host on an ephemeral port from its own runtime thread
fn start_mock_remote() -> MockRemote {
    let catalog = Arc::new(RemoteCatalog::with_dummy_data());
    let tokens = Arc::new(TokenStore::new());
    let app = oauth_service::create_router(OAuthState {
        account: Arc::new(MockAccount {
            email: "me@example.com".to_string(),
            password: "hunter2".to_string(),
            client_id: "client-1".to_string(),
        }),
        tokens: tokens.clone(),
    })
    .merge(video_service::create_router(VideoApiState {
        catalog: catalog.clone(),
        tokens,
    }))
    .merge(control_service::create_router(catalog.clone()));

    let (tx, rx) = std::sync::mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    let addr = rx.recv().unwrap();
    MockRemote {
        base_url: format!("http://{addr}"),
        catalog,
    }
}

fn client(remote: &MockRemote) -> HttpVideoApi {
    HttpVideoApi::new(&remote.base_url, Duration::from_secs(5)).unwrap()
}

fn credentials() -> Credentials {
    Credentials::new("me@example.com", "hunter2", "client-1")
}

#[test]
fn fetches_seeded_entry() {
    let remote = start_mock_remote();
    remote.catalog.insert(
        RemoteVideoEntry {
            video_id: "abc123".to_string(),
            title: "Demo".to_string(),
            description: Some("Remote description".to_string()),
            keywords: Some("demo, rust".to_string()),
            is_private: true,
            youtube_url: Some("https://www.youtube.com/watch?v=abc123".to_string()),
            swf_url: Some("https://www.youtube.com/v/abc123".to_string()),
            thumbnails: vec!["t1.jpg".to_string(), "t2.jpg".to_string()],
        },
        true,
    );

    let entry = client(&remote).fetch_entry("abc123").unwrap();

    assert_eq!(entry, remote.catalog.get("abc123").unwrap());
}

#[test]
fn unknown_video_is_not_found() {
    let remote = start_mock_remote();
    assert_eq!(
        client(&remote).fetch_entry("nope"),
        Err(RemoteError::NotFound("nope".to_string()))
    );
}

#[test]
fn bad_credentials_fail_authentication() {
    let remote = start_mock_remote();
    let result = client(&remote).authenticate(&Credentials::new(
        "me@example.com",
        "wrong",
        "client-1",
    ));
    assert!(matches!(result, Err(RemoteError::Auth(message)) if message.starts_with("invalid_grant")));
}

#[test]
fn update_rewrites_remote_snippet() {
    let remote = start_mock_remote();
    let api = client(&remote);
    let token = api.authenticate(&credentials()).unwrap();

    api.update_remote(
        &token,
        "test-video-1",
        &VideoUpdate {
            title: "Renamed".to_string(),
            description: None,
            keywords: Some("one,two , ".to_string()),
        },
    )
    .unwrap();

    let entry = api.fetch_entry("test-video-1").unwrap();
    assert_eq!(entry.title, "Renamed");
    assert_eq!(entry.description, None);
    assert_eq!(entry.keywords.as_deref(), Some("one, two"));
    assert_eq!(entry.thumbnails.len(), 3);
}

#[test]
fn mutating_calls_reject_unknown_tokens() {
    let remote = start_mock_remote();
    let api = client(&remote);
    let forged = AuthToken::bearer("ya29.forged");

    let update = VideoUpdate {
        title: "Nope".to_string(),
        description: None,
        keywords: None,
    };
    assert!(matches!(
        api.update_remote(&forged, "test-video-1", &update),
        Err(RemoteError::Auth(_))
    ));
    assert!(matches!(
        api.delete_remote(&forged, "test-video-1"),
        Err(RemoteError::Auth(_))
    ));
    assert_eq!(api.fetch_entry("test-video-1").unwrap().title, "Mock Video");
}

#[test]
fn delete_reports_refusal_as_false() {
    let remote = start_mock_remote();
    let api = client(&remote);
    let token = api.authenticate(&credentials()).unwrap();

    assert_eq!(api.delete_remote(&token, "locked-video-1"), Ok(false));
    assert!(remote.catalog.get("locked-video-1").is_some());

    assert_eq!(api.delete_remote(&token, "test-video-1"), Ok(true));
    assert!(remote.catalog.get("test-video-1").is_none());

    assert_eq!(
        api.delete_remote(&token, "test-video-1"),
        Err(RemoteError::NotFound("test-video-1".to_string()))
    );
}

#[test]
fn unreachable_host_is_a_transport_error() {
    let api = HttpVideoApi::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    assert!(matches!(
        api.fetch_entry("abc123"),
        Err(RemoteError::Transport(_))
    ));
}
