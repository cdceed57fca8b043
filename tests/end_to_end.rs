//! End-to-end tests over a real socket
//!
//! Serves the gateway on an ephemeral port with the in-memory store and
//! talks to it through `ContentClient`.

use clap::Parser;
use jaat_gateway::auth::AuthSecret;
use jaat_gateway::client::{ClientError, ContentClient};
use jaat_gateway::config::Args;
use jaat_gateway::store::{MemoryContentStore, NewLog, NewPost, NewQuote, PostPatch};
use jaat_gateway::{serve, AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const SECRET: &str = "e2e-secret";

/// Start a server and return its base URL
async fn spawn_gateway(extra_args: &[&str]) -> String {
    let mut argv = vec!["jaat-gateway"];
    argv.extend_from_slice(extra_args);
    let args = Args::try_parse_from(argv).unwrap();

    let store = Arc::new(MemoryContentStore::new());
    let state = Arc::new(AppState::new(args, store, AuthSecret::new(SECRET).unwrap()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, state));

    format!("http://{}", addr)
}

fn new_post(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        description: "desc".to_string(),
        thumbnail: "/uploads/t.png".to_string(),
        content: "<p>hi</p>".to_string(),
    }
}

#[tokio::test]
async fn test_post_lifecycle_over_http() {
    let base = spawn_gateway(&[]).await;
    let client = ContentClient::new(&base).with_auth_key(SECRET);

    assert!(client.list_posts().await.unwrap().is_empty());

    let post = client.create_post(&new_post("First")).await.unwrap();
    assert_eq!(client.get_post(&post.id).await.unwrap(), post);

    // The create invalidated the cached empty listing
    let posts = client.list_posts().await.unwrap();
    assert_eq!(posts, vec![post.clone()]);

    let patch = PostPatch {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    let updated = client.update_post(&post.id, &patch).await.unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.content, post.content);
    assert_eq!(client.get_post(&post.id).await.unwrap().title, "Renamed");

    client.delete_post(&post.id).await.unwrap();
    let err = client.get_post(&post.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(client.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quotes_and_logs_over_http() {
    let base = spawn_gateway(&[]).await;
    let client = ContentClient::new(&base).with_auth_key(SECRET);

    let quote = client
        .create_quote(&NewQuote {
            content: "hello".to_string(),
            author: "A".to_string(),
        })
        .await
        .unwrap();
    let quotes = client.list_quotes().await.unwrap();
    assert_eq!(quotes.first(), Some(&quote));

    client.delete_quote(&quote.id).await.unwrap();
    assert!(client.list_quotes().await.unwrap().is_empty());

    // Logs need no credential
    let anonymous = ContentClient::new(&base);
    let log = anonymous
        .create_log(&NewLog {
            title: "t".to_string(),
            content: "c".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(anonymous.list_logs().await.unwrap(), vec![log]);
}

#[tokio::test]
async fn test_client_surfaces_api_errors() {
    let base = spawn_gateway(&[]).await;

    let anonymous = ContentClient::new(&base);
    let err = anonymous.create_post(&new_post("Nope")).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized: Invalid admin auth key.");
        }
        other => panic!("unexpected error: {other}"),
    }

    let client = ContentClient::new(&base).with_auth_key(SECRET);
    let err = client.create_post(&new_post("")).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let err = client.delete_post("999").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let base = spawn_gateway(&["--max-body-bytes", "64"]).await;
    let client = ContentClient::new(&base).with_auth_key(SECRET);

    let mut post = new_post("Big");
    post.content = "x".repeat(1024);
    let err = client.create_post(&post).await.unwrap_err();
    assert_eq!(err.status(), Some(413));
    assert!(client.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stalled_body_times_out() {
    let base = spawn_gateway(&["--request-timeout-ms", "200"]).await;
    let addr = base.trim_start_matches("http://");

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let head = format!(
        "POST /api/logs HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{{\"ti",
        addr
    );
    stream.write_all(head.as_bytes()).await.unwrap();

    // The rest of the body never arrives
    let mut buf = vec![0u8; 1024];
    let n = tokio::time::timeout(Duration::from_secs(3), stream.read(&mut buf))
        .await
        .expect("server should answer before the client gives up")
        .unwrap();
    let response = String::from_utf8_lossy(&buf[..n]);
    assert!(response.starts_with("HTTP/1.1 500"), "got: {response}");
    assert!(response.contains("Internal server error"));
}
