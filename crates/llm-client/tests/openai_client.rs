//! Tests for the chat completion client against a local stub server.
//!
//! The stub answers exactly one request with a canned response and hands
//! back the raw request it received.

use std::time::Duration;

use llm_client::{ApiKey, GenerationError, LlmConfig, OpenAiChatClient, TextGenerator};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = find_header_end(&buf) {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serve one canned response, return the base URL and the captured request
async fn spawn_stub(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{}/v1", addr), handle)
}

fn client_for(api_base: &str, timeout: Duration) -> OpenAiChatClient {
    let config = LlmConfig::default()
        .with_api_base(api_base)
        .with_model("test-model")
        .with_timeout(timeout);
    OpenAiChatClient::new(ApiKey::parse("sk-test-key").unwrap(), config).unwrap()
}

#[tokio::test]
async fn test_generate_success() {
    let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"1. The Exorcist\n2. Alien"}}]}"#;
    let (api_base, server) = spawn_stub("200 OK", body).await;
    let client = client_for(&api_base, Duration::from_secs(5));

    let text = client.generate("You are a film expert", "horror").await.unwrap();
    assert_eq!(text, "1. The Exorcist\n2. Alien");

    let request = server.await.unwrap();
    let lowered = request.to_lowercase();
    assert!(request.starts_with("POST /v1/chat/completions"));
    assert!(lowered.contains("authorization: bearer sk-test-key"));
    assert!(request.contains(r#""model":"test-model""#));
    assert!(request.contains(r#"{"role":"system","content":"You are a film expert"}"#));
    assert!(request.contains(r#"{"role":"user","content":"horror"}"#));
}

#[tokio::test]
async fn test_generate_unauthorized() {
    let (api_base, server) =
        spawn_stub("401 Unauthorized", r#"{"error":{"message":"Incorrect API key"}}"#).await;
    let client = client_for(&api_base, Duration::from_secs(5));

    let err = client.generate("system", "comedy").await.unwrap_err();
    assert!(matches!(err, GenerationError::Authentication(_)));
    assert!(!err.is_recoverable());

    server.await.unwrap();
}

#[tokio::test]
async fn test_generate_provider_error() {
    let (api_base, server) = spawn_stub("503 Service Unavailable", "{}").await;
    let client = client_for(&api_base, Duration::from_secs(5));

    let err = client.generate("system", "comedy").await.unwrap_err();
    assert!(matches!(err, GenerationError::ServiceUnavailable(_)));
    assert!(err.is_recoverable());

    server.await.unwrap();
}

#[tokio::test]
async fn test_generate_empty_choices() {
    let (api_base, server) = spawn_stub("200 OK", r#"{"choices":[]}"#).await;
    let client = client_for(&api_base, Duration::from_secs(5));

    let err = client.generate("system", "drama").await.unwrap_err();
    assert_eq!(err, GenerationError::EmptyResponse);

    server.await.unwrap();
}

#[tokio::test]
async fn test_generate_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept and read, then never answer
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let _request = read_request(&mut socket).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let client = client_for(&format!("http://{}/v1", addr), Duration::from_millis(200));
    let err = client.generate("system", "romance").await.unwrap_err();

    assert_eq!(err, GenerationError::Timeout(Duration::from_millis(200)));
}

#[tokio::test]
async fn test_generate_connection_refused() {
    // Grab a free port, then close it again
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let client = client_for(&format!("http://{}/v1", addr), Duration::from_secs(5));
    let err = client.generate("system", "romance").await.unwrap_err();

    assert!(matches!(err, GenerationError::ServiceUnavailable(_)));
}
