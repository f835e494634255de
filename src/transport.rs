use async_trait::async_trait;
use reqwest::Client;

#[cfg(test)]
use mockall::automock;

use crate::config::RelayConfig;
use crate::error::{FeedbackError, Result};
use crate::models::{MessagesRequest, MessagesResponse};

/// Outbound seam for the relay call. One invocation is one HTTP request;
/// implementations never retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: &MessagesRequest) -> Result<MessagesResponse>;
}

pub struct MessagesTransport {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    api_version: String,
}

impl MessagesTransport {
    pub fn new(cfg: &RelayConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
            api_version: cfg.api_version.clone(),
        })
    }
}

#[async_trait]
impl Transport for MessagesTransport {
    async fn send(&self, req: &MessagesRequest) -> Result<MessagesResponse> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json");

        if let Some(key) = &self.api_key {
            builder = builder
                .header("x-api-key", key)
                .header("anthropic-version", &self.api_version);
        }

        let response = builder.json(req).send().await.map_err(|e| {
            FeedbackError::Transport(format!("Failed to send request to messages endpoint: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Messages endpoint returned non-success status");
        }

        // The status is not inspected further: error bodies are JSON without
        // content blocks and resolve to the "no text" reply downstream.
        let body = response.text().await.map_err(|e| {
            FeedbackError::Transport(format!("Failed to read messages endpoint response: {e}"))
        })?;

        let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            FeedbackError::Transport(format!("Failed to parse messages endpoint response: {e}"))
        })?;

        if let Some(err) = &parsed.error {
            tracing::warn!(
                error_type = err.error_type.as_deref().unwrap_or("unknown"),
                "Messages endpoint reported an error"
            );
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatMessage;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and hand back the raw request text
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept connection");
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.expect("read request");
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            String::from_utf8_lossy(&raw).to_string()
        });

        (format!("http://{addr}/v1/messages"), handle)
    }

    fn request() -> MessagesRequest {
        MessagesRequest {
            model: "test-model".to_string(),
            max_tokens: 50,
            system: "be brief".to_string(),
            messages: vec![ChatMessage::user("hello")],
        }
    }

    fn relay_config(endpoint: String, api_key: Option<&str>) -> RelayConfig {
        RelayConfig {
            endpoint,
            model: "test-model".to_string(),
            max_tokens: 50,
            api_key: api_key.map(str::to_string),
            api_version: "2023-06-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_posts_json_and_reads_first_block() {
        let (endpoint, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"content":[{"type":"text","text":"✅ Strengths: clear"}]}"#,
        )
        .await;
        let transport =
            MessagesTransport::new(&relay_config(endpoint, None)).expect("build transport");

        let resp = transport.send(&request()).await.expect("request succeeds");
        assert_eq!(resp.first_text(), Some("✅ Strengths: clear"));

        let raw = server.await.expect("server task");
        assert!(raw.starts_with("POST /v1/messages"));
        assert!(raw.contains(r#""model":"test-model""#));
        assert!(raw.contains(r#""system":"be brief""#));
        assert!(!raw.to_lowercase().contains("x-api-key"));
    }

    #[tokio::test]
    async fn test_attaches_credentials_when_configured() {
        let (endpoint, server) =
            serve_once("HTTP/1.1 200 OK", r#"{"content":[{"type":"text","text":"ok"}]}"#).await;
        let transport = MessagesTransport::new(&relay_config(endpoint, Some("sk-test")))
            .expect("build transport");

        transport.send(&request()).await.expect("request succeeds");

        let raw = server.await.expect("server task").to_lowercase();
        assert!(raw.contains("x-api-key: sk-test"));
        assert!(raw.contains("anthropic-version: 2023-06-01"));
    }

    #[tokio::test]
    async fn test_error_status_with_json_body_is_not_a_transport_error() {
        let (endpoint, _server) = serve_once(
            "HTTP/1.1 401 Unauthorized",
            r#"{"type":"error","error":{"type":"authentication_error","message":"missing key"}}"#,
        )
        .await;
        let transport =
            MessagesTransport::new(&relay_config(endpoint, None)).expect("build transport");

        let resp = transport.send(&request()).await.expect("json body parses");
        assert!(resp.first_text().is_none());
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_transport_error() {
        let (endpoint, _server) = serve_once("HTTP/1.1 502 Bad Gateway", "upstream down").await;
        let transport =
            MessagesTransport::new(&relay_config(endpoint, None)).expect("build transport");

        let err = transport.send(&request()).await.expect_err("body is not json");
        assert!(matches!(err, FeedbackError::Transport(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        drop(listener);

        let transport = MessagesTransport::new(&relay_config(
            format!("http://{addr}/v1/messages"),
            None,
        ))
        .expect("build transport");

        let err = transport.send(&request()).await.expect_err("nothing is listening");
        assert!(matches!(err, FeedbackError::Transport(_)));
    }
}
