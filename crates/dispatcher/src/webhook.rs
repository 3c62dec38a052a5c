//! Webhook transport - JSON POST with status checking

use std::time::Duration;

use contracts::ContractError;
use reqwest::Client;
use tracing::{debug, instrument};

/// Posts JSON payloads to a single webhook URL
///
/// The URL embeds a secret token, so it is never logged and is stripped
/// from transport errors.
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    /// Create a client with a request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// POST `payload`; any non-2xx status is an error
    ///
    /// Success means the webhook accepted the request, nothing more.
    #[instrument(name = "webhook_post", skip(self, payload), fields(destination = %destination))]
    pub async fn post_json(
        &self,
        destination: &str,
        payload: &serde_json::Value,
    ) -> Result<(), ContractError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ContractError::transport(destination, e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContractError::WebhookStatus {
                destination: destination.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Webhook accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_webhook_is_transport_error() {
        let client = WebhookClient::new(
            "http://127.0.0.1:9/api/webhooks/secret-token",
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client
            .post_json("discord", &serde_json::json!({ "content": "hi" }))
            .await
            .unwrap_err();

        assert!(matches!(err, ContractError::Transport { .. }));
        assert!(!err.to_string().contains("secret-token"));
    }

    /// Serve one request on an ephemeral port, answering `500` with `body`
    async fn serve_500_once(body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                request.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&request).to_ascii_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if n == 0 || request.len() >= end + 4 + length {
                        break;
                    }
                } else if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 500 Internal Server Error\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_non_success_status_is_webhook_status_error() {
        let base = serve_500_once("rate limited").await;
        let client =
            WebhookClient::new(format!("{base}/api/webhooks/secret-token"), Duration::from_secs(5))
                .unwrap();

        let err = client
            .post_json("slack", &serde_json::json!({ "text": "hi" }))
            .await
            .unwrap_err();

        match err {
            ContractError::WebhookStatus {
                destination,
                status,
                body,
            } => {
                assert_eq!(destination, "slack");
                assert_eq!(status, 500);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected WebhookStatus, got {other:?}"),
        }
    }
}
