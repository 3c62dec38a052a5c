//! Lever postings API client

use std::time::Duration;

use contracts::{ContractError, Posting, PostingSource, WatchConfig};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Upstream posting as returned by `GET /v0/postings/{org}`
///
/// Only the consumed fields are modelled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverPosting {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub categories: LeverCategories,
    #[serde(default)]
    pub description_plain: Option<String>,
    pub apply_url: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeverCategories {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub commitment: Option<String>,
}

impl From<LeverPosting> for Posting {
    fn from(raw: LeverPosting) -> Self {
        Self {
            apply_url: trim_apply_suffix(&raw.apply_url).to_string(),
            id: raw.id,
            title: raw.text,
            team: raw.categories.team,
            location: raw
                .categories
                .location
                .unwrap_or_else(|| "Unknown".to_string()),
            commitment: raw.categories.commitment,
            description: raw.description_plain.unwrap_or_default(),
            created_at: raw.created_at,
        }
    }
}

/// Strip one trailing `/apply` path segment so the link lands on the posting page
pub fn trim_apply_suffix(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    trimmed.strip_suffix("/apply").unwrap_or(trimmed)
}

/// HTTP client for one organization's postings
pub struct LeverClient {
    client: Client,
    base_url: String,
    organization: String,
    query: Option<String>,
}

impl LeverClient {
    /// Create a client
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        organization: impl Into<String>,
        query: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ContractError> {
        let organization = organization.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContractError::fetch(&organization, format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            organization,
            query: query.filter(|q| !q.is_empty()),
        })
    }

    /// Create from watch configuration
    pub fn from_config(config: &WatchConfig) -> Result<Self, ContractError> {
        Self::new(
            config.api_base_url.clone(),
            config.organization.clone(),
            config.query.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Full request URL
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        match &self.query {
            Some(query) => format!(
                "{base}/{}?{}",
                self.organization,
                query.trim_start_matches('?')
            ),
            None => format!("{base}/{}", self.organization),
        }
    }
}

impl PostingSource for LeverClient {
    fn organization_id(&self) -> &str {
        &self.organization
    }

    #[instrument(
        name = "lever_fetch",
        skip(self),
        fields(organization = %self.organization)
    )]
    async fn fetch(&self) -> Result<Vec<Posting>, ContractError> {
        let url = self.url();
        debug!(url = %url, "Fetching postings");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ContractError::fetch(&self.organization, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContractError::UpstreamStatus {
                organization: self.organization.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let raw: Vec<LeverPosting> = response
            .json()
            .await
            .map_err(|e| ContractError::fetch(&self.organization, format!("decode: {e}")))?;

        info!(count = raw.len(), "Fetched postings");
        Ok(raw.into_iter().map(Posting::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": "5a1b",
            "text": "Senior Rust Engineer",
            "categories": { "team": "Platform", "location": "Tokyo", "commitment": "Full-time" },
            "descriptionPlain": "Build things.",
            "applyUrl": "https://jobs.lever.co/acme/5a1b/apply",
            "hostedUrl": "https://jobs.lever.co/acme/5a1b",
            "createdAt": 1700000000000
        },
        {
            "id": "6c2d",
            "text": "Recruiter",
            "categories": {},
            "applyUrl": "https://jobs.lever.co/acme/6c2d/apply",
            "createdAt": 1700000001000
        }
    ]"#;

    #[test]
    fn test_decode_and_map() {
        let raw: Vec<LeverPosting> = serde_json::from_str(SAMPLE).unwrap();
        let postings: Vec<Posting> = raw.into_iter().map(Posting::from).collect();

        assert_eq!(postings[0].title, "Senior Rust Engineer");
        assert_eq!(postings[0].team.as_deref(), Some("Platform"));
        assert_eq!(postings[0].apply_url, "https://jobs.lever.co/acme/5a1b");
        assert_eq!(postings[0].description, "Build things.");

        assert_eq!(postings[1].location, "Unknown");
        assert!(postings[1].team.is_none());
        assert_eq!(postings[1].description, "");
    }

    #[test]
    fn test_trim_apply_suffix_is_path_aware() {
        assert_eq!(
            trim_apply_suffix("https://jobs.lever.co/acme/abc/apply"),
            "https://jobs.lever.co/acme/abc"
        );
        assert_eq!(
            trim_apply_suffix("https://jobs.lever.co/acme/abc/apply/"),
            "https://jobs.lever.co/acme/abc"
        );
        // Character-set trimming would eat the trailing "pay" here
        assert_eq!(
            trim_apply_suffix("https://jobs.lever.co/acme/paypal"),
            "https://jobs.lever.co/acme/paypal"
        );
    }

    #[test]
    fn test_url_with_query() {
        let client = LeverClient::new(
            "https://api.lever.co/v0/postings/",
            "acme",
            Some("location=Tokyo&commitment=Full-time".into()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.url(),
            "https://api.lever.co/v0/postings/acme?location=Tokyo&commitment=Full-time"
        );
    }

    #[test]
    fn test_url_without_query() {
        let mut config = WatchConfig::for_organization("acme");
        config.query = Some(String::new());
        let client = LeverClient::from_config(&config).unwrap();
        assert_eq!(client.url(), "https://api.lever.co/v0/postings/acme");
        assert_eq!(client.organization_id(), "acme");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_fetch_error() {
        let client = LeverClient::new(
            "http://127.0.0.1:9",
            "acme",
            None,
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, ContractError::Fetch { .. }));
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
    async fn test_server_error_is_upstream_status() {
        let base = serve_500_once("boom").await;
        let client = LeverClient::new(&base, "acme", None, Duration::from_secs(5)).unwrap();

        let err = client.fetch().await.unwrap_err();

        match err {
            ContractError::UpstreamStatus {
                organization,
                status,
                body,
            } => {
                assert_eq!(organization, "acme");
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected UpstreamStatus, got {other:?}"),
        }
    }
}
