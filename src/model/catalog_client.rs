//! iTunes catalog search client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::media::SearchResponse;
use crate::error::NetworkError;
use crate::{log_api_request, log_api_result};

/// Parameters of one catalog search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub term: String,
    pub country: String,
    pub media: String,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>, country: impl Into<String>, media: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            country: country.into(),
            media: media.into(),
        }
    }

    fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("term", self.term.as_str()),
            ("country", self.country.as_str()),
            ("media", self.media.as_str()),
        ]
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, NetworkError>;
}

/// HTTP client for the public iTunes search API.
///
/// Each search makes up to `max_attempts` attempts back to back. Only
/// failures that may be transient are retried.
#[derive(Clone)]
pub struct ItunesClient {
    http: Client,
    base_url: String,
    max_attempts: u32,
}

impl ItunesClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, max_attempts: u32) -> Result<Self, NetworkError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("mitunes/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        Ok(Self::with_client(http, base_url, max_attempts))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_attempts: max_attempts.max(1),
        }
    }

    fn search_url(&self) -> Result<reqwest::Url, NetworkError> {
        let raw = format!("{}/search", self.base_url);
        reqwest::Url::parse(&raw).map_err(|_| NetworkError::InvalidUrl(raw))
    }

    async fn attempt(&self, url: reqwest::Url, request: &SearchRequest) -> Result<SearchResponse, NetworkError> {
        let response = self
            .http
            .get(url)
            .query(&request.query_pairs())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(classify)?;
        serde_json::from_slice(&body).map_err(|e| NetworkError::Decode(e.to_string()))
    }
}

fn classify(error: reqwest::Error) -> NetworkError {
    if error.is_timeout() {
        NetworkError::Timeout
    } else if error.is_connect() {
        NetworkError::Transport(format!("Connection failed: {}", error))
    } else {
        NetworkError::Transport(error.to_string())
    }
}

#[async_trait]
impl CatalogClient for ItunesClient {
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, NetworkError> {
        let url = self.search_url()?;
        log_api_request!("search", term = %request.term, country = %request.country, media = %request.media);

        let mut attempt = 0;
        let result = loop {
            attempt += 1;
            match self.attempt(url.clone(), &request).await {
                Ok(response) => break Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    tracing::warn!(error = %e, attempt, max_attempts = self.max_attempts, "Catalog search failed, retrying");
                }
                Err(e) if e.is_retryable() => {
                    break Err(NetworkError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => break Err(e),
            }
        };

        log_api_result!("search", result);
        if let Ok(response) = &result {
            tracing::debug!(term = %request.term, result_count = response.result_count, "Catalog search returned");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve canned HTTP responses, one per connection, and count requests.
    /// The join handle yields the head of every request received.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let handle = tokio::spawn(async move {
            let mut heads = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap();
                let head = String::from_utf8_lossy(&buf[..n]).to_string();
                heads.push(head);
                counter.fetch_add(1, Ordering::SeqCst);

                let reply = format!(
                    "HTTP/1.1 {} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            heads
        });

        (format!("http://{}", addr), hits, handle)
    }

    const ONE_RESULT: &str = r#"{"resultCount":1,"results":[{"wrapperType":"track","kind":"feature-movie","trackId":1437031362,"artistName":"J.J. Abrams","trackName":"Star Wars"}]}"#;

    fn request() -> SearchRequest {
        SearchRequest::new("star wars", "au", "movie")
    }

    #[tokio::test]
    async fn decodes_successful_search() {
        let (base, hits, server) = serve(vec![(200, ONE_RESULT)]).await;
        let client = ItunesClient::new(base, Duration::from_secs(5), 3).unwrap();

        let response = client.search(request()).await.unwrap();
        assert_eq!(response.result_count, 1);
        assert_eq!(response.results[0].track_id, 1437031362);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let heads = server.await.unwrap();
        assert!(heads[0].starts_with("GET /search?term=star+wars&country=au&media=movie"));
    }

    #[tokio::test]
    async fn search_sends_accept_but_no_content_type() {
        let (base, _hits, server) = serve(vec![(200, ONE_RESULT)]).await;
        let client = ItunesClient::new(base, Duration::from_secs(5), 3).unwrap();
        client.search(request()).await.unwrap();

        let head = server.await.unwrap().remove(0).to_ascii_lowercase();
        assert!(head.contains("accept: application/json"));
        assert!(!head.contains("content-type"));
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let (base, hits, _server) = serve(vec![(503, "{}"), (500, "{}"), (200, ONE_RESULT)]).await;
        let client = ItunesClient::new(base, Duration::from_secs(5), 3).unwrap();

        assert!(client.search(request()).await.is_ok());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let (base, hits, _server) = serve(vec![(503, "{}"), (503, "{}"), (503, "{}")]).await;
        let client = ItunesClient::new(base, Duration::from_secs(5), 3).unwrap();

        let err = client.search(request()).await.unwrap_err();
        assert!(matches!(err, NetworkError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (base, hits, _server) = serve(vec![(400, "{}")]).await;
        let client = ItunesClient::new(base, Duration::from_secs(5), 3).unwrap();

        let err = client.search(request()).await.unwrap_err();
        assert!(matches!(err, NetworkError::Status { status: 400 }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (base, _hits, _server) = serve(vec![(200, "not json")]).await;
        let client = ItunesClient::new(base, Duration::from_secs(5), 3).unwrap();

        let err = client.search(request()).await.unwrap_err();
        assert!(matches!(err, NetworkError::Decode(_)));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let client = ItunesClient::with_client(Client::new(), "not a url", 3);
        assert!(matches!(client.search_url(), Err(NetworkError::InvalidUrl(_))));
    }
}
