// src/crawl/fetch.rs
// =============================================================================
// The HTTP fetch primitive used by the crawl engine.
//
// A fetch either yields the page body or a FetchError. Anything other than
// a 2xx response counts as a failure; the crawler reports it against the
// URL and moves on.
//
// Error categories follow what reqwest can tell us about a failure:
// - Timeout: the request ran past the client's time budget
// - Status: the server answered with a non-success code
// - Connect: we never got a connection (DNS, refused, unreachable)
// - Other: anything else (TLS, body decoding, redirect loops, ...)
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Per-request time budget used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("subhound/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(categorize_error)
    }
}

fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else if let Some(status) = error.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Other(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url_for(server: &MockServer, route: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><a href=\"/next\">n</a></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let fetcher = ReqwestFetcher::new(DEFAULT_TIMEOUT).unwrap();
        let body = fetcher.fetch(&url_for(&server, "/index")).await.unwrap();
        assert!(body.contains("href=\"/next\""));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = ReqwestFetcher::new(DEFAULT_TIMEOUT).unwrap();
        let err = fetcher.fetch(&url_for(&server, "/missing")).await.unwrap_err();
        assert_eq!(err, FetchError::Status(404));
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = ReqwestFetcher::new(Duration::from_millis(200)).unwrap();
        let err = fetcher.fetch(&url_for(&server, "/slow")).await.unwrap_err();
        assert_eq!(err, FetchError::Timeout);
    }

    #[tokio::test]
    async fn test_refused_connection_is_connect_error() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = ReqwestFetcher::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Connect(_)), "got {:?}", err);
    }
}
