use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Deserialize};

use super::{Endpoint, FetchError};
use crate::data::{ColumnConfig, Stock, Ticker, TickerList};

/// Response body of `GET /health`
#[derive(Clone, Debug, Deserialize)]
pub struct HealthMessage {
    pub message: String,
}

/// HTTP client for the screener backend.
///
/// Cheap to clone; every clone shares the same connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tickermind/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            token: None,
            http,
        })
    }

    /// Attach a bearer token to every request
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, FetchError> {
        let started = Instant::now();
        let mut request = self.http.get(self.url(endpoint));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let into_error = |err: reqwest::Error| FetchError::from_reqwest(endpoint, self.timeout, &err);
        let response = request.send().await.map_err(into_error)?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%endpoint, status = status.as_u16(), "backend returned error status");
            return Err(FetchError::HttpStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(into_error)?;
        let value = serde_json::from_slice(&body).map_err(|err| FetchError::Parse {
            endpoint,
            message: err.to_string(),
        })?;
        tracing::trace!(
            %endpoint,
            bytes = body.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "fetched"
        );
        Ok(value)
    }

    pub async fn fetch_columns(&self) -> Result<Vec<ColumnConfig>, FetchError> {
        self.get_json(Endpoint::Columns).await
    }

    pub async fn fetch_stocks(&self) -> Result<Vec<Stock>, FetchError> {
        self.get_json(Endpoint::Stocks).await
    }

    pub async fn fetch_tickers(&self) -> Result<Vec<Ticker>, FetchError> {
        self.get_json::<TickerList>(Endpoint::Tickers)
            .await
            .map(|list| list.data)
    }

    pub async fn health(&self) -> Result<HealthMessage, FetchError> {
        self.get_json(Endpoint::Health).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::ApiClient;
    use crate::api::{Endpoint, FetchError};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve a single canned HTTP response, handing back the raw request.
    pub(crate) async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            _ = socket.shutdown().await;
            _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });
        (format!("http://{addr}"), rx)
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_millis(500)).expect("client")
    }

    #[tokio::test]
    async fn fetches_stocks() {
        let (base, _) = serve_once(
            "200 OK",
            r#"[{"symbol":"AAPL","name":"Apple Inc.","price":145.3,"changePercent":2.15,"volume":12500000}]"#,
        )
        .await;
        let stocks = client(&base).fetch_stocks().await.expect("stocks");
        assert_eq!(stocks.len(), 1);
        assert_eq!(stocks[0].symbol, "AAPL");
        assert_eq!(stocks[0].volume, Some(12_500_000));
    }

    #[tokio::test]
    async fn sends_bearer_token_to_path() {
        let (base, request) = serve_once("200 OK", r#"{"data":[]}"#).await;
        let tickers = client(&base)
            .with_token(Some("s3cret".to_string()))
            .fetch_tickers()
            .await
            .expect("tickers");
        assert!(tickers.is_empty());
        let request = request.await.expect("request captured");
        assert!(request.starts_with("GET /api?Cmd=Tickers.GetList HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer s3cret"));
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let (base, _) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
        let err = client(&base).fetch_columns().await.expect_err("http error");
        assert_eq!(
            err,
            FetchError::HttpStatus {
                endpoint: Endpoint::Columns,
                status: 500
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let (base, _) = serve_once("200 OK", r#"[{"symbol":"AAPL"}]"#).await;
        let err = client(&base).fetch_stocks().await.expect_err("parse error");
        assert!(matches!(err, FetchError::Parse { endpoint: Endpoint::Stocks, .. }));
        assert!(err.to_string().starts_with("Failed to read stocks"));
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        let err = client(&format!("http://{addr}"))
            .fetch_stocks()
            .await
            .expect_err("network error");
        assert!(matches!(err, FetchError::Network { endpoint: Endpoint::Stocks, .. }));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.expect("accept");
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        let client = ApiClient::new(&format!("http://{addr}/"), Duration::from_millis(100))
            .expect("client");
        let err = client.fetch_stocks().await.expect_err("timeout");
        assert_eq!(
            err,
            FetchError::Timeout {
                endpoint: Endpoint::Stocks,
                timeout: Duration::from_millis(100)
            }
        );
    }

    #[test]
    fn trims_trailing_slash() {
        let client = client("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url(Endpoint::Columns), "http://localhost:8000/api/columns");
    }
}
