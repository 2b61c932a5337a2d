//! FR24 feeder client: fetches `flights.json` and parses it into a snapshot.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use skymatrix_core::feed::parse_flights;
use skymatrix_core::snapshot::Snapshot;
use skymatrix_core::SkyError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Feed(#[from] SkyError),
}

/// Build the `flights.json` URL for a feeder given as `host:port` or a base URL.
pub fn flights_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}/flights.json")
    } else {
        format!("http://{host}/flights.json")
    }
}

/// Fetches aircraft snapshots from one feeder.
#[derive(Clone)]
pub struct FeederClient {
    url: String,
    client: reqwest::Client,
}

impl FeederClient {
    pub fn new(host: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(FeederClient {
            url: flights_url(host),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET `flights.json` and parse it.
    pub async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(url = %self.url, bytes = body.len(), "fetched flights");
        Ok(parse_flights(&body)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on an ephemeral port.
    pub(crate) async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        addr.to_string()
    }

    #[test]
    fn test_flights_url() {
        assert_eq!(flights_url("localhost:8754"), "http://localhost:8754/flights.json");
        assert_eq!(
            flights_url("http://pi.local:8754/"),
            "http://pi.local:8754/flights.json"
        );
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let host = serve_once(
            "200 OK",
            r#"{"x4a914f": ["4A914F", 59.2893, 18.1239, 305, 2275, 179, "5322", 0, "", "", 1415781759, "", "", "", 0, -640, "SCW10"]}"#,
        )
        .await;

        let client = FeederClient::new(&host).unwrap();
        let snapshot = client.fetch().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot.get("x4a914f").unwrap().callsign.as_deref(),
            Some("SCW10")
        );
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let host = serve_once("503 Service Unavailable", "{}").await;
        let client = FeederClient::new(&host).unwrap();
        assert!(matches!(client.fetch().await, Err(FetchError::Http(_))));
    }

    #[tokio::test]
    async fn test_fetch_bad_body() {
        let host = serve_once("200 OK", "[]").await;
        let client = FeederClient::new(&host).unwrap();
        assert!(matches!(client.fetch().await, Err(FetchError::Feed(_))));
    }
}
