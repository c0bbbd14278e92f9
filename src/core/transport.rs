use crate::domain::ports::{ApiRequest, ConfigProvider, HttpMethod, Transport, TransportOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::{Client, Method};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// reqwest-backed transport rooted at one base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> TransportOutcome {
        let url = self.url_for(&request.path);
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self.client.request(to_method(request.method), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                return TransportOutcome::RequestFailed {
                    url,
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                return TransportOutcome::NoResponse {
                    url,
                    reason: e.to_string(),
                }
            }
        };

        let status = response.status();
        tracing::debug!("{} {} -> {}", request.method, url, status);
        let status_text = reason_phrase(&response);

        // A body cut short means the answer never fully arrived.
        match response.bytes().await {
            Ok(bytes) => TransportOutcome::Response {
                url,
                status: status.as_u16(),
                status_text,
                body: bytes.to_vec(),
            },
            Err(e) => {
                tracing::warn!("Could not read response body from {}: {}", url, e);
                TransportOutcome::NoResponse {
                    url,
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// The phrase the server sent on its status line. hyper only records it when it
/// differs from the canonical one.
fn reason_phrase(response: &reqwest::Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining_ignores_duplicate_slashes() {
        let transport = HttpTransport::new("http://localhost:3000/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:3000/api");
        assert_eq!(transport.url_for("/clubs/3"), "http://localhost:3000/api/clubs/3");
        assert_eq!(transport.url_for("socios/4"), "http://localhost:3000/api/socios/4");
    }

    #[tokio::test]
    async fn test_unparseable_base_url_is_a_request_failure() {
        let transport = HttpTransport::new("not a url", DEFAULT_TIMEOUT).unwrap();
        let outcome = transport
            .send(&ApiRequest::new(HttpMethod::Get, "/clubs"))
            .await;
        assert!(matches!(outcome, TransportOutcome::RequestFailed { .. }));
    }
}
