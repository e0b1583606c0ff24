//! JSON HTTP client used by the HTTP fetch strategy.
//!
//! The client pre-configures a request timeout plus JSON `content-type` and
//! `accept` headers, and builds one request per [`HttpItem`]: the declared
//! method (GET by default, POST when only a body is declared), the declared
//! headers, and the JSON body when present.

use std::time::Duration;

use remote_json_envs_types::HttpItem;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use tracing::debug;

use crate::StoreError;

/// Client-side timeout applied to every HTTP request.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_millis(7000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin wrapper around a configured `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct JsonHttpClient {
    http: Client,
    user_agent: String,
}

impl JsonHttpClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self, StoreError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout)
            .build()
            .map_err(StoreError::ClientBuild)?;

        Ok(Self {
            http,
            user_agent: format!("remote-json-envs/{}; {}", env!("CARGO_PKG_VERSION"), std::env::consts::OS),
        })
    }

    /// Send the request described by `item` and read the full response body.
    ///
    /// Only transport-level failures are errors; any HTTP status is returned
    /// to the caller as an [`HttpResponse`].
    pub async fn send(&self, item: &HttpItem) -> Result<HttpResponse, StoreError> {
        let url = validate_url(&item.url)?;
        let method_name = item.effective_method();
        let method = Method::from_bytes(method_name.as_bytes()).map_err(|_| StoreError::InvalidMethod(method_name.clone()))?;
        let headers = build_headers(item)?;

        debug!(%url, %method, header_count = headers.len(), "sending request");
        let mut builder = self
            .http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
            .headers(headers);
        if let Some(body) = &item.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|source| StoreError::Transport {
            url: item.url.clone(),
            source,
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|source| StoreError::Transport {
            url: item.url.clone(),
            source,
        })?;

        Ok(HttpResponse { status, body })
    }
}

fn build_headers(item: &HttpItem) -> Result<HeaderMap, StoreError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &item.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| StoreError::InvalidHeader {
            name: name.clone(),
            reason: error.to_string(),
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|error| StoreError::InvalidHeader {
            name: name.clone(),
            reason: error.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Accept only absolute `http`/`https` URLs with a host.
pub fn validate_url(raw: &str) -> Result<Url, StoreError> {
    let url = Url::parse(raw).map_err(|error| StoreError::invalid_url(raw, error.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(StoreError::invalid_url(raw, format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(StoreError::invalid_url(raw, "missing host"));
    }
    Ok(url)
}
