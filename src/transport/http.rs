//! HTTP transport
//!
//! Implements `Transport` over reqwest. Used for every run against a live
//! Book Library server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use tracing::debug;

use super::{RawResponse, RequestDescriptor, Transport, TransportError};
use crate::config::SuiteConfig;

/// Transport that talks HTTP to the configured base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., "http://localhost:3000")
    /// * `timeout_secs` - Per-request timeout applied to every call
    ///
    /// # Example
    ///
    /// ```rust
    /// use book_library_suite::transport::http::HttpTransport;
    ///
    /// let transport = HttpTransport::new("http://localhost:3000/", 10).unwrap();
    /// assert_eq!(transport.timeout_secs(), 10);
    /// ```
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, TransportError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TransportError::Request {
                url: base_url.clone(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url,
            timeout_secs,
            client,
        })
    }

    /// Create a transport from suite configuration
    pub fn from_config(config: &SuiteConfig) -> Result<Self, TransportError> {
        Self::new(config.base_url.clone(), config.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Build a request with authentication and extra headers
    fn build_request(&self, descriptor: &RequestDescriptor) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = self.url_for(&descriptor.path);
        let mut request = self.client.request(descriptor.method.into(), &url);

        for (key, value) in &descriptor.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| TransportError::InvalidHeader {
                name: key.clone(),
                message: e.to_string(),
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
                name: key.clone(),
                message: e.to_string(),
            })?;
            request = request.header(header_name, header_value);
        }

        if let Some(ref token) = descriptor.bearer_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(ref body) = descriptor.body {
            request = request.json(body);
        }

        Ok(request)
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else if err.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, descriptor: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        let url = self.url_for(&descriptor.path);
        let response = self
            .build_request(descriptor)?
            .send()
            .await
            .map_err(|e| self.classify(&url, e))?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| self.classify(&url, e))?;

        debug!(
            "{} -> {} ({} bytes)",
            descriptor.label(),
            status,
            bytes.len()
        );

        Ok(RawResponse {
            status,
            body: bytes.to_vec(),
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let transport = HttpTransport::new("http://localhost:3000///", 5).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:3000");
        assert_eq!(transport.url_for("/books"), "http://localhost:3000/books");
        assert_eq!(transport.url_for("books/1"), "http://localhost:3000/books/1");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpTransport::new("not a url", 5);
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let transport = HttpTransport::new("http://localhost:3000", 5).unwrap();
        let descriptor = RequestDescriptor::get("/books").with_header("bad header", "x");
        let result = transport.build_request(&descriptor);
        assert!(matches!(result, Err(TransportError::InvalidHeader { .. })));
    }

    #[test]
    fn test_from_config() {
        let config = SuiteConfig::new("http://127.0.0.1:8080/", "admin", "secret").with_timeout(12);
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:8080");
        assert_eq!(transport.timeout_secs(), 12);
    }
}
