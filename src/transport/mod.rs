//! Transport abstraction
//!
//! Defines the `Transport` trait and the request/response types that flow
//! through it:
//! - HttpTransport: reqwest-backed transport against a live server (default)
//! - MockTransport: scripted replies for unit tests
//!
//! A transport performs exactly one round trip per call. Any HTTP status,
//! including 4xx and 5xx, is a normal response; only failures below HTTP
//! (refused connection, DNS, timeout, broken body stream) are errors.

use std::fmt::{self, Display};

use async_trait::async_trait;
use serde_json::Value;

#[cfg(feature = "http-backend")]
pub mod http;

#[cfg(test)]
pub mod mock;

/// Error type for transport operations
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to connect to {url}: {message}")]
    Connect { url: String, message: String },
    #[error("Request to {url} timed out after {timeout_secs} seconds")]
    Timeout { url: String, timeout_secs: u64 },
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },
}

/// HTTP methods used against the Book Library service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{label}")
    }
}

#[cfg(feature = "http-backend")]
impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Full description of one HTTP call
///
/// Built fresh for every call; nothing here outlives the round trip.
///
/// # Example
///
/// ```rust
/// use book_library_suite::transport::{HttpMethod, RequestDescriptor};
/// use serde_json::json;
///
/// let request = RequestDescriptor::post("/books")
///     .with_json(json!({ "title": "Dune" }))
///     .with_bearer(Some("token123"));
///
/// assert_eq!(request.method, HttpMethod::Post);
/// assert_eq!(request.bearer_token.as_deref(), Some("token123"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    /// Path relative to the configured base URL, starting with `/`
    pub path: String,
    pub body: Option<Value>,
    pub bearer_token: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// Create a descriptor with no body, token or extra headers
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer_token: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Attach a JSON body
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a bearer token; `None` leaves the request unauthenticated
    pub fn with_bearer(mut self, token: Option<&str>) -> Self {
        self.bearer_token = token.map(str::to_string);
        self
    }

    /// Add an extra header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Short label used in logs and failure reports, e.g. `PUT /books/7`
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Raw response as it came off the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded lossily as UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Trait for transports
///
/// Implementations must be independent per call: no retries, no caching and
/// no session state beyond what the descriptor carries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP round trip
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError>;

    /// Base URL requests are resolved against
    fn base_url(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_descriptor_builders() {
        let request = RequestDescriptor::put("/books/7")
            .with_json(json!({ "available": false }))
            .with_bearer(Some("abc"))
            .with_header("X-Request-Id", "42");

        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.label(), "PUT /books/7");
        assert_eq!(request.body, Some(json!({ "available": false })));
        assert_eq!(request.bearer_token.as_deref(), Some("abc"));
        assert_eq!(
            request.headers,
            vec![("X-Request-Id".to_string(), "42".to_string())]
        );
    }

    #[test]
    fn test_descriptor_without_token() {
        let request = RequestDescriptor::delete("/books/1").with_bearer(None);
        assert!(request.bearer_token.is_none());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(201, "").is_success());
        assert!(RawResponse::new(299, "").is_success());
        assert!(!RawResponse::new(199, "").is_success());
        assert!(!RawResponse::new(302, "").is_success());
        assert!(!RawResponse::new(404, "").is_success());
        assert_eq!(RawResponse::new(500, "oops").text(), "oops");
    }
}
