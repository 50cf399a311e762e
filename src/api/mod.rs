//! Domain operations
//!
//! Each operation is a fixed composition: build a `RequestDescriptor`, send
//! it through a `Transport`, normalize the response and return an
//! [`ApiOutcome`]. No operation keeps state between calls; the bearer token
//! is always passed in explicitly.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::contract::Contract;
use crate::normalize::ResponseEnvelope;
use crate::transport::{RawResponse, RequestDescriptor, Transport, TransportError};
use crate::validator::validate_as;

pub mod auth;
pub mod books;

pub use auth::{AuthApi, LoginOutcome};
pub use books::BooksApi;

/// Result of one domain operation
///
/// `entity` is best-effort: it is present only when the body carried a value
/// that satisfies the expected contract. Failure-path calls simply leave it
/// empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiOutcome<T> {
    pub status: u16,
    pub ok: bool,
    pub body: Option<Value>,
    pub entity: Option<T>,
}

impl<T> ApiOutcome<T> {
    fn new(envelope: ResponseEnvelope, entity: Option<T>) -> Self {
        Self {
            status: envelope.status,
            ok: envelope.ok,
            body: envelope.body,
            entity,
        }
    }

    /// String field at the top level of the body
    pub fn body_str(&self, field: &str) -> Option<&str> {
        self.body.as_ref()?.get(field)?.as_str()
    }

    /// The body's `message` field
    pub fn message(&self) -> Option<&str> {
        self.body_str("message")
    }

    /// The body's `error` field
    pub fn error(&self) -> Option<&str> {
        self.body_str("error")
    }

    /// Whether the body has a top-level `field` at all
    pub fn has_field(&self, field: &str) -> bool {
        self.body
            .as_ref()
            .and_then(Value::as_object)
            .is_some_and(|o| o.contains_key(field))
    }
}

/// Send `request` and normalize whatever comes back
pub(crate) async fn round_trip(
    transport: &dyn Transport,
    request: &RequestDescriptor,
) -> Result<ResponseEnvelope, TransportError> {
    let raw: RawResponse = transport.send(request).await?;
    Ok(ResponseEnvelope::from_raw(&raw))
}

/// Read `value` as `T` if it satisfies `contract`
pub(crate) fn extract<T: DeserializeOwned>(value: Option<&Value>, contract: &Contract) -> Option<T> {
    value.and_then(|v| validate_as(contract, v).ok())
}

/// Read the envelope's `data` field as `T` if it satisfies `contract`
pub(crate) fn extract_data<T: DeserializeOwned>(body: Option<&Value>, contract: &Contract) -> Option<T> {
    extract(body.and_then(|b| b.get("data")), contract)
}
