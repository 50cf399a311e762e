//! Response normalization
//!
//! Turns a `RawResponse` into a `ResponseEnvelope`. Bodies that are not JSON
//! (empty, an HTML error page, a truncated stream) become `None` instead of an
//! error so callers can assert on "no usable body" directly.

use serde_json::Value;

use crate::transport::RawResponse;

/// Status code, success flag and parsed body of one response
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: u16,
    /// Derived from the status code (2xx)
    pub ok: bool,
    pub body: Option<Value>,
}

impl ResponseEnvelope {
    pub fn from_raw(raw: &RawResponse) -> Self {
        Self {
            status: raw.status,
            ok: raw.is_success(),
            body: parse_body(&raw.body),
        }
    }

    /// Body as a JSON object, if it is one
    pub fn object(&self) -> Option<&serde_json::Map<String, Value>> {
        self.body.as_ref().and_then(Value::as_object)
    }
}

/// Parse a raw body as JSON
///
/// Never fails: anything that is not a JSON document yields `None`. A literal
/// `null` document is treated the same as no body.
pub fn parse_body(raw: &[u8]) -> Option<Value> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Null) | Err(_) => None,
        Ok(value) => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object() {
        let body = parse_body(br#"{"success":true,"data":{"id":1}}"#);
        assert_eq!(body, Some(json!({ "success": true, "data": { "id": 1 } })));
    }

    #[test]
    fn test_parse_array_and_scalars() {
        assert_eq!(parse_body(b"[1,2]"), Some(json!([1, 2])));
        assert_eq!(parse_body(b"\"text\""), Some(json!("text")));
        assert_eq!(parse_body(b"42"), Some(json!(42)));
    }

    #[test]
    fn test_unusable_bodies_yield_none() {
        assert_eq!(parse_body(b""), None);
        assert_eq!(parse_body(b"   \n\t"), None);
        assert_eq!(parse_body(b"null"), None);
        assert_eq!(parse_body(b"<!DOCTYPE html><html><body>Cannot PATCH</body></html>"), None);
        assert_eq!(parse_body(br#"{"success":tr"#), None);
        assert_eq!(parse_body(&[0xff, 0xfe, 0x00]), None);
    }

    #[test]
    fn test_envelope_from_raw() {
        let envelope = ResponseEnvelope::from_raw(&RawResponse::new(404, r#"{"error":"Not Found"}"#));
        assert_eq!(envelope.status, 404);
        assert!(!envelope.ok);
        assert_eq!(
            envelope.object().and_then(|o| o.get("error")),
            Some(&json!("Not Found"))
        );

        let envelope = ResponseEnvelope::from_raw(&RawResponse::new(204, ""));
        assert!(envelope.ok);
        assert!(envelope.body.is_none());
        assert!(envelope.object().is_none());
    }
}
