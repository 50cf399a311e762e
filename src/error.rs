//! Error types for suite operations
//!
//! `SuiteError` is what a scenario ultimately fails with. Transport and
//! contract failures are kept as distinct variants so a report can tell a
//! refused connection apart from a server that answered with the wrong shape.

use thiserror::Error;

use crate::config::ConfigError;
use crate::contract::ContractError;
use crate::transport::TransportError;
use crate::validator::ContractFailure;

/// Errors that can occur while driving the Book Library service
#[derive(Error, Debug)]
pub enum SuiteError {
    /// Network-level failure; never produced for an HTTP error status
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response body present but shaped differently from its contract
    #[error("{0}")]
    Contract(ContractFailure),

    /// Token extraction was attempted on a body that is not a JSON object
    #[error("Cannot extract token from {context}: expected a JSON object body, got {found}")]
    TokenExtraction { context: String, found: String },

    /// Login did not yield a bearer token
    #[error("Authentication failed for user '{username}' (HTTP {status}): {message}")]
    Authentication {
        username: String,
        status: u16,
        message: String,
    },

    /// A scenario expectation did not hold
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Contract registry misuse (unknown or duplicate name)
    #[error(transparent)]
    Registry(#[from] ContractError),

    /// Request payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ContractFailure> for SuiteError {
    fn from(failure: ContractFailure) -> Self {
        SuiteError::Contract(failure)
    }
}

impl From<serde_json::Error> for SuiteError {
    fn from(err: serde_json::Error) -> Self {
        SuiteError::Serialization(err.to_string())
    }
}

impl SuiteError {
    /// Build an assertion failure from any displayable message
    pub fn assertion(message: impl Into<String>) -> Self {
        SuiteError::Assertion(message.into())
    }

    /// Whether the failure happened below HTTP (connection, timeout, DNS)
    pub fn is_transport(&self) -> bool {
        matches!(self, SuiteError::Transport(_))
    }

    /// Whether the failure is a contract violation
    pub fn is_contract(&self) -> bool {
        matches!(self, SuiteError::Contract(_))
    }
}

/// Result type for suite operations
pub type SuiteResult<T> = Result<T, SuiteError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{Violation, Violations};

    #[test]
    fn test_error_display() {
        let err = SuiteError::assertion("expected 201, got 400");
        assert_eq!(err.to_string(), "Assertion failed: expected 201, got 400");

        let err = SuiteError::TokenExtraction {
            context: "POST /auth/login".to_string(),
            found: "array".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot extract token from POST /auth/login: expected a JSON object body, got array"
        );
    }

    #[test]
    fn test_contract_error_renders_report() {
        let violations = Violations::new(vec![
            Violation::new("$.data.title", "required field missing"),
            Violation::new("$.data.isbn", "required field missing"),
        ])
        .unwrap();
        let err: SuiteError = ContractFailure::new(Some("GET /books/1"), violations).into();

        assert!(err.is_contract());
        assert!(!err.is_transport());
        let rendered = err.to_string();
        assert!(rendered.starts_with("GET /books/1: 2 contract violation(s)"));
        assert!(rendered.contains("$.data.title: required field missing"));
        assert!(rendered.contains("$.data.isbn: required field missing"));
    }

    #[test]
    fn test_error_from_serde() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SuiteError = json_err.into();
        assert!(matches!(err, SuiteError::Serialization(_)));
    }

    #[test]
    fn test_error_from_transport() {
        let err: SuiteError = TransportError::Timeout {
            url: "http://localhost:3000/books".to_string(),
            timeout_secs: 5,
        }
        .into();
        assert!(err.is_transport());
    }
}
