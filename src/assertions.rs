//! Scenario assertions
//!
//! Each helper returns `Ok(())` (or the validated value) when the
//! expectation holds and a `SuiteError` describing the mismatch otherwise,
//! so scenarios can chain them with `?`.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::ApiOutcome;
use crate::contract::{names, registry};
use crate::error::{SuiteError, SuiteResult};
use crate::validator::{ContractFailure, Violation, Violations, validate, validate_as};

/// Short description of a body for failure messages
fn describe_body<T>(outcome: &ApiOutcome<T>) -> String {
    match &outcome.body {
        None => "no JSON body".to_string(),
        Some(body) => {
            let text = body.to_string();
            if text.chars().count() > 200 {
                format!("{}...", text.chars().take(200).collect::<String>())
            } else {
                text
            }
        }
    }
}

/// Fail unless `condition` holds
pub fn ensure(condition: bool, message: impl Into<String>) -> SuiteResult<()> {
    if condition {
        Ok(())
    } else {
        Err(SuiteError::assertion(message))
    }
}

/// Fail unless `actual == expected`
pub fn expect_eq<T: PartialEq + Debug>(actual: &T, expected: &T, what: &str) -> SuiteResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(SuiteError::assertion(format!(
            "{}: expected {:?}, got {:?}",
            what, expected, actual
        )))
    }
}

/// Fail unless the response has status `expected`
pub fn expect_status<T>(outcome: &ApiOutcome<T>, expected: u16, what: &str) -> SuiteResult<()> {
    if outcome.status == expected {
        Ok(())
    } else {
        Err(SuiteError::assertion(format!(
            "{}: expected HTTP {}, got {} with {}",
            what,
            expected,
            outcome.status,
            describe_body(outcome)
        )))
    }
}

/// Fail unless the body's `message` equals `expected` exactly
pub fn expect_message<T>(outcome: &ApiOutcome<T>, expected: &str, what: &str) -> SuiteResult<()> {
    match outcome.message() {
        Some(message) if message == expected => Ok(()),
        Some(message) => Err(SuiteError::assertion(format!(
            "{}: expected message \"{}\", got \"{}\"",
            what, expected, message
        ))),
        None => Err(SuiteError::assertion(format!(
            "{}: expected message \"{}\", got {}",
            what,
            expected,
            describe_body(outcome)
        ))),
    }
}

/// Fail unless the body's `message` contains `needle`
pub fn expect_message_contains<T>(outcome: &ApiOutcome<T>, needle: &str, what: &str) -> SuiteResult<()> {
    match outcome.message() {
        Some(message) if message.contains(needle) => Ok(()),
        Some(message) => Err(SuiteError::assertion(format!(
            "{}: expected message containing \"{}\", got \"{}\"",
            what, needle, message
        ))),
        None => Err(SuiteError::assertion(format!(
            "{}: expected message containing \"{}\", got {}",
            what,
            needle,
            describe_body(outcome)
        ))),
    }
}

/// Fail unless the response is an error with the given status, `error` and `message`
///
/// Status comes first, then the `error` contract, then the two values.
pub fn expect_error<T>(
    outcome: &ApiOutcome<T>,
    status: u16,
    error: &str,
    message: &str,
    what: &str,
) -> SuiteResult<()> {
    expect_status(outcome, status, what)?;
    expect_contract(outcome, names::ERROR, what)?;
    match outcome.error() {
        Some(actual) if actual == error => {}
        actual => {
            return Err(SuiteError::assertion(format!(
                "{}: expected error \"{}\", got {:?}",
                what, error, actual
            )));
        }
    }
    expect_message(outcome, message, what)
}

/// Fail unless the body has no top-level `field`
pub fn expect_absent<T>(outcome: &ApiOutcome<T>, field: &str, what: &str) -> SuiteResult<()> {
    ensure(
        !outcome.has_field(field),
        format!("{}: expected no `{}` in {}", what, field, describe_body(outcome)),
    )
}

/// Validate the body against the named registry contract
///
/// A missing body counts as a root violation. Returns the coerced value.
pub fn expect_contract<T>(outcome: &ApiOutcome<T>, contract: &str, what: &str) -> SuiteResult<Value> {
    let contract = registry().expect(contract)?;
    let result = match &outcome.body {
        Some(body) => validate(contract, body),
        None => Err(Violations::from(Violation::new("$", "expected JSON body, got none"))),
    };
    result.map_err(|violations| ContractFailure::new(Some(what), violations).into())
}

/// Validate the body against the named contract and read it as `D`
pub fn expect_contract_as<T, D: DeserializeOwned>(
    outcome: &ApiOutcome<T>,
    contract: &str,
    what: &str,
) -> SuiteResult<D> {
    let contract = registry().expect(contract)?;
    let result = match &outcome.body {
        Some(body) => validate_as(contract, body),
        None => Err(Violations::from(Violation::new("$", "expected JSON body, got none"))),
    };
    result.map_err(|violations| ContractFailure::new(Some(what), violations).into())
}

/// Return the extracted entity or fail with the body that lacked it
pub fn expect_entity<T: Clone>(outcome: &ApiOutcome<T>, what: &str) -> SuiteResult<T> {
    outcome.entity.clone().ok_or_else(|| {
        SuiteError::assertion(format!(
            "{}: no entity could be read from {}",
            what,
            describe_body(outcome)
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(status: u16, body: Option<Value>) -> ApiOutcome<()> {
        ApiOutcome {
            status,
            ok: (200..300).contains(&status),
            body,
            entity: None,
        }
    }

    #[test]
    fn test_expect_status() {
        let o = outcome(400, Some(json!({ "error": "Bad Request", "message": "nope" })));
        assert!(expect_status(&o, 400, "create").is_ok());

        let err = expect_status(&o, 201, "create").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("create: expected HTTP 201, got 400"));
        assert!(text.contains("\"nope\""));
    }

    #[test]
    fn test_expect_error() {
        let o = outcome(
            401,
            Some(json!({
                "error": "Access denied. No token provided.",
                "message": "Authorization header with Bearer token is required"
            })),
        );
        assert!(
            expect_error(
                &o,
                401,
                "Access denied. No token provided.",
                "Authorization header with Bearer token is required",
                "no token"
            )
            .is_ok()
        );
        assert!(expect_error(&o, 401, "Unauthorized", "x", "no token").is_err());
        assert!(expect_error(&o, 403, "Access denied. No token provided.", "x", "no token").is_err());
    }

    #[test]
    fn test_expect_error_reports_status_before_shape() {
        let created = outcome(201, Some(json!({ "success": true, "data": { "id": 1 } })));
        let err = expect_error(&created, 400, "Bad Request", "Missing required fields", "create").unwrap_err();
        assert!(err.to_string().contains("expected HTTP 400, got 201"), "{}", err);

        let drifted = outcome(400, Some(json!({ "message": "Missing required fields" })));
        let err = expect_error(&drifted, 400, "Bad Request", "Missing required fields", "create").unwrap_err();
        assert!(err.to_string().contains("$.error: required field missing"), "{}", err);
    }

    #[test]
    fn test_message_helpers() {
        let o = outcome(404, Some(json!({ "error": "Not Found", "message": "Book with ID 99 not found" })));
        assert!(expect_message(&o, "Book with ID 99 not found", "get").is_ok());
        assert!(expect_message(&o, "Book with ID 9 not found", "get").is_err());
        assert!(expect_message_contains(&o, "99", "get").is_ok());
        assert!(expect_message_contains(&o, "100", "get").is_err());

        let empty = outcome(404, None);
        let err = expect_message_contains(&empty, "99", "get").unwrap_err();
        assert!(err.to_string().contains("no JSON body"));
    }

    #[test]
    fn test_expect_absent() {
        let o = outcome(401, Some(json!({ "error": "Unauthorized", "message": "m" })));
        assert!(expect_absent(&o, "token", "login").is_ok());
        assert!(expect_absent(&o, "error", "login").is_err());
    }

    #[test]
    fn test_expect_contract_reports_every_violation() {
        let o = outcome(200, Some(json!({ "success": true, "data": { "id": 1, "available": "yes" } })));
        let err = expect_contract(&o, names::BOOK_ENVELOPE, "GET /books/1").unwrap_err();
        match err {
            SuiteError::Contract(failure) => {
                assert_eq!(failure.context.as_deref(), Some("GET /books/1"));
                let paths = failure.violations.paths();
                assert!(paths.contains(&"$.data.title"));
                assert!(paths.contains(&"$.data.author"));
                assert!(paths.contains(&"$.data.isbn"));
                assert!(paths.contains(&"$.data.available"));
            }
            other => panic!("Expected Contract, got {:?}", other),
        }
    }

    #[test]
    fn test_expect_contract_missing_body() {
        let err = expect_contract(&outcome(200, None), names::ERROR, "PATCH").unwrap_err();
        assert!(err.is_contract());
        assert!(err.to_string().contains("$: expected JSON body, got none"));
    }

    #[test]
    fn test_expect_contract_unknown_name() {
        let o = outcome(200, Some(json!({})));
        let err = expect_contract(&o, "magazine", "x").unwrap_err();
        assert!(matches!(err, SuiteError::Registry(_)));
    }

    #[test]
    fn test_expect_eq_and_ensure() {
        assert!(expect_eq(&1, &1, "count").is_ok());
        let err = expect_eq(&"a", &"b", "title").unwrap_err();
        assert_eq!(err.to_string(), "Assertion failed: title: expected \"b\", got \"a\"");
        assert!(ensure(true, "fine").is_ok());
        assert!(ensure(false, "broken").is_err());
    }

    #[test]
    fn test_expect_entity() {
        let mut o: ApiOutcome<u32> = ApiOutcome {
            status: 200,
            ok: true,
            body: None,
            entity: Some(5),
        };
        assert_eq!(expect_entity(&o, "x").unwrap(), 5);
        o.entity = None;
        assert!(expect_entity(&o, "x").is_err());
    }
}
