//! Authentication operations

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{ApiOutcome, extract, round_trip};
use crate::config::SuiteConfig;
use crate::contract::{names, registry};
use crate::error::{SuiteError, SuiteResult};
use crate::models::{LoginRequest, LoginResponse};
use crate::transport::{RequestDescriptor, Transport};
use crate::validator::json_type_name;

pub const LOGIN_PATH: &str = "/auth/login";

/// Outcome of a login call plus the extracted bearer token
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub response: ApiOutcome<LoginResponse>,
    /// Present whenever the body carried a non-empty string `token`
    pub token: Option<String>,
}

impl LoginOutcome {
    pub fn status(&self) -> u16 {
        self.response.status
    }

    pub fn message(&self) -> Option<&str> {
        self.response.message()
    }
}

/// Client for `POST /auth/login`
#[derive(Clone)]
pub struct AuthApi {
    transport: Arc<dyn Transport>,
}

impl AuthApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Log in with typed credentials
    pub async fn login(&self, credentials: &LoginRequest) -> SuiteResult<LoginOutcome> {
        self.login_raw(serde_json::to_value(credentials)?).await
    }

    /// Log in with an arbitrary JSON payload (e.g. `{}` or a missing field)
    ///
    /// A body that is present but not a JSON object fails with
    /// [`SuiteError::TokenExtraction`] regardless of status, since there is
    /// no meaningful place to read a token from. A missing body is fine and
    /// just yields no token.
    pub async fn login_raw(&self, payload: Value) -> SuiteResult<LoginOutcome> {
        let request = RequestDescriptor::post(LOGIN_PATH).with_json(payload);
        let envelope = round_trip(self.transport.as_ref(), &request).await?;

        let token = match &envelope.body {
            None => None,
            Some(Value::Object(object)) => object
                .get("token")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            Some(other) => {
                return Err(SuiteError::TokenExtraction {
                    context: request.label(),
                    found: json_type_name(other).to_string(),
                });
            }
        };

        let entity = extract(envelope.body.as_ref(), registry().expect(names::AUTH_LOGIN)?);
        debug!(
            "login -> {} (token {})",
            envelope.status,
            if token.is_some() { "issued" } else { "absent" }
        );

        Ok(LoginOutcome {
            response: ApiOutcome::new(envelope, entity),
            token,
        })
    }

    /// Log in with the configured credentials and return the bearer token
    ///
    /// Fails with [`SuiteError::Authentication`] when the server does not
    /// issue a token.
    pub async fn authenticate(&self, config: &SuiteConfig) -> SuiteResult<String> {
        let outcome = self
            .login(&LoginRequest::new(&config.username, &config.password))
            .await?;

        match outcome.token {
            Some(token) if outcome.response.ok => Ok(token),
            _ => Err(SuiteError::Authentication {
                username: config.username.clone(),
                status: outcome.response.status,
                message: outcome
                    .response
                    .message()
                    .unwrap_or("no token in response")
                    .to_string(),
            }),
        }
    }
}
