//! Login scenarios

use super::{FnScenario, Scenario, ScenarioContext, ScenarioFuture, ScenarioGroup};
use crate::assertions::{ensure, expect_absent, expect_contract, expect_error, expect_message, expect_status};
use crate::contract::names;
use crate::fixtures::{incomplete_login_payloads, messages};
use crate::models::LoginRequest;

pub fn scenarios() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(FnScenario::new(
            "login with valid credentials",
            ScenarioGroup::Auth,
            valid_login,
        )),
        Box::new(FnScenario::new(
            "login with wrong password",
            ScenarioGroup::Auth,
            wrong_password,
        )),
        Box::new(FnScenario::new(
            "login with incomplete payload",
            ScenarioGroup::Auth,
            incomplete_payload,
        )),
    ]
}

fn valid_login(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let credentials = LoginRequest::new(&ctx.config().username, &ctx.config().password);
        let outcome = ctx.auth().login(&credentials).await?;

        expect_status(&outcome.response, 200, "valid login")?;
        expect_contract(&outcome.response, names::AUTH_LOGIN, "valid login")?;
        expect_message(&outcome.response, messages::LOGIN_SUCCESS, "valid login")?;
        ensure(
            outcome.token.as_deref().is_some_and(|t| !t.is_empty()),
            "valid login: expected a non-empty token",
        )
    })
}

fn wrong_password(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let credentials = LoginRequest::new(
            &ctx.config().username,
            format!("{}-wrong", ctx.config().password),
        );
        let outcome = ctx.auth().login(&credentials).await?;
        let what = "login with wrong password";

        expect_error(
            &outcome.response,
            401,
            messages::UNAUTHORIZED,
            messages::INVALID_CREDENTIALS,
            what,
        )?;
        expect_absent(&outcome.response, "token", what)?;
        ensure(outcome.token.is_none(), format!("{}: no token expected", what))
    })
}

fn incomplete_payload(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let credentials = LoginRequest::new(&ctx.config().username, &ctx.config().password);

        for (label, payload) in incomplete_login_payloads(&credentials) {
            let outcome = ctx.auth().login_raw(payload).await?;
            let what = format!("login with {}", label);

            expect_error(
                &outcome.response,
                400,
                messages::BAD_REQUEST,
                messages::CREDENTIALS_REQUIRED,
                &what,
            )?;
            ensure(outcome.token.is_none(), format!("{}: no token expected", what))?;
        }
        Ok(())
    })
}
