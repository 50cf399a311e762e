//! End-to-end scenarios against the Book Library service
//!
//! A scenario is a strictly sequential chain of calls and assertions. Each
//! one runs with its own [`ScenarioContext`] (own transport handle, own
//! token) and deletes the books it created when it finishes.

use std::fmt::{self, Display};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{ApiOutcome, AuthApi, BooksApi};
use crate::assertions::{expect_entity, expect_status};
use crate::config::SuiteConfig;
use crate::error::SuiteResult;
use crate::models::{Book, BookId, NewBook};
use crate::transport::Transport;

pub mod auth;
pub mod books;
pub mod security;

/// Boxed future returned by scenario bodies
pub type ScenarioFuture<'a> = Pin<Box<dyn Future<Output = SuiteResult<()>> + Send + 'a>>;

/// Scenario body signature
pub type ScenarioFn = for<'a> fn(&'a mut ScenarioContext) -> ScenarioFuture<'a>;

/// Area of the service a scenario exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioGroup {
    Auth,
    Create,
    Read,
    Update,
    Delete,
    Security,
    Routing,
}

impl ScenarioGroup {
    pub const ALL: [ScenarioGroup; 7] = [
        ScenarioGroup::Auth,
        ScenarioGroup::Create,
        ScenarioGroup::Read,
        ScenarioGroup::Update,
        ScenarioGroup::Delete,
        ScenarioGroup::Security,
        ScenarioGroup::Routing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioGroup::Auth => "auth",
            ScenarioGroup::Create => "create",
            ScenarioGroup::Read => "read",
            ScenarioGroup::Update => "update",
            ScenarioGroup::Delete => "delete",
            ScenarioGroup::Security => "security",
            ScenarioGroup::Routing => "routing",
        }
    }
}

impl Display for ScenarioGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScenarioGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ScenarioGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown scenario group '{}'. Expected one of: {}",
                    s,
                    ScenarioGroup::ALL.map(|g| g.as_str()).join(", ")
                )
            })
    }
}

/// One end-to-end check
#[async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &str;

    fn group(&self) -> ScenarioGroup;

    async fn run(&self, ctx: &mut ScenarioContext) -> SuiteResult<()>;
}

/// Scenario backed by a plain function
pub struct FnScenario {
    name: &'static str,
    group: ScenarioGroup,
    body: ScenarioFn,
}

impl FnScenario {
    pub fn new(name: &'static str, group: ScenarioGroup, body: ScenarioFn) -> Self {
        Self { name, group, body }
    }
}

#[async_trait]
impl Scenario for FnScenario {
    fn name(&self) -> &str {
        self.name
    }

    fn group(&self) -> ScenarioGroup {
        self.group
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> SuiteResult<()> {
        (self.body)(ctx).await
    }
}

/// Every scenario, in run order
pub fn catalog() -> Vec<Box<dyn Scenario>> {
    let mut scenarios = Vec::new();
    scenarios.extend(auth::scenarios());
    scenarios.extend(books::scenarios());
    scenarios.extend(security::scenarios());
    scenarios
}

/// Per-scenario state: API clients, the cached token and created books
pub struct ScenarioContext {
    config: SuiteConfig,
    auth: AuthApi,
    books: BooksApi,
    token: Option<String>,
    created: Vec<BookId>,
}

impl ScenarioContext {
    pub fn new(config: SuiteConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            auth: AuthApi::new(transport.clone()),
            books: BooksApi::new(transport),
            token: None,
            created: Vec::new(),
        }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    pub fn books(&self) -> &BooksApi {
        &self.books
    }

    /// Bearer token for the configured user, logging in on first use
    pub async fn token(&mut self) -> SuiteResult<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        let token = self.auth.authenticate(&self.config).await?;
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Remember a book so `cleanup` deletes it
    pub fn track(&mut self, id: BookId) {
        if !self.created.contains(&id) {
            self.created.push(id);
        }
    }

    /// Track whatever a create call reports it stored
    ///
    /// Any 2xx answer with a readable `data.id` counts, even when the rest of
    /// the body breaks its contract.
    pub fn track_created<T>(&mut self, outcome: &ApiOutcome<T>) {
        if !outcome.ok {
            return;
        }
        let id = outcome
            .body
            .as_ref()
            .and_then(|body| body.get("data"))
            .and_then(|data| data.get("id"))
            .and_then(BookId::from_value);
        match id {
            Some(id) => self.track(id),
            None => warn!("HTTP {} create answer carries no book id to clean up", outcome.status),
        }
    }

    /// Stop tracking a book that the scenario already deleted
    pub fn forget(&mut self, id: &BookId) {
        self.created.retain(|tracked| tracked != id);
    }

    /// Books created and not yet deleted
    pub fn created(&self) -> &[BookId] {
        &self.created
    }

    /// Create a book that must succeed, track it and return it
    pub async fn create_book(&mut self, payload: &NewBook) -> SuiteResult<Book> {
        let token = self.token().await?;
        let outcome = self.books.create(payload, Some(&token)).await?;
        self.track_created(&outcome);
        expect_status(&outcome, 201, "create book")?;
        expect_entity(&outcome, "create book")
    }

    /// Delete every tracked book
    ///
    /// Failures are logged and skipped. Returns how many books were removed.
    pub async fn cleanup(&mut self) -> usize {
        if self.created.is_empty() {
            return 0;
        }

        let token = match self.token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(
                    "Cleanup skipped for {} book(s): could not authenticate: {}",
                    self.created.len(),
                    e
                );
                return 0;
            }
        };

        let mut removed = 0;
        for id in std::mem::take(&mut self.created) {
            match self.books.delete(&id, Some(&token)).await {
                Ok(outcome) if outcome.ok => {
                    debug!("Cleaned up book {}", id);
                    removed += 1;
                }
                Ok(outcome) if outcome.status == 404 => {
                    debug!("Book {} already gone", id);
                }
                Ok(outcome) => warn!("Cleanup of book {} returned HTTP {}", id, outcome.status),
                Err(e) => warn!("Cleanup of book {} failed: {}", id, e),
            }
        }
        removed
    }
}
