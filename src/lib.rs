//! Book Library API Suite - contract-validated end-to-end checks for the Book Library service
//!
//! Provides unified interfaces for:
//! - HTTP transport against a configured base URL (via the `Transport` trait)
//! - Response normalization (raw bytes to optional JSON)
//! - Declarative response contracts and a total validator
//! - Domain operations for authentication and books
//! - Fixtures, assertions and the scenario catalog
//! - A sequential scenario runner with text/JSON reports

pub mod api;
pub mod assertions;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod normalize;
pub mod runner;
pub mod scenarios;
pub mod transport;
pub mod validator;

// Re-export commonly used types
pub use api::{ApiOutcome, AuthApi, BooksApi, LoginOutcome};
pub use config::{ConfigError, SuiteConfig};
pub use contract::{Contract, ContractError, ContractRegistry, Field, Shape, registry};
pub use error::{SuiteError, SuiteResult};
pub use normalize::{ResponseEnvelope, parse_body};
pub use runner::{RunReport, Runner, ScenarioFilter, ScenarioResult};
pub use scenarios::{Scenario, ScenarioContext, ScenarioGroup, catalog};
#[cfg(feature = "http-backend")]
pub use transport::http::HttpTransport;
pub use transport::{HttpMethod, RawResponse, RequestDescriptor, Transport, TransportError};
pub use validator::{ContractFailure, ValidationResult, Violation, Violations, validate, validate_as};

// Re-export models
pub use models::{Book, BookId, BookUpdate, DeleteResponse, ErrorBody, LoginRequest, LoginResponse, NewBook, User};
