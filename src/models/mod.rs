//! Models module for the suite
//!
//! Typed request payloads and response bodies exchanged with the Book Library
//! service. Response types are only ever built from values that already
//! passed their contract.

pub mod auth;
pub mod book;
pub mod response;

pub use auth::{LoginRequest, LoginResponse, User};
pub use book::{Book, BookId, BookUpdate, NewBook};
pub use response::{DeleteResponse, ErrorBody};
