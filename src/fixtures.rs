//! Test data and the service's canonical responses
//!
//! Book payloads are unique per call so scenarios never collide with each
//! other or with books left behind on a shared server.

use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::models::{BookId, LoginRequest, NewBook};

/// An id the service never assigns
pub const NONEXISTENT_BOOK_ID: u64 = 999_999;

/// A bearer token that is not a JWT
pub const MALFORMED_TOKEN: &str = "invalid-token";

/// Response texts the service is expected to produce
pub mod messages {
    pub const LOGIN_SUCCESS: &str = "Login successful";
    pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
    pub const CREDENTIALS_REQUIRED: &str = "Username and password are required";

    pub const MISSING_FIELDS: &str = "Missing required fields: title, author, and isbn are required";
    pub const INVALID_ISBN: &str =
        "Invalid ISBN format. ISBN should be 10 or 13 digits (hyphens and spaces allowed)";

    pub const NO_TOKEN_ERROR: &str = "Access denied. No token provided.";
    pub const NO_TOKEN_MESSAGE: &str = "Authorization header with Bearer token is required";
    pub const INVALID_TOKEN_ERROR: &str = "Invalid or expired token";
    pub const JWT_MALFORMED: &str = "jwt malformed";

    pub const BOOK_CREATED: &str = "Book created successfully";
    pub const BOOK_UPDATED: &str = "Book updated successfully";
    pub const BOOK_DELETED: &str = "Book deleted successfully";

    pub const BAD_REQUEST: &str = "Bad Request";
    pub const UNAUTHORIZED: &str = "Unauthorized";
    pub const NOT_FOUND: &str = "Not Found";

    /// Message for a missing book
    pub fn book_not_found(id: &str) -> String {
        format!("Book with ID {} not found", id)
    }

    /// Message for a method the books route does not support
    pub fn cannot(method: &str, path: &str) -> String {
        format!("Cannot {} {}", method, path)
    }
}

/// The id the service never assigns, as a `BookId`
pub fn nonexistent_book_id() -> BookId {
    BookId::from(NONEXISTENT_BOOK_ID)
}

/// A fresh ISBN-13 shaped string, `978-` followed by ten digits
pub fn unique_isbn() -> String {
    let digits = Uuid::new_v4().as_u128() % 10_000_000_000;
    format!("978-{:010}", digits)
}

/// A fresh, valid book payload with every field set
pub fn new_book() -> NewBook {
    let tag = Uuid::new_v4().simple().to_string();
    NewBook::new(
        format!("Suite Book {}", &tag[..8]),
        "Suite Author",
        unique_isbn(),
    )
    .with_published_year(2024)
    .with_available(true)
}

/// Only the three required fields, leaving server defaults for the rest
pub fn minimal_book() -> NewBook {
    let tag = Uuid::new_v4().simple().to_string();
    NewBook::new(format!("Minimal Book {}", &tag[..8]), "Suite Author", unique_isbn())
}

/// Valid payloads with every non-empty subset of title/author/isbn removed
///
/// Each entry is labelled with the removed fields, e.g. `"title+isbn"`.
pub fn missing_field_payloads() -> Vec<(String, Value)> {
    const REQUIRED: [&str; 3] = ["title", "author", "isbn"];

    let full = match serde_json::to_value(new_book()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    (1u8..(1 << REQUIRED.len()))
        .map(|mask| {
            let removed: Vec<&str> = REQUIRED
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, name)| *name)
                .collect();
            let mut payload = full.clone();
            for name in &removed {
                payload.remove(*name);
            }
            (removed.join("+"), Value::Object(payload))
        })
        .collect()
}

/// ISBN strings the service must reject
pub fn invalid_isbns() -> Vec<&'static str> {
    vec!["978", "123456789", "978-0-306-40615-7-123", "ISBN9780306406", "97803064061x"]
}

/// A valid payload carrying `isbn`
pub fn book_with_isbn(isbn: &str) -> NewBook {
    let mut book = new_book();
    book.isbn = isbn.to_string();
    book
}

/// Login payloads the service must reject with 400
pub fn incomplete_login_payloads(credentials: &LoginRequest) -> Vec<(&'static str, Value)> {
    vec![
        ("empty payload", json!({})),
        ("missing password", json!({ "username": credentials.username })),
        ("missing username", json!({ "password": credentials.password })),
    ]
}
