//! In-memory Book Library used by the integration tests
//!
//! `FakeLibrary` answers `RequestDescriptor`s the way the real service does:
//! login issues opaque tokens, protected routes check them, books get
//! sequential numeric ids and unknown routes list the available endpoints.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use book_library_suite::{HttpMethod, RawResponse, RequestDescriptor, Transport, TransportError};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "admin123";

/// Deliberate deviations from the real service
#[derive(Debug, Clone, Copy, Default)]
pub struct Quirks {
    /// Leave `isbn` out of every book in responses
    pub omit_isbn: bool,
    /// Accept requests without a token
    pub skip_auth: bool,
    /// Answer PATCH with a JSON body whose `error` is not "Not Found"
    pub patch_method_not_allowed: bool,
}

#[derive(Default)]
struct State {
    next_id: u64,
    books: BTreeMap<u64, Map<String, Value>>,
    tokens: HashSet<String>,
    requests: Vec<String>,
}

pub struct FakeLibrary {
    state: Mutex<State>,
    quirks: Quirks,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                ..State::default()
            }),
            quirks,
        }
    }

    pub fn book_count(&self) -> usize {
        self.state.lock().unwrap().books.len()
    }

    /// Every request label seen so far, e.g. `DELETE /books/3`
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    fn handle(&self, request: &RequestDescriptor) -> (u16, Value) {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.label());

        let segments: Vec<&str> = request.path.trim_matches('/').split('/').collect();
        match (request.method, segments.as_slice()) {
            (HttpMethod::Post, ["auth", "login"]) => login(&mut state, request.body.as_ref()),
            (HttpMethod::Get, ["books"]) => {
                let books: Vec<Value> = state.books.values().map(|b| self.render(b)).collect();
                (200, json!({ "success": true, "data": books }))
            }
            (HttpMethod::Get, ["books", id]) => match find(&state, id) {
                Some(book) => (200, json!({ "success": true, "data": self.render(book) })),
                None => not_found(id),
            },
            (HttpMethod::Post, ["books"]) => {
                if let Some(denied) = self.authorize(&state, request) {
                    return denied;
                }
                create(&mut state, request.body.as_ref())
                    .map(|book| {
                        (
                            201,
                            json!({
                                "success": true,
                                "message": "Book created successfully",
                                "data": self.render(&book)
                            }),
                        )
                    })
                    .unwrap_or_else(|rejection| rejection)
            }
            (HttpMethod::Put, ["books", id]) => {
                if let Some(denied) = self.authorize(&state, request) {
                    return denied;
                }
                let Some(key) = id.parse::<u64>().ok().filter(|k| state.books.contains_key(k)) else {
                    return not_found(id);
                };
                let book = state.books.get_mut(&key).unwrap();
                if let Some(Value::Object(patch)) = &request.body {
                    for field in ["title", "author", "isbn", "publishedYear", "available"] {
                        if let Some(value) = patch.get(field) {
                            book.insert(field.to_string(), value.clone());
                        }
                    }
                }
                let book = book.clone();
                (
                    200,
                    json!({
                        "success": true,
                        "message": "Book updated successfully",
                        "data": self.render(&book)
                    }),
                )
            }
            (HttpMethod::Delete, ["books", id]) => {
                if let Some(denied) = self.authorize(&state, request) {
                    return denied;
                }
                match id.parse::<u64>().ok().and_then(|k| state.books.remove(&k).map(|_| k)) {
                    Some(key) => (
                        200,
                        json!({ "success": true, "message": "Book deleted successfully", "deletedId": key }),
                    ),
                    None => not_found(id),
                }
            }
            (HttpMethod::Patch, ["books", _]) => (
                404,
                json!({
                    "error": if self.quirks.patch_method_not_allowed { "Method Not Allowed" } else { "Not Found" },
                    "message": format!("Cannot PATCH {}", request.path)
                }),
            ),
            _ => (
                404,
                json!({
                    "error": "Not Found",
                    "message": format!("Route {} {} not found", request.method, request.path),
                    "availableEndpoints": [
                        "POST /auth/login",
                        "GET /books",
                        "GET /books/:id",
                        "POST /books",
                        "PUT /books/:id",
                        "DELETE /books/:id"
                    ]
                }),
            ),
        }
    }

    fn authorize(&self, state: &State, request: &RequestDescriptor) -> Option<(u16, Value)> {
        if self.quirks.skip_auth {
            return None;
        }
        match &request.bearer_token {
            None => Some((
                401,
                json!({
                    "error": "Access denied. No token provided.",
                    "message": "Authorization header with Bearer token is required"
                }),
            )),
            Some(token) if !state.tokens.contains(token) => Some((
                401,
                json!({ "error": "Invalid or expired token", "message": "jwt malformed" }),
            )),
            Some(_) => None,
        }
    }

    fn render(&self, book: &Map<String, Value>) -> Value {
        let mut book = book.clone();
        if self.quirks.omit_isbn {
            book.remove("isbn");
        }
        Value::Object(book)
    }
}

fn find<'a>(state: &'a State, id: &str) -> Option<&'a Map<String, Value>> {
    id.parse::<u64>().ok().and_then(|key| state.books.get(&key))
}

fn not_found(id: &str) -> (u16, Value) {
    (
        404,
        json!({ "error": "Not Found", "message": format!("Book with ID {} not found", id) }),
    )
}

fn bad_request(message: &str) -> (u16, Value) {
    (400, json!({ "error": "Bad Request", "message": message }))
}

fn non_empty_str<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    body.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn login(state: &mut State, body: Option<&Value>) -> (u16, Value) {
    let empty = Map::new();
    let body = body.and_then(Value::as_object).unwrap_or(&empty);
    let (Some(username), Some(password)) = (non_empty_str(body, "username"), non_empty_str(body, "password"))
    else {
        return bad_request("Username and password are required");
    };

    if username != USERNAME || password != PASSWORD {
        return (
            401,
            json!({ "error": "Unauthorized", "message": "Invalid username or password" }),
        );
    }

    let token = format!("fake.jwt.{}", state.tokens.len() + 1);
    state.tokens.insert(token.clone());
    (
        200,
        json!({
            "message": "Login successful",
            "token": token,
            "user": { "username": username, "role": "admin" }
        }),
    )
}

fn valid_isbn(isbn: &str) -> bool {
    let digits = isbn.chars().filter(char::is_ascii_digit).count();
    isbn.chars().all(|c| c.is_ascii_digit() || c == '-' || c == ' ') && (digits == 10 || digits == 13)
}

fn create(state: &mut State, body: Option<&Value>) -> Result<Map<String, Value>, (u16, Value)> {
    let empty = Map::new();
    let body = body.and_then(Value::as_object).unwrap_or(&empty);

    let (Some(title), Some(author), Some(isbn)) = (
        non_empty_str(body, "title"),
        non_empty_str(body, "author"),
        non_empty_str(body, "isbn"),
    ) else {
        return Err(bad_request("Missing required fields: title, author, and isbn are required"));
    };
    if !valid_isbn(isbn) {
        return Err(bad_request(
            "Invalid ISBN format. ISBN should be 10 or 13 digits (hyphens and spaces allowed)",
        ));
    }

    let id = state.next_id;
    state.next_id += 1;

    let mut book = Map::new();
    book.insert("id".to_string(), json!(id));
    book.insert("title".to_string(), json!(title));
    book.insert("author".to_string(), json!(author));
    book.insert("isbn".to_string(), json!(isbn));
    book.insert(
        "publishedYear".to_string(),
        body.get("publishedYear").cloned().unwrap_or(Value::Null),
    );
    book.insert(
        "available".to_string(),
        body.get("available").cloned().unwrap_or(Value::Bool(true)),
    );
    state.books.insert(id, book.clone());
    Ok(book)
}

#[async_trait]
impl Transport for FakeLibrary {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        let (status, body) = self.handle(request);
        Ok(RawResponse::new(status, body.to_string()))
    }

    fn base_url(&self) -> &str {
        "fake://book-library"
    }
}
