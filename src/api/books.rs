//! Book resource operations

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{ApiOutcome, extract, extract_data, round_trip};
use crate::contract::{names, registry};
use crate::error::SuiteResult;
use crate::models::{Book, BookId, BookUpdate, DeleteResponse, NewBook};
use crate::transport::{HttpMethod, RequestDescriptor, Transport};

pub const BOOKS_PATH: &str = "/books";

/// Path of a single book, with the id percent-encoded as one segment
pub fn book_path(id: &BookId) -> String {
    format!("{}/{}", BOOKS_PATH, urlencoding::encode(id.as_str()))
}

/// Client for the `/books` resource
///
/// Every mutating call takes the bearer token explicitly; passing `None`
/// sends the request unauthenticated.
#[derive(Clone)]
pub struct BooksApi {
    transport: Arc<dyn Transport>,
}

impl BooksApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `POST /books` with a typed payload
    pub async fn create(&self, payload: &NewBook, token: Option<&str>) -> SuiteResult<ApiOutcome<Book>> {
        self.create_raw(serde_json::to_value(payload)?, token).await
    }

    /// `POST /books` with an arbitrary JSON payload
    pub async fn create_raw(&self, payload: Value, token: Option<&str>) -> SuiteResult<ApiOutcome<Book>> {
        let request = RequestDescriptor::post(BOOKS_PATH)
            .with_json(payload)
            .with_bearer(token);
        self.book_call(&request).await
    }

    /// `GET /books/{id}`
    pub async fn get(&self, id: &BookId) -> SuiteResult<ApiOutcome<Book>> {
        let request = RequestDescriptor::get(book_path(id));
        self.book_call(&request).await
    }

    /// `PUT /books/{id}` with a partial update
    ///
    /// `entity` is only filled when the server echoes a complete book.
    pub async fn update(
        &self,
        id: &BookId,
        patch: &BookUpdate,
        token: Option<&str>,
    ) -> SuiteResult<ApiOutcome<Book>> {
        let request = RequestDescriptor::put(book_path(id))
            .with_json(serde_json::to_value(patch)?)
            .with_bearer(token);
        self.book_call(&request).await
    }

    /// `DELETE /books/{id}`
    pub async fn delete(&self, id: &BookId, token: Option<&str>) -> SuiteResult<ApiOutcome<DeleteResponse>> {
        let request = RequestDescriptor::delete(book_path(id)).with_bearer(token);
        let envelope = round_trip(self.transport.as_ref(), &request).await?;
        let entity = extract(envelope.body.as_ref(), registry().expect(names::BOOK_DELETED)?);
        debug!("{} -> {}", request.label(), envelope.status);
        Ok(ApiOutcome::new(envelope, entity))
    }

    /// `GET /books`
    pub async fn list(&self) -> SuiteResult<ApiOutcome<Vec<Book>>> {
        let request = RequestDescriptor::get(BOOKS_PATH);
        let envelope = round_trip(self.transport.as_ref(), &request).await?;
        let entity = extract_data(envelope.body.as_ref(), registry().expect(names::BOOK_LIST)?);
        debug!("{} -> {}", request.label(), envelope.status);
        Ok(ApiOutcome::new(envelope, entity))
    }

    /// Send an arbitrary request, e.g. an unsupported method or unknown path
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> SuiteResult<ApiOutcome<()>> {
        let mut request = RequestDescriptor::new(method, path).with_bearer(token);
        if let Some(body) = body {
            request = request.with_json(body);
        }
        let envelope = round_trip(self.transport.as_ref(), &request).await?;
        debug!("{} -> {}", request.label(), envelope.status);
        Ok(ApiOutcome::new(envelope, None))
    }

    async fn book_call(&self, request: &RequestDescriptor) -> SuiteResult<ApiOutcome<Book>> {
        let envelope = round_trip(self.transport.as_ref(), request).await?;
        let entity = extract_data(envelope.body.as_ref(), registry().expect(names::BOOK)?);
        debug!(
            "{} -> {} (entity {})",
            request.label(),
            envelope.status,
            if entity.is_some() { "extracted" } else { "absent" }
        );
        Ok(ApiOutcome::new(envelope, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use serde_json::json;

    fn api(mock: MockTransport) -> (BooksApi, Arc<MockTransport>) {
        let mock = Arc::new(mock);
        (BooksApi::new(mock.clone()), mock)
    }

    fn book_json(id: Value) -> Value {
        json!({
            "id": id,
            "title": "The Left Hand of Darkness",
            "author": "Ursula K. Le Guin",
            "isbn": "978-0441478125",
            "publishedYear": 1969,
            "available": true
        })
    }

    #[test]
    fn test_book_path_encodes_id() {
        assert_eq!(book_path(&BookId::from(42u64)), "/books/42");
        assert_eq!(book_path(&BookId::from("a b/c")), "/books/a%20b%2Fc");
    }

    #[tokio::test]
    async fn test_create_sends_token_and_extracts_book() {
        let (api, mock) = api(MockTransport::new().reply_json(
            201,
            json!({ "success": true, "message": "Book created successfully", "data": book_json(json!(7)) }),
        ));

        let payload = NewBook::new("The Left Hand of Darkness", "Ursula K. Le Guin", "978-0441478125")
            .with_published_year(1969);
        let outcome = api.create(&payload, Some("tok")).await.unwrap();

        assert_eq!(outcome.status, 201);
        assert!(outcome.ok);
        let book = outcome.entity.unwrap();
        assert_eq!(book.id, BookId::from("7"));
        assert!(book.matches(&payload));

        let sent = &mock.requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.path, "/books");
        assert_eq!(sent.bearer_token.as_deref(), Some("tok"));
        assert_eq!(sent.body.as_ref().unwrap()["isbn"], "978-0441478125");
    }

    #[tokio::test]
    async fn test_create_failure_has_no_entity() {
        let (api, _) = api(MockTransport::new().reply_json(
            401,
            json!({
                "error": "Access denied. No token provided.",
                "message": "Authorization header with Bearer token is required"
            }),
        ));

        let outcome = api.create_raw(json!({ "title": "x" }), None).await.unwrap();
        assert_eq!(outcome.status, 401);
        assert!(!outcome.ok);
        assert!(outcome.entity.is_none());
        assert_eq!(outcome.error(), Some("Access denied. No token provided."));
    }

    #[tokio::test]
    async fn test_get_canonicalizes_string_id() {
        let (api, mock) = api(
            MockTransport::new().reply_json(200, json!({ "success": true, "data": book_json(json!("12")) })),
        );

        let outcome = api.get(&BookId::from(12u64)).await.unwrap();
        assert_eq!(outcome.entity.unwrap().id.as_str(), "12");
        assert!(mock.requests()[0].bearer_token.is_none());
    }

    #[tokio::test]
    async fn test_update_with_partial_echo() {
        let (api, mock) = api(MockTransport::new().reply_json(
            200,
            json!({ "success": true, "message": "Book updated successfully", "data": { "available": false } }),
        ));

        let outcome = api
            .update(&BookId::from(3u64), &BookUpdate::new().available(false), Some("tok"))
            .await
            .unwrap();
        assert_eq!(outcome.status, 200);
        assert!(outcome.entity.is_none());
        assert_eq!(outcome.message(), Some("Book updated successfully"));

        let sent = &mock.requests()[0];
        assert_eq!(sent.method, HttpMethod::Put);
        assert_eq!(sent.body, Some(json!({ "available": false })));
    }

    #[tokio::test]
    async fn test_delete_extracts_deleted_id() {
        let (api, _) = api(MockTransport::new().reply_json(
            200,
            json!({ "success": true, "message": "Book deleted successfully", "deletedId": 9 }),
        ));

        let outcome = api.delete(&BookId::from(9u64), Some("tok")).await.unwrap();
        assert_eq!(outcome.entity.unwrap().deleted_id, BookId::from("9"));
    }

    #[tokio::test]
    async fn test_list() {
        let (api, _) = api(MockTransport::new().reply_json(
            200,
            json!({ "success": true, "data": [book_json(json!(1)), book_json(json!("2"))] }),
        ));

        let books = api.list().await.unwrap().entity.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].id.as_str(), "2");
    }

    #[tokio::test]
    async fn test_send_raw_method() {
        let (api, mock) = api(MockTransport::new().reply_json(
            404,
            json!({ "error": "Not Found", "message": "Cannot PATCH /books/1" }),
        ));

        let outcome = api
            .send(HttpMethod::Patch, "/books/1", Some(json!({ "title": "x" })), None)
            .await
            .unwrap();
        assert_eq!(outcome.status, 404);
        assert_eq!(outcome.message(), Some("Cannot PATCH /books/1"));
        assert_eq!(mock.requests()[0].method, HttpMethod::Patch);
    }

    #[tokio::test]
    async fn test_non_json_body_is_absent() {
        let (api, _) = api(MockTransport::new().reply_raw(404, "<!DOCTYPE html><pre>Cannot PATCH</pre>"));

        let outcome = api.send(HttpMethod::Patch, "/books/1", None, None).await.unwrap();
        assert!(outcome.body.is_none());
        assert!(outcome.message().is_none());
    }
}
