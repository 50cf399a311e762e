//! Book model for the suite

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::validator::canonical_number;

/// Server-assigned book identifier
///
/// The service may return identifiers as numbers or strings. Both
/// deserialize to the same canonical text, so `BookId` comparisons never
/// depend on which form the server chose.
///
/// # Example
///
/// ```rust
/// use book_library_suite::models::BookId;
///
/// let from_number: BookId = serde_json::from_str("17").unwrap();
/// let from_string: BookId = serde_json::from_str("\"17\"").unwrap();
/// assert_eq!(from_number, from_string);
/// assert_eq!(from_number, BookId::from(17u64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical text of an identifier value, if it is a number or a non-empty string
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(canonical_number(n))),
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for BookId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        BookId::from_value(&value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "book id must be a number or a non-empty string, got {}",
                value
            ))
        })
    }
}

/// Book as returned by the service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default)]
    pub published_year: Option<i64>,
    pub available: bool,
}

impl Book {
    /// Whether every field submitted in `payload` is reflected here
    ///
    /// Fields the payload left out (server defaults) are not compared.
    pub fn matches(&self, payload: &NewBook) -> bool {
        self.title == payload.title
            && self.author == payload.author
            && self.isbn == payload.isbn
            && payload
                .published_year
                .is_none_or(|year| self.published_year == Some(year))
            && payload.available.is_none_or(|available| self.available == available)
    }

    /// This book with `update` applied, as the server should report it
    pub fn merged(&self, update: &BookUpdate) -> Book {
        Book {
            id: self.id.clone(),
            title: update.title.clone().unwrap_or_else(|| self.title.clone()),
            author: update.author.clone().unwrap_or_else(|| self.author.clone()),
            isbn: update.isbn.clone().unwrap_or_else(|| self.isbn.clone()),
            published_year: update.published_year.or(self.published_year),
            available: update.available.unwrap_or(self.available),
        }
    }
}

/// Payload for `POST /books`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, isbn: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            published_year: None,
            available: None,
        }
    }

    pub fn with_published_year(mut self, year: i64) -> Self {
        self.published_year = Some(year);
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }
}

/// Partial payload for `PUT /books/{id}`; unset fields are omitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl BookUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn published_year(mut self, year: i64) -> Self {
        self.published_year = Some(year);
        self
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
