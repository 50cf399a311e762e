//! Error and delete response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::book::BookId;

/// Structured error body returned with 4xx statuses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    /// Only present on unknown-route responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<Value>>,
}

/// Body of a successful `DELETE /books/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub deleted_id: BookId,
}
