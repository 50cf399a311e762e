//! Scripted transport for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{RawResponse, RequestDescriptor, Transport, TransportError};

/// A reply the mock hands out for the next request
pub enum MockReply {
    Response(RawResponse),
    ConnectionRefused,
}

/// A mock transport that replays scripted replies in order and records
/// every request it receives
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a JSON reply
    pub fn reply_json(self, status: u16, body: Value) -> Self {
        self.reply_raw(status, body.to_string())
    }

    /// Queue a raw reply
    pub fn reply_raw(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Response(RawResponse::new(status, body)));
        self
    }

    /// Queue a network failure
    pub fn refuse(self) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::ConnectionRefused);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::ConnectionRefused) => Err(TransportError::Connect {
                url: format!("mock://{}", request.path),
                message: "Connection refused".to_string(),
            }),
            None => Err(TransportError::Request {
                url: format!("mock://{}", request.path),
                message: "No scripted reply left".to_string(),
            }),
        }
    }

    fn base_url(&self) -> &str {
        "mock://"
    }
}
