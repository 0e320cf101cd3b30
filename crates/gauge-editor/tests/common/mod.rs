//! Scripted in-memory backend shared by the integration tests.

use async_trait::async_trait;
use gauge_editor::{HttpError, HttpTransport};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

struct Reply {
    method: Method,
    path_prefix: String,
    result: Result<Value, HttpError>,
}

/// Replies are matched on method and path prefix and consumed once.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<Vec<Reply>>,
    requests: Mutex<Vec<Request>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(&self, path_prefix: &str, result: Result<Value, HttpError>) -> &Self {
        self.push(Method::Get, path_prefix, result)
    }

    pub fn on_post(&self, path: &str, result: Result<Value, HttpError>) -> &Self {
        self.push(Method::Post, path, result)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn push(&self, method: Method, path_prefix: &str, result: Result<Value, HttpError>) -> &Self {
        self.replies.lock().push(Reply {
            method,
            path_prefix: path_prefix.to_string(),
            result,
        });
        self
    }

    fn reply(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, HttpError> {
        self.requests.lock().push(Request {
            method: method.clone(),
            path: path.to_string(),
            body,
        });

        let mut replies = self.replies.lock();
        let index = replies
            .iter()
            .position(|r| r.method == method && path.starts_with(&r.path_prefix));
        match index {
            Some(index) => replies.remove(index).result,
            None => Err(HttpError::status(404, Some(format!("no reply scripted for {path}")))),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, path: &str) -> Result<Value, HttpError> {
        self.reply(Method::Get, path, None)
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, HttpError> {
        self.reply(Method::Post, path, Some(body))
    }
}
