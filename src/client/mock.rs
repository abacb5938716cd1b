//! Mock resource fetcher for testing
//!
//! Serves canned JSON bodies by exact path without touching the platform.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::ResourceFetcher;
use crate::error::{ApiError, Result};

/// Mock fetcher for testing.
///
/// Configure responses via builder methods, then hand it to the code under
/// test. Paths without a configured response fail with `NotFound`.
///
/// # Example
/// ```ignore
/// let mock = MockFetcher::new()
///     .with_response("/v3/apps/a/processes/web", json!({ "command": "bin/run" }))
///     .with_failure("/v3/apps/b/env");
/// ```
#[derive(Default)]
pub struct MockFetcher {
    /// Path -> body
    responses: HashMap<String, Value>,
    /// Paths that fail with a server error
    failures: HashSet<String>,
    /// Every path requested, in call order
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a new mock with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `path`.
    pub fn with_response(mut self, path: impl Into<String>, body: Value) -> Self {
        self.responses.insert(path.into(), body);
        self
    }

    /// Fail every request for `path` with a server error.
    pub fn with_failure(mut self, path: impl Into<String>) -> Self {
        self.failures.insert(path.into());
        self
    }

    /// Paths requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of requests made for `path`.
    pub fn call_count(&self, path: &str) -> usize {
        self.calls().iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl ResourceFetcher for MockFetcher {
    async fn get_json(&self, path: &str) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(path.to_string());
        }

        if self.failures.contains(path) {
            let message = format!("mock failure for {}", path);
            return Err(ApiError::ServerError(message).into());
        }

        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(path.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_serves_configured_response() {
        let mock = MockFetcher::new().with_response("/v3/apps", json!({ "resources": [] }));

        let body = mock.get_json("/v3/apps").await.unwrap();
        assert_eq!(body, json!({ "resources": [] }));
        assert_eq!(mock.call_count("/v3/apps"), 1);
    }

    #[tokio::test]
    async fn test_mock_unknown_path_is_not_found() {
        let mock = MockFetcher::new();
        let err = mock.get_json("/v3/apps/x/env").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_mock_failure_takes_precedence() {
        let mock = MockFetcher::new()
            .with_response("/v3/apps", json!({}))
            .with_failure("/v3/apps");

        assert!(mock.get_json("/v3/apps").await.is_err());
        assert_eq!(mock.calls(), vec!["/v3/apps".to_string()]);
    }
}
