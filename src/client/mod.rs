//! Cloud Controller API access
//!
//! Everything the collector knows about the platform goes through the
//! [`ResourceFetcher`] trait: one logical "get the JSON resource at this
//! path" call. Transports implement the trait; the collector never sees
//! whether the bytes came from HTTP or from the `cf` CLI.

use async_trait::async_trait;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Result};

pub mod cf_cli;
pub mod cloud_controller;
#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod parallel;

pub use cf_cli::CfCliFetcher;
pub use cloud_controller::CloudControllerClient;
#[cfg(test)]
pub use mock::MockFetcher;
pub use pagination::Paginator;

/// Single-resource access to the platform API.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch and parse the JSON resource at `path` (query string included).
    ///
    /// Transport failures, non-success statuses and unparseable bodies all
    /// surface as errors.
    async fn get_json(&self, path: &str) -> Result<Value>;
}

/// Fetch a resource and decode it into a typed model.
///
/// A top-level `errors` field in an otherwise successful response is only
/// reported; it never changes control flow. A body that does not match the
/// expected shape is a fetch failure carrying the raw body.
pub async fn fetch_resource<T: DeserializeOwned>(
    fetcher: &dyn ResourceFetcher,
    path: &str,
) -> Result<T> {
    let body = fetcher.get_json(path).await?;
    report_platform_errors(path, &body);

    T::deserialize(&body).map_err(|e| {
        error!("Failed to decode response from {}: {}", path, body);
        ApiError::InvalidResponse(format!(
            "Failed to decode {}: {}. Body was: {}",
            path, e, body
        ))
        .into()
    })
}

/// Surface errors the platform embedded in a response body.
fn report_platform_errors(path: &str, body: &Value) {
    match body.get("errors") {
        None | Some(Value::Null) => {}
        Some(Value::Array(errors)) if errors.is_empty() => {}
        Some(errors) => warn!("Platform reported errors for {}: {}", path, errors),
    }
}

/// Parse a raw response body as JSON, logging the body when it is not.
pub(crate) fn parse_body(path: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| {
        error!("Failed to parse response from {} as JSON:\n{}", path, raw);
        ApiError::InvalidResponse(format!(
            "Failed to parse {} as JSON: {}. Body was: {}",
            path, e, raw
        ))
        .into()
    })
}
