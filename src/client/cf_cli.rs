//! `cf curl` transport
//!
//! Reuses whatever session the operator's `cf` CLI is logged into, so no
//! credentials pass through cf-inventory.

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use tokio::process::Command;

use super::{ResourceFetcher, parse_body};
use crate::error::{ApiError, Result};

/// Default name of the cf CLI binary
pub const DEFAULT_CF_BINARY: &str = "cf";

/// Fetches resources by shelling out to `cf curl <path>`.
#[derive(Debug, Clone)]
pub struct CfCliFetcher {
    binary: String,
}

impl CfCliFetcher {
    /// Create a fetcher invoking the given cf binary.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for CfCliFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_CF_BINARY)
    }
}

#[async_trait]
impl ResourceFetcher for CfCliFetcher {
    async fn get_json(&self, path: &str) -> Result<Value> {
        debug!("{} curl {}", self.binary, path);

        let output = Command::new(&self.binary)
            .arg("curl")
            .arg(path)
            .output()
            .await
            .map_err(|e| ApiError::CommandFailed(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(ApiError::CommandFailed(format!(
                "`{} curl {}` exited with {}: {}",
                self.binary, path, output.status, detail
            ))
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_body(path, &stdout)
    }
}
