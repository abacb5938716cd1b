//! App listing models

use serde::{Deserialize, Serialize};

/// Lifecycle state of a running app.
pub const STARTED: &str = "STARTED";

/// App entry from a `/v3/apps` listing page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppResource {
    /// App GUID
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub guid: String,

    /// Desired state (`STARTED` or `STOPPED`)
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub state: String,

    /// Build lifecycle
    #[serde(default)]
    pub lifecycle: LifecycleResource,
}

impl AppResource {
    /// Whether the app is in the started/running state.
    pub fn is_started(&self) -> bool {
        self.state == STARTED
    }
}

/// Lifecycle block of an app (`buildpack`, `cnb` or `docker`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleResource {
    /// Lifecycle type
    #[serde(rename = "type", default, deserialize_with = "super::null_as_default")]
    pub kind: String,

    /// Lifecycle data; empty for docker apps
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub data: LifecycleData,
}

/// Requested buildpacks and stack
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleData {
    /// Buildpacks requested for staging, in order
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub buildpacks: Vec<String>,

    /// Target stack
    #[serde(default)]
    pub stack: Option<String>,
}
