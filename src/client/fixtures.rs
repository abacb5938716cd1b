//! Test fixtures for Cloud Controller response bodies
//!
//! Import via `use crate::client::fixtures::*` in test modules.

use serde_json::{Value, json};

// ============================================================================
// Listing pages
// ============================================================================

/// Build a `/v3/apps` page of buildpack apps from `(guid, state)` pairs.
pub fn apps_page(apps: &[(&str, &str)], total_pages: Option<usize>, has_next: bool) -> Value {
    let resources: Vec<Value> = apps
        .iter()
        .map(|(guid, state)| AppBuilder::new(*guid).state(*state).build())
        .collect();

    json!({
        "pagination": {
            "total_results": resources.len(),
            "total_pages": total_pages,
            "next": if has_next { json!({ "href": "https://api.example.com/v3/apps?page=next" }) } else { Value::Null },
        },
        "resources": resources,
    })
}

// ============================================================================
// AppBuilder
// ============================================================================

/// Builder for a single `/v3/apps` listing entry.
///
/// # Example
/// ```ignore
/// let app = AppBuilder::new("app-1")
///     .buildpacks(&["java_buildpack"])
///     .stack("cflinuxfs4")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct AppBuilder {
    guid: String,
    state: String,
    lifecycle_type: String,
    buildpacks: Vec<String>,
    stack: Option<String>,
}

impl AppBuilder {
    /// Create a started buildpack app with the given GUID.
    pub fn new(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            state: "STARTED".to_string(),
            lifecycle_type: "buildpack".to_string(),
            buildpacks: Vec::new(),
            stack: Some("cflinuxfs4".to_string()),
        }
    }

    /// Set the app state.
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Make this a docker app.
    pub fn docker(mut self) -> Self {
        self.lifecycle_type = "docker".to_string();
        self.buildpacks.clear();
        self.stack = None;
        self
    }

    /// Set requested buildpacks.
    pub fn buildpacks(mut self, buildpacks: &[&str]) -> Self {
        self.buildpacks = buildpacks.iter().map(|b| b.to_string()).collect();
        self
    }

    /// Set the stack.
    pub fn stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Build the listing entry.
    pub fn build(self) -> Value {
        let data = if self.lifecycle_type == "docker" {
            json!({})
        } else {
            json!({ "buildpacks": self.buildpacks, "stack": self.stack })
        };

        json!({
            "guid": self.guid,
            "name": format!("name-of-{}", self.guid),
            "state": self.state,
            "lifecycle": { "type": self.lifecycle_type, "data": data },
        })
    }
}

// ============================================================================
// Per-app resources
// ============================================================================

/// Current droplet body with the given detected buildpack names.
pub fn droplet(buildpacks: &[&str]) -> Value {
    let buildpacks: Vec<Value> = buildpacks
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "detect_output": "detected",
                "buildpack_name": name,
                "version": "1.0.0",
            })
        })
        .collect();
    json!({ "guid": "droplet-guid", "state": "STAGED", "buildpacks": buildpacks })
}

/// Environment body with one scope per argument and no services.
pub fn env(staging: Value, running: Value, app: Value) -> Value {
    json!({
        "staging_env_json": staging,
        "running_env_json": running,
        "environment_variables": app,
        "system_env_json": { "VCAP_SERVICES": {} },
        "application_env_json": { "VCAP_APPLICATION": { "name": "redacted" } },
    })
}

/// Web process body with the given start command.
pub fn process(command: &str) -> Value {
    json!({ "type": "web", "command": command, "instances": 1 })
}
