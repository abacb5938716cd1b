//! Report records
//!
//! These structs are the output contract: field order here is field order in
//! the written JSON, and optional sections serialize as `null` when the
//! matching fetch never ran.

use serde::Serialize;

use crate::client::models::{AppResource, DetectedBuildpack};

/// One started app and everything collected about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Application {
    /// Raw GUID, used for per-app fetch paths and never written out
    #[serde(skip)]
    pub source_guid: String,

    /// GUID as reported (anonymized unless bypassed)
    pub guid: String,

    /// Requested build lifecycle
    pub lifecycle: Lifecycle,

    /// Buildpacks detected when the current droplet was staged
    pub current_droplet: Option<Droplet>,

    /// Service bindings and environment variable names
    pub env: Option<Environment>,

    /// Recognized start command fragments
    pub process: Option<Process>,
}

impl Application {
    /// Create an un-enriched record for a discovered app.
    pub fn new(
        source_guid: impl Into<String>,
        guid: impl Into<String>,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            source_guid: source_guid.into(),
            guid: guid.into(),
            lifecycle,
            current_droplet: None,
            env: None,
            process: None,
        }
    }

    /// Whether every enrichment pass filled this record.
    pub fn is_fully_enriched(&self) -> bool {
        self.current_droplet.is_some() && self.env.is_some() && self.process.is_some()
    }
}

/// Lifecycle descriptor taken from the listing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lifecycle {
    /// Lifecycle type (`buildpack`, `cnb`, `docker`)
    #[serde(rename = "type")]
    pub kind: String,

    /// Requested buildpacks, in order
    pub buildpacks: Vec<String>,

    /// Target stack
    pub stack: Option<String>,
}

impl From<&AppResource> for Lifecycle {
    fn from(app: &AppResource) -> Self {
        Self {
            kind: app.lifecycle.kind.clone(),
            buildpacks: app.lifecycle.data.buildpacks.clone(),
            stack: app.lifecycle.data.stack.clone(),
        }
    }
}

/// Build lineage of the current droplet.
///
/// Empty for apps that have never staged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Droplet {
    /// Detected buildpacks, in detection order
    pub buildpacks: Vec<DetectedBuildpack>,
}

/// Environment summary of an app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Environment {
    /// Bound service instances
    pub vcap_services: Vec<ServiceBinding>,

    /// Variables visible at staging time
    pub staging_env: Vec<String>,

    /// Variables visible at run time
    pub running_env: Vec<String>,
}

/// One bound service instance; every field is anonymized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceBinding {
    pub name: String,
    pub label: String,
    pub tags: Vec<String>,
}

/// Start command summary of the web process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Process {
    /// Recognized fragments, in allow-list order
    pub command_fragments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unenriched_application_serializes_nulls_in_order() {
        let app = Application::new(
            "raw-guid",
            "reported-guid",
            Lifecycle {
                kind: "buildpack".to_string(),
                buildpacks: vec!["go_buildpack".to_string()],
                stack: Some("cflinuxfs4".to_string()),
            },
        );

        let encoded = serde_json::to_string(&app).unwrap();
        assert_eq!(
            encoded,
            r#"{"guid":"reported-guid","lifecycle":{"type":"buildpack","buildpacks":["go_buildpack"],"stack":"cflinuxfs4"},"current_droplet":null,"env":null,"process":null}"#
        );
        assert!(!encoded.contains("raw-guid"));
        assert!(!app.is_fully_enriched());
    }

    #[test]
    fn test_enriched_application_serializes_sections() {
        let mut app = Application::new("g", "g", Lifecycle::default());
        app.current_droplet = Some(Droplet::default());
        app.env = Some(Environment {
            vcap_services: vec![ServiceBinding {
                name: "n".to_string(),
                label: "l".to_string(),
                tags: vec!["t".to_string()],
            }],
            staging_env: vec!["A".to_string()],
            running_env: vec![],
        });
        app.process = Some(Process::default());

        assert!(app.is_fully_enriched());
        assert_eq!(
            serde_json::to_value(&app).unwrap(),
            json!({
                "guid": "g",
                "lifecycle": { "type": "", "buildpacks": [], "stack": null },
                "current_droplet": { "buildpacks": [] },
                "env": {
                    "vcap_services": [ { "name": "n", "label": "l", "tags": ["t"] } ],
                    "staging_env": ["A"],
                    "running_env": []
                },
                "process": { "command_fragments": [] }
            })
        );
    }
}
