//! Droplet models

use serde::{Deserialize, Serialize};

/// Current droplet of an app (`/v3/apps/:guid/droplets/current`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DropletResource {
    /// Buildpacks detected during staging
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub buildpacks: Vec<DetectedBuildpack>,
}

/// Buildpack detected while staging a droplet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedBuildpack {
    /// System buildpack name or URL
    #[serde(default)]
    pub name: Option<String>,

    /// Output of the buildpack's detect script
    #[serde(default)]
    pub detect_output: Option<String>,

    /// Name reported by the buildpack itself
    #[serde(default)]
    pub buildpack_name: Option<String>,

    /// Buildpack version
    #[serde(default)]
    pub version: Option<String>,
}
