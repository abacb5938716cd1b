//! Process models

use serde::{Deserialize, Serialize};

/// Web process of an app (`/v3/apps/:guid/processes/web`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessResource {
    /// Effective start command
    #[serde(default)]
    pub command: Option<String>,
}

impl ProcessResource {
    /// Start command, or an empty string when the platform reports none.
    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or_default()
    }
}
