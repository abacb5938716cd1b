//! Anonymization policy
//!
//! Decides, per emitted string, whether the raw value or its SHA-256 digest
//! ends up in the output. The policy is a plain value built once at startup
//! from two operator toggles and never changes during a run.
//!
//! A digest cannot be turned back into the original string, but a known
//! string can still be recognized by computing its digest: `"foo"` always
//! becomes `2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae`.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Buildpack configuration variables reported as `KEY=value` by default.
pub const ALLOWLISTED_VARIABLES: [&str; 12] = [
    "BP_PIP_VERSION",                         // Python buildpack
    "CACHE_NUGET_PACKAGES",                   // .NET Core buildpack
    "EXTENSIONS",                             // PHP buildpack
    "GOVERSION",                              // Go buildpack
    "JBP_CONFIG_COMPONENTS",                  // Java buildpack
    "JBP_CONFIG_SPRING_AUTO_RECONFIGURATION", // Java buildpack
    "JBP_DEFAULT_COMPONENTS",                 // Java buildpack
    "NODE_ENV",                               // Node.js buildpack
    "WEBDIR",                                 // PHP buildpack
    "WEB_CONCURRENCY",                        // Node.js buildpack
    "WEB_MEMORY",                             // Node.js buildpack
    "WEB_SERVER",                             // PHP buildpack
];

/// SHA-256 of `value`, as 64 lowercase hex characters.
pub fn digest(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whether `key` is a buildpack configuration variable.
pub fn is_allowlisted(key: &str) -> bool {
    ALLOWLISTED_VARIABLES.contains(&key)
}

/// Run-wide anonymization settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnonymizationPolicy {
    /// Digest allow-listed variables too, dropping their values
    force_anonymize_allowlisted: bool,
    /// Emit everything raw
    bypass: bool,
}

impl AnonymizationPolicy {
    /// Build the policy from the two operator toggles.
    pub fn new(force_anonymize_allowlisted: bool, bypass: bool) -> Self {
        Self {
            force_anonymize_allowlisted,
            bypass,
        }
    }

    /// Whether allow-listed variables are digested like any other.
    #[cfg(test)]
    pub fn force_anonymize_allowlisted(&self) -> bool {
        self.force_anonymize_allowlisted
    }

    /// Whether hashing is disabled for the run.
    #[cfg(test)]
    pub fn bypass(&self) -> bool {
        self.bypass
    }

    /// Digest `value`, or return it unchanged under bypass.
    ///
    /// Used for app GUIDs and every service binding field.
    pub fn anonymize(&self, value: &str) -> String {
        if self.bypass {
            value.to_string()
        } else {
            digest(value)
        }
    }

    /// Anonymize every string in a list, keeping order.
    pub fn anonymize_all(&self, values: &[String]) -> Vec<String> {
        values.iter().map(|v| self.anonymize(v)).collect()
    }

    /// Render one environment variable for the report.
    ///
    /// Allow-listed keys come out as `KEY=value` unless the operator forced
    /// them to be anonymized. Every other key is reduced to its digest and
    /// the value is dropped; under bypass the key is kept raw instead.
    pub fn render_variable(&self, key: &str, value: &Value) -> String {
        if is_allowlisted(key) && !self.force_anonymize_allowlisted {
            format!("{}={}", key, render_value(value))
        } else {
            self.anonymize(key)
        }
    }
}

/// Strings render bare; any other JSON value as compact JSON text.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
