//! Configuration management for cf-inventory

use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default number of apps requested per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 5000;

/// Default client-side request budget for the HTTP transport.
pub const DEFAULT_RATE_LIMIT: u32 = 20;

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "output.json";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cloud Controller API base URL (e.g. `https://api.sys.example.com`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// OAuth access token, with or without the `bearer ` prefix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Collection preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// Collection preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Apps requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Concurrent per-app fetches in each enrichment pass
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Requests per second for the HTTP transport
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,

    /// Output file path
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_concurrency() -> usize {
    1
}

fn default_rate_limit() -> u32 {
    DEFAULT_RATE_LIMIT
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            concurrency: default_concurrency(),
            rate_limit: default_rate_limit(),
            output: default_output(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".cf-inventory").join("config.yaml"))
    }

    /// Load configuration from an explicit path, or the default location.
    ///
    /// The config file is optional: a missing default file yields defaults,
    /// while a missing explicit file is an error.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(Path::new(p)),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Reject preference values the collector cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.preferences.page_size == 0 {
            return Err(
                ConfigError::Invalid("page_size must be at least 1".to_string()).into(),
            );
        }
        if self.preferences.concurrency == 0 {
            return Err(
                ConfigError::Invalid("concurrency must be at least 1".to_string()).into(),
            );
        }
        if self.preferences.rate_limit == 0 {
            return Err(
                ConfigError::Invalid("rate_limit must be at least 1".to_string()).into(),
            );
        }
        Ok(())
    }
}

/// Decode the `exp` claim of a JWT access token.
///
/// Accepts tokens with the `bearer ` prefix printed by `cf oauth-token`.
/// Returns `None` for anything that is not a well-formed JWT.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    #[derive(Deserialize)]
    struct Claims {
        exp: i64,
    }

    let raw = strip_bearer(token);
    let payload = raw.split('.').nth(1)?;
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;

    DateTime::from_timestamp(claims.exp, 0)
}

/// Check whether a JWT access token has already expired.
///
/// Opaque tokens are assumed valid; the platform will reject them if not.
pub fn is_token_expired(token: &str) -> bool {
    token_expiry(token).is_some_and(|expires_at| expires_at < Utc::now())
}

/// Remove a leading `bearer ` scheme, case-insensitively.
pub fn strip_bearer(token: &str) -> &str {
    let trimmed = token.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed[7..].trim_start(),
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn jwt_with_exp(exp: i64) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#);
        let payload = general_purpose::URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_host.is_none());
        assert!(config.access_token.is_none());
        assert_eq!(config.preferences.page_size, 5000);
        assert_eq!(config.preferences.concurrency, 1);
        assert_eq!(config.preferences.rate_limit, 20);
        assert_eq!(config.preferences.output, "output.json");
    }

    #[test]
    fn test_load_from_fills_missing_preferences() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "api_host: https://api.sys.example.com\npreferences:\n  concurrency: 4\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.api_host.as_deref(),
            Some("https://api.sys.example.com")
        );
        assert_eq!(config.preferences.concurrency, 4);
        assert_eq!(config.preferences.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_load_at_missing_explicit_path_is_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nope.yaml");

        let err = Config::load_at(path.to_str()).unwrap_err();
        assert!(err.to_string().contains("nope.yaml"));
    }

    #[test]
    fn test_load_rejects_zero_page_size() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "preferences:\n  page_size: 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_load_rejects_malformed_yaml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "preferences: [oops").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_token_expiry_decodes_exp_claim() {
        let token = jwt_with_exp(1_700_000_000);
        let expiry = token_expiry(&token).unwrap();
        assert_eq!(expiry.timestamp(), 1_700_000_000);

        let prefixed = format!("bearer {}", token);
        assert_eq!(token_expiry(&prefixed), Some(expiry));
    }

    #[test]
    fn test_token_expiry_rejects_opaque_tokens() {
        assert!(token_expiry("not-a-jwt").is_none());
        assert!(token_expiry("a.!!!.c").is_none());
        assert!(!is_token_expired("not-a-jwt"));
    }

    #[test]
    fn test_is_token_expired() {
        let past = (Utc::now() - chrono::Duration::hours(1)).timestamp();
        assert!(is_token_expired(&jwt_with_exp(past)));

        let future = (Utc::now() + chrono::Duration::hours(1)).timestamp();
        assert!(!is_token_expired(&jwt_with_exp(future)));
    }

    #[test]
    fn test_strip_bearer() {
        assert_eq!(strip_bearer("bearer abc"), "abc");
        assert_eq!(strip_bearer("Bearer abc"), "abc");
        assert_eq!(strip_bearer("abc"), "abc");
        assert_eq!(strip_bearer("  bearer   abc "), "abc");
    }
}
