//! Command execution context
//!
//! Resolves configuration layers and builds the resource fetcher once, so
//! the collect handler only deals with running the pipeline.

use std::path::PathBuf;

use log::{debug, warn};

use crate::cli::args::{CollectArgs, GlobalOptions, Transport};
use crate::client::{CfCliFetcher, CloudControllerClient, ResourceFetcher};
use crate::collector::{AnonymizationPolicy, CollectSettings};
use crate::config::{self, Config};
use crate::error::{ConfigError, Result};

/// Everything a collection run needs, fully resolved.
pub struct CommandContext {
    /// Transport used for every platform request
    pub fetcher: Box<dyn ResourceFetcher>,
    /// Pipeline settings
    pub settings: CollectSettings,
    /// Report destination
    pub output: PathBuf,
    /// Pretty-print the report
    pub pretty: bool,
}

impl CommandContext {
    /// Resolve settings with precedence CLI flag > environment > config file > default.
    ///
    /// # Errors
    /// Returns error if the config file cannot be loaded or the selected
    /// transport is missing its host or token.
    pub fn new(opts: &GlobalOptions, args: &CollectArgs) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        let settings = resolve_settings(&config, args);
        let output = PathBuf::from(
            args.output
                .clone()
                .unwrap_or_else(|| config.preferences.output.clone()),
        );

        let fetcher: Box<dyn ResourceFetcher> = match args.transport {
            Transport::CfCli => {
                debug!("Using cf CLI transport ({})", args.cf_binary);
                Box::new(CfCliFetcher::new(args.cf_binary.clone()))
            }
            Transport::Http => Box::new(http_client(&config, args)?),
        };

        Ok(Self {
            fetcher,
            settings,
            output,
            pretty: args.pretty,
        })
    }
}

/// Merge CLI overrides onto config-file preferences.
fn resolve_settings(config: &Config, args: &CollectArgs) -> CollectSettings {
    let prefs = &config.preferences;

    CollectSettings {
        page_size: args
            .page_size
            .map(|n| n as usize)
            .unwrap_or(prefs.page_size),
        concurrency: args
            .concurrency
            .map(|n| n as usize)
            .unwrap_or(prefs.concurrency),
        policy: AnonymizationPolicy::new(args.anon_bp_vars, args.bypass_anon),
    }
}

fn http_client(config: &Config, args: &CollectArgs) -> Result<CloudControllerClient> {
    let api_host = args
        .api_host
        .as_deref()
        .or(config.api_host.as_deref())
        .ok_or(ConfigError::MissingApiHost)?;
    let token = args
        .token
        .as_deref()
        .or(config.access_token.as_deref())
        .ok_or(ConfigError::MissingToken)?;
    let rate_limit = args.rate_limit.unwrap_or(config.preferences.rate_limit);

    if let Some(expires_at) = config::token_expiry(token) {
        if config::is_token_expired(token) {
            warn!(
                "Access token expired at {}; requests will likely be rejected. Run `cf oauth-token` for a fresh one.",
                expires_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        } else {
            debug!("Access token valid until {}", expires_at);
        }
    }

    debug!(
        "Using HTTP transport against {} ({} req/s)",
        api_host, rate_limit
    );
    CloudControllerClient::new(api_host, token, rate_limit)
}
