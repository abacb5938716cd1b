//! Arguments for the `collect` command

use clap::Args;
use clap::builder::FalseyValueParser;

/// How platform resources are fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Transport {
    /// Shell out to `cf curl`, reusing the cf CLI's login
    #[default]
    CfCli,
    /// Call the Cloud Controller API directly with a bearer token
    Http,
}

/// Options for a collection run.
///
/// Unset options fall back to the config file, then to built-in defaults.
#[derive(Debug, Clone, Args, Default)]
pub struct CollectArgs {
    /// Output file for the JSON report [default: output.json]
    #[arg(long, short)]
    pub output: Option<String>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Apps requested per listing page [default: 5000]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=5000))]
    pub page_size: Option<u64>,

    /// Concurrent per-app fetches in each pass [default: 1]
    #[arg(long, short = 'j', value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: Option<u64>,

    /// How to reach the platform
    #[arg(long, value_enum, default_value_t = Transport::CfCli)]
    pub transport: Transport,

    /// cf CLI binary used by the cf-cli transport
    #[arg(long, default_value = crate::client::cf_cli::DEFAULT_CF_BINARY)]
    pub cf_binary: String,

    /// Cloud Controller API URL for the http transport
    #[arg(long, env = "CF_INVENTORY_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Access token for the http transport (output of `cf oauth-token`)
    #[arg(long, env = "CF_INVENTORY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Requests per second for the http transport [default: 20]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub rate_limit: Option<u32>,

    /// Anonymize allow-listed build variables too
    #[arg(long, env = "ANON_BP_VARS", value_parser = FalseyValueParser::new())]
    pub anon_bp_vars: bool,

    /// Emit every field raw (no anonymization)
    #[arg(long, env = "BYPASS_ANON", value_parser = FalseyValueParser::new())]
    pub bypass_anon: bool,
}
