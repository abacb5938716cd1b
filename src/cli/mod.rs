//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod collect;
pub mod completions;
pub mod context;

pub use args::{CollectArgs, GlobalOptions};
pub use context::CommandContext;

/// cf-inventory - read-only app inventory collector for Cloud Foundry
#[derive(Parser, Debug)]
#[command(name = "cf-inventory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Override config file location
    #[arg(long, global = true, env = "CF_INVENTORY_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(
        long,
        global = true,
        env = "CF_INVENTORY_DEBUG",
        hide_env = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub debug: bool,

    /// Suppress banner, progress bars and summary
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect started apps and write the anonymized inventory
    Collect(CollectArgs),

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   cf-inventory completions bash > /etc/bash_completion.d/cf-inventory
  zsh:    cf-inventory completions zsh > \"${fpath[1]}/_cf-inventory\"
  fish:   cf-inventory completions fish > ~/.config/fish/completions/cf-inventory.fish")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Display version information
    Version,
}
