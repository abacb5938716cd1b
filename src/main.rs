//! cf-inventory - read-only app inventory collector for Cloud Foundry

use clap::Parser;

mod cli;
mod client;
mod collector;
mod config;
mod error;
mod output;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let opts = GlobalOptions::from_cli(&cli);

    // RUST_LOG wins over --debug
    let filter = opts.log_filter();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();

    if opts.debug {
        log::debug!("Debug mode enabled");
    }

    match cli.command {
        Commands::Collect(args) => cli::collect::run(&opts, &args).await,
        Commands::Completions { shell } => cli::completions::run(shell),
        Commands::Version => {
            println!("cf-inventory version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
