//! Collect command implementation

use colored::Colorize;
use log::{error, info};

use crate::cli::CommandContext;
use crate::cli::args::{CollectArgs, GlobalOptions};
use crate::collector::aggregate::missing_sections;
use crate::collector::{Collection, CollectionOutcome, Pipeline};
use crate::error::Result;
use crate::output::json::{format_json, write_report};
use crate::output::progress::Progress;
use crate::output::table::{format_table, summarize};

/// Run the collect command.
///
/// Collection failures are reported but never fail the command: whatever was
/// gathered is still written. Only a failure to encode or write the report
/// is an error.
pub async fn run(opts: &GlobalOptions, args: &CollectArgs) -> Result<()> {
    let ctx = CommandContext::new(opts, args)?;
    let progress = Progress::new(opts.show_progress());

    if progress.is_enabled() {
        print_banner();
    }

    let collection = Pipeline::new(ctx.fetcher.as_ref(), ctx.settings, progress)
        .run()
        .await;

    report_outcome(&collection);

    let encoded = format_json(&collection.apps, ctx.pretty)?;
    write_report(&ctx.output, &encoded)?;
    info!(
        "Wrote {} apps to {}",
        collection.apps.len(),
        ctx.output.display()
    );

    if progress.is_enabled() {
        print_summary(&collection, &ctx.output.display().to_string());
    }

    Ok(())
}

fn print_banner() {
    eprintln!(
        "{}",
        "cf-inventory collects a read-only, anonymized inventory of started apps."
            .bold()
    );
    eprintln!(
        "{}",
        "Make sure the cf CLI (or --api-host) targets the desired foundation, logged in as an admin or admin_read_only user."
            .yellow()
    );
    eprintln!();
}

fn report_outcome(collection: &Collection) {
    if let CollectionOutcome::Interrupted { stage, error } = &collection.outcome {
        error!("Collection interrupted while {}: {}", stage, error);
        eprintln!(
            "{} {}",
            format!("Collection stopped while {}:", stage).red().bold(),
            error.to_string().red()
        );
        eprintln!(
            "{}",
            "Writing the partial inventory collected so far.".red()
        );
    }
}

fn print_summary(collection: &Collection, output: &str) {
    let (droplets, envs, processes) = missing_sections(&collection.apps);

    eprintln!();
    eprintln!("{}", format_table(&summarize(&collection.apps)));

    let status = if collection.is_complete() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    eprintln!(
        "{} {} apps written to {} ({} fully enriched)",
        status,
        collection.apps.len(),
        output.cyan(),
        collection.fully_enriched()
    );

    if droplets + envs + processes > 0 {
        eprintln!(
            "  {} missing: droplet {}, env {}, process {}",
            "→".dimmed(),
            droplets,
            envs,
            processes
        );
    }
}
