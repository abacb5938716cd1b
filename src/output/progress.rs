//! Console progress reporting
//!
//! All progress output goes to stderr so stdout stays clean for piping.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Step and bar reporter for a collection run.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    enabled: bool,
}

impl Progress {
    /// Reporter that draws to stderr.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Reporter that draws nothing.
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Whether anything will be drawn.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Announce a pipeline step, e.g. `[Step 2/4] Fetching droplets...`.
    pub fn step(&self, current: usize, total: usize, message: &str) {
        if self.enabled {
            eprintln!(
                "{} {}",
                format!("[Step {}/{}]", current, total).bold(),
                message
            );
        }
    }

    /// Print a plain status line.
    pub fn note(&self, message: &str) {
        if self.enabled {
            eprintln!("{}", message);
        }
    }

    /// Spinner for listing pages, whose total is only known as it goes.
    pub fn pages(&self, label: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{spinner} Fetching {prefix} page {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix(label.to_string());
        bar
    }

    /// Counter bar for a per-app pass, e.g. `Fetching env 3/10`.
    pub fn items(&self, label: &str, len: usize) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::with_draw_target(Some(len as u64), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("Fetching {prefix} {pos}/{len} [{bar:30}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_prefix(label.to_string());
        bar
    }
}

/// Page counter text; the total is advisory and shown as `?` when unknown.
pub fn page_message(current: usize, total: Option<usize>) -> String {
    match total {
        Some(total) => format!("{}/{}", current, total),
        None => format!("{}/?", current),
    }
}
