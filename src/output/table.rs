//! Table output formatting

use std::collections::BTreeMap;

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::collector::Application;

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// One row of the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct LifecycleSummary {
    #[tabled(rename = "LIFECYCLE")]
    pub lifecycle: String,

    #[tabled(rename = "STACK")]
    pub stack: String,

    #[tabled(rename = "APPS")]
    pub apps: usize,

    #[tabled(rename = "ENRICHED")]
    pub enriched: usize,
}

/// Group collected apps by lifecycle type and stack.
pub fn summarize(apps: &[Application]) -> Vec<LifecycleSummary> {
    let mut groups: BTreeMap<(String, String), (usize, usize)> = BTreeMap::new();

    for app in apps {
        let key = (
            display_or_dash(&app.lifecycle.kind),
            display_or_dash(app.lifecycle.stack.as_deref().unwrap_or_default()),
        );
        let entry = groups.entry(key).or_default();
        entry.0 += 1;
        if app.is_fully_enriched() {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|((lifecycle, stack), (apps, enriched))| LifecycleSummary {
            lifecycle,
            stack,
            apps,
            enriched,
        })
        .collect()
}

fn display_or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
