//! JSON report encoding and persistence

use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Encode the report as a JSON array.
///
/// Compact by default, matching what downstream ingestion expects.
pub fn format_json<T: Serialize>(data: &[T], pretty: bool) -> Result<String> {
    let encoded = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    Ok(encoded)
}

/// Write the whole report to `path` in one go.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)?;
    Ok(())
}
