//! Cloud Controller v3 resource models
//!
//! Only the fields the collector reads are modelled. Every field defaults
//! when missing or `null`, so partial platform responses decode cleanly.

use serde::{Deserialize, Deserializer};

mod app;
mod droplet;
mod env;
mod process;

pub use app::AppResource;
pub use droplet::{DetectedBuildpack, DropletResource};
pub use env::{AppEnvResource, ServiceOfferings, VariableMap};
pub use process::ProcessResource;

/// Decode `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
