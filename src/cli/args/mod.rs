//! Shared CLI argument types
//!
//! Argument structs here are flattened into commands or built once in
//! `main.rs` and passed to handlers.

mod collect;
mod global;

pub use collect::{CollectArgs, Transport};
pub use global::GlobalOptions;
