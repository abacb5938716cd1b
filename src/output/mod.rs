//! Report encoding and console output

pub mod json;
pub mod progress;
pub mod table;
