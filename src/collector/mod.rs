//! App inventory collection
//!
//! Discovery, enrichment and anonymization of started apps.

pub mod aggregate;
pub mod anonymize;
pub mod model;
pub mod pipeline;

pub use anonymize::AnonymizationPolicy;
pub use model::Application;
pub use pipeline::{CollectSettings, Collection, CollectionOutcome, Pipeline};
