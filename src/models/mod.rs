//! Core data structures.

mod record;

pub use record::{Enrichment, ScholarRecord};
