//! Normalized API reference documents.
//!
//! Stored documents come from scrapers of varying quality, so every field
//! that may be absent on disk has an explicit default here.

pub mod types;

pub use types::{Category, Document, Endpoint, Parameter};
