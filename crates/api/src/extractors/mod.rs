//! Custom Axum extractors.
//!
//! Extractors for parsing and validating request data.

pub mod actor;

pub use actor::Actor;
