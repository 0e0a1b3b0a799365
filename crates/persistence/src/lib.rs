//! Persistence layer for the billing backend.
//!
//! This crate contains:
//! - Database connection management and actor session binding
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - SQL migrations under `src/migrations`

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod session;
