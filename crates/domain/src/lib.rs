//! Domain layer for the billing backend.
//!
//! This crate contains:
//! - Domain models (Profile, Customer, Bill, Tariff, Feedback, AuditLog)
//! - Pure business logic (billing arithmetic, field policies, audit events)
//!
//! Nothing here performs I/O; persistence and HTTP live in their own crates.

pub mod models;
pub mod services;
