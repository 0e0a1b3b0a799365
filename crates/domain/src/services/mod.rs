//! Domain services for the billing backend.
//!
//! Services contain business logic that operates on domain models and stays
//! free of I/O; repositories and handlers compose them.

pub mod audit;
pub mod billing;
pub mod field_policy;

pub use audit::{audit_events, tables as audit_tables, ChangedFields};

pub use billing::{compute_amount, recompute_source, RecomputeSource};

pub use field_policy::{editable_fields, fields as policy_fields, first_rejected_field, EditTarget};
