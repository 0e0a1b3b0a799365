//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod admin;
pub mod audit_log;
pub mod bill;
pub mod customer;
pub mod feedback;
pub mod profile;
pub mod staff;
pub mod tariff;

pub use admin::AdminAccountEntity;
pub use audit_log::AuditLogEntity;
pub use bill::{BillEntity, BillWithCustomerEntity};
pub use customer::CustomerAccountEntity;
pub use feedback::{FeedbackEntity, FeedbackReplyEntity, FeedbackWithCustomerEntity};
pub use profile::{ProfileAuthEntity, ProfileEntity};
pub use staff::StaffAccountEntity;
pub use tariff::TariffEntity;
