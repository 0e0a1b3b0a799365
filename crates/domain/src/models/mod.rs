//! Domain models for the billing backend.

pub mod actor;
pub mod admin;
pub mod audit_log;
pub mod bill;
pub mod customer;
pub mod feedback;
pub mod profile;
pub mod staff;
pub mod tariff;

pub use actor::{ActorContext, Role};
pub use admin::AdminAccount;
pub use audit_log::{
    ActionType, AuditDetail, AuditLog, AuditLogPage, CreateAuditLogInput, ListAuditLogsQuery,
};
pub use bill::{Bill, BillStatus, BillWithCustomer};
pub use customer::{CustomerAccount, CustomerStatus};
pub use feedback::{Feedback, FeedbackDetail, FeedbackReply, FeedbackStatus, FeedbackWithCustomer};
pub use profile::Profile;
pub use staff::StaffAccount;
pub use tariff::Tariff;
