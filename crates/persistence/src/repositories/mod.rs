//! Repository implementations for database operations.

pub mod admin;
pub mod audit_log;
pub mod bill;
pub mod customer;
pub mod feedback;
pub mod profile;
pub mod staff;
pub mod tariff;

pub use admin::{AdminAccountChanges, AdminRepository, NewAdminAccount};
pub use audit_log::AuditLogRepository;
pub use bill::{BillChanges, BillRepository, NewBill};
pub use customer::{
    CustomerAccountChanges, CustomerRepository, DeletedCustomer, NewCustomerAccount,
};
pub use feedback::FeedbackRepository;
pub use profile::{ProfileChanges, ProfileRepository};
pub use staff::{NewStaffAccount, StaffAccountChanges, StaffRepository};
pub use tariff::{TariffChanges, TariffRepository};
