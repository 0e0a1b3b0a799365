//! HTTP route handlers.

pub mod admins;
pub mod audit_logs;
pub mod auth;
pub mod bills;
pub mod customers;
pub mod feedback;
pub mod health;
pub mod profiles;
pub mod staff;
pub mod tariffs;
