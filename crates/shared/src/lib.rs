//! Shared utilities and common types for the billing backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT token issuance and validation (HS256)
//! - Password hashing with Argon2id
//! - Common validation logic
//! - Page/limit pagination helpers

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
