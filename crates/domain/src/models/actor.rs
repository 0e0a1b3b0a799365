//! Actor context and roles.
//!
//! Every data-access call receives the authenticated caller's identity as an
//! explicit [`ActorContext`] value. It is built once per request from verified
//! JWT claims and never stored in shared mutable state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of an authenticated actor, mirroring `profiles.profile_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Staff => "Staff",
            Role::Admin => "Admin",
        }
    }

    /// Staff and Admin both count as back-office operators.
    pub fn is_operator(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Customer" => Ok(Role::Customer),
            "Staff" => Ok(Role::Staff),
            "Admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authenticated caller identity, passed explicitly through every
/// row-scoped data operation.
///
/// `profile_id` is `None` only for anonymous flows (self-registration runs
/// before any profile exists). `customer_id` is set for customer actors whose
/// customer row is already known; services fall back to a profile lookup when
/// it is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    pub role: Role,
    pub profile_id: Option<i64>,
    pub customer_id: Option<i64>,
}

impl ActorContext {
    pub fn new(role: Role, profile_id: Option<i64>, customer_id: Option<i64>) -> Self {
        Self {
            role,
            profile_id,
            customer_id,
        }
    }

    /// Context for unauthenticated self-registration. The write itself runs
    /// with administrative scope since no profile exists yet.
    pub fn registration() -> Self {
        Self {
            role: Role::Admin,
            profile_id: None,
            customer_id: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_customer(&self) -> bool {
        self.role == Role::Customer
    }

    /// True when the actor is the profile itself.
    pub fn is_self(&self, profile_id: i64) -> bool {
        self.profile_id == Some(profile_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Customer, Role::Staff, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
        assert!(Role::from_str("Superuser").is_err());
        assert!(Role::from_str("customer").is_err(), "roles are case-sensitive");
    }

    #[test]
    fn role_display_matches_as_str() {
        assert_eq!(format!("{}", Role::Staff), "Staff");
        assert_eq!(format!("{}", Role::Admin), "Admin");
    }

    #[test]
    fn operator_covers_staff_and_admin() {
        assert!(Role::Staff.is_operator());
        assert!(Role::Admin.is_operator());
        assert!(!Role::Customer.is_operator());
    }

    #[test]
    fn registration_context_has_no_profile() {
        let ctx = ActorContext::registration();
        assert_eq!(ctx.role, Role::Admin);
        assert!(ctx.profile_id.is_none());
        assert!(ctx.customer_id.is_none());
    }

    #[test]
    fn is_self_compares_profile_ids() {
        let ctx = ActorContext::new(Role::Customer, Some(7), Some(3));
        assert!(ctx.is_self(7));
        assert!(!ctx.is_self(8));

        let anonymous = ActorContext::registration();
        assert!(!anonymous.is_self(7));
    }
}
