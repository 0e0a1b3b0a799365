//! Role-gated field editing policy for account updates.
//!
//! Which fields an actor may change depends on the entity and the actor's
//! role: customers manage their own contact details but never identity
//! fields, staff identity is Admin-editable only, and the bare profile
//! surface is wholly administrative. Update paths consult these tables
//! instead of branching on role inline; a request naming a field outside the
//! actor's set is rejected whole, so no part of a payload is silently
//! dropped.

use crate::models::actor::Role;

/// Entities whose partial updates are gated per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Profile,
    CustomerAccount,
    StaffAccount,
    AdminAccount,
}

/// Wire-format names of the gated fields.
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const PROFILE_TYPE: &str = "profileType";
    pub const CONTACT: &str = "contact";
    pub const ADDRESS: &str = "address";
    pub const STATUS: &str = "status";
    pub const DATE_OF_BIRTH: &str = "dateOfBirth";
}

use fields::*;

const CUSTOMER_SELF_EDITABLE: &[&str] = &[CONTACT, ADDRESS, DATE_OF_BIRTH];
const CUSTOMER_OPERATOR_EDITABLE: &[&str] =
    &[NAME, EMAIL, CONTACT, ADDRESS, STATUS, DATE_OF_BIRTH];
const STAFF_SELF_EDITABLE: &[&str] = &[CONTACT, ADDRESS];
const STAFF_ADMIN_EDITABLE: &[&str] = &[NAME, EMAIL, CONTACT, ADDRESS];
const ADMIN_EDITABLE: &[&str] = &[NAME, EMAIL];
const PROFILE_ADMIN_EDITABLE: &[&str] = &[NAME, PROFILE_TYPE, EMAIL, PASSWORD];
const NONE_EDITABLE: &[&str] = &[];

/// Fields `role` may change on `target`.
pub fn editable_fields(target: EditTarget, role: Role) -> &'static [&'static str] {
    match (target, role) {
        (EditTarget::CustomerAccount, Role::Customer) => CUSTOMER_SELF_EDITABLE,
        (EditTarget::CustomerAccount, Role::Staff | Role::Admin) => CUSTOMER_OPERATOR_EDITABLE,
        (EditTarget::StaffAccount, Role::Staff) => STAFF_SELF_EDITABLE,
        (EditTarget::StaffAccount, Role::Admin) => STAFF_ADMIN_EDITABLE,
        (EditTarget::AdminAccount, Role::Admin) => ADMIN_EDITABLE,
        (EditTarget::Profile, Role::Admin) => PROFILE_ADMIN_EDITABLE,
        _ => NONE_EDITABLE,
    }
}

/// First requested field `role` may not change on `target`, if any.
pub fn first_rejected_field(
    target: EditTarget,
    role: Role,
    requested: &[&'static str],
) -> Option<&'static str> {
    let allowed = editable_fields(target, role);
    requested.iter().copied().find(|f| !allowed.contains(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_self_edit_excludes_identity_fields() {
        let allowed = editable_fields(EditTarget::CustomerAccount, Role::Customer);

        assert!(allowed.contains(&CONTACT));
        assert!(allowed.contains(&ADDRESS));
        assert!(allowed.contains(&DATE_OF_BIRTH));
        assert!(!allowed.contains(&NAME));
        assert!(!allowed.contains(&EMAIL));
        assert!(!allowed.contains(&STATUS));
    }

    #[test]
    fn operators_edit_customer_identity_and_status() {
        for role in [Role::Staff, Role::Admin] {
            let allowed = editable_fields(EditTarget::CustomerAccount, role);
            assert!(allowed.contains(&NAME));
            assert!(allowed.contains(&EMAIL));
            assert!(allowed.contains(&STATUS));
        }
    }

    #[test]
    fn staff_identity_is_admin_only() {
        assert!(!editable_fields(EditTarget::StaffAccount, Role::Staff).contains(&NAME));
        assert!(editable_fields(EditTarget::StaffAccount, Role::Admin).contains(&NAME));
    }

    #[test]
    fn customers_never_touch_staff_or_profile_surfaces() {
        assert!(editable_fields(EditTarget::StaffAccount, Role::Customer).is_empty());
        assert!(editable_fields(EditTarget::Profile, Role::Customer).is_empty());
        assert!(editable_fields(EditTarget::AdminAccount, Role::Staff).is_empty());
    }

    #[test]
    fn rejection_names_the_offending_field() {
        let rejected = first_rejected_field(
            EditTarget::CustomerAccount,
            Role::Customer,
            &[CONTACT, EMAIL, ADDRESS],
        );
        assert_eq!(rejected, Some(EMAIL));
    }

    #[test]
    fn allowed_request_passes_whole() {
        let rejected = first_rejected_field(
            EditTarget::CustomerAccount,
            Role::Customer,
            &[CONTACT, ADDRESS, DATE_OF_BIRTH],
        );
        assert_eq!(rejected, None);
    }

    #[test]
    fn empty_request_is_never_rejected() {
        assert_eq!(
            first_rejected_field(EditTarget::Profile, Role::Customer, &[]),
            None
        );
    }
}
