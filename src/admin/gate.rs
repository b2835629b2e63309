//! The single authorization predicate shared by every admin operation.

use crate::model::Principal;

/// Returns `true` only for a present principal with the admin flag.
#[must_use]
pub fn is_authorized(principal: Option<&Principal>) -> bool {
    principal.is_some_and(|principal| principal.is_admin)
}

/// Passes the principal through only when it is authorized, for operations that mutate it.
pub fn admit(principal: Option<&mut Principal>) -> Option<&mut Principal> {
    principal.filter(|principal| principal.is_admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admins_pass() {
        assert!(is_authorized(Some(&Principal::admin("u1", "Ada"))));
        assert!(!is_authorized(Some(&Principal::new("u2", "Bob"))));
        assert!(!is_authorized(None));
    }

    #[test]
    fn admit_filters_non_admins() {
        let mut admin = Principal::admin("u1", "Ada");
        let mut member = Principal::new("u2", "Bob");
        assert!(admit(Some(&mut admin)).is_some());
        assert!(admit(Some(&mut member)).is_none());
        assert!(admit(None).is_none());
    }
}
