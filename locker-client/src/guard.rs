//! Role gates for the signed-in sections.
//!
//! Kiosk deposit and phone/code pickup are public and never go through here.

use std::fmt;

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Admin,
    Courier,
    Recipient,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Section::Admin => "admin",
            Section::Courier => "courier",
            Section::Recipient => "recipient",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("role {role} may not open the {section} section")]
    Forbidden { role: Role, section: Section },
}

/// Whether `role` may enter `section`. Admins may enter every section.
pub fn allows(role: Role, section: Section) -> bool {
    matches!(
        (role, section),
        (Role::Admin, _) | (Role::Courier, Section::Courier) | (Role::Recipient, Section::Recipient)
    )
}

pub fn check(role: Option<Role>, section: Section) -> Result<(), GuardError> {
    let role = role.ok_or(GuardError::NotSignedIn)?;
    if allows(role, section) {
        Ok(())
    } else {
        Err(GuardError::Forbidden { role, section })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_enters_everything() {
        for section in [Section::Admin, Section::Courier, Section::Recipient] {
            assert!(check(Some(Role::Admin), section).is_ok());
        }
    }

    #[test]
    fn test_roles_are_confined_to_their_section() {
        assert!(check(Some(Role::Courier), Section::Courier).is_ok());
        assert_eq!(
            check(Some(Role::Courier), Section::Admin),
            Err(GuardError::Forbidden {
                role: Role::Courier,
                section: Section::Admin
            })
        );
        assert!(check(Some(Role::Recipient), Section::Recipient).is_ok());
        assert!(check(Some(Role::Recipient), Section::Courier).is_err());
    }

    #[test]
    fn test_no_session() {
        assert_eq!(check(None, Section::Recipient), Err(GuardError::NotSignedIn));
    }
}
