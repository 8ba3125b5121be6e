//! User Entity

use crate::domain::value_object::{Email, SystemRole};
use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::StoredPasswordHash;

/// A platform account. The password hash never leaves this entity
/// except through [`verify_password`](Self::verify_password).
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password_hash: StoredPasswordHash,
    pub display_name: String,
    pub system_role: SystemRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: Email,
        password_hash: StoredPasswordHash,
        display_name: impl Into<String>,
        system_role: SystemRole,
    ) -> Self {
        Self {
            id: UserId::new(),
            email,
            password_hash,
            display_name: display_name.into(),
            system_role,
            created_at: Utc::now(),
        }
    }

    pub fn verify_password(&self, candidate: &platform::password::ClearTextPassword) -> bool {
        self.password_hash.verify(candidate)
    }

    pub fn is_staff(&self) -> bool {
        self.system_role.is_staff()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::{ClearTextPassword, HashScheme};

    #[test]
    fn test_verify_password() {
        let password = ClearTextPassword::new("Geheim123!");
        let hash = StoredPasswordHash::hash(&password, HashScheme::Fallback).unwrap();
        let user = User::new(
            Email::new("a@b.ch").unwrap(),
            hash,
            "A",
            SystemRole::User,
        );
        assert!(user.verify_password(&ClearTextPassword::new("Geheim123!")));
        assert!(!user.verify_password(&ClearTextPassword::new("falsch")));
    }
}
