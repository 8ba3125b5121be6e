//! System Role Value Object
//!
//! Platform-wide role, independent of any tenant. `Staff` and `Admin`
//! bypass tenant-membership checks everywhere; this is the single,
//! deliberate privilege-escalation path in the system.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum SystemRole {
    /// Regular client user; access governed entirely by memberships
    #[default]
    User = 0,
    /// Back-office staff: admin area plus every tenant portal
    Staff = 1,
    /// Platform administrator: same access as Staff
    Admin = 2,
}

impl SystemRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            SystemRole::User => "USER",
            SystemRole::Staff => "STAFF",
            SystemRole::Admin => "ADMIN",
        }
    }

    /// Staff and Admin are both "staff" for authorization purposes
    #[inline]
    pub const fn is_staff(&self) -> bool {
        matches!(self, SystemRole::Staff | SystemRole::Admin)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(SystemRole::User),
            1 => Some(SystemRole::Staff),
            2 => Some(SystemRole::Admin),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "USER" => Some(SystemRole::User),
            "STAFF" => Some(SystemRole::Staff),
            "ADMIN" => Some(SystemRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for SystemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(SystemRole::from_id(0), Some(SystemRole::User));
        assert_eq!(SystemRole::from_id(1), Some(SystemRole::Staff));
        assert_eq!(SystemRole::from_id(2), Some(SystemRole::Admin));
        assert_eq!(SystemRole::from_id(99), None);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(SystemRole::from_code("USER"), Some(SystemRole::User));
        assert_eq!(SystemRole::from_code("STAFF"), Some(SystemRole::Staff));
        assert_eq!(SystemRole::from_code("ADMIN"), Some(SystemRole::Admin));
        assert_eq!(SystemRole::from_code("user"), None);
    }

    #[test]
    fn test_is_staff() {
        assert!(!SystemRole::User.is_staff());
        assert!(SystemRole::Staff.is_staff());
        assert!(SystemRole::Admin.is_staff());
    }

    #[test]
    fn test_serde_codes() {
        assert_eq!(
            serde_json::to_string(&SystemRole::Staff).unwrap(),
            "\"STAFF\""
        );
        let role: SystemRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, SystemRole::Admin);
    }
}
