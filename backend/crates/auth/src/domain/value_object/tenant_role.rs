//! Tenant Role Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a user holds within one tenant. Ordering is by privilege:
/// Owner > Admin > Member > Viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum TenantRole {
    Owner = 0,
    Admin = 1,
    Member = 2,
    Viewer = 3,
}

impl TenantRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            TenantRole::Owner => "OWNER",
            TenantRole::Admin => "ADMIN",
            TenantRole::Member => "MEMBER",
            TenantRole::Viewer => "VIEWER",
        }
    }

    /// Owners and tenant admins may manage tenant settings and members.
    #[inline]
    pub const fn can_manage(&self) -> bool {
        matches!(self, TenantRole::Owner | TenantRole::Admin)
    }

    /// Viewers are read-only; everyone else may edit case data.
    #[inline]
    pub const fn can_edit(&self) -> bool {
        !matches!(self, TenantRole::Viewer)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(TenantRole::Owner),
            1 => Some(TenantRole::Admin),
            2 => Some(TenantRole::Member),
            3 => Some(TenantRole::Viewer),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "OWNER" => Some(TenantRole::Owner),
            "ADMIN" => Some(TenantRole::Admin),
            "MEMBER" => Some(TenantRole::Member),
            "VIEWER" => Some(TenantRole::Viewer),
            _ => None,
        }
    }
}

impl fmt::Display for TenantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
