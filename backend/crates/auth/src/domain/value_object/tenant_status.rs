//! Tenant Status Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum TenantStatus {
    Pending = 0,
    /// Newly registered tenants start Active
    #[default]
    Active = 1,
    Suspended = 2,
    Closed = 3,
}

impl TenantStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            TenantStatus::Pending => "PENDING",
            TenantStatus::Active => "ACTIVE",
            TenantStatus::Suspended => "SUSPENDED",
            TenantStatus::Closed => "CLOSED",
        }
    }

    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, TenantStatus::Active)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(TenantStatus::Pending),
            1 => Some(TenantStatus::Active),
            2 => Some(TenantStatus::Suspended),
            3 => Some(TenantStatus::Closed),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(TenantStatus::Pending),
            "ACTIVE" => Some(TenantStatus::Active),
            "SUSPENDED" => Some(TenantStatus::Suspended),
            "CLOSED" => Some(TenantStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
