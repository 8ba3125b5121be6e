//! Tenant Membership Entity

use crate::domain::value_object::TenantRole;
use chrono::{DateTime, Utc};
use kernel::id::{MembershipId, TenantId, UserId};

/// Links a user to a tenant with a role. One row per (user, tenant)
/// pair.
#[derive(Debug, Clone)]
pub struct TenantMembership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub tenant_id: TenantId,
    pub role: TenantRole,
    pub created_at: DateTime<Utc>,
}

impl TenantMembership {
    pub fn new(user_id: UserId, tenant_id: TenantId, role: TenantRole) -> Self {
        Self {
            id: MembershipId::new(),
            user_id,
            tenant_id,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Membership joined with the tenant it refers to. This is what
/// authorization and session claims work with, since checks are
/// against the slug, not the raw tenant id.
#[derive(Debug, Clone)]
pub struct MembershipWithTenant {
    pub membership: TenantMembership,
    pub tenant_slug: crate::domain::value_object::Slug,
    pub tenant_name: String,
}
