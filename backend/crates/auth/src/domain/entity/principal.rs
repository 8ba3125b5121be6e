//! Principal Entity
//!
//! The resolved identity of a request: user plus all tenant
//! memberships. Every authorization decision is a pure function over
//! this value.

use crate::domain::entity::{MembershipWithTenant, User};
use crate::domain::value_object::TenantRole;

#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
    pub memberships: Vec<MembershipWithTenant>,
}

impl Principal {
    pub fn new(user: User, memberships: Vec<MembershipWithTenant>) -> Self {
        Self { user, memberships }
    }

    pub fn is_staff(&self) -> bool {
        self.user.is_staff()
    }

    /// Role the principal holds in the tenant with the given slug.
    pub fn tenant_role(&self, slug: &str) -> Option<TenantRole> {
        self.memberships
            .iter()
            .find(|m| m.tenant_slug == *slug)
            .map(|m| m.membership.role)
    }

    /// First membership by join date, used for the login landing page.
    pub fn primary_membership(&self) -> Option<&MembershipWithTenant> {
        self.memberships
            .iter()
            .min_by_key(|m| m.membership.created_at)
    }
}
