//! Authorization Engine
//!
//! Pure decision functions over a resolved [`Principal`]. No I/O, no
//! clock. Staff bypass is absolute: staff and platform admins pass
//! every tenant check regardless of memberships.

use crate::domain::entity::Principal;
use crate::domain::value_object::TenantRole;

/// Whether the principal may enter the back-office admin area.
pub fn can_access_admin(principal: &Principal) -> bool {
    principal.is_staff()
}

/// Whether the principal may enter the portal of the given tenant.
pub fn can_access_tenant(principal: &Principal, slug: &str) -> bool {
    principal.is_staff() || principal.tenant_role(slug).is_some()
}

/// Whether the principal may change tenant settings and members.
pub fn can_manage_tenant(principal: &Principal, slug: &str) -> bool {
    principal.is_staff()
        || principal
            .tenant_role(slug)
            .is_some_and(|role| role.can_manage())
}

/// Whether the principal may edit case data within the tenant.
pub fn can_edit_case(principal: &Principal, slug: &str) -> bool {
    principal.is_staff()
        || principal
            .tenant_role(slug)
            .is_some_and(|role| role.can_edit())
}

/// Landing page after a successful login. Staff go to the admin area,
/// clients to their first tenant's dashboard, users without any
/// membership to the start page.
pub fn login_redirect_url(principal: &Principal) -> String {
    if principal.is_staff() {
        return "/admin".to_string();
    }
    match principal.primary_membership() {
        Some(m) => format!("/portal/{}/dashboard", m.tenant_slug),
        None => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{MembershipWithTenant, TenantMembership, User};
    use crate::domain::value_object::{Email, Slug, SystemRole};
    use kernel::id::TenantId;
    use platform::password::{ClearTextPassword, HashScheme, StoredPasswordHash};

    fn principal(role: SystemRole, memberships: Vec<(&str, TenantRole)>) -> Principal {
        let hash =
            StoredPasswordHash::hash(&ClearTextPassword::new("Test123!"), HashScheme::Fallback)
                .unwrap();
        let user = User::new(Email::new("t@t.ch").unwrap(), hash, "T", role);
        let user_id = user.id;
        let memberships = memberships
            .into_iter()
            .map(|(slug, tenant_role)| MembershipWithTenant {
                membership: TenantMembership::new(user_id, TenantId::new(), tenant_role),
                tenant_slug: Slug::from_canonical(slug),
                tenant_name: slug.to_string(),
            })
            .collect();
        Principal::new(user, memberships)
    }

    #[test]
    fn test_staff_bypass_is_absolute() {
        let staff = principal(SystemRole::Staff, vec![]);
        assert!(can_access_admin(&staff));
        assert!(can_access_tenant(&staff, "acme-gmbh"));
        assert!(can_manage_tenant(&staff, "acme-gmbh"));
        assert!(can_edit_case(&staff, "acme-gmbh"));
    }

    #[test]
    fn test_member_scoped_to_own_tenant() {
        let member = principal(SystemRole::User, vec![("acme-gmbh", TenantRole::Member)]);
        assert!(!can_access_admin(&member));
        assert!(can_access_tenant(&member, "acme-gmbh"));
        assert!(!can_access_tenant(&member, "other-ag"));
        assert!(!can_manage_tenant(&member, "acme-gmbh"));
        assert!(can_edit_case(&member, "acme-gmbh"));
    }

    #[test]
    fn test_viewer_is_read_only() {
        let viewer = principal(SystemRole::User, vec![("acme-gmbh", TenantRole::Viewer)]);
        assert!(can_access_tenant(&viewer, "acme-gmbh"));
        assert!(!can_edit_case(&viewer, "acme-gmbh"));
        assert!(!can_manage_tenant(&viewer, "acme-gmbh"));
    }

    #[test]
    fn test_owner_manages() {
        let owner = principal(SystemRole::User, vec![("acme-gmbh", TenantRole::Owner)]);
        assert!(can_manage_tenant(&owner, "acme-gmbh"));
        assert!(can_edit_case(&owner, "acme-gmbh"));
    }

    #[test]
    fn test_login_redirect_precedence() {
        let staff_with_membership =
            principal(SystemRole::Admin, vec![("acme-gmbh", TenantRole::Owner)]);
        assert_eq!(login_redirect_url(&staff_with_membership), "/admin");

        let client = principal(SystemRole::User, vec![("acme-gmbh", TenantRole::Owner)]);
        assert_eq!(
            login_redirect_url(&client),
            "/portal/acme-gmbh/dashboard"
        );

        let orphan = principal(SystemRole::User, vec![]);
        assert_eq!(login_redirect_url(&orphan), "/");
    }

    #[test]
    fn test_first_membership_wins() {
        let mut p = principal(
            SystemRole::User,
            vec![
                ("first-ag", TenantRole::Member),
                ("second-ag", TenantRole::Owner),
            ],
        );
        p.memberships[0].membership.created_at = chrono::Utc::now() - chrono::Duration::days(30);
        // oldest membership decides, not vec order
        p.memberships.swap(0, 1);
        assert_eq!(login_redirect_url(&p), "/portal/first-ag/dashboard");
    }
}
