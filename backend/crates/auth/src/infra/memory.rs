//! In-Memory Repository
//!
//! Storage backend for development and tests. All maps live behind a
//! single lock so the registration unit of work can check and insert
//! atomically.

use crate::domain::entity::{MembershipWithTenant, Session, Tenant, TenantMembership, User};
use crate::domain::repository::{
    MembershipRepository, RegistrationUnitOfWork, SessionRepository, TenantRepository,
    UserRepository,
};
use crate::domain::value_object::{Email, Slug, SystemRole, TenantRole};
use crate::error::{AuthError, AuthResult};
use kernel::id::{TenantId, UserId};
use platform::password::{ClearTextPassword, HashScheme, StoredPasswordHash};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Store {
    users: HashMap<UserId, User>,
    tenants: HashMap<TenantId, Tenant>,
    memberships: Vec<TenantMembership>,
    sessions: HashMap<String, Session>,
}

#[derive(Clone, Default)]
pub struct InMemorySolarRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemorySolarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AuthResult<RwLockReadGuard<'_, Store>> {
        self.store
            .read()
            .map_err(|_| AuthError::Internal("storage lock poisoned".to_string()))
    }

    fn write(&self) -> AuthResult<RwLockWriteGuard<'_, Store>> {
        self.store
            .write()
            .map_err(|_| AuthError::Internal("storage lock poisoned".to_string()))
    }

    /// Seeds the demo accounts used by local development: a staff
    /// admin and one client tenant with its owner. Demo credentials
    /// use the fallback hash scheme so startup stays fast.
    pub fn seed_demo(&self) -> AuthResult<()> {
        let admin = User::new(
            Email::new("admin@solar.ch")?,
            StoredPasswordHash::hash(&ClearTextPassword::new("Admin123!"), HashScheme::Fallback)?,
            "Solar Admin",
            SystemRole::Admin,
        );

        let client = User::new(
            Email::new("client@acme.ch")?,
            StoredPasswordHash::hash(&ClearTextPassword::new("Client123!"), HashScheme::Fallback)?,
            "Acme Client",
            SystemRole::User,
        );
        let tenant = Tenant::new("Acme GmbH", Slug::from_name("Acme GmbH"));
        let membership = TenantMembership::new(client.id, tenant.id, TenantRole::Owner);

        let mut store = self.write()?;
        store.users.insert(admin.id, admin);
        store.users.insert(client.id, client);
        store.tenants.insert(tenant.id, tenant);
        store.memberships.push(membership);
        Ok(())
    }
}

impl UserRepository for InMemorySolarRepository {
    async fn create_user(&self, user: &User) -> AuthResult<()> {
        let mut store = self.write()?;
        if store.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        store.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.read()?.users.get(user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }
}

impl TenantRepository for InMemorySolarRepository {
    async fn create_tenant(&self, tenant: &Tenant) -> AuthResult<()> {
        let mut store = self.write()?;
        if store.tenants.values().any(|t| t.slug == tenant.slug) {
            return Err(AuthError::SlugTaken);
        }
        store.tenants.insert(tenant.id, tenant.clone());
        Ok(())
    }

    async fn find_tenant_by_slug(&self, slug: &str) -> AuthResult<Option<Tenant>> {
        Ok(self
            .read()?
            .tenants
            .values()
            .find(|t| t.slug == *slug)
            .cloned())
    }
}

impl MembershipRepository for InMemorySolarRepository {
    async fn create_membership(&self, membership: &TenantMembership) -> AuthResult<()> {
        let mut store = self.write()?;
        if store
            .memberships
            .iter()
            .any(|m| m.user_id == membership.user_id && m.tenant_id == membership.tenant_id)
        {
            return Err(AuthError::Internal("membership already exists".to_string()));
        }
        store.memberships.push(membership.clone());
        Ok(())
    }

    async fn list_memberships(&self, user_id: &UserId) -> AuthResult<Vec<MembershipWithTenant>> {
        let store = self.read()?;
        let mut rows: Vec<MembershipWithTenant> = store
            .memberships
            .iter()
            .filter(|m| m.user_id == *user_id)
            .filter_map(|m| {
                store.tenants.get(&m.tenant_id).map(|t| MembershipWithTenant {
                    membership: m.clone(),
                    tenant_slug: t.slug.clone(),
                    tenant_name: t.name.clone(),
                })
            })
            .collect();
        rows.sort_by_key(|m| m.membership.created_at);
        Ok(rows)
    }
}

impl SessionRepository for InMemorySolarRepository {
    async fn create_session(&self, session: &Session) -> AuthResult<()> {
        self.write()?
            .sessions
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_session(&self, token: &str) -> AuthResult<Option<Session>> {
        Ok(self.read()?.sessions.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> AuthResult<()> {
        self.write()?.sessions.remove(token);
        Ok(())
    }
}

impl RegistrationUnitOfWork for InMemorySolarRepository {
    async fn create_account(
        &self,
        user: &User,
        tenant: &Tenant,
        membership: &TenantMembership,
    ) -> AuthResult<()> {
        let mut store = self.write()?;
        if store.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        if store.tenants.values().any(|t| t.slug == tenant.slug) {
            return Err(AuthError::SlugTaken);
        }
        store.users.insert(user.id, user.clone());
        store.tenants.insert(tenant.id, tenant.clone());
        store.memberships.push(membership.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_demo_accounts() {
        let repo = InMemorySolarRepository::new();
        repo.seed_demo().unwrap();

        let admin = repo
            .find_user_by_email(&Email::new("admin@solar.ch").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_staff());

        let client = repo
            .find_user_by_email(&Email::new("client@acme.ch").unwrap())
            .await
            .unwrap()
            .unwrap();
        let memberships = repo.list_memberships(&client.id).await.unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].tenant_slug, *"acme-gmbh");
        assert_eq!(memberships[0].membership.role, TenantRole::Owner);
    }

    #[tokio::test]
    async fn test_create_account_rejects_duplicates() {
        let repo = InMemorySolarRepository::new();
        let hash =
            StoredPasswordHash::hash(&ClearTextPassword::new("Test123!"), HashScheme::Fallback)
                .unwrap();
        let user = User::new(
            Email::new("a@b.ch").unwrap(),
            hash.clone(),
            "A",
            SystemRole::User,
        );
        let tenant = Tenant::new("B AG", Slug::from_name("B AG"));
        let membership = TenantMembership::new(user.id, tenant.id, TenantRole::Owner);
        repo.create_account(&user, &tenant, &membership)
            .await
            .unwrap();

        let dup_user = User::new(Email::new("a@b.ch").unwrap(), hash, "A2", SystemRole::User);
        let tenant2 = Tenant::new("C AG", Slug::from_name("C AG"));
        let m2 = TenantMembership::new(dup_user.id, tenant2.id, TenantRole::Owner);
        let err = repo.create_account(&dup_user, &tenant2, &m2).await;
        assert!(matches!(err, Err(AuthError::EmailTaken)));

        // failed unit of work must leave nothing behind
        assert!(repo.find_tenant_by_slug("c-ag").await.unwrap().is_none());
    }
}
