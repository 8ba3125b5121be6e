//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{MembershipWithTenant, Session, Tenant, TenantMembership, User};
use crate::domain::value_object::Email;
use crate::error::AuthResult;
use kernel::id::UserId;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create_user(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (emails are stored lowercased)
    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>>;
}

/// Tenant repository trait
#[trait_variant::make(TenantRepository: Send)]
pub trait LocalTenantRepository {
    /// Create a new tenant
    async fn create_tenant(&self, tenant: &Tenant) -> AuthResult<()>;

    /// Find tenant by slug
    async fn find_tenant_by_slug(&self, slug: &str) -> AuthResult<Option<Tenant>>;
}

/// Membership repository trait
#[trait_variant::make(MembershipRepository: Send)]
pub trait LocalMembershipRepository {
    /// Create a membership
    async fn create_membership(&self, membership: &TenantMembership) -> AuthResult<()>;

    /// All memberships of a user, joined with tenant slug and name,
    /// ordered by join date ascending
    async fn list_memberships(&self, user_id: &UserId) -> AuthResult<Vec<MembershipWithTenant>>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Persist a new session
    async fn create_session(&self, session: &Session) -> AuthResult<()>;

    /// Look up a session by token. Returns expired sessions too; the
    /// caller decides whether to self-heal.
    async fn find_session(&self, token: &str) -> AuthResult<Option<Session>>;

    /// Delete a session. Deleting a missing token is not an error.
    async fn delete_session(&self, token: &str) -> AuthResult<()>;
}

/// Unit of work for registration. User, tenant and owner membership
/// are created together or not at all.
#[trait_variant::make(RegistrationUnitOfWork: Send)]
pub trait LocalRegistrationUnitOfWork {
    async fn create_account(
        &self,
        user: &User,
        tenant: &Tenant,
        membership: &TenantMembership,
    ) -> AuthResult<()>;
}

/// Everything the auth use cases need from storage.
pub trait SolarRepository:
    UserRepository
    + TenantRepository
    + MembershipRepository
    + SessionRepository
    + RegistrationUnitOfWork
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> SolarRepository for T where
    T: UserRepository
        + TenantRepository
        + MembershipRepository
        + SessionRepository
        + RegistrationUnitOfWork
        + Clone
        + Send
        + Sync
        + 'static
{
}
