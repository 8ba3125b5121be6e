//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{MembershipWithTenant, Session, Tenant, TenantMembership, User};
use crate::domain::repository::{
    MembershipRepository, RegistrationUnitOfWork, SessionRepository, TenantRepository,
    UserRepository,
};
use crate::domain::value_object::{Email, Slug, SystemRole, TenantRole, TenantStatus};
use crate::error::{AuthError, AuthResult};
use kernel::id::{MembershipId, TenantId, UserId};
use platform::password::StoredPasswordHash;

/// PostgreSQL-backed repository for users, tenants, memberships and
/// sessions.
#[derive(Clone)]
pub struct PgSolarRepository {
    pool: PgPool,
}

impl PgSolarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions. Resolution self-heals lazily; this
    /// sweep exists for sessions nobody presents again.
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgSolarRepository {
    async fn create_user(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, email, password_hash, display_name, system_role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(&user.display_name)
        .bind(user.system_role.id())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_user_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, password_hash, display_name, system_role, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, password_hash, display_name, system_role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }
}

// ============================================================================
// Tenant Repository Implementation
// ============================================================================

impl TenantRepository for PgSolarRepository {
    async fn create_tenant(&self, tenant: &Tenant) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tenants (tenant_id, name, slug, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(tenant.id.as_uuid())
        .bind(&tenant.name)
        .bind(tenant.slug.as_str())
        .bind(tenant.status.id())
        .bind(tenant.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_tenant_by_slug(&self, slug: &str) -> AuthResult<Option<Tenant>> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT tenant_id, name, slug, status, created_at
            FROM tenants
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_tenant()).transpose()
    }
}

// ============================================================================
// Membership Repository Implementation
// ============================================================================

impl MembershipRepository for PgSolarRepository {
    async fn create_membership(&self, membership: &TenantMembership) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO memberships (membership_id, user_id, tenant_id, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(membership.id.as_uuid())
        .bind(membership.user_id.as_uuid())
        .bind(membership.tenant_id.as_uuid())
        .bind(membership.role.id())
        .bind(membership.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn list_memberships(&self, user_id: &UserId) -> AuthResult<Vec<MembershipWithTenant>> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT
                m.membership_id, m.user_id, m.tenant_id, m.role, m.created_at,
                t.slug AS tenant_slug, t.name AS tenant_name
            FROM memberships m
            JOIN tenants t ON t.tenant_id = m.tenant_id
            WHERE m.user_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_membership()).collect()
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgSolarRepository {
    async fn create_session(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&session.token)
        .bind(session.user_id.as_uuid())
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, token: &str) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT token, user_id, created_at, expires_at
            FROM sessions
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_session()))
    }

    async fn delete_session(&self, token: &str) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Registration Unit of Work
// ============================================================================

impl RegistrationUnitOfWork for PgSolarRepository {
    async fn create_account(
        &self,
        user: &User,
        tenant: &Tenant,
        membership: &TenantMembership,
    ) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (user_id, email, password_hash, display_name, system_role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(&user.display_name)
        .bind(user.system_role.id())
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO tenants (tenant_id, name, slug, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(tenant.id.as_uuid())
        .bind(&tenant.name)
        .bind(tenant.slug.as_str())
        .bind(tenant.status.id())
        .bind(tenant.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            r#"
            INSERT INTO memberships (membership_id, user_id, tenant_id, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(membership.id.as_uuid())
        .bind(membership.user_id.as_uuid())
        .bind(membership.tenant_id.as_uuid())
        .bind(membership.role.id())
        .bind(membership.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Maps unique-constraint violations to the domain conflict they
/// represent, by constraint name.
fn map_unique_violation(error: sqlx::Error) -> AuthError {
    let constraint = match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            db.constraint().map(str::to_string)
        }
        _ => return AuthError::Store(error),
    };
    match constraint.as_deref() {
        Some("users_email_key") => AuthError::EmailTaken,
        Some("tenants_slug_key") => AuthError::SlugTaken,
        _ => AuthError::Store(error),
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    display_name: String,
    system_role: i16,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let email = Email::new(&self.email)
            .map_err(|e| AuthError::Internal(format!("Invalid email in storage: {}", e)))?;
        let password_hash = StoredPasswordHash::from_encoded(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash in storage: {}", e)))?;

        Ok(User {
            id: UserId::from_uuid(self.user_id),
            email,
            password_hash,
            display_name: self.display_name,
            system_role: SystemRole::from_id(self.system_role).unwrap_or_default(),
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TenantRow {
    tenant_id: Uuid,
    name: String,
    slug: String,
    status: i16,
    created_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self) -> AuthResult<Tenant> {
        Ok(Tenant {
            id: TenantId::from_uuid(self.tenant_id),
            name: self.name,
            slug: Slug::from_canonical(self.slug),
            status: TenantStatus::from_id(self.status).unwrap_or_default(),
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
    membership_id: Uuid,
    user_id: Uuid,
    tenant_id: Uuid,
    role: i16,
    created_at: DateTime<Utc>,
    tenant_slug: String,
    tenant_name: String,
}

impl MembershipRow {
    fn into_membership(self) -> AuthResult<MembershipWithTenant> {
        let role = TenantRole::from_id(self.role)
            .ok_or_else(|| AuthError::Internal(format!("Unknown tenant role: {}", self.role)))?;

        Ok(MembershipWithTenant {
            membership: TenantMembership {
                id: MembershipId::from_uuid(self.membership_id),
                user_id: UserId::from_uuid(self.user_id),
                tenant_id: TenantId::from_uuid(self.tenant_id),
                role,
                created_at: self.created_at,
            },
            tenant_slug: Slug::from_canonical(self.tenant_slug),
            tenant_name: self.tenant_name,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    token: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            token: self.token,
            user_id: UserId::from_uuid(self.user_id),
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}
