//! Session Lifecycle
//!
//! Issuing sessions on login/registration and resolving them back to
//! a [`Principal`]. Expired sessions self-heal: the first resolution
//! after expiry deletes the stored record and reports no session.

use crate::application::claims::SessionClaims;
use crate::application::config::AuthConfig;
use crate::domain::entity::{Principal, Session};
use crate::domain::repository::{MembershipRepository, SessionRepository, UserRepository};
use crate::error::AuthResult;
use chrono::Utc;

/// Creates a server-side session for the principal and returns the
/// signed claims cookie value.
pub async fn issue_session<R>(
    repo: &R,
    config: &AuthConfig,
    principal: &Principal,
) -> AuthResult<String>
where
    R: SessionRepository,
{
    let session = Session::issue(principal.user.id, config.session_ttl);
    repo.create_session(&session).await?;
    let claims = SessionClaims::for_principal(principal, session.token.clone(), session.expires_at);
    Ok(claims.encode(&config.session_secret))
}

/// Resolves a session token to its principal. Returns `None` for
/// unknown tokens, for expired sessions (deleting the stale record)
/// and for sessions whose user has vanished.
pub async fn resolve_principal<R>(repo: &R, token: &str) -> AuthResult<Option<Principal>>
where
    R: SessionRepository + UserRepository + MembershipRepository,
{
    let Some(session) = repo.find_session(token).await? else {
        return Ok(None);
    };
    if session.is_expired_at(Utc::now()) {
        repo.delete_session(token).await?;
        return Ok(None);
    }
    let Some(user) = repo.find_user_by_id(&session.user_id).await? else {
        // dangling session, clean it up too
        repo.delete_session(token).await?;
        return Ok(None);
    };
    let memberships = repo.list_memberships(&user.id).await?;
    Ok(Some(Principal::new(user, memberships)))
}
