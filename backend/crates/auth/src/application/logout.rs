//! Logout Use Case
//!
//! Deletes the server-side session. Logout never fails from the
//! caller's perspective: a missing or already-deleted session still
//! results in a cleared cookie.

use crate::domain::repository::SessionRepository;

pub async fn logout<R>(repo: &R, token: Option<&str>)
where
    R: SessionRepository,
{
    if let Some(token) = token {
        if let Err(error) = repo.delete_session(token).await {
            tracing::warn!(%error, "session deletion failed during logout");
        }
    }
}
