//! Session Entity
//!
//! Server-side session record. The token is an opaque random value;
//! expiry is fixed at creation and never renewed.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use platform::crypto;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Issues a fresh session with a random token and a fixed lifetime.
    pub fn issue(user_id: UserId, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: crypto::random_token(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sets_fixed_expiry() {
        let session = Session::issue(UserId::new(), Duration::days(7));
        let lifetime = session.expires_at - session.created_at;
        assert_eq!(lifetime, Duration::days(7));
        assert!(!session.is_expired());
        assert_eq!(session.token.len(), 64);
    }

    #[test]
    fn test_expiry_boundary() {
        let session = Session::issue(UserId::new(), Duration::days(7));
        assert!(session.is_expired_at(session.expires_at));
        assert!(!session.is_expired_at(session.expires_at - Duration::seconds(1)));
    }
}
