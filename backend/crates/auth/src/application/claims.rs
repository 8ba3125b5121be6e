//! Session Claims
//!
//! The cookie payload. A compact JSON claims object carrying the
//! session token, the user's system role and tenant memberships, and
//! the expiry, signed with HMAC-SHA256. The edge gate authorizes from
//! the verified claims without a storage round trip; handlers use the
//! embedded token for full server-side resolution.
//!
//! Wire format: `base64url(json) "." base64url(hmac_sha256(secret, json))`.

use crate::domain::entity::Principal;
use crate::domain::value_object::{SystemRole, TenantRole};
use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::crypto;
use serde::{Deserialize, Serialize};

/// Tenant access carried in the cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantClaim {
    pub slug: String,
    pub role: TenantRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Opaque server-side session token
    pub token: String,
    pub user_id: UserId,
    pub system_role: SystemRole,
    pub tenants: Vec<TenantClaim>,
    /// Unix millis; the gate rejects expired claims without asking
    /// the store
    pub expires_at_ms: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("malformed claims cookie")]
    Malformed,
    #[error("claims signature mismatch")]
    BadSignature,
    #[error("claims expired")]
    Expired,
}

impl SessionClaims {
    pub fn for_principal(
        principal: &Principal,
        token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: token.into(),
            user_id: principal.user.id,
            system_role: principal.user.system_role,
            tenants: principal
                .memberships
                .iter()
                .map(|m| TenantClaim {
                    slug: m.tenant_slug.as_str().to_string(),
                    role: m.membership.role,
                })
                .collect(),
            expires_at_ms: expires_at.timestamp_millis(),
        }
    }

    pub fn is_staff(&self) -> bool {
        self.system_role.is_staff()
    }

    pub fn tenant_role(&self, slug: &str) -> Option<TenantRole> {
        self.tenants
            .iter()
            .find(|t| t.slug == slug)
            .map(|t| t.role)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.expires_at_ms
    }

    /// Serialize and sign into the cookie value.
    pub fn encode(&self, secret: &[u8; 32]) -> String {
        // serde on these fields cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        let mac = crypto::hmac_sha256(secret, &json);
        format!(
            "{}.{}",
            crypto::to_base64url(&json),
            crypto::to_base64url(&mac)
        )
    }

    /// Verify signature and expiry, then deserialize. Any structural
    /// defect is `Malformed`; a valid structure with a wrong MAC is
    /// `BadSignature`.
    pub fn decode(value: &str, secret: &[u8; 32], now: DateTime<Utc>) -> Result<Self, ClaimsError> {
        let (payload_b64, mac_b64) = value.split_once('.').ok_or(ClaimsError::Malformed)?;
        let json = crypto::from_base64url(payload_b64).map_err(|_| ClaimsError::Malformed)?;
        let mac = crypto::from_base64url(mac_b64).map_err(|_| ClaimsError::Malformed)?;
        if !crypto::hmac_verify(secret, &json, &mac) {
            return Err(ClaimsError::BadSignature);
        }
        let claims: SessionClaims =
            serde_json::from_slice(&json).map_err(|_| ClaimsError::Malformed)?;
        if claims.is_expired_at(now) {
            return Err(ClaimsError::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(expires_at: DateTime<Utc>) -> SessionClaims {
        SessionClaims {
            token: "a".repeat(64),
            user_id: UserId::new(),
            system_role: SystemRole::User,
            tenants: vec![TenantClaim {
                slug: "acme-gmbh".to_string(),
                role: TenantRole::Owner,
            }],
            expires_at_ms: expires_at.timestamp_millis(),
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let secret = [7u8; 32];
        let now = Utc::now();
        let claims = sample(now + Duration::days(7));
        let cookie = claims.encode(&secret);
        let decoded = SessionClaims::decode(&cookie, &secret, now).unwrap();
        assert_eq!(decoded.token, claims.token);
        assert_eq!(decoded.tenant_role("acme-gmbh"), Some(TenantRole::Owner));
        assert_eq!(decoded.tenant_role("other"), None);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = Utc::now();
        let cookie = sample(now + Duration::days(7)).encode(&[7u8; 32]);
        assert_eq!(
            SessionClaims::decode(&cookie, &[8u8; 32], now),
            Err(ClaimsError::BadSignature)
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let secret = [7u8; 32];
        let now = Utc::now();
        let cookie = sample(now + Duration::days(7)).encode(&secret);
        let (payload, mac) = cookie.split_once('.').unwrap();
        // forge a staff role without re-signing
        let mut json = crypto::from_base64url(payload).unwrap();
        let text = String::from_utf8(json.clone()).unwrap();
        json = text.replace("\"USER\"", "\"ADMIN\"").into_bytes();
        let forged = format!("{}.{}", crypto::to_base64url(&json), mac);
        assert_eq!(
            SessionClaims::decode(&forged, &secret, now),
            Err(ClaimsError::BadSignature)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let secret = [7u8; 32];
        let now = Utc::now();
        assert_eq!(
            SessionClaims::decode("not-a-cookie", &secret, now),
            Err(ClaimsError::Malformed)
        );
        assert_eq!(
            SessionClaims::decode("xx.!!", &secret, now),
            Err(ClaimsError::Malformed)
        );
    }

    #[test]
    fn test_expired_claims_rejected() {
        let secret = [7u8; 32];
        let now = Utc::now();
        let cookie = sample(now - Duration::seconds(1)).encode(&secret);
        assert_eq!(
            SessionClaims::decode(&cookie, &secret, now),
            Err(ClaimsError::Expired)
        );
    }
}
