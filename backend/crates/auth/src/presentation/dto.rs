//! API DTOs (Data Transfer Objects)

use crate::application::claims::SessionClaims;
use crate::domain::entity::Principal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub company_name: String,
}

/// Shared response for login and register
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub redirect_url: String,
}

// ============================================================================
// Me
// ============================================================================

/// Membership as exposed to the client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipDto {
    pub tenant_slug: String,
    pub tenant_name: String,
    pub role: String,
}

/// Current principal as exposed to the client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalDto {
    pub email: String,
    pub display_name: String,
    pub system_role: String,
    pub memberships: Vec<MembershipDto>,
}

/// GET /me response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PrincipalDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<i64>,
}

impl MeResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
            expires_at_ms: None,
        }
    }

    pub fn for_principal(principal: &Principal, claims: &SessionClaims) -> Self {
        Self {
            authenticated: true,
            user: Some(PrincipalDto {
                email: principal.user.email.as_str().to_string(),
                display_name: principal.user.display_name.clone(),
                system_role: principal.user.system_role.code().to_string(),
                memberships: principal
                    .memberships
                    .iter()
                    .map(|m| MembershipDto {
                        tenant_slug: m.tenant_slug.as_str().to_string(),
                        tenant_name: m.tenant_name.clone(),
                        role: m.membership.role.code().to_string(),
                    })
                    .collect(),
            }),
            expires_at_ms: Some(claims.expires_at_ms),
        }
    }
}

// ============================================================================
// Logout
// ============================================================================

/// Logout response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub success: bool,
}
