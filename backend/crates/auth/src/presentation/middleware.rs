//! Request Gate
//!
//! Edge middleware deciding, per request, whether to let a page
//! request through. Three tiers, evaluated in order: public
//! allow-list, unauthenticated redirect to login, role gate for the
//! admin and portal areas. Authorization here runs on the verified
//! claims cookie alone, with no storage round trip; handlers behind
//! the gate resolve the session against the store themselves.
//!
//! A cookie that fails signature or expiry checks counts as no
//! session at all: it is cleared and the request is sent to the
//! login page. The gate never fails open.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::sync::Arc;

use crate::application::claims::{ClaimsError, SessionClaims};
use crate::application::config::AuthConfig;

/// Exact-match public paths
const PUBLIC_PATHS: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/catalog",
    "/calculator",
];

/// Prefix-match public paths. API routes authorize in their handlers,
/// not at the edge; `/routes/` holds the public catalog pages
/// (notaries, accounting, addresses, directors).
const PUBLIC_PREFIXES: &[&str] = &["/api/", "/assets/", "/_static/", "/routes/"];

/// Outcome of gate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through
    Allow,
    /// No usable session; send to login, remembering where the user
    /// wanted to go
    RedirectToLogin {
        original_path: String,
        clear_cookie: bool,
    },
    /// Authenticated but not allowed here
    RedirectToUnauthorized,
}

/// What the gate knows about the request's session, before any role
/// check
#[derive(Debug)]
pub enum GateSession {
    Missing,
    /// Present but failed signature, structure or expiry checks
    Invalid,
    Valid(SessionClaims),
}

/// Pure gate decision. Takes only the request path and the decoded
/// session state.
pub fn evaluate(path: &str, session: &GateSession) -> GateDecision {
    if is_public(path) {
        return GateDecision::Allow;
    }

    let claims = match session {
        GateSession::Missing => {
            return GateDecision::RedirectToLogin {
                original_path: path.to_string(),
                clear_cookie: false,
            };
        }
        GateSession::Invalid => {
            return GateDecision::RedirectToLogin {
                original_path: path.to_string(),
                clear_cookie: true,
            };
        }
        GateSession::Valid(claims) => claims,
    };

    if is_under(path, "/admin") {
        if claims.is_staff() {
            return GateDecision::Allow;
        }
        return GateDecision::RedirectToUnauthorized;
    }

    if let Some(slug) = portal_slug(path) {
        if claims.is_staff() || claims.tenant_role(slug).is_some() {
            return GateDecision::Allow;
        }
        return GateDecision::RedirectToUnauthorized;
    }

    // authenticated request to an unclassified page
    GateDecision::Allow
}

fn is_public(path: &str) -> bool {
    if PUBLIC_PATHS.contains(&path) {
        return true;
    }
    if PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }
    // static assets carry a file extension
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

/// `/admin` and `/admin/...`, but not `/administration`
fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix || path.starts_with(&format!("{}/", prefix))
}

/// Tenant slug from `/portal/{slug}/...` paths
fn portal_slug(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("/portal/")?;
    let slug = rest.split('/').next()?;
    (!slug.is_empty()).then_some(slug)
}

// ============================================================================
// Axum integration
// ============================================================================

/// State for the gate middleware layer
#[derive(Clone)]
pub struct GateState {
    pub config: Arc<AuthConfig>,
}

impl GateState {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }
}

/// Gate middleware for `axum::middleware::from_fn_with_state`
pub async fn request_gate(
    State(state): State<GateState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let session = read_session(request.headers(), &state.config);

    match evaluate(&path, &session) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::RedirectToLogin {
            original_path,
            clear_cookie,
        } => {
            let location = format!("/login?redirect={}", original_path);
            redirect(&location, clear_cookie.then(|| state.config.cookie_config()))
        }
        GateDecision::RedirectToUnauthorized => redirect("/unauthorized", None),
    }
}

fn read_session(headers: &HeaderMap, config: &AuthConfig) -> GateSession {
    let Some(cookie) = platform::cookie::extract_cookie(headers, &config.session_cookie_name)
    else {
        return GateSession::Missing;
    };
    match SessionClaims::decode(&cookie, &config.session_secret, Utc::now()) {
        Ok(claims) => GateSession::Valid(claims),
        Err(error) => {
            if error != ClaimsError::Expired {
                tracing::debug!(%error, "rejecting session cookie");
            }
            GateSession::Invalid
        }
    }
}

fn redirect(location: &str, clear: Option<platform::cookie::CookieConfig>) -> Response {
    let mut response = (StatusCode::TEMPORARY_REDIRECT, ()).into_response();
    if let Ok(value) = location.parse() {
        response.headers_mut().insert(header::LOCATION, value);
    }
    if let Some(cookie_config) = clear {
        response.headers_mut().insert(
            header::SET_COOKIE,
            platform::cookie::clear_cookie_header(&cookie_config),
        );
    }
    response
}
