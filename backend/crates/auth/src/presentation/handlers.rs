//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use std::sync::Arc;

use crate::application::claims::SessionClaims;
use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, logout, resolve_principal,
};
use crate::domain::repository::SolarRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthResponse, LoginRequest, LogoutResponse, MeResponse, RegisterRequest,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: SolarRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: SolarRepository,
{
    let use_case = LoginUseCase::new((*state.repo).clone(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = platform::cookie::set_cookie_header(&state.config.cookie_config(), &output.cookie_value);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            success: true,
            redirect_url: output.redirect_url,
        }),
    ))
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: SolarRepository,
{
    let use_case = RegisterUseCase::new((*state.repo).clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
            display_name: req.name,
            company_name: req.company_name,
        })
        .await?;

    let cookie = platform::cookie::set_cookie_header(&state.config.cookie_config(), &output.cookie_value);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            success: true,
            redirect_url: output.redirect_url,
        }),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
///
/// Always succeeds and clears the cookie, with or without a valid
/// session.
pub async fn logout_handler<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: SolarRepository,
{
    let token = session_token(&headers, &state);
    logout(&*state.repo, token.as_deref()).await;

    let cookie = platform::cookie::clear_cookie_header(&state.config.cookie_config());

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse { success: true }),
    )
}

// ============================================================================
// Me
// ============================================================================

/// GET /api/auth/me
///
/// Resolves against the store, not just the cookie claims, so a
/// deleted session reads as anonymous even while its cookie is still
/// within its signed lifetime.
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<MeResponse>>
where
    R: SolarRepository,
{
    let Some(claims) = session_claims(&headers, &state) else {
        return Ok(Json(MeResponse::anonymous()));
    };

    match resolve_principal(&*state.repo, &claims.token).await? {
        Some(principal) => Ok(Json(MeResponse::for_principal(&principal, &claims))),
        None => Ok(Json(MeResponse::anonymous())),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn session_claims<R>(headers: &HeaderMap, state: &AuthAppState<R>) -> Option<SessionClaims>
where
    R: SolarRepository,
{
    let cookie = platform::cookie::extract_cookie(headers, &state.config.session_cookie_name)?;
    SessionClaims::decode(&cookie, &state.config.session_secret, Utc::now()).ok()
}

fn session_token<R>(headers: &HeaderMap, state: &AuthAppState<R>) -> Option<String>
where
    R: SolarRepository,
{
    session_claims(headers, state).map(|claims| claims.token)
}
