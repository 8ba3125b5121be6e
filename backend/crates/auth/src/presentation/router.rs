//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::SolarRepository;
use crate::infra::postgres::PgSolarRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgSolarRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create an Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: SolarRepository,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/register", post(handlers::register::<R>))
        .route("/logout", post(handlers::logout_handler::<R>))
        .route("/me", get(handlers::me::<R>))
        .with_state(state)
}
