//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{AuthConfig, GateState, InMemorySolarRepository, PgSolarRepository};
use axum::{
    Router, http,
    http::{Method, header},
    middleware::from_fn_with_state,
};
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = auth_config()?;
    let gate_state = GateState::new(Arc::new(config.clone()));

    // Storage: PostgreSQL when DATABASE_URL is set, otherwise the
    // in-memory store with demo accounts
    let auth_routes = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            // Startup cleanup: remove expired sessions
            // Errors here should not prevent server startup
            let repo = PgSolarRepository::new(pool);
            match repo.cleanup_expired().await {
                Ok(sessions) => {
                    tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
                }
            }

            auth::auth_router(repo, config)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage with demo accounts");
            let repo = InMemorySolarRepository::new();
            repo.seed_demo()?;
            auth::auth_router_generic(repo, config)
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router. The request gate runs in front of every route;
    // API routes pass through it on the public prefix.
    let app = Router::new()
        .nest("/api/auth", auth_routes)
        .layer(from_fn_with_state(gate_state, auth::request_gate))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Session configuration from the environment. Release builds demand
/// an explicit base64 secret; debug builds fall back to a random one.
fn auth_config() -> anyhow::Result<AuthConfig> {
    match env::var("SESSION_SECRET") {
        Ok(secret_b64) => {
            let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
            let secret: [u8; 32] = secret_bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("SESSION_SECRET must decode to exactly 32 bytes"))?;
            Ok(AuthConfig {
                session_secret: secret,
                ..AuthConfig::default()
            })
        }
        Err(_) if cfg!(debug_assertions) => Ok(AuthConfig::development()),
        Err(_) => Err(anyhow::anyhow!(
            "SESSION_SECRET must be set in production"
        )),
    }
}
