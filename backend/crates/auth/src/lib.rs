//! Auth (Authentication & Tenant Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, authorization rules
//! - `application/` - Use cases (register, login, logout, session resolution)
//! - `infra/` - PostgreSQL and in-memory store implementations
//! - `presentation/` - HTTP handlers, DTOs, router, request gate middleware
//!
//! ## Features
//! - Email + password login with server-side sessions
//! - Self-service registration creating user, tenant and owner membership
//! - HMAC-signed session claims for store-free edge decisions
//! - System roles (User, Staff, Admin) and tenant roles (Owner, Admin,
//!   Member, Viewer)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (salted SHA-256 fallback)
//! - Session cookie carries signed claims; forged or malformed cookies are
//!   treated as anonymous (fail closed)
//! - Staff bypass is the only authorization override in the system

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::InMemorySolarRepository;
pub use infra::postgres::PgSolarRepository;
pub use presentation::middleware::{GateState, request_gate};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
