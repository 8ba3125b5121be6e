//! Presentation Layer
//!
//! HTTP surface: handlers, DTOs, router and the request gate.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{GateDecision, GateSession, GateState, evaluate, request_gate};
pub use router::{auth_router, auth_router_generic};
