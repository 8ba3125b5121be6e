//! Infrastructure Layer
//!
//! Storage backends implementing the domain repository traits.

pub mod memory;
pub mod postgres;

pub use memory::InMemorySolarRepository;
pub use postgres::PgSolarRepository;
