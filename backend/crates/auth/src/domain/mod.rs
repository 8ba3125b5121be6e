//! Domain Layer
//!
//! Entities, value objects, repository traits and the pure
//! authorization rules.

pub mod authorization;
pub mod entity;
pub mod repository;
pub mod value_object;
