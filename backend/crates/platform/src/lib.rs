//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random tokens, HMAC, base64url)
//! - Password hashing (Argon2id primary, salted SHA-256 fallback)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
