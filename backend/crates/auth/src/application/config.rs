//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;
pub use platform::password::HashScheme;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Secret key for HMAC signing of the claims cookie (32 bytes)
    pub session_secret: [u8; 32],
    /// Fixed session lifetime. Sessions are never renewed.
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Scheme used when hashing new passwords. Verification always
    /// accepts both schemes.
    pub password_scheme: HashScheme,
}

// A config never carries a guessable signing key: the default draws a
// fresh random secret, callers override it with a deployed one.
impl Default for AuthConfig {
    fn default() -> Self {
        Self::with_random_secret()
    }
}

impl AuthConfig {
    /// Create config with a random session secret
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_cookie_name: "solar_session".to_string(),
            session_secret: secret,
            session_ttl: Duration::days(7),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_scheme: HashScheme::Primary,
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Cookie settings derived from this config
    pub fn cookie_config(&self) -> platform::cookie::CookieConfig {
        platform::cookie::CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.num_seconds()),
        }
    }
}
