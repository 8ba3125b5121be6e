//! Email Value Object
//!
//! Represents a validated, lowercased email address. Uniqueness is
//! case-insensitive, which is why the canonical form is always lowercase.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    ///
    /// The stored form is trimmed and lowercased, so two registrations
    /// differing only in case map to the same address.
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("Ungültige E-Mail-Adresse"));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AppError::bad_request("Ungültige E-Mail-Adresse"));
        }

        if !Self::is_valid_format(&email) {
            return Err(AppError::bad_request("Ungültige E-Mail-Adresse"));
        }

        Ok(Self(email))
    }

    /// Basic format validation: exactly one `@`, non-empty local part,
    /// and at least one `.` in the domain part.
    fn is_valid_format(email: &str) -> bool {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 {
            return false;
        }

        let local = parts[0];
        let domain = parts[1];

        if local.is_empty() || local.len() > 64 || local.contains(char::is_whitespace) {
            return false;
        }

        if domain.is_empty() || domain.contains(char::is_whitespace) {
            return false;
        }

        // Domain must contain a dot that is neither leading nor trailing
        match domain.find('.') {
            Some(0) => false,
            Some(_) if domain.ends_with('.') => false,
            Some(_) => true,
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(Email::new("admin@solar.ch").is_ok());
        assert!(Email::new("max.mustermann@acme.example.com").is_ok());
        assert!(Email::new("a@b.co").is_ok());
    }

    #[test]
    fn test_lowercased_and_trimmed() {
        let email = Email::new("  Admin@Solar.CH ").unwrap();
        assert_eq!(email.as_str(), "admin@solar.ch");
    }

    #[test]
    fn test_case_insensitive_equality() {
        let a = Email::new("Client@Acme.ch").unwrap();
        let b = Email::new("client@acme.ch").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_emails() {
        assert!(Email::new("").is_err());
        assert!(Email::new("no-at-sign").is_err());
        assert!(Email::new("two@@solar.ch").is_err());
        assert!(Email::new("a@b@c.ch").is_err());
        assert!(Email::new("no-dot@domain").is_err());
        assert!(Email::new("@solar.ch").is_err());
        assert!(Email::new("user@.ch").is_err());
        assert!(Email::new("user@solar.").is_err());
        assert!(Email::new("spaced user@solar.ch").is_err());
    }
}
