//! Tenant Slug Value Object
//!
//! URL-safe tenant identifier derived from the company name. German
//! umlauts are transliterated (ae/oe/ue/ss) before slugification, so
//! "Müller GmbH" becomes "mueller-gmbh".

use serde::{Deserialize, Serialize};
use std::fmt;

/// URL-safe tenant slug
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a display name
    ///
    /// The result may collide with an existing tenant; collision
    /// disambiguation (numeric suffix) is the registration flow's job.
    pub fn from_name(name: &str) -> Self {
        let mut out = String::with_capacity(name.len());
        let mut last_dash = true; // suppress leading dash

        for ch in name.chars() {
            match ch {
                'ä' | 'Ä' => {
                    out.push_str("ae");
                    last_dash = false;
                }
                'ö' | 'Ö' => {
                    out.push_str("oe");
                    last_dash = false;
                }
                'ü' | 'Ü' => {
                    out.push_str("ue");
                    last_dash = false;
                }
                'ß' => {
                    out.push_str("ss");
                    last_dash = false;
                }
                c if c.is_ascii_alphanumeric() => {
                    out.push(c.to_ascii_lowercase());
                    last_dash = false;
                }
                _ => {
                    if !last_dash {
                        out.push('-');
                        last_dash = true;
                    }
                }
            }
        }

        // Trim trailing dash
        while out.ends_with('-') {
            out.pop();
        }

        Self(out)
    }

    /// Wrap an already-canonical slug (e.g., loaded from the store)
    pub fn from_canonical(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Append a numeric disambiguation suffix: `acme-gmbh` -> `acme-gmbh-1`
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{}", self.0, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Slug {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugification() {
        assert_eq!(Slug::from_name("Acme GmbH").as_str(), "acme-gmbh");
        assert_eq!(Slug::from_name("ACME   AG").as_str(), "acme-ag");
    }

    #[test]
    fn test_umlaut_transliteration() {
        assert_eq!(Slug::from_name("Müller GmbH").as_str(), "mueller-gmbh");
        assert_eq!(Slug::from_name("Bäckerei Höfli").as_str(), "baeckerei-hoefli");
        assert_eq!(Slug::from_name("Straßenbau AG").as_str(), "strassenbau-ag");
    }

    #[test]
    fn test_special_characters_collapse() {
        assert_eq!(Slug::from_name("Acme & Co. AG").as_str(), "acme-co-ag");
        assert_eq!(Slug::from_name("--Acme--").as_str(), "acme");
    }

    #[test]
    fn test_no_leading_or_trailing_dash() {
        let slug = Slug::from_name("  !Acme! ");
        assert!(!slug.as_str().starts_with('-'));
        assert!(!slug.as_str().ends_with('-'));
    }

    #[test]
    fn test_suffix() {
        let base = Slug::from_name("Acme GmbH");
        assert_eq!(base.with_suffix(1).as_str(), "acme-gmbh-1");
        assert_eq!(base.with_suffix(2).as_str(), "acme-gmbh-2");
    }
}
