//! Tenant Entity

use crate::domain::value_object::{Slug, TenantStatus};
use chrono::{DateTime, Utc};
use kernel::id::TenantId;

/// A client company. The slug is the URL-visible identity and is
/// unique across the platform.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub slug: Slug,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
}

impl Tenant {
    pub fn new(name: impl Into<String>, slug: Slug) -> Self {
        Self {
            id: TenantId::new(),
            name: name.into(),
            slug,
            status: TenantStatus::default(),
            created_at: Utc::now(),
        }
    }
}
