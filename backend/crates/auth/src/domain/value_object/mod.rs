//! Value Objects

pub mod email;
pub mod slug;
pub mod system_role;
pub mod tenant_role;
pub mod tenant_status;

pub use email::Email;
pub use slug::Slug;
pub use system_role::SystemRole;
pub use tenant_role::TenantRole;
pub use tenant_status::TenantStatus;
