pub mod membership;
pub mod principal;
pub mod session;
pub mod tenant;
pub mod user;

pub use membership::{MembershipWithTenant, TenantMembership};
pub use principal::Principal;
pub use session::Session;
pub use tenant::Tenant;
pub use user::User;
