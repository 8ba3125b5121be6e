pub mod claims;
pub mod config;
pub mod login;
pub mod logout;
pub mod register;
pub mod session;

pub use claims::{ClaimsError, SessionClaims, TenantClaim};
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::logout;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use session::{issue_session, resolve_principal};
