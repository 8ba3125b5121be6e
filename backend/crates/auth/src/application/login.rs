//! Login Use Case
//!
//! Authenticates by email and password and issues a session. Unknown
//! email and wrong password produce the identical error so responses
//! carry no user-enumeration signal.

use crate::application::config::AuthConfig;
use crate::application::session::issue_session;
use crate::domain::authorization;
use crate::domain::entity::Principal;
use crate::domain::repository::{MembershipRepository, SessionRepository, UserRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};
use platform::password::ClearTextPassword;
use std::sync::Arc;

#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub cookie_value: String,
    pub redirect_url: String,
}

pub struct LoginUseCase<R> {
    repo: R,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository + MembershipRepository + SessionRepository,
{
    pub fn new(repo: R, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::validation(
                "fields",
                "Alle Felder sind erforderlich",
            ));
        }

        // a malformed address is bad input, not a credential failure;
        // it depends only on the input itself so nothing is enumerated
        let email = Email::new(input.email.as_str())
            .map_err(|_| AuthError::validation("email", "Ungültige E-Mail-Adresse"))?;
        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = ClearTextPassword::new(input.password.as_str());
        if !user.verify_password(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let memberships = self.repo.list_memberships(&user.id).await?;
        let principal = Principal::new(user, memberships);
        let redirect_url = authorization::login_redirect_url(&principal);
        let cookie_value = issue_session(&self.repo, &self.config, &principal).await?;

        Ok(LoginOutput {
            cookie_value,
            redirect_url,
        })
    }
}
