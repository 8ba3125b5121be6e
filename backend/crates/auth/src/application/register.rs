//! Register Use Case
//!
//! Creates a user, their company tenant and the owner membership in
//! one atomic step, then signs the new user in.

use crate::application::config::AuthConfig;
use crate::application::session::issue_session;
use crate::domain::authorization;
use crate::domain::entity::{Principal, Tenant, TenantMembership, User};
use crate::domain::repository::{
    MembershipRepository, RegistrationUnitOfWork, SessionRepository, TenantRepository,
    UserRepository,
};
use crate::domain::value_object::{Email, Slug, SystemRole, TenantRole};
use crate::error::{AuthError, AuthResult};
use platform::password::{ClearTextPassword, StoredPasswordHash};
use std::sync::Arc;

/// Registration input, unvalidated
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub company_name: String,
}

/// Registration result: an authenticated session plus the signed
/// cookie value and the landing page.
#[derive(Debug)]
pub struct RegisterOutput {
    pub cookie_value: String,
    pub redirect_url: String,
}

/// Slug candidates stop after this many numeric suffixes. A platform
/// with this many name collisions has a different problem.
const MAX_SLUG_ATTEMPTS: u32 = 100;

pub struct RegisterUseCase<R> {
    repo: R,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository
        + TenantRepository
        + MembershipRepository
        + SessionRepository
        + RegistrationUnitOfWork,
{
    pub fn new(repo: R, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let (email, password) = validate(&input)?;

        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let hash = StoredPasswordHash::hash(&password, self.config.password_scheme)?;
        let user = User::new(email, hash, input.display_name.trim(), SystemRole::User);

        let slug = self.free_slug(&input.company_name).await?;
        let tenant = Tenant::new(input.company_name.trim(), slug);
        let membership = TenantMembership::new(user.id, tenant.id, TenantRole::Owner);

        self.repo
            .create_account(&user, &tenant, &membership)
            .await?;

        let memberships = self.repo.list_memberships(&user.id).await?;
        let principal = Principal::new(user, memberships);
        let redirect_url = authorization::login_redirect_url(&principal);
        let cookie_value = issue_session(&self.repo, &self.config, &principal).await?;

        Ok(RegisterOutput {
            cookie_value,
            redirect_url,
        })
    }

    /// First unused slug derived from the company name, appending
    /// `-1`, `-2`, ... on collision.
    async fn free_slug(&self, company_name: &str) -> AuthResult<Slug> {
        let base = Slug::from_name(company_name);
        if self.repo.find_tenant_by_slug(base.as_str()).await?.is_none() {
            return Ok(base);
        }
        for n in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = base.with_suffix(n);
            if self
                .repo
                .find_tenant_by_slug(candidate.as_str())
                .await?
                .is_none()
            {
                return Ok(candidate);
            }
        }
        Err(AuthError::SlugTaken)
    }
}

/// Field validation, short-circuiting on the first failure. Messages
/// are user-facing German.
fn validate(input: &RegisterInput) -> AuthResult<(Email, ClearTextPassword)> {
    if input.email.trim().is_empty()
        || input.password.is_empty()
        || input.display_name.trim().is_empty()
        || input.company_name.trim().is_empty()
    {
        return Err(AuthError::validation(
            "fields",
            "Alle Felder sind erforderlich",
        ));
    }

    let email = Email::new(input.email.as_str())
        .map_err(|_| AuthError::validation("email", "Ungültige E-Mail-Adresse"))?;

    if input.password.chars().count() < 8 {
        return Err(AuthError::validation(
            "password",
            "Das Passwort muss mindestens 8 Zeichen lang sein",
        ));
    }
    let has_upper = input.password.chars().any(|c| c.is_uppercase());
    let has_lower = input.password.chars().any(|c| c.is_lowercase());
    let has_digit = input.password.chars().any(|c| c.is_ascii_digit());
    if !(has_upper && has_lower && has_digit) {
        return Err(AuthError::validation(
            "password",
            "Das Passwort muss Gross- und Kleinbuchstaben sowie eine Zahl enthalten",
        ));
    }

    if input.display_name.trim().chars().count() < 2 {
        return Err(AuthError::validation(
            "name",
            "Der Name muss mindestens 2 Zeichen lang sein",
        ));
    }
    if input.company_name.trim().chars().count() < 2 {
        return Err(AuthError::validation(
            "companyName",
            "Der Firmenname muss mindestens 2 Zeichen lang sein",
        ));
    }

    Ok((email, ClearTextPassword::new(input.password.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str, password: &str, name: &str, company: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            password: password.to_string(),
            display_name: name.to_string(),
            company_name: company.to_string(),
        }
    }

    fn message(result: AuthResult<(Email, ClearTextPassword)>) -> String {
        match result {
            Err(AuthError::Validation { message, .. }) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_required_fields_first() {
        let result = validate(&input("", "short", "", ""));
        assert_eq!(message(result), "Alle Felder sind erforderlich");
    }

    #[test]
    fn test_email_before_password() {
        let result = validate(&input("kein-at-zeichen", "short", "Max", "Acme"));
        assert_eq!(message(result), "Ungültige E-Mail-Adresse");
    }

    #[test]
    fn test_password_length() {
        let result = validate(&input("max@acme.ch", "Ab1", "Max", "Acme"));
        assert_eq!(
            message(result),
            "Das Passwort muss mindestens 8 Zeichen lang sein"
        );
    }

    #[test]
    fn test_password_classes() {
        let result = validate(&input("max@acme.ch", "nurklein123", "Max", "Acme"));
        assert_eq!(
            message(result),
            "Das Passwort muss Gross- und Kleinbuchstaben sowie eine Zahl enthalten"
        );
    }

    #[test]
    fn test_name_lengths() {
        let result = validate(&input("max@acme.ch", "Sicher123", "M", "Acme"));
        assert_eq!(
            message(result),
            "Der Name muss mindestens 2 Zeichen lang sein"
        );
        let result = validate(&input("max@acme.ch", "Sicher123", "Max", "A"));
        assert_eq!(
            message(result),
            "Der Firmenname muss mindestens 2 Zeichen lang sein"
        );
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate(&input("max@acme.ch", "Sicher123", "Max", "Acme GmbH")).is_ok());
    }
}
