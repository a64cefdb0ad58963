use serde::Deserialize;
use tracing::info;

use crate::auth::SessionUser;
use crate::state::AppState;
use crate::store::{NewUser, StoreError};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username / password.";

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 12;
const PASSWORD_MAX: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("{INVALID_CREDENTIALS_MESSAGE}")]
    InvalidCredentials,
    /// Every validation failure for the attempted registration, in rule
    /// order. Surfaced together, never one at a time.
    #[error("registration failed validation")]
    Validation(Vec<String>),
    #[error("password hashing failed")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Verify credentials and return the minimal public fields for the session.
///
/// A missing user and a wrong password are indistinguishable to the caller;
/// only a backend fault propagates separately.
pub async fn login(state: &AppState, form: &LoginForm) -> Result<SessionUser, CredentialError> {
    let user = match state.users.find_by_username(&form.username).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => return Err(CredentialError::InvalidCredentials),
        Err(err) => return Err(err.into()),
    };

    let password_matches = bcrypt::verify(&form.password, &user.password_hash).unwrap_or(false);
    if !password_matches {
        return Err(CredentialError::InvalidCredentials);
    }

    Ok(SessionUser {
        user_id: user.user_id,
        username: user.username,
        avatar_url: user.avatar_url,
    })
}

/// Validate and persist a new user, then kick off the welcome email without
/// waiting on it.
pub async fn register(
    state: &AppState,
    form: &RegisterForm,
) -> Result<SessionUser, CredentialError> {
    let mut errors = validate(form);

    match state.users.find_by_username(&form.username).await {
        Ok(_) => errors.push("That username is already taken.".to_string()),
        Err(StoreError::NotFound) => {}
        Err(err) => return Err(err.into()),
    }

    if state.users.email_exists(&form.email).await? {
        errors.push("That email is already being used.".to_string());
    }

    if !errors.is_empty() {
        return Err(CredentialError::Validation(errors));
    }

    let password_hash = bcrypt::hash(&form.password, bcrypt::DEFAULT_COST)?;
    let user = state
        .users
        .create(NewUser {
            username: form.username.clone(),
            email: form.email.clone(),
            password_hash,
            avatar_url: gravatar_url(&form.email),
        })
        .await?;

    info!("Registered new user {}", user.username);
    state
        .mailer
        .spawn_welcome(user.email.clone(), user.username.clone());

    Ok(SessionUser {
        user_id: user.user_id,
        username: user.username,
        avatar_url: user.avatar_url,
    })
}

/// Collect every rule violation for the attempted registration, in rule
/// order. An empty vec means the form passed.
pub fn validate(form: &RegisterForm) -> Vec<String> {
    let mut errors = Vec::new();

    let username = form.username.trim();
    if username.is_empty() {
        errors.push("You must provide a username.".to_string());
    } else {
        if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
            errors.push("Username can only contain letters and numbers.".to_string());
        }
        if username.len() < USERNAME_MIN {
            errors.push("Username must be at least 3 characters.".to_string());
        }
        if username.len() > USERNAME_MAX {
            errors.push("Username cannot exceed 30 characters.".to_string());
        }
    }

    if !is_plausible_email(form.email.trim()) {
        errors.push("You must provide a valid email address.".to_string());
    }

    if form.password.is_empty() {
        errors.push("You must provide a password.".to_string());
    } else {
        if form.password.len() < PASSWORD_MIN {
            errors.push("Password must be at least 12 characters.".to_string());
        }
        if form.password.len() > PASSWORD_MAX {
            errors.push("Password cannot exceed 50 characters.".to_string());
        }
    }

    errors
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Deterministic avatar URL derived from the email, gravatar style.
pub fn gravatar_url(email: &str) -> String {
    use sha2::{Digest as _, Sha256};

    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();

    format!("https://gravatar.com/avatar/{hex}?s=128")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str, password: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn valid_form_has_no_errors() {
        let errors = validate(&form("alice", "alice@example.com", "correct horse battery"));
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn every_violation_is_collected() {
        // Bad charset, too short, bad email, short password: four messages.
        let errors = validate(&form("a!", "nope", "short"));
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], "Username can only contain letters and numbers.");
        assert_eq!(errors[1], "Username must be at least 3 characters.");
        assert_eq!(errors[2], "You must provide a valid email address.");
        assert_eq!(errors[3], "Password must be at least 12 characters.");
    }

    #[test]
    fn empty_fields_each_report_once() {
        let errors = validate(&form("", "", ""));
        assert_eq!(
            errors,
            vec![
                "You must provide a username.",
                "You must provide a valid email address.",
                "You must provide a password.",
            ]
        );
    }

    #[test]
    fn oversized_fields_are_rejected() {
        let errors = validate(&form(
            &"a".repeat(31),
            "alice@example.com",
            &"p".repeat(51),
        ));
        assert_eq!(
            errors,
            vec![
                "Username cannot exceed 30 characters.",
                "Password cannot exceed 50 characters.",
            ]
        );
    }

    #[test]
    fn gravatar_url_is_stable_and_case_insensitive() {
        let a = gravatar_url("Alice@Example.com");
        let b = gravatar_url("alice@example.com ");
        assert_eq!(a, b);
        assert!(a.starts_with("https://gravatar.com/avatar/"));
    }
}
