//! Password-based sign-in, registration, and session management commands.
//!
//! Passwords are prompted interactively unless passed via flag, so they
//! stay out of shell history. Registration checks the password
//! confirmation locally — a mismatch never reaches the network.

use anyhow::Result;
use dialoguer::Password;

use crate::client::{self, ApiClient};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::Token;
use crate::session::{self, Session};

/// Local pre-flight check for registration credentials.
pub fn validate_passwords(password: &str, confirm: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::Validation(
            "Please fill in all fields".to_string(),
        ));
    }
    if password != confirm {
        return Err(ApiError::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

/// CLI entry point for `deepr login`.
pub async fn run_login(config: &Config, email: &str, password: Option<&str>) -> Result<()> {
    if email.trim().is_empty() {
        anyhow::bail!("Please fill in all fields");
    }
    let password = match password {
        Some(p) => p.to_string(),
        None => Password::new().with_prompt("Password").interact()?,
    };
    if password.is_empty() {
        anyhow::bail!("Please fill in all fields");
    }

    let client = client::anonymous(config)?;
    let token = client.login(email, &password).await?;
    let session = establish_session(config, token).await?;
    session::save(&session::session_path(config), &session)?;

    println!("signed in as {}", email);
    Ok(())
}

/// CLI entry point for `deepr register`.
pub async fn run_register(
    config: &Config,
    username: &str,
    email: &str,
    password: Option<&str>,
) -> Result<()> {
    let password = match password {
        Some(p) => {
            validate_passwords(p, p)?;
            p.to_string()
        }
        None => {
            let password = Password::new().with_prompt("Password").interact()?;
            let confirm = Password::new().with_prompt("Confirm password").interact()?;
            validate_passwords(&password, &confirm)?;
            password
        }
    };

    let client = client::anonymous(config)?;
    client.register(username, email, &password).await?;

    // Registration does not issue a credential; sign in with the same
    // credentials to establish the session.
    let token = client.login(email, &password).await?;
    let session = establish_session(config, token).await?;
    session::save(&session::session_path(config), &session)?;

    println!("account created; signed in as {}", email);
    Ok(())
}

/// Wrap a fresh token in a session, enriched with the `/users/me` profile
/// when the backend can provide it. Sign-in already succeeded, so a
/// profile failure is not fatal.
async fn establish_session(config: &Config, token: Token) -> Result<Session> {
    let mut session = Session::from_token(token);
    let authed = ApiClient::new(config, Some(&session))?;
    match authed.me().await {
        Ok(user) => session.user = Some(user),
        Err(err) => tracing::debug!(error = ?err, "profile fetch failed after sign-in"),
    }
    Ok(session)
}

/// CLI entry point for `deepr logout`.
pub fn run_logout(config: &Config) -> Result<()> {
    if session::clear(&session::session_path(config))? {
        println!("signed out");
    } else {
        println!("no active session");
    }
    Ok(())
}

/// CLI entry point for `deepr whoami`.
pub async fn run_whoami(config: &Config) -> Result<()> {
    let mut session = session::require(&session::session_path(config))?;

    if session.user.is_none() {
        let client = ApiClient::new(config, Some(&session))?;
        session.user = client.me().await.ok();
    }

    match &session.user {
        Some(user) => println!("{} <{}>", user.username, user.email),
        None => println!("signed in (profile unavailable)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_passwords_fail_locally() {
        let err = validate_passwords("hunter2", "hunter3").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn empty_password_fails_locally() {
        let err = validate_passwords("", "").unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all fields");
    }

    #[test]
    fn matching_passwords_pass() {
        assert!(validate_passwords("hunter2", "hunter2").is_ok());
    }
}
