//! Authentication commands

use mia_domain::{GoogleAuthStart, MiaError, Result, User};
use mia_infra::parse_oauth_redirect;
use serde::Serialize;

use crate::utils::command_helpers::execute_command;
use crate::AppContext;

/// Signed-in state shown by the popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub user: Option<User>,
}

/// Sign in with email and password.
///
/// # Errors
/// Returns `MiaError::InvalidInput` for a blank email or password, otherwise
/// the backend error (e.g. invalid credentials).
pub async fn sign_in(ctx: &AppContext, email: &str, password: &str) -> Result<AuthStatus> {
    execute_command("auth::sign_in", || async {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(MiaError::InvalidInput("email and password are required".into()));
        }
        let session = ctx.auth.sign_in(email, password).await.map_err(MiaError::from)?;
        Ok(AuthStatus { authenticated: true, user: session.user })
    })
    .await
}

/// Begin Google sign-in. The host opens `auth_url` and hands the redirect
/// back to [`complete_google_login`] along with `state`.
///
/// # Errors
/// Returns the backend error.
pub async fn start_google_login(ctx: &AppContext) -> Result<GoogleAuthStart> {
    execute_command("auth::start_google_login", || async {
        ctx.auth.start_google_login().await.map_err(MiaError::from)
    })
    .await
}

/// Finish Google sign-in from the redirect URL the host observed.
///
/// # Errors
/// Returns `MiaError::InvalidInput` if `redirect_url` is not an OAuth
/// redirect, otherwise the backend error.
pub async fn complete_google_login(
    ctx: &AppContext,
    redirect_url: &str,
    initial_state: Option<&str>,
) -> Result<AuthStatus> {
    execute_command("auth::complete_google_login", || async {
        let callback = parse_oauth_redirect(redirect_url).ok_or_else(|| {
            MiaError::InvalidInput("redirect does not carry an authorization code".into())
        })?;
        let session = ctx
            .auth
            .complete_google_login(&callback, initial_state)
            .await
            .map_err(MiaError::from)?;
        Ok(AuthStatus { authenticated: true, user: session.user })
    })
    .await
}

pub fn auth_status(ctx: &AppContext) -> AuthStatus {
    AuthStatus { authenticated: ctx.auth.is_authenticated(), user: ctx.auth.current_user() }
}

/// # Errors
/// Returns an error if the token or user cannot be removed.
pub async fn logout(ctx: &AppContext) -> Result<()> {
    execute_command("auth::logout", || async { ctx.auth.logout().map_err(MiaError::from) }).await
}
