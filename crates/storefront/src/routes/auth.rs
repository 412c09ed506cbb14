//! Authentication route handlers.
//!
//! Registration and login re-render their form with messages on bad input;
//! only infrastructure failures surface as error pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::Email;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{PageContext, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService, validate_password};
use crate::state::AppState;

/// Where a fresh login lands.
const AFTER_LOGIN: &str = "/products";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub email: String,
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
    pub email: String,
    pub errors: Vec<String>,
}

/// Check a registration form without touching the database.
///
/// Returns one message per failed rule, in form order.
fn validate_registration(form: &RegisterForm) -> Vec<String> {
    let mut errors = Vec::new();

    if let Err(e) = Email::parse(&form.email) {
        errors.push(capitalize(&e.to_string()));
    }

    if let Err(AuthError::WeakPassword(msg)) = validate_password(&form.password) {
        errors.push(capitalize(&msg));
    }

    if form.password != form.password_confirm {
        errors.push("Passwords do not match".to_string());
    }

    errors
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

async fn log_in(session: &Session, user: &CurrentUser) -> Result<()> {
    set_current_user(session, user).await?;
    set_sentry_user(&user.id);
    Ok(())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(ctx: PageContext) -> impl IntoResponse {
    RegisterTemplate {
        ctx,
        email: String::new(),
        errors: Vec::new(),
    }
}

/// Handle registration form submission.
///
/// A successful registration logs the new user in.
///
/// # Errors
///
/// Returns an error if the database or session store fails.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let errors = validate_registration(&form);
    if !errors.is_empty() {
        return Ok(RegisterTemplate {
            ctx,
            email: form.email,
            errors,
        }
        .into_response());
    }

    let user = match AuthService::new(state.pool())
        .register_with_password(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::UserAlreadyExists) => {
            return Ok(RegisterTemplate {
                ctx,
                email: form.email,
                errors: vec!["An account with this email already exists".to_string()],
            }
            .into_response());
        }
        Err(e) if e.is_user_facing() => {
            return Ok(RegisterTemplate {
                ctx,
                email: form.email,
                errors: vec![capitalize(&e.to_string())],
            }
            .into_response());
        }
        Err(e) => return Err(AppError::Auth(e)),
    };

    log_in(&session, &CurrentUser::from(&user)).await?;

    Ok(Redirect::to(AFTER_LOGIN).into_response())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(ctx: PageContext) -> impl IntoResponse {
    LoginTemplate {
        ctx,
        email: String::new(),
        error: None,
    }
}

/// Handle login form submission.
///
/// # Errors
///
/// Returns an error if the database or session store fails.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AuthService::new(state.pool())
        .login_with_password(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            log_in(&session, &CurrentUser::from(&user)).await?;
            tracing::info!(user_id = %user.id, "User logged in");
            Ok(Redirect::to(AFTER_LOGIN).into_response())
        }
        Err(e) if e.is_user_facing() => {
            tracing::warn!(error = %e, "Login failed");
            Ok(LoginTemplate {
                ctx,
                email: form.email,
                error: Some("Invalid email or password".to_string()),
            }
            .into_response())
        }
        Err(e) => Err(AppError::Auth(e)),
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log out and discard the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_registration_has_no_errors() {
        let errors = validate_registration(&form("ada@example.com", "correct horse", "correct horse"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_registration_reports_every_problem() {
        let errors = validate_registration(&form("not-an-email", "short", "shorter"));
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[2], "Passwords do not match");
    }

    #[test]
    fn test_numeric_password_rejected() {
        let errors = validate_registration(&form("ada@example.com", "12345678", "12345678"));
        assert_eq!(errors, vec!["Password cannot be entirely numeric".to_string()]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("email cannot be empty"), "Email cannot be empty");
        assert_eq!(capitalize(""), "");
    }
}
