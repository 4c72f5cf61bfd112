//! Authentication route handlers: signup, login, logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Signup form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Signup page template.
///
/// On error the previously typed names are preserved (never the password).
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub form: SignupForm,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(OptionalAuth(current_user): OptionalAuth) -> SignupTemplate {
    SignupTemplate {
        current_user,
        error: None,
        form: SignupForm::default(),
    }
}

/// Handle signup form submission.
///
/// The existence pre-check gives the friendly form error; the UNIQUE
/// constraint on `username` still backstops concurrent signups, so a race
/// loser gets the same message instead of a duplicate account.
pub async fn signup(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.pool());

    let rerender = |error: String, form: SignupForm| {
        SignupTemplate {
            current_user,
            error: Some(error),
            form,
        }
        .into_response()
    };

    match auth
        .register(&form.first_name, &form.last_name, &form.username, &form.password)
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, username = %user.username, "account created");
            Ok(Redirect::to("/login").into_response())
        }
        Err(AuthError::UsernameTaken) => {
            Ok(rerender("Username is already taken".to_string(), form))
        }
        Err(AuthError::InvalidUsername(e)) => Ok(rerender(e.to_string(), form)),
        Err(AuthError::WeakPassword(msg)) => Ok(rerender(msg, form)),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(OptionalAuth(current_user): OptionalAuth) -> LoginTemplate {
    LoginTemplate {
        current_user,
        error: None,
    }
}

/// Handle login form submission.
///
/// Establishes the session and redirects home on success. Unknown username
/// and wrong password render the same generic message.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let current_user = CurrentUser::from(&user);
            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!(error = %e, "failed to set session");
                return Err(crate::error::AppError::Internal(
                    "session store failure".to_string(),
                ));
            }

            tracing::info!(user_id = %user.id, "login succeeded");
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username, "login failed");
            Ok(LoginTemplate {
                current_user: None,
                error: Some("Invalid username or password".to_string()),
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Destroys the whole session, then sends the visitor home.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "failed to clear session");
    }

    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "failed to flush session");
    }

    Redirect::to("/").into_response()
}
