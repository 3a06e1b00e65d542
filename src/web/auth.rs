use axum::{
    Form,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{info, warn};

use super::flash::flash;
use super::validation::{INVALID_INPUT_MESSAGE, validate_credentials};
use super::{AppState, WebError, page_context, templates};
use crate::models::user::User;
use crate::services::AuthError;

const USER_ID_KEY: &str = "_user_id";

pub const LOGIN_PATH: &str = "/login";

const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

// ============================================================================
// Identity
// ============================================================================

/// Identity of the request, resolved once from the session.
#[derive(Debug, Clone)]
pub enum CurrentUser {
    Authenticated(User),
    Anonymous,
}

impl CurrentUser {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, CurrentUser::Authenticated(_))
    }
}

/// Load the user whose id the session carries. Anything unusable reads as anonymous.
pub async fn resolve_user(state: &AppState, session: &Session) -> Result<CurrentUser, WebError> {
    let id = match session.get::<i32>(USER_ID_KEY).await {
        Ok(Some(id)) => id,
        Ok(None) => return Ok(CurrentUser::Anonymous),
        Err(e) => {
            warn!("Ignoring unreadable session identity: {e}");
            return Ok(CurrentUser::Anonymous);
        }
    };

    Ok(match state.auth().load_user(id).await? {
        Some(user) => CurrentUser::Authenticated(user),
        None => CurrentUser::Anonymous,
    })
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Set by `require_login` on protected routes
        if let Some(current) = parts.extensions.get::<CurrentUser>() {
            return Ok(current.clone());
        }

        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| WebError::internal(msg))?;

        let current = resolve_user(state, &session).await?;
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// The logged-in user; anonymous requests are sent to the login page.
pub struct AuthUser(pub User);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?
        {
            CurrentUser::Authenticated(user) => Ok(AuthUser(user)),
            CurrentUser::Anonymous => Err(Redirect::to(LOGIN_PATH).into_response()),
        }
    }
}

/// Bind the session to `user`. The session id is rotated first.
pub async fn login_user(session: &Session, user: &User) -> Result<(), WebError> {
    session
        .cycle_id()
        .await
        .map_err(|e| WebError::internal(format!("Failed to rotate session: {e}")))?;

    session
        .insert(USER_ID_KEY, user.id)
        .await
        .map_err(|e| WebError::internal(format!("Failed to create session: {e}")))
}

/// Forget the identity but keep the session, so queued flashes survive.
pub async fn logout_user(session: &Session) -> Result<(), WebError> {
    session
        .remove::<i32>(USER_ID_KEY)
        .await
        .map_err(|e| WebError::internal(format!("Session error: {e}")))?;
    Ok(())
}

// ============================================================================
// Middleware
// ============================================================================

/// Guards protected routes: anonymous requests get a flash and a redirect to the login form.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    match resolve_user(&state, &session).await? {
        CurrentUser::Anonymous => {
            flash(&session, LOGIN_REQUIRED_MESSAGE).await?;
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
        current => {
            request.extensions_mut().insert(current);
            Ok(next.run(request).await)
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /login
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    session: Session,
) -> Result<Html<String>, WebError> {
    let ctx = page_context(&state, &session, current.is_authenticated()).await?;
    Ok(Html(templates::login(&ctx)))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, WebError> {
    let Ok((username, password)) = validate_credentials(&form.username, &form.password) else {
        flash(&session, INVALID_INPUT_MESSAGE).await?;
        return Ok(Redirect::to(LOGIN_PATH));
    };

    match state.auth().authenticate(username, password).await {
        Ok(user) => {
            login_user(&session, &user).await?;
            info!("User {} logged in", user.id);
            flash(&session, "Login success.").await?;
            Ok(Redirect::to("/"))
        }
        Err(AuthError::InvalidCredentials) => {
            warn!("Failed login attempt for username '{username}'");
            flash(&session, "Invalid username or password.").await?;
            Ok(Redirect::to(LOGIN_PATH))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /logout
pub async fn logout(AuthUser(user): AuthUser, session: Session) -> Result<Redirect, WebError> {
    logout_user(&session).await?;
    info!("User {} logged out", user.id);
    flash(&session, "Goodbye.").await?;
    Ok(Redirect::to("/"))
}
