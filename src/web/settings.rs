use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::info;

use super::auth::AuthUser;
use super::flash::flash;
use super::validation::{INVALID_INPUT_MESSAGE, validate_name};
use super::{AppState, WebError, page_context, templates};

#[derive(Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub name: String,
}

/// GET /settings
pub async fn settings_page(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    session: Session,
) -> Result<Html<String>, WebError> {
    let ctx = page_context(&state, &session, true).await?;
    Ok(Html(templates::settings(&ctx, &user.name)))
}

/// POST /settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    session: Session,
    Form(form): Form<SettingsForm>,
) -> Result<Redirect, WebError> {
    let Ok(name) = validate_name(&form.name) else {
        flash(&session, INVALID_INPUT_MESSAGE).await?;
        return Ok(Redirect::to("/settings"));
    };

    if !state.store().update_user_name(user.id, name).await? {
        return Err(WebError::not_found("User", user.id));
    }

    info!("User {} changed display name", user.id);
    flash(&session, "Settings updated.").await?;
    Ok(Redirect::to("/"))
}
