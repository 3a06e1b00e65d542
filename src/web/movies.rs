use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{AuthUser, CurrentUser};
use super::flash::flash;
use super::validation::{INVALID_INPUT_MESSAGE, validate_movie};
use super::{AppState, WebError, page_context, templates};

#[derive(Deserialize)]
pub struct MovieForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
}

/// Path ids that are not integers behave like ids that do not exist.
fn parse_movie_id(raw: &str) -> Result<i32, WebError> {
    raw.parse::<i32>()
        .map_err(|_| WebError::not_found("Movie", raw))
}

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    session: Session,
) -> Result<Html<String>, WebError> {
    let movies = state.store().list_movies().await?;
    let ctx = page_context(&state, &session, current.is_authenticated()).await?;
    Ok(Html(templates::index(&ctx, &movies)))
}

/// POST /
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    session: Session,
    form: Result<Form<MovieForm>, FormRejection>,
) -> Result<Redirect, WebError> {
    if !current.is_authenticated() {
        return Ok(Redirect::to("/"));
    }

    // A body that is not a form counts as invalid input
    let Some(input) = form
        .ok()
        .and_then(|Form(form)| validate_movie(&form.title, &form.year).ok())
    else {
        flash(&session, INVALID_INPUT_MESSAGE).await?;
        return Ok(Redirect::to("/"));
    };

    state.store().add_movie(&input).await?;
    flash(&session, "Item created.").await?;
    Ok(Redirect::to("/"))
}

/// GET /movie/edit/{id}
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, WebError> {
    let id = parse_movie_id(&raw_id)?;
    let movie = state
        .store()
        .get_movie(id)
        .await?
        .ok_or_else(|| WebError::movie_not_found(id))?;

    let ctx = page_context(&state, &session, true).await?;
    Ok(Html(templates::edit(&ctx, &movie)))
}

/// POST /movie/edit/{id}
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    session: Session,
    Path(raw_id): Path<String>,
    Form(form): Form<MovieForm>,
) -> Result<Redirect, WebError> {
    let id = parse_movie_id(&raw_id)?;
    if state.store().get_movie(id).await?.is_none() {
        return Err(WebError::movie_not_found(id));
    }

    let Ok(input) = validate_movie(&form.title, &form.year) else {
        flash(&session, INVALID_INPUT_MESSAGE).await?;
        return Ok(Redirect::to(&format!("/movie/edit/{id}")));
    };

    state
        .store()
        .update_movie(id, &input)
        .await?
        .ok_or_else(|| WebError::movie_not_found(id))?;

    flash(&session, "Item updated.").await?;
    Ok(Redirect::to("/"))
}

/// POST /movie/delete/{id}
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Redirect, WebError> {
    let id = parse_movie_id(&raw_id)?;
    if !state.store().remove_movie(id).await? {
        return Err(WebError::movie_not_found(id));
    }

    flash(&session, "Item deleted.").await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_ids_are_not_found() {
        assert_eq!(parse_movie_id("3").unwrap(), 3);
        assert!(matches!(parse_movie_id("abc"), Err(WebError::NotFound(_))));
        assert!(matches!(
            parse_movie_id("99999999999"),
            Err(WebError::NotFound(_))
        ));
    }
}
