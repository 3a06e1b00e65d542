use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt;

use super::templates::{self, PageContext};
use crate::services::AuthError;

/// Failures a handler cannot recover from with a flash message and a redirect.
#[derive(Debug)]
pub enum WebError {
    NotFound(String),

    /// Login attempted while the users table is empty
    NoAdmin,

    InternalError(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::NotFound(msg) => write!(f, "Not found: {}", msg),
            WebError::NoAdmin => write!(f, "No admin account configured"),
            WebError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for WebError {}

/// Marks a response as one of the site's error pages so it can be rendered again
/// with the request's header, nav and flashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPage {
    NotFound,
    NoAdmin,
}

impl ErrorPage {
    pub fn render(self, ctx: &PageContext) -> String {
        match self {
            ErrorPage::NotFound => templates::not_found(ctx),
            ErrorPage::NoAdmin => templates::no_admin(ctx),
        }
    }

    fn respond(self, status: StatusCode) -> Response {
        let mut response = (status, Html(self.render(&PageContext::default()))).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match &self {
            WebError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                ErrorPage::NotFound.respond(StatusCode::NOT_FOUND)
            }
            WebError::NoAdmin => {
                tracing::warn!("Login attempted but no admin account exists");
                ErrorPage::NoAdmin.respond(StatusCode::SERVICE_UNAVAILABLE)
            }
            WebError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred",
                )
                    .into_response()
            }
        }
    }
}

impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> Self {
        WebError::InternalError(format!("{err:#}"))
    }
}

impl From<AuthError> for WebError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NoAdmin => WebError::NoAdmin,
            other => WebError::InternalError(other.to_string()),
        }
    }
}

impl WebError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        WebError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn movie_not_found(id: i32) -> Self {
        WebError::NotFound(format!("Movie {} not found", id))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        WebError::InternalError(msg.into())
    }
}
