//! Domain service for authentication.
//!
//! Checks credentials against the admin row and reloads the logged-in user from
//! the id kept in the session.

use crate::models::user::User;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The users table is empty, so there is nobody to log in as.
    #[error("No admin account configured")]
    NoAdmin,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials against the first user row.
    ///
    /// # Errors
    ///
    /// - Returns [`AuthError::NoAdmin`] if no user row exists
    /// - Returns [`AuthError::InvalidCredentials`] if the username or password does not match
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Reconstructs the identity stored in a session by primary-key lookup.
    async fn load_user(&self, id: i32) -> Result<Option<User>, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_display() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
        assert_eq!(AuthError::NoAdmin.to_string(), "No admin account configured");
        assert_eq!(
            AuthError::from(anyhow::anyhow!("boom")).to_string(),
            "Internal error: boom"
        );
    }
}
