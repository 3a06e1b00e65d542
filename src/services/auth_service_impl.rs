//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::{Store, verify_password};
use crate::models::user::User;
use crate::services::auth_service::{AuthError, AuthService};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .store
            .first_user_with_password()
            .await?
            .ok_or(AuthError::NoAdmin)?;

        if user.username.as_deref() != Some(username) {
            return Err(AuthError::InvalidCredentials);
        }

        // Rows created by `forge` have no password until `admin` sets one
        let Some(password_hash) = password_hash else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn load_user(&self, id: i32) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;

    async fn service() -> (SeaOrmAuthService, Store) {
        let path = std::env::temp_dir().join(format!("watchlist-auth-test-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&crate::config::sqlite_url(&path)).await.unwrap();
        (SeaOrmAuthService::new(store.clone()), store)
    }

    fn cheap_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[tokio::test]
    async fn empty_table_is_no_admin() {
        let (auth, _) = service().await;
        let err = auth.authenticate("admin", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::NoAdmin));
    }

    #[tokio::test]
    async fn checks_username_and_password() {
        let (auth, store) = service().await;
        store.upsert_admin("admin", "pw", &cheap_params()).await.unwrap();

        let user = auth.authenticate("admin", "pw").await.unwrap();
        assert_eq!(user.username.as_deref(), Some("admin"));

        assert!(matches!(
            auth.authenticate("admin", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.authenticate("someone", "pw").await,
            Err(AuthError::InvalidCredentials)
        ));

        assert_eq!(auth.load_user(user.id).await.unwrap(), Some(user));
        assert_eq!(auth.load_user(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn seeded_user_without_password_cannot_log_in() {
        let (auth, store) = service().await;
        store.create_user("Grey Li", None, None).await.unwrap();

        assert!(matches!(
            auth.authenticate("", "").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
