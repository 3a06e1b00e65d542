use crate::config::SecurityConfig;
use crate::entities::{movies, users};
use crate::models::movie::{Movie, MovieInput};
use crate::models::user::User;
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::{hash_password, hash_password_blocking, verify_password};

/// Outcome of [`Store::upsert_admin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminUpsert {
    Created,
    Updated,
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

/// Filesystem path behind a sqlite URL, or `None` for in-memory databases.
fn sqlite_file_path(db_url: &str) -> Option<&str> {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    let path = rest.split('?').next().unwrap_or(rest);

    if path.is_empty() || path.starts_with(":memory:") {
        None
    } else {
        Some(path)
    }
}

impl Store {
    /// Connect and bring the schema up to date.
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        let store = Self::connect(db_url, max_connections, min_connections).await?;

        migrator::Migrator::up(&store.conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(store)
    }

    /// Connect without touching the schema.
    pub async fn connect(db_url: &str, max_connections: u32, min_connections: u32) -> Result<Self> {
        if let Some(path_str) = sqlite_file_path(db_url) {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file: {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .with_context(|| format!("Failed to connect to {db_url}"))?;

        Ok(Self { conn })
    }

    /// Create the schema, optionally dropping every existing table first.
    pub async fn init_schema(&self, drop: bool) -> Result<()> {
        if drop {
            migrator::Migrator::fresh(&self.conn).await?;
            info!("Dropped and re-created all tables");
        } else {
            migrator::Migrator::up(&self.conn, None).await?;
            info!("Schema is up to date");
        }
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    // ========== Movies ==========

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.movie_repo().list().await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn count_movies(&self) -> Result<u64> {
        self.movie_repo().count().await
    }

    pub async fn add_movie(&self, input: &MovieInput) -> Result<Movie> {
        self.movie_repo().add(input).await
    }

    pub async fn update_movie(&self, id: i32, input: &MovieInput) -> Result<Option<Movie>> {
        self.movie_repo().update(id, input).await
    }

    pub async fn remove_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().remove(id).await
    }

    // ========== Users ==========

    pub async fn first_user(&self) -> Result<Option<User>> {
        self.user_repo().first().await
    }

    pub async fn first_user_with_password(&self) -> Result<Option<(User, Option<String>)>> {
        self.user_repo().first_with_password().await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn create_user(
        &self,
        name: &str,
        username: Option<&str>,
        password_hash: Option<String>,
    ) -> Result<User> {
        self.user_repo().create(name, username, password_hash).await
    }

    pub async fn update_user_name(&self, id: i32, name: &str) -> Result<bool> {
        self.user_repo().update_name(id, name).await
    }

    /// Set the login of the first user, creating an "Admin" row when the table is empty.
    pub async fn upsert_admin(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<AdminUpsert> {
        let password_hash = hash_password_blocking(password, security).await?;
        let repo = self.user_repo();

        match repo.first().await? {
            Some(user) => {
                repo.set_credentials(user.id, username, password_hash).await?;
                info!("Updated credentials for user {}", user.id);
                Ok(AdminUpsert::Updated)
            }
            None => {
                let user = repo.create("Admin", Some(username), Some(password_hash)).await?;
                info!("Created admin user {}", user.id);
                Ok(AdminUpsert::Created)
            }
        }
    }

    /// Insert a demo user and the given movies in a single transaction.
    pub async fn seed_demo(&self, user_name: &str, fixture: &[(&str, &str)]) -> Result<()> {
        let txn = self.conn.begin().await?;

        users::ActiveModel {
            name: Set(user_name.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert demo user")?;

        for (title, year) in fixture {
            movies::ActiveModel {
                title: Set((*title).to_string()),
                year: Set((*year).to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .with_context(|| format!("Failed to insert demo movie {title}"))?;
        }

        txn.commit().await?;
        info!("Seeded demo user and {} movies", fixture.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::{DEMO_MOVIES, DEMO_USER_NAME};

    async fn temp_store() -> Store {
        let path =
            std::env::temp_dir().join(format!("watchlist-store-test-{}.db", uuid::Uuid::new_v4()));
        Store::new(&crate::config::sqlite_url(&path)).await.unwrap()
    }

    fn cheap_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn sqlite_file_path_handles_url_shapes() {
        assert_eq!(sqlite_file_path("sqlite://data.db"), Some("data.db"));
        assert_eq!(sqlite_file_path("sqlite:///tmp/w.db"), Some("/tmp/w.db"));
        assert_eq!(sqlite_file_path("sqlite:data/w.db?mode=rwc"), Some("data/w.db"));
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
    }

    #[tokio::test]
    async fn movie_crud() {
        let store = temp_store().await;

        let movie = store
            .add_movie(&MovieInput::new("Parasite", "2019"))
            .await
            .unwrap();
        assert_eq!(store.get_movie(movie.id).await.unwrap(), Some(movie.clone()));

        let updated = store
            .update_movie(movie.id, &MovieInput::new("Parasite (B&W)", "2020"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Parasite (B&W)");
        assert_eq!(updated.year, "2020");

        assert!(store.remove_movie(movie.id).await.unwrap());
        assert!(!store.remove_movie(movie.id).await.unwrap());
        assert!(store.get_movie(movie.id).await.unwrap().is_none());
        assert!(
            store
                .update_movie(movie.id, &MovieInput::new("x", "1"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn seed_demo_inserts_fixture_in_order() {
        let store = temp_store().await;
        store.seed_demo(DEMO_USER_NAME, &DEMO_MOVIES).await.unwrap();

        let movies = store.list_movies().await.unwrap();
        assert_eq!(movies.len(), 10);
        assert_eq!(movies[0].title, "My Neighbor Totoro");
        assert_eq!(movies[9].year, "2012");

        let user = store.first_user().await.unwrap().unwrap();
        assert_eq!(user.name, DEMO_USER_NAME);
        assert!(user.username.is_none());
    }

    #[tokio::test]
    async fn upsert_admin_creates_then_updates() {
        let store = temp_store().await;

        let outcome = store.upsert_admin("admin", "hunter2", &cheap_params()).await.unwrap();
        assert_eq!(outcome, AdminUpsert::Created);

        let outcome = store.upsert_admin("root", "swordfish", &cheap_params()).await.unwrap();
        assert_eq!(outcome, AdminUpsert::Updated);
        assert_eq!(store.count_users().await.unwrap(), 1);

        let (user, hash) = store.first_user_with_password().await.unwrap().unwrap();
        assert_eq!(user.name, "Admin");
        assert_eq!(user.username.as_deref(), Some("root"));
        assert!(verify_password("swordfish", &hash.unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn init_schema_drop_clears_rows() {
        let store = temp_store().await;
        store.add_movie(&MovieInput::new("Leon", "1994")).await.unwrap();

        store.init_schema(false).await.unwrap();
        assert_eq!(store.count_movies().await.unwrap(), 1);

        store.init_schema(true).await.unwrap();
        assert_eq!(store.count_movies().await.unwrap(), 0);
    }
}
