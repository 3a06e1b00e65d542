use crate::entities::{movies, prelude::*};
use crate::models::movie::{Movie, MovieInput};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, Set,
};
use tracing::info;

/// Repository for watchlist entries
pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: movies::Model) -> Movie {
        Movie {
            id: m.id,
            title: m.title,
            year: m.year,
        }
    }

    pub async fn list(&self) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list movies")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let row = Movies::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie")?;

        Ok(row.map(Self::map_model))
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Movies::find().count(&self.conn).await?)
    }

    pub async fn add(&self, input: &MovieInput) -> Result<Movie> {
        let active_model = movies::ActiveModel {
            title: Set(input.title.clone()),
            year: Set(input.year.clone()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert movie")?;

        info!("Added movie {}: {} ({})", model.id, model.title, model.year);
        Ok(Self::map_model(model))
    }

    /// Returns `None` when the id does not exist
    pub async fn update(&self, id: i32, input: &MovieInput) -> Result<Option<Movie>> {
        let Some(existing) = Movies::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: movies::ActiveModel = existing.into();
        active.title = Set(input.title.clone());
        active.year = Set(input.year.clone());
        let model = active.update(&self.conn).await?;

        info!("Updated movie {}: {} ({})", model.id, model.title, model.year);
        Ok(Some(Self::map_model(model)))
    }

    /// Returns `false` when the id does not exist
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let Some(existing) = Movies::find_by_id(id).one(&self.conn).await? else {
            return Ok(false);
        };

        existing.delete(&self.conn).await?;
        info!("Removed movie {}", id);
        Ok(true)
    }
}
