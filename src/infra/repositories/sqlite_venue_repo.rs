use crate::domain::models::venue::Venue;
use crate::domain::ports::VenueRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteVenueRepo {
    pool: SqlitePool,
}

impl SqliteVenueRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueRepository for SqliteVenueRepo {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "INSERT INTO venues (id, owner_id, name, location, description, timezone, open_hour, close_hour, is_open_24h, field_configs_json, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&venue.id).bind(&venue.owner_id).bind(&venue.name).bind(&venue.location)
            .bind(&venue.description).bind(&venue.timezone).bind(venue.open_hour).bind(venue.close_hour)
            .bind(venue.is_open_24h).bind(&venue.field_configs_json).bind(venue.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, owner_id: Option<&str>) -> Result<Vec<Venue>, AppError> {
        match owner_id {
            Some(owner) => {
                sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE owner_id = ? ORDER BY created_at ASC")
                    .bind(owner).fetch_all(&self.pool).await.map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, Venue>("SELECT * FROM venues ORDER BY created_at ASC")
                    .fetch_all(&self.pool).await.map_err(AppError::Database)
            }
        }
    }

    async fn update(&self, venue: &Venue) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "UPDATE venues SET name=?, location=?, description=?, timezone=?, open_hour=?, close_hour=?, is_open_24h=?, field_configs_json=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&venue.name).bind(&venue.location).bind(&venue.description).bind(&venue.timezone)
            .bind(venue.open_hour).bind(venue.close_hour).bind(venue.is_open_24h).bind(&venue.field_configs_json)
            .bind(&venue.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Venue not found".into()));
        }

        Ok(())
    }
}
