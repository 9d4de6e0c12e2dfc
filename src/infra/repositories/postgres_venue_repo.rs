use crate::domain::models::venue::Venue;
use crate::domain::ports::VenueRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresVenueRepo {
    pool: PgPool,
}

impl PostgresVenueRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueRepository for PostgresVenueRepo {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "INSERT INTO venues (id, owner_id, name, location, description, timezone, open_hour, close_hour, is_open_24h, field_configs_json, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *"
        )
            .bind(&venue.id).bind(&venue.owner_id).bind(&venue.name).bind(&venue.location)
            .bind(&venue.description).bind(&venue.timezone).bind(venue.open_hour).bind(venue.close_hour)
            .bind(venue.is_open_24h).bind(&venue.field_configs_json).bind(venue.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, owner_id: Option<&str>) -> Result<Vec<Venue>, AppError> {
        match owner_id {
            Some(owner) => {
                sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE owner_id = $1 ORDER BY created_at ASC")
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
            "UPDATE venues SET name=$1, location=$2, description=$3, timezone=$4, open_hour=$5, close_hour=$6, is_open_24h=$7, field_configs_json=$8
             WHERE id=$9
             RETURNING *"
        )
            .bind(&venue.name).bind(&venue.location).bind(&venue.description).bind(&venue.timezone)
            .bind(venue.open_hour).bind(venue.close_hour).bind(venue.is_open_24h).bind(&venue.field_configs_json)
            .bind(&venue.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Venue not found".into()));
        }

        Ok(())
    }
}
