use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::models::venue::Venue;
use crate::domain::ports::VenueRepository;
use crate::error::AppError;

/// Non-durable venue catalog for the `ephemeral` bootstrap target and tests.
pub struct MemoryVenueRepo {
    venues: Mutex<HashMap<String, Venue>>,
}

impl MemoryVenueRepo {
    pub fn new() -> Self {
        Self {
            venues: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVenueRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VenueRepository for MemoryVenueRepo {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError> {
        let mut venues = self.venues.lock().unwrap();

        if venues.contains_key(&venue.id) {
            return Err(AppError::Conflict(format!("Venue {} already exists", venue.id)));
        }

        venues.insert(venue.id.clone(), venue.clone());
        Ok(venue.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError> {
        let venues = self.venues.lock().unwrap();
        Ok(venues.get(id).cloned())
    }

    async fn list(&self, owner_id: Option<&str>) -> Result<Vec<Venue>, AppError> {
        let venues = self.venues.lock().unwrap();

        let mut result: Vec<Venue> = venues
            .values()
            .filter(|v| owner_id.is_none_or(|owner| v.owner_id == owner))
            .cloned()
            .collect();

        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    async fn update(&self, venue: &Venue) -> Result<Venue, AppError> {
        let mut venues = self.venues.lock().unwrap();

        if !venues.contains_key(&venue.id) {
            return Err(AppError::NotFound("Venue not found".into()));
        }

        venues.insert(venue.id.clone(), venue.clone());
        Ok(venue.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut venues = self.venues.lock().unwrap();

        if venues.remove(id).is_none() {
            return Err(AppError::NotFound("Venue not found".into()));
        }

        Ok(())
    }
}
