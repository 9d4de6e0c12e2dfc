use serde::Serialize;

use crate::domain::models::venue::{FieldConfiguration, Venue};
use crate::domain::services::pricing::PriceRange;

#[derive(Serialize)]
pub struct VenueSummary {
    #[serde(flatten)]
    pub venue: Venue,
    pub price_range: PriceRange,
}

#[derive(Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub field_configurations: Vec<FieldConfiguration>,
    pub price_range: PriceRange,
}

#[derive(Serialize)]
pub struct SlotStatus {
    pub hour: u32,
    pub start_time: String,
    pub end_time: String,
    pub status: &'static str,
    pub price: i64,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub venue_id: String,
    pub date: String,
    pub field_config_id: String,
    pub slots: Vec<SlotStatus>,
}

#[derive(Serialize)]
pub struct BookingStatsResponse {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub cancelled: usize,
    pub revenue: i64,
}
