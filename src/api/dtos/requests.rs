use serde::Deserialize;

use crate::domain::models::venue::TieredPricing;

#[derive(Deserialize)]
pub struct FieldConfigurationRequest {
    pub id: Option<String>,
    pub name: String,
    pub base_price: i64,
    #[serde(default)]
    pub pricing: TieredPricing,
}

#[derive(Deserialize)]
pub struct CreateVenueRequest {
    pub owner_id: String,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub timezone: String,
    pub open_hour: i32,
    pub close_hour: i32,
    #[serde(default)]
    pub is_open_24h: bool,
    pub field_configurations: Vec<FieldConfigurationRequest>,
}

#[derive(Deserialize)]
pub struct UpdateVenueRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub timezone: Option<String>,
    pub open_hour: Option<i32>,
    pub close_hour: Option<i32>,
    pub is_open_24h: Option<bool>,
    pub field_configurations: Option<Vec<FieldConfigurationRequest>>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub booking_id: Option<String>,
    pub date: String,
    pub field_config_id: String,
    pub slot_hours: Vec<u32>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateFlexibleBookingRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub customer_name: String,
    pub customer_email: String,
}

#[derive(Deserialize)]
pub struct CancelBookingRequest {
    #[serde(default)]
    pub reason: Option<String>,
}
