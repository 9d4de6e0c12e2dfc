use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use tracing::info;

use crate::api::dtos::requests::{CreateVenueRequest, FieldConfigurationRequest, UpdateVenueRequest};
use crate::api::dtos::responses::{VenueDetail, VenueSummary};
use crate::domain::models::venue::{
    validate_field_configurations, validate_operating_window, FieldConfiguration, NewVenueParams, Venue,
};
use crate::domain::services::pricing::venue_price_range;
use crate::error::AppError;
use crate::state::AppState;

fn build_field_configurations(requests: Vec<FieldConfigurationRequest>) -> Vec<FieldConfiguration> {
    requests
        .into_iter()
        .map(|req| FieldConfiguration {
            id: req.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: req.name,
            base_price: req.base_price,
            pricing: req.pricing,
        })
        .collect()
}

pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let venue = Venue::new(NewVenueParams {
        owner_id: payload.owner_id,
        name: payload.name,
        location: payload.location,
        description: payload.description,
        timezone: payload.timezone,
        open_hour: payload.open_hour,
        close_hour: payload.close_hour,
        is_open_24h: payload.is_open_24h,
        field_configurations: build_field_configurations(payload.field_configurations),
    })?;

    let created = state.venue_repo.create(&venue).await?;
    info!("Venue created: {} ({})", created.name, created.id);
    Ok(Json(created))
}

pub async fn list_venues(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let venues = state.venue_repo.list(params.get("owner_id").map(String::as_str)).await?;

    let summaries: Vec<VenueSummary> = venues
        .into_iter()
        .map(|venue| {
            let price_range = venue_price_range(&venue.field_configurations());
            VenueSummary { venue, price_range }
        })
        .collect();

    Ok(Json(summaries))
}

pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    let field_configurations = venue.field_configurations();
    let price_range = venue_price_range(&field_configurations);

    Ok(Json(VenueDetail {
        venue,
        field_configurations,
        price_range,
    }))
}

pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    Json(payload): Json<UpdateVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut venue = state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    if let Some(name) = payload.name { venue.name = name; }
    if let Some(location) = payload.location { venue.location = location; }
    if let Some(description) = payload.description { venue.description = Some(description); }
    if let Some(timezone) = payload.timezone { venue.timezone = timezone; }
    if let Some(open_hour) = payload.open_hour { venue.open_hour = open_hour; }
    if let Some(close_hour) = payload.close_hour { venue.close_hour = close_hour; }
    if let Some(is_open_24h) = payload.is_open_24h { venue.is_open_24h = is_open_24h; }

    if let Some(requests) = payload.field_configurations {
        let configs = build_field_configurations(requests);
        validate_field_configurations(&configs)?;
        venue.field_configs_json = serde_json::to_string(&configs).map_err(|_| AppError::Internal)?;
    }

    validate_operating_window(venue.open_hour, venue.close_hour, venue.is_open_24h)?;

    let updated = state.venue_repo.update(&venue).await?;
    info!("Venue updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.venue_repo.delete(&venue_id).await?;
    info!("Venue deleted: {}", venue_id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
