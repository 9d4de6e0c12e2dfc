use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::api::dtos::responses::{AvailabilityResponse, SlotStatus};
use crate::domain::services::pricing::price_for;
use crate::domain::services::schedule::generate_slots;
use crate::domain::services::selection::is_too_soon_or_past;
use crate::error::AppError;
use crate::state::AppState;

/// The slot sheet for one venue/date: every derived slot with its current
/// status and its price under the chosen field configuration. Rendering
/// state only; commit-time validity is re-checked by the ledger.
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path((venue_id, date_str)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let field_config = match params.get("field_config") {
        Some(id) => venue.field_configuration(id)
            .ok_or_else(|| AppError::NotFound(format!("Field configuration {} not found", id)))?,
        None => venue.field_configurations().into_iter().next()
            .ok_or(AppError::Validation("Venue has no field configurations".into()))?,
    };

    let bookings = state.ledger.list_for_date(&venue_id, date).await?;
    let booked_hours: HashSet<u32> = bookings
        .iter()
        .filter(|b| b.payment_status.occupies_slots())
        .flat_map(|b| b.slot_hours())
        .collect();

    let flexible = state.ledger.flexible_for_date(&venue_id, date).await?;
    let now = Utc::now();

    let slots = generate_slots(&venue)
        .into_iter()
        .map(|slot| {
            let status = if booked_hours.contains(&slot.hour) {
                "booked"
            } else if flexible.iter().any(|fb| fb.covers(slot.hour)) {
                "flexible"
            } else if is_too_soon_or_past(&venue, date, slot.hour, now) {
                "unavailable"
            } else {
                "available"
            };

            SlotStatus {
                hour: slot.hour,
                start_time: slot.start_time,
                end_time: slot.end_time,
                status,
                price: price_for(slot.hour, &field_config),
            }
        })
        .collect();

    Ok(Json(AvailabilityResponse {
        venue_id,
        date: date_str,
        field_config_id: field_config.id,
        slots,
    }))
}
