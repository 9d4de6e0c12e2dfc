use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use chrono::{NaiveDate, NaiveTime, Timelike, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateBookingRequest, CreateFlexibleBookingRequest};
use crate::domain::models::booking::FlexibleBooking;
use crate::domain::services::checkout::{CheckoutFlow, CheckoutOutcome, CustomerDetails};
use crate::domain::services::schedule::generate_slots;
use crate::domain::services::selection::SlotSelectionSession;
use crate::error::AppError;
use crate::state::AppState;

/// Rebuilds the user's selection server-side. Each toggle re-validates the
/// hour against the ledger; the duplicates guard keeps a repeated hour from
/// silently toggling itself back off.
async fn stage_selection(
    state: &AppState,
    venue_id: &str,
    payload: &CreateBookingRequest,
) -> Result<SlotSelectionSession, AppError> {
    let venue = state.venue_repo.find_by_id(venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let mut session = SlotSelectionSession::open(venue, date, &payload.field_config_id)?;

    let mut hours = payload.slot_hours.clone();
    hours.sort_unstable();
    hours.dedup();

    let now = Utc::now();
    for hour in hours {
        session.toggle(state.ledger.as_ref(), hour, now).await?;
    }

    Ok(session)
}

fn customer_from(payload: &CreateBookingRequest) -> CustomerDetails {
    CustomerDetails {
        name: payload.customer_name.clone(),
        email: payload.customer_email.clone(),
        phone: payload.customer_phone.clone(),
    }
}

pub async fn create_manual_booking(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = stage_selection(&state, &venue_id, &payload).await?;

    let mut flow = CheckoutFlow::begin(&session, payload.booking_id.clone(), customer_from(&payload))?;
    let record = flow.pay_at_venue(state.ledger.as_ref()).await?;

    info!("Manual booking settled: {} for venue {}", record.id, venue_id);
    Ok(Json(record))
}

pub async fn create_online_booking(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = stage_selection(&state, &venue_id, &payload).await?;

    let mut flow = CheckoutFlow::begin(&session, payload.booking_id.clone(), customer_from(&payload))?;
    let outcome = flow
        .pay_online(state.ledger.as_ref(), state.payment_provider.as_ref())
        .await?;

    match outcome {
        CheckoutOutcome::Settled(record) => {
            info!("Online booking settled: {} for venue {}", record.id, venue_id);
            Ok(Json(serde_json::json!({ "status": "confirmed", "booking": record })))
        }
        CheckoutOutcome::PaymentCancelled => {
            Ok(Json(serde_json::json!({ "status": "cancelled" })))
        }
    }
}

pub async fn create_flexible_booking(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
    Json(payload): Json<CreateFlexibleBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let start = NaiveTime::parse_from_str(&payload.start_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid start time format (HH:MM)".into()))?;
    let end = NaiveTime::parse_from_str(&payload.end_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid end time format (HH:MM)".into()))?;

    let start_hour = start.hour() as i32;
    let end_hour = end.hour() as i32;

    if start_hour >= end_hour {
        return Err(AppError::Validation("End time must be after start time".into()));
    }

    let slots = generate_slots(&venue);
    let in_window = (start_hour..end_hour).all(|h| slots.iter().any(|s| s.hour == h as u32));
    if !in_window {
        return Err(AppError::Validation("Requested range is outside the venue's operating hours".into()));
    }

    let booking = FlexibleBooking::new(
        venue.id,
        date,
        start_hour,
        end_hour,
        payload.customer_name,
        payload.customer_email,
    );

    let committed = state.ledger.commit_flexible(&booking).await?;
    info!("Flexible booking committed: {} ({}:00-{}:00)", committed.id, start_hour, end_hour);
    Ok(Json(committed))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.ledger.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    Ok(Json(booking))
}

pub async fn list_customer_bookings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let email = params.get("customer_email")
        .ok_or(AppError::Validation("customer_email is required".into()))?;

    let bookings = state.ledger.list_by_customer(email).await?;
    Ok(Json(bookings))
}
