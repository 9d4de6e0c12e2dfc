use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::CancelBookingRequest;
use crate::api::dtos::responses::BookingStatsResponse;
use crate::domain::models::booking::{BookingRecord, PaymentStatus};
use crate::error::AppError;
use crate::state::AppState;

async fn owner_bookings(state: &AppState, owner_id: &str) -> Result<Vec<BookingRecord>, AppError> {
    let venues = state.venue_repo.list(Some(owner_id)).await?;

    let mut bookings = Vec::new();
    for venue in &venues {
        bookings.extend(state.ledger.list_by_venue(&venue.id).await?);
    }

    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(bookings)
}

pub async fn list_owner_bookings(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let mut bookings = owner_bookings(&state, &owner_id).await?;

    if let Some(venue_id) = params.get("venue_id") {
        bookings.retain(|b| &b.venue_id == venue_id);
    }

    if let Some(status) = params.get("status") {
        let status: PaymentStatus = status.parse().map_err(AppError::Validation)?;
        bookings.retain(|b| b.payment_status == status);
    }

    if let Some(date_str) = params.get("date") {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid date format".into()))?;
        bookings.retain(|b| b.date == date);
    }

    Ok(Json(bookings))
}

pub async fn owner_booking_stats(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = owner_bookings(&state, &owner_id).await?;

    let stats = BookingStatsResponse {
        total: bookings.len(),
        completed: bookings.iter().filter(|b| b.payment_status == PaymentStatus::Completed).count(),
        pending: bookings.iter().filter(|b| b.payment_status == PaymentStatus::Pending).count(),
        cancelled: bookings
            .iter()
            .filter(|b| matches!(
                b.payment_status,
                PaymentStatus::Cancelled | PaymentStatus::Failed | PaymentStatus::Refunded
            ))
            .count(),
        revenue: bookings
            .iter()
            .filter(|b| b.payment_status == PaymentStatus::Completed)
            .map(|b| b.amount)
            .sum(),
    };

    Ok(Json(stats))
}

/// Owner confirming cash collected for a pay-at-venue booking.
pub async fn confirm_payment(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.ledger.mark_paid(&booking_id).await?;
    info!("Booking marked as paid: {}", booking_id);
    Ok(Json(booking))
}

/// Frees the booked hours and records the reason. Safe to repeat; a second
/// cancel is a no-op. Never touches captured funds.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.ledger.cancel(&booking_id, payload.reason.as_deref()).await?;
    info!("Booking cancelled: {}", booking_id);
    Ok(Json(cancelled))
}
