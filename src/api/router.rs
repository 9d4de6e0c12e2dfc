use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{availability, booking_management, checkout, health, venue};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Venue Catalog
        .route("/api/v1/venues", get(venue::list_venues).post(venue::create_venue))
        .route("/api/v1/venues/{venue_id}", get(venue::get_venue).put(venue::update_venue).delete(venue::delete_venue))

        // Public Booking Flow
        .route("/api/v1/venues/{venue_id}/availability/{date}", get(availability::get_availability))
        .route("/api/v1/venues/{venue_id}/bookings/manual", post(checkout::create_manual_booking))
        .route("/api/v1/venues/{venue_id}/bookings/online", post(checkout::create_online_booking))
        .route("/api/v1/venues/{venue_id}/bookings/flexible", post(checkout::create_flexible_booking))

        // Customer Booking Lookup
        .route("/api/v1/bookings", get(checkout::list_customer_bookings))
        .route("/api/v1/bookings/{booking_id}", get(checkout::get_booking))

        // Owner Booking Management
        .route("/api/v1/bookings/{booking_id}/confirm-payment", post(booking_management::confirm_payment))
        .route("/api/v1/bookings/{booking_id}/cancel", post(booking_management::cancel_booking))
        .route("/api/v1/owners/{owner_id}/bookings", get(booking_management::list_owner_bookings))
        .route("/api/v1/owners/{owner_id}/bookings/stats", get(booking_management::owner_booking_stats))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
