use crate::domain::models::{
    booking::{BookingRecord, FlexibleBooking},
    venue::Venue,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError>;
    async fn list(&self, owner_id: Option<&str>) -> Result<Vec<Venue>, AppError>;
    async fn update(&self, venue: &Venue) -> Result<Venue, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// The single source of truth for "is this (venue, date, hour) taken".
///
/// `commit` and `commit_flexible` are atomic: either every requested hour is
/// claimed or none are, and two callers racing for an overlapping hour cannot
/// both succeed. Pre-checks done elsewhere (e.g. in a selection session) are
/// advisory only; the ledger re-verifies inside its own atomic section.
#[async_trait]
pub trait AvailabilityLedger: Send + Sync {
    /// Hourly-slot occupancy. Flexible-range coverage is reported separately
    /// through `flexible_for_date` so callers can tell the two modes apart.
    async fn is_booked(&self, venue_id: &str, date: NaiveDate, hour: u32) -> Result<bool, AppError>;

    async fn commit(&self, record: &BookingRecord) -> Result<BookingRecord, AppError>;
    async fn commit_flexible(&self, booking: &FlexibleBooking) -> Result<FlexibleBooking, AppError>;

    /// Idempotent: cancelling an already-cancelled booking is a no-op.
    async fn cancel(&self, booking_id: &str, reason: Option<&str>) -> Result<BookingRecord, AppError>;

    /// Pay-at-venue confirmation: pending -> completed.
    async fn mark_paid(&self, booking_id: &str) -> Result<BookingRecord, AppError>;

    async fn find_by_id(&self, booking_id: &str) -> Result<Option<BookingRecord>, AppError>;
    async fn list_for_date(&self, venue_id: &str, date: NaiveDate) -> Result<Vec<BookingRecord>, AppError>;
    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<BookingRecord>, AppError>;
    async fn list_by_customer(&self, email: &str) -> Result<Vec<BookingRecord>, AppError>;
    async fn flexible_for_date(&self, venue_id: &str, date: NaiveDate) -> Result<Vec<FlexibleBooking>, AppError>;
}

#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub amount: i64,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    Success { provider_ref: String },
    Failure { reason: String },
    Cancelled,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeOutcome, AppError>;
}
