use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::booking::{BookingRecord, FlexibleBooking, PaymentStatus};
use crate::domain::ports::AvailabilityLedger;
use crate::error::AppError;

#[derive(Default)]
struct LedgerState {
    bookings: HashMap<String, BookingRecord>,
    flexible: Vec<FlexibleBooking>,
}

/// Reference in-memory ledger. The single mutex is the per-(venue, date)
/// mutual-exclusion scope: every commit checks and claims under the same
/// lock, so two racing commits for an overlapping hour cannot both succeed.
/// Non-durable; used by the `ephemeral` bootstrap target and by tests.
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn hour_taken(state: &LedgerState, venue_id: &str, date: NaiveDate, hour: u32) -> bool {
    let slot_taken = state.bookings.values().any(|b| {
        b.venue_id == venue_id
            && b.date == date
            && b.payment_status.occupies_slots()
            && b.slot_hours().contains(&hour)
    });

    slot_taken
        || state
            .flexible
            .iter()
            .any(|fb| fb.venue_id == venue_id && fb.date == date && fb.status == "active" && fb.covers(hour))
}

#[async_trait]
impl AvailabilityLedger for MemoryLedger {
    async fn is_booked(&self, venue_id: &str, date: NaiveDate, hour: u32) -> Result<bool, AppError> {
        let state = self.state.lock().unwrap();

        Ok(state.bookings.values().any(|b| {
            b.venue_id == venue_id
                && b.date == date
                && b.payment_status.occupies_slots()
                && b.slot_hours().contains(&hour)
        }))
    }

    async fn commit(&self, record: &BookingRecord) -> Result<BookingRecord, AppError> {
        let mut state = self.state.lock().unwrap();

        if let Some(existing) = state.bookings.get(&record.id) {
            return Ok(existing.clone());
        }

        for hour in record.slot_hours() {
            if hour_taken(&state, &record.venue_id, record.date, hour) {
                return Err(AppError::Conflict(format!("Slot {}:00 is already booked", hour)));
            }
        }

        state.bookings.insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    async fn commit_flexible(&self, booking: &FlexibleBooking) -> Result<FlexibleBooking, AppError> {
        let mut state = self.state.lock().unwrap();

        for hour in booking.covered_hours() {
            if hour_taken(&state, &booking.venue_id, booking.date, hour) {
                return Err(AppError::Conflict(format!("Slot {}:00 is already booked", hour)));
            }
        }

        state.flexible.push(booking.clone());
        Ok(booking.clone())
    }

    async fn cancel(&self, booking_id: &str, reason: Option<&str>) -> Result<BookingRecord, AppError> {
        let mut state = self.state.lock().unwrap();

        let booking = state
            .bookings
            .get_mut(booking_id)
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if booking.payment_status == PaymentStatus::Cancelled {
            return Ok(booking.clone());
        }

        booking.payment_status = PaymentStatus::Cancelled;
        booking.cancel_reason = reason.map(str::to_string);
        Ok(booking.clone())
    }

    async fn mark_paid(&self, booking_id: &str) -> Result<BookingRecord, AppError> {
        let mut state = self.state.lock().unwrap();

        let booking = state
            .bookings
            .get_mut(booking_id)
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        match booking.payment_status {
            PaymentStatus::Pending => {
                booking.payment_status = PaymentStatus::Completed;
                Ok(booking.clone())
            }
            PaymentStatus::Completed => Ok(booking.clone()),
            _ => Err(AppError::Conflict(format!(
                "Booking {} is not awaiting payment",
                booking_id
            ))),
        }
    }

    async fn find_by_id(&self, booking_id: &str) -> Result<Option<BookingRecord>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.bookings.get(booking_id).cloned())
    }

    async fn list_for_date(&self, venue_id: &str, date: NaiveDate) -> Result<Vec<BookingRecord>, AppError> {
        let state = self.state.lock().unwrap();

        let mut records: Vec<BookingRecord> = state
            .bookings
            .values()
            .filter(|b| {
                b.venue_id == venue_id
                    && b.date == date
                    && !matches!(b.payment_status, PaymentStatus::Cancelled | PaymentStatus::Failed)
            })
            .cloned()
            .collect();

        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }

    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<BookingRecord>, AppError> {
        let state = self.state.lock().unwrap();

        let mut records: Vec<BookingRecord> = state
            .bookings
            .values()
            .filter(|b| b.venue_id == venue_id)
            .cloned()
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn list_by_customer(&self, email: &str) -> Result<Vec<BookingRecord>, AppError> {
        let state = self.state.lock().unwrap();

        let mut records: Vec<BookingRecord> = state
            .bookings
            .values()
            .filter(|b| b.customer_email == email)
            .cloned()
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn flexible_for_date(&self, venue_id: &str, date: NaiveDate) -> Result<Vec<FlexibleBooking>, AppError> {
        let state = self.state.lock().unwrap();

        let mut bookings: Vec<FlexibleBooking> = state
            .flexible
            .iter()
            .filter(|fb| fb.venue_id == venue_id && fb.date == date && fb.status == "active")
            .cloned()
            .collect();

        bookings.sort_by_key(|fb| fb.start_hour);
        Ok(bookings)
    }
}
