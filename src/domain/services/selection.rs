use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::domain::models::venue::{FieldConfiguration, Venue};
use crate::domain::ports::AvailabilityLedger;
use crate::domain::services::{pricing, schedule};
use crate::error::AppError;

/// Minimum lead time before a slot's start when booking for the current day.
pub const MIN_LEAD_MINUTES: u32 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Slot {hour}:00 is already booked")]
    AlreadyBooked { hour: u32 },
    #[error("Slot {hour}:00 is in the past or starts too soon")]
    TooSoonOrPast { hour: u32 },
    #[error("Slot {hour}:00 falls within an existing flexible booking")]
    WithinFlexibleBooking { hour: u32 },
    #[error("Slot {hour}:00 is outside the venue's operating hours")]
    OutsideOperatingHours { hour: u32 },
    #[error("No slots selected")]
    EmptySelection,
}

impl SelectionError {
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            SelectionError::AlreadyBooked { .. } | SelectionError::WithinFlexibleBooking { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// One user's staging area for one venue/date before checkout. Ephemeral:
/// rebuilt whenever the booking screen is opened, destroyed on commit or
/// abandonment, never persisted. Its checks are advisory; the ledger
/// re-validates at commit time.
#[derive(Debug)]
pub struct SlotSelectionSession {
    venue: Venue,
    date: NaiveDate,
    field_config: FieldConfiguration,
    selected: BTreeSet<u32>,
}

impl SlotSelectionSession {
    pub fn open(venue: Venue, date: NaiveDate, field_config_id: &str) -> Result<Self, AppError> {
        let field_config = venue.field_configuration(field_config_id).ok_or_else(|| {
            AppError::NotFound(format!("Field configuration {} not found", field_config_id))
        })?;

        Ok(Self {
            venue,
            date,
            field_config,
            selected: BTreeSet::new(),
        })
    }

    pub fn venue(&self) -> &Venue {
        &self.venue
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn field_configuration(&self) -> &FieldConfiguration {
        &self.field_config
    }

    pub fn selected_hours(&self) -> Vec<u32> {
        self.selected.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Adds the hour if absent, removes it if present. Validation order:
    /// operating window, booked, temporal cutoff, flexible range.
    pub async fn toggle(
        &mut self,
        ledger: &dyn AvailabilityLedger,
        hour: u32,
        now: DateTime<Utc>,
    ) -> Result<ToggleOutcome, AppError> {
        let in_window = schedule::generate_slots(&self.venue).iter().any(|s| s.hour == hour);
        if !in_window {
            return Err(SelectionError::OutsideOperatingHours { hour }.into());
        }

        if ledger.is_booked(&self.venue.id, self.date, hour).await? {
            return Err(SelectionError::AlreadyBooked { hour }.into());
        }

        if is_too_soon_or_past(&self.venue, self.date, hour, now) {
            return Err(SelectionError::TooSoonOrPast { hour }.into());
        }

        let flexible = ledger.flexible_for_date(&self.venue.id, self.date).await?;
        if flexible.iter().any(|fb| fb.covers(hour)) {
            return Err(SelectionError::WithinFlexibleBooking { hour }.into());
        }

        if self.selected.remove(&hour) {
            Ok(ToggleOutcome::Removed)
        } else {
            self.selected.insert(hour);
            Ok(ToggleOutcome::Added)
        }
    }

    /// Prices are configuration-specific; a stale selection must not carry
    /// mismatched pricing, so switching configurations clears it.
    pub fn change_field_configuration(&mut self, field_config_id: &str) -> Result<(), AppError> {
        let field_config = self.venue.field_configuration(field_config_id).ok_or_else(|| {
            AppError::NotFound(format!("Field configuration {} not found", field_config_id))
        })?;

        self.field_config = field_config;
        self.selected.clear();
        Ok(())
    }

    /// Selections do not carry across dates.
    pub fn change_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.selected.clear();
    }

    pub fn running_total(&self) -> i64 {
        pricing::total_for(&self.selected_hours(), &self.field_config)
    }
}

/// The temporal cutoff, evaluated in venue-local time: past hours, the
/// current hour, and the next hour once fewer than `MIN_LEAD_MINUTES`
/// remain before it starts. Only applies when the date is today; future
/// dates are unrestricted and past dates are always rejected.
pub fn is_too_soon_or_past(venue: &Venue, date: NaiveDate, hour: u32, now: DateTime<Utc>) -> bool {
    let tz: Tz = venue.timezone.parse().unwrap_or(chrono_tz::UTC);
    let local_now = now.with_timezone(&tz);

    if date != local_now.date_naive() {
        return date < local_now.date_naive();
    }

    let current_hour = local_now.hour();

    hour < current_hour
        || hour == current_hour
        || (hour == current_hour + 1 && local_now.minute() > 60 - MIN_LEAD_MINUTES)
}
