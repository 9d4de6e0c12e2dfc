use serde::Serialize;

use crate::domain::models::venue::Venue;

/// One bookable hourly unit. Never persisted; always derived from the
/// venue's operating window.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Slot {
    pub hour: u32,
    pub start_time: String,
    pub end_time: String,
}

impl Slot {
    pub fn from_hour(hour: u32) -> Self {
        Self {
            hour,
            start_time: format!("{:02}:00", hour),
            end_time: format!("{:02}:00", (hour + 1) % 24),
        }
    }
}

/// Derives the slot sheet for a venue: all 24 hours for continuous venues,
/// otherwise `open_hour..=close_hour` in ascending order.
pub fn generate_slots(venue: &Venue) -> Vec<Slot> {
    if venue.is_open_24h {
        return (0..24).map(Slot::from_hour).collect();
    }

    (venue.open_hour as u32..=venue.close_hour as u32)
        .map(Slot::from_hour)
        .collect()
}
