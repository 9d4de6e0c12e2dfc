use serde::Serialize;

use crate::domain::models::venue::FieldConfiguration;

// Peak hours: 6 PM - 9 PM. Night hours: 6 PM - 12 AM. Peak is a strict
// subset of night; the check order below makes peak win in the overlap.
pub const PEAK_START_HOUR: u32 = 18;
pub const PEAK_END_HOUR: u32 = 20;
pub const NIGHT_START_HOUR: u32 = 18;
pub const NIGHT_END_HOUR: u32 = 23;

/// Resolves the charged price for one slot hour under one field
/// configuration: peak, then night, then day, then the base price.
pub fn price_for(hour: u32, config: &FieldConfiguration) -> i64 {
    if (PEAK_START_HOUR..=PEAK_END_HOUR).contains(&hour)
        && let Some(price) = config.pricing.peak_price {
        return price;
    }

    if (NIGHT_START_HOUR..=NIGHT_END_HOUR).contains(&hour)
        && let Some(price) = config.pricing.night_price {
        return price;
    }

    if let Some(price) = config.pricing.day_price {
        return price;
    }

    config.base_price
}

pub fn total_for(hours: &[u32], config: &FieldConfiguration) -> i64 {
    hours.iter().map(|&hour| price_for(hour, config)).sum()
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl PriceRange {
    fn fold(&mut self, price: i64) {
        self.min = self.min.min(price);
        self.max = self.max.max(price);
    }
}

/// Min/max over the configured prices. The base price is always part of the
/// range; tier prices join it when set.
pub fn price_range_for(config: &FieldConfiguration) -> PriceRange {
    let mut range = PriceRange { min: config.base_price, max: config.base_price };

    let tiers = [config.pricing.day_price, config.pricing.night_price, config.pricing.peak_price];
    for price in tiers.into_iter().flatten() {
        range.fold(price);
    }

    range
}

/// The venue-card range across every field configuration.
pub fn venue_price_range(configs: &[FieldConfiguration]) -> PriceRange {
    let mut configs_iter = configs.iter();

    let Some(first) = configs_iter.next() else {
        return PriceRange { min: 0, max: 0 };
    };

    let mut range = price_range_for(first);
    for config in configs_iter {
        let next = price_range_for(config);
        range.fold(next.min);
        range.fold(next.max);
    }

    range
}
