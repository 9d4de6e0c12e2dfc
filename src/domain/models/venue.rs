use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TieredPricing {
    pub day_price: Option<i64>,
    pub night_price: Option<i64>,
    pub peak_price: Option<i64>,
}

/// One purchasable field size/layout at a venue, e.g. "7-a-side".
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FieldConfiguration {
    pub id: String,
    pub name: String,
    pub base_price: i64,
    #[serde(default)]
    pub pricing: TieredPricing,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Venue {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub timezone: String,
    pub open_hour: i32,
    pub close_hour: i32,
    pub is_open_24h: bool,
    pub field_configs_json: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewVenueParams {
    pub owner_id: String,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub timezone: String,
    pub open_hour: i32,
    pub close_hour: i32,
    pub is_open_24h: bool,
    pub field_configurations: Vec<FieldConfiguration>,
}

impl Venue {
    pub fn new(params: NewVenueParams) -> Result<Self, AppError> {
        validate_operating_window(params.open_hour, params.close_hour, params.is_open_24h)?;
        validate_field_configurations(&params.field_configurations)?;

        let field_configs_json = serde_json::to_string(&params.field_configurations)
            .map_err(|_| AppError::Internal)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner_id: params.owner_id,
            name: params.name,
            location: params.location,
            description: params.description,
            timezone: params.timezone,
            open_hour: params.open_hour,
            close_hour: params.close_hour,
            is_open_24h: params.is_open_24h,
            field_configs_json,
            created_at: Utc::now(),
        })
    }

    pub fn field_configurations(&self) -> Vec<FieldConfiguration> {
        serde_json::from_str(&self.field_configs_json).unwrap_or_default()
    }

    pub fn field_configuration(&self, id: &str) -> Option<FieldConfiguration> {
        self.field_configurations().into_iter().find(|c| c.id == id)
    }
}

pub fn validate_operating_window(open_hour: i32, close_hour: i32, is_open_24h: bool) -> Result<(), AppError> {
    if !(0..24).contains(&open_hour) || !(0..24).contains(&close_hour) {
        return Err(AppError::Validation("Operating hours must be between 0 and 23".into()));
    }
    if !is_open_24h && open_hour > close_hour {
        return Err(AppError::Validation("Opening hour must not be after closing hour".into()));
    }
    Ok(())
}

pub fn validate_field_configurations(configs: &[FieldConfiguration]) -> Result<(), AppError> {
    if configs.is_empty() {
        return Err(AppError::Validation("A venue needs at least one field configuration".into()));
    }

    for config in configs {
        if config.base_price <= 0 {
            return Err(AppError::Validation(format!(
                "Base price for field configuration '{}' must be positive", config.name
            )));
        }
        let tiers = [config.pricing.day_price, config.pricing.night_price, config.pricing.peak_price];
        if tiers.into_iter().flatten().any(|price| price <= 0) {
            return Err(AppError::Validation(format!(
                "Tiered prices for field configuration '{}' must be positive", config.name
            )));
        }
    }

    Ok(())
}
