use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Cancelled,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    /// Only pending and completed bookings hold their hours in the ledger.
    pub fn occupies_slots(self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Completed)
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Manual,
    Online,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Manual => "manual",
            PaymentMethod::Online => "online",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(PaymentMethod::Manual),
            "online" => Ok(PaymentMethod::Online),
            other => Err(format!("unknown payment method '{}'", other)),
        }
    }
}

impl<DB: sqlx::Database> sqlx::Type<DB> for PaymentStatus
where
    str: sqlx::Type<DB>,
{
    fn type_info() -> DB::TypeInfo {
        <str as sqlx::Type<DB>>::type_info()
    }

    fn compatible(ty: &DB::TypeInfo) -> bool {
        <str as sqlx::Type<DB>>::compatible(ty)
    }
}

impl<'q, DB: sqlx::Database> sqlx::Encode<'q, DB> for PaymentStatus
where
    &'q str: sqlx::Encode<'q, DB>,
{
    fn encode_by_ref(
        &self,
        buf: &mut <DB as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, DB>>::encode(self.as_str(), buf)
    }
}

impl<'r, DB: sqlx::Database> sqlx::Decode<'r, DB> for PaymentStatus
where
    &'r str: sqlx::Decode<'r, DB>,
{
    fn decode(value: <DB as sqlx::Database>::ValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, DB>>::decode(value)?;
        raw.parse().map_err(Into::into)
    }
}

impl<DB: sqlx::Database> sqlx::Type<DB> for PaymentMethod
where
    str: sqlx::Type<DB>,
{
    fn type_info() -> DB::TypeInfo {
        <str as sqlx::Type<DB>>::type_info()
    }

    fn compatible(ty: &DB::TypeInfo) -> bool {
        <str as sqlx::Type<DB>>::compatible(ty)
    }
}

impl<'q, DB: sqlx::Database> sqlx::Encode<'q, DB> for PaymentMethod
where
    &'q str: sqlx::Encode<'q, DB>,
{
    fn encode_by_ref(
        &self,
        buf: &mut <DB as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, DB>>::encode(self.as_str(), buf)
    }
}

impl<'r, DB: sqlx::Database> sqlx::Decode<'r, DB> for PaymentMethod
where
    &'r str: sqlx::Decode<'r, DB>,
{
    fn decode(value: <DB as sqlx::Database>::ValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, DB>>::decode(value)?;
        raw.parse().map_err(Into::into)
    }
}

/// A committed reservation. The unit of truth in the availability ledger.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingRecord {
    pub id: String,
    pub venue_id: String,
    pub field_config_id: String,
    pub date: NaiveDate,
    pub slot_hours_json: String,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub provider_ref: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub booking_id: Option<String>,
    pub venue_id: String,
    pub field_config_id: String,
    pub date: NaiveDate,
    pub slot_hours: Vec<u32>,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub provider_ref: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
}

impl BookingRecord {
    pub fn new(params: NewBookingParams) -> Self {
        let mut hours = params.slot_hours;
        hours.sort_unstable();
        hours.dedup();

        Self {
            id: params.booking_id.unwrap_or_else(generate_booking_reference),
            venue_id: params.venue_id,
            field_config_id: params.field_config_id,
            date: params.date,
            slot_hours_json: serde_json::to_string(&hours).unwrap_or_else(|_| "[]".to_string()),
            amount: params.amount,
            payment_method: params.payment_method,
            payment_status: params.payment_status,
            provider_ref: params.provider_ref,
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            customer_phone: params.customer_phone,
            cancel_reason: None,
            created_at: Utc::now(),
        }
    }

    pub fn slot_hours(&self) -> Vec<u32> {
        serde_json::from_str(&self.slot_hours_json).unwrap_or_default()
    }
}

/// Booking references as shown to customers and to the payment provider.
pub fn generate_booking_reference() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();

    format!("BK{}", suffix.to_uppercase())
}

/// The coarse booking mode: a contiguous custom time range instead of
/// discrete hourly slots. Occupies the same ledger as slot bookings.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct FlexibleBooking {
    pub id: String,
    pub venue_id: String,
    pub date: NaiveDate,
    pub start_hour: i32,
    pub end_hour: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl FlexibleBooking {
    pub fn new(
        venue_id: String,
        date: NaiveDate,
        start_hour: i32,
        end_hour: i32,
        customer_name: String,
        customer_email: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            venue_id,
            date,
            start_hour,
            end_hour,
            customer_name,
            customer_email,
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn covers(&self, hour: u32) -> bool {
        (self.start_hour..self.end_hour).contains(&(hour as i32))
    }

    /// The discrete hours the range occupies, end-exclusive.
    pub fn covered_hours(&self) -> Vec<u32> {
        (self.start_hour..self.end_hour).map(|h| h as u32).collect()
    }
}
