use crate::domain::models::booking::{BookingRecord, FlexibleBooking, PaymentStatus};
use crate::domain::ports::AvailabilityLedger;
use crate::error::AppError;
use crate::infra::repositories::claim_conflict;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

/// SQLite ledger. Atomicity lives in the database: each commit claims its
/// hours inside one transaction against the unique (venue_id, date, hour)
/// index, so a lost race surfaces as a constraint violation and rolls the
/// whole commit back.
pub struct SqliteLedgerRepo {
    pool: SqlitePool,
}

impl SqliteLedgerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityLedger for SqliteLedgerRepo {
    async fn is_booked(&self, venue_id: &str, date: NaiveDate, hour: u32) -> Result<bool, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM slot_claims WHERE venue_id = ? AND date = ? AND hour = ? AND source = 'slot'"
        )
            .bind(venue_id).bind(date).bind(hour as i32)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn commit(&self, record: &BookingRecord) -> Result<BookingRecord, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(existing) = sqlx::query_as::<_, BookingRecord>("SELECT * FROM bookings WHERE id = ?")
            .bind(&record.id).fetch_optional(&mut *tx).await.map_err(AppError::Database)? {
            return Ok(existing);
        }

        let created = sqlx::query_as::<_, BookingRecord>(
            "INSERT INTO bookings (id, venue_id, field_config_id, date, slot_hours_json, amount, payment_method, payment_status, provider_ref, customer_name, customer_email, customer_phone, cancel_reason, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&record.id).bind(&record.venue_id).bind(&record.field_config_id).bind(record.date)
            .bind(&record.slot_hours_json).bind(record.amount).bind(record.payment_method)
            .bind(record.payment_status).bind(&record.provider_ref).bind(&record.customer_name)
            .bind(&record.customer_email).bind(&record.customer_phone).bind(&record.cancel_reason)
            .bind(record.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for hour in record.slot_hours() {
            sqlx::query("INSERT INTO slot_claims (venue_id, date, hour, source, ref_id) VALUES (?, ?, ?, 'slot', ?)")
                .bind(&record.venue_id).bind(record.date).bind(hour as i32).bind(&record.id)
                .execute(&mut *tx).await
                .map_err(|e| claim_conflict(e, hour))?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn commit_flexible(&self, booking: &FlexibleBooking) -> Result<FlexibleBooking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, FlexibleBooking>(
            "INSERT INTO flexible_bookings (id, venue_id, date, start_hour, end_hour, customer_name, customer_email, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.venue_id).bind(booking.date)
            .bind(booking.start_hour).bind(booking.end_hour).bind(&booking.customer_name)
            .bind(&booking.customer_email).bind(&booking.status).bind(booking.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for hour in booking.covered_hours() {
            sqlx::query("INSERT INTO slot_claims (venue_id, date, hour, source, ref_id) VALUES (?, ?, ?, 'flexible', ?)")
                .bind(&booking.venue_id).bind(booking.date).bind(hour as i32).bind(&booking.id)
                .execute(&mut *tx).await
                .map_err(|e| claim_conflict(e, hour))?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn cancel(&self, booking_id: &str, reason: Option<&str>) -> Result<BookingRecord, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let booking = sqlx::query_as::<_, BookingRecord>("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if booking.payment_status == PaymentStatus::Cancelled {
            return Ok(booking);
        }

        let cancelled = sqlx::query_as::<_, BookingRecord>(
            "UPDATE bookings SET payment_status = 'cancelled', cancel_reason = ? WHERE id = ? RETURNING *"
        )
            .bind(reason).bind(booking_id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM slot_claims WHERE ref_id = ?")
            .bind(booking_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }

    async fn mark_paid(&self, booking_id: &str) -> Result<BookingRecord, AppError> {
        let booking = sqlx::query_as::<_, BookingRecord>("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id).fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        match booking.payment_status {
            PaymentStatus::Pending => {
                sqlx::query_as::<_, BookingRecord>(
                    "UPDATE bookings SET payment_status = 'completed' WHERE id = ? RETURNING *"
                )
                    .bind(booking_id)
                    .fetch_one(&self.pool).await.map_err(AppError::Database)
            }
            PaymentStatus::Completed => Ok(booking),
            _ => Err(AppError::Conflict(format!("Booking {} is not awaiting payment", booking_id))),
        }
    }

    async fn find_by_id(&self, booking_id: &str) -> Result<Option<BookingRecord>, AppError> {
        sqlx::query_as::<_, BookingRecord>("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for_date(&self, venue_id: &str, date: NaiveDate) -> Result<Vec<BookingRecord>, AppError> {
        sqlx::query_as::<_, BookingRecord>(
            "SELECT * FROM bookings WHERE venue_id = ? AND date = ? AND payment_status NOT IN ('cancelled', 'failed') ORDER BY created_at ASC"
        )
            .bind(venue_id).bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<BookingRecord>, AppError> {
        sqlx::query_as::<_, BookingRecord>(
            "SELECT * FROM bookings WHERE venue_id = ? ORDER BY created_at DESC"
        )
            .bind(venue_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_customer(&self, email: &str) -> Result<Vec<BookingRecord>, AppError> {
        sqlx::query_as::<_, BookingRecord>(
            "SELECT * FROM bookings WHERE customer_email = ? ORDER BY created_at DESC"
        )
            .bind(email).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn flexible_for_date(&self, venue_id: &str, date: NaiveDate) -> Result<Vec<FlexibleBooking>, AppError> {
        sqlx::query_as::<_, FlexibleBooking>(
            "SELECT * FROM flexible_bookings WHERE venue_id = ? AND date = ? AND status = 'active' ORDER BY start_hour ASC"
        )
            .bind(venue_id).bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
