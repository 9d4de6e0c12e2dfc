use tracing::{info, warn};

use chrono::NaiveDate;

use crate::domain::models::booking::{
    generate_booking_reference, BookingRecord, NewBookingParams, PaymentMethod, PaymentStatus,
};
use crate::domain::models::venue::FieldConfiguration;
use crate::domain::ports::{AvailabilityLedger, ChargeOutcome, ChargeRequest, PaymentProvider};
use crate::domain::services::selection::{SelectionError, SlotSelectionSession};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    AwaitingMethodChoice,
    Settled,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    Settled(BookingRecord),
    PaymentCancelled,
}

/// The state machine that turns a finalized slot selection into a durable
/// booking record. One flow per booking attempt; the amount is frozen at
/// `begin` and never recomputed.
///
/// `AwaitingMethodChoice -> Settled | Failed | Cancelled`, where `Failed`
/// (payment declined, or a lost commit race) is retryable without losing the
/// selection, and `Cancelled` is terminal with no ledger write.
#[derive(Debug)]
pub struct CheckoutFlow {
    booking_id: String,
    venue_id: String,
    field_config: FieldConfiguration,
    date: NaiveDate,
    hours: Vec<u32>,
    amount: i64,
    customer: CustomerDetails,
    state: CheckoutState,
}

impl CheckoutFlow {
    pub fn begin(
        session: &SlotSelectionSession,
        booking_id: Option<String>,
        customer: CustomerDetails,
    ) -> Result<Self, AppError> {
        if session.is_empty() {
            return Err(SelectionError::EmptySelection.into());
        }

        Ok(Self {
            booking_id: booking_id.unwrap_or_else(generate_booking_reference),
            venue_id: session.venue().id.clone(),
            field_config: session.field_configuration().clone(),
            date: session.date(),
            hours: session.selected_hours(),
            amount: session.running_total(),
            customer,
            state: CheckoutState::AwaitingMethodChoice,
        })
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn hours(&self) -> &[u32] {
        &self.hours
    }

    /// Pay-at-venue: commits a pending record. A lost race returns the flow
    /// to the method choice so the user can re-select.
    pub async fn pay_at_venue(
        &mut self,
        ledger: &dyn AvailabilityLedger,
    ) -> Result<BookingRecord, AppError> {
        self.ensure_payable()?;

        if let Some(existing) = ledger.find_by_id(&self.booking_id).await? {
            self.state = CheckoutState::Settled;
            return Ok(existing);
        }

        let record = self.build_record(PaymentMethod::Manual, PaymentStatus::Pending, None);

        match ledger.commit(&record).await {
            Ok(committed) => {
                info!(booking_id = %committed.id, amount = committed.amount, "Manual booking committed");
                self.state = CheckoutState::Settled;
                Ok(committed)
            }
            Err(AppError::Conflict(msg)) => {
                warn!(booking_id = %self.booking_id, "Slot conflict at manual commit: {}", msg);
                self.state = CheckoutState::AwaitingMethodChoice;
                Err(AppError::Conflict(msg))
            }
            Err(other) => Err(other),
        }
    }

    /// Online payment: charge first, then commit a completed record. A
    /// conflict after a captured charge is a reconciliation case for manual
    /// support; it is never silently dropped or silently double-booked.
    pub async fn pay_online(
        &mut self,
        ledger: &dyn AvailabilityLedger,
        provider: &dyn PaymentProvider,
    ) -> Result<CheckoutOutcome, AppError> {
        self.ensure_payable()?;

        if let Some(existing) = ledger.find_by_id(&self.booking_id).await? {
            self.state = CheckoutState::Settled;
            return Ok(CheckoutOutcome::Settled(existing));
        }

        let request = ChargeRequest {
            amount: self.amount,
            reference: self.booking_id.clone(),
        };

        match provider.charge(&request).await? {
            ChargeOutcome::Success { provider_ref } => {
                let record = self.build_record(
                    PaymentMethod::Online,
                    PaymentStatus::Completed,
                    Some(provider_ref.clone()),
                );

                match ledger.commit(&record).await {
                    Ok(committed) => {
                        info!(
                            booking_id = %committed.id,
                            provider_ref = %provider_ref,
                            "Online booking committed"
                        );
                        self.state = CheckoutState::Settled;
                        Ok(CheckoutOutcome::Settled(committed))
                    }
                    Err(AppError::Conflict(_)) => {
                        self.state = CheckoutState::Failed;
                        Err(AppError::Reconciliation {
                            booking_id: self.booking_id.clone(),
                            provider_ref,
                        })
                    }
                    Err(other) => Err(other),
                }
            }
            ChargeOutcome::Failure { reason } => {
                // The selection survives; the user may retry from here.
                warn!(booking_id = %self.booking_id, "Payment declined: {}", reason);
                self.state = CheckoutState::Failed;
                Err(AppError::Payment(reason))
            }
            ChargeOutcome::Cancelled => {
                info!(booking_id = %self.booking_id, "Payment cancelled by customer");
                self.state = CheckoutState::Cancelled;
                Ok(CheckoutOutcome::PaymentCancelled)
            }
        }
    }

    /// User walked away before settling. No ledger write.
    pub fn abandon(&mut self) {
        if self.state != CheckoutState::Settled {
            self.state = CheckoutState::Cancelled;
        }
    }

    fn ensure_payable(&self) -> Result<(), AppError> {
        match self.state {
            CheckoutState::AwaitingMethodChoice | CheckoutState::Failed => Ok(()),
            CheckoutState::Settled => Err(AppError::Conflict(format!(
                "Booking {} is already settled",
                self.booking_id
            ))),
            CheckoutState::Cancelled => {
                Err(AppError::Validation("Checkout was abandoned".into()))
            }
        }
    }

    fn build_record(
        &self,
        payment_method: PaymentMethod,
        payment_status: PaymentStatus,
        provider_ref: Option<String>,
    ) -> BookingRecord {
        BookingRecord::new(NewBookingParams {
            booking_id: Some(self.booking_id.clone()),
            venue_id: self.venue_id.clone(),
            field_config_id: self.field_config.id.clone(),
            date: self.date,
            slot_hours: self.hours.clone(),
            amount: self.amount,
            payment_method,
            payment_status,
            provider_ref,
            customer_name: self.customer.name.clone(),
            customer_email: self.customer.email.clone(),
            customer_phone: self.customer.phone.clone(),
        })
    }
}
