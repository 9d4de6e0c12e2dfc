use std::sync::Arc;
use crate::domain::ports::{AvailabilityLedger, PaymentProvider, VenueRepository};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub venue_repo: Arc<dyn VenueRepository>,
    pub ledger: Arc<dyn AvailabilityLedger>,
    pub payment_provider: Arc<dyn PaymentProvider>,
}
