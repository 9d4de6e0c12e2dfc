use sporzo_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::{ChargeOutcome, ChargeRequest, PaymentProvider},
    error::AppError,
    infra::repositories::{
        sqlite_ledger_repo::SqliteLedgerRepo,
        sqlite_venue_repo::SqliteVenueRepo,
    },
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use axum::Router;
use async_trait::async_trait;

pub struct MockPaymentProvider {
    outcome: Mutex<ChargeOutcome>,
    charges: Mutex<Vec<ChargeRequest>>,
}

impl MockPaymentProvider {
    pub fn succeeding(provider_ref: &str) -> Self {
        Self {
            outcome: Mutex::new(ChargeOutcome::Success {
                provider_ref: provider_ref.to_string(),
            }),
            charges: Mutex::new(Vec::new()),
        }
    }

    pub fn set_outcome(&self, outcome: ChargeOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn charge_count(&self) -> usize {
        self.charges.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeOutcome, AppError> {
        self.charges.lock().unwrap().push(request.clone());
        Ok(self.outcome.lock().unwrap().clone())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub payment: Arc<MockPaymentProvider>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        // SQLite serializes writers anyway; a single pooled connection keeps
        // concurrent test commits deterministic.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            payment_service_url: "http://localhost".to_string(),
            payment_service_key: "test-key".to_string(),
        };

        let payment = Arc::new(MockPaymentProvider::succeeding("pay_test_1"));

        let state = Arc::new(AppState {
            config,
            venue_repo: Arc::new(SqliteVenueRepo::new(pool.clone())),
            ledger: Arc::new(SqliteLedgerRepo::new(pool.clone())),
            payment_provider: payment.clone(),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            payment,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
