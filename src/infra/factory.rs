use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::payment::http_payment_provider::HttpPaymentProvider;
use crate::infra::repositories::{
    memory_ledger_repo::MemoryLedger, memory_venue_repo::MemoryVenueRepo,
    postgres_ledger_repo::PostgresLedgerRepo, postgres_venue_repo::PostgresVenueRepo,
    sqlite_ledger_repo::SqliteLedgerRepo, sqlite_venue_repo::SqliteVenueRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let payment_provider = Arc::new(HttpPaymentProvider::new(
        config.payment_service_url.clone(),
        config.payment_service_key.clone(),
    ));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            venue_repo: Arc::new(PostgresVenueRepo::new(pool.clone())),
            ledger: Arc::new(PostgresLedgerRepo::new(pool.clone())),
            payment_provider,
        }
    } else if database_url == "ephemeral" {
        info!("Initializing in-memory state (non-durable, for demos and tests)...");

        AppState {
            config: config.clone(),
            venue_repo: Arc::new(MemoryVenueRepo::new()),
            ledger: Arc::new(MemoryLedger::new()),
            payment_provider,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            venue_repo: Arc::new(SqliteVenueRepo::new(pool.clone())),
            ledger: Arc::new(SqliteLedgerRepo::new(pool.clone())),
            payment_provider,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
