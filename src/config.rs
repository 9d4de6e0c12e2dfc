use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub payment_service_url: String,
    pub payment_service_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            payment_service_url: env::var("PAYMENT_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/charge".to_string()),
            payment_service_key: env::var("PAYMENT_SERVICE_KEY").unwrap_or_else(|_| "test-key-1".to_string()),
        }
    }
}
