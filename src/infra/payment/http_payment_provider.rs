use crate::domain::ports::{ChargeOutcome, ChargeRequest, PaymentProvider};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Adapter for the external payment gateway. Any provider speaking this
/// charge contract is substitutable; the core never sees its wire protocol.
pub struct HttpPaymentProvider {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentProvider {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct ChargePayload {
    // The gateway wants minor units (paise).
    amount_minor: i64,
    currency: String,
    reference: String,
}

#[derive(Deserialize)]
struct ChargeResponse {
    status: String,
    transaction_id: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn charge(&self, request: &ChargeRequest) -> Result<ChargeOutcome, AppError> {
        let payload = ChargePayload {
            amount_minor: request.amount * 100,
            currency: "INR".to_string(),
            reference: request.reference.clone(),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let body: ChargeResponse = res.json().await.map_err(|e| {
            AppError::InternalWithMsg(format!("Invalid payment service response: {}", e))
        })?;

        match body.status.as_str() {
            "success" => body
                .transaction_id
                .map(|id| ChargeOutcome::Success { provider_ref: id })
                .ok_or_else(|| {
                    AppError::InternalWithMsg(
                        "Payment service reported success without a transaction id".to_string(),
                    )
                }),
            "cancelled" => Ok(ChargeOutcome::Cancelled),
            _ => Ok(ChargeOutcome::Failure {
                reason: body.error.unwrap_or_else(|| "Payment declined".to_string()),
            }),
        }
    }
}
