//! Mercado Pago payments API client.
//!
//! Mercado Pago webhooks deliver only a payment id; the full record
//! (status, payer email, payer name) has to be fetched from the payments
//! API. A single attempt per notification - Mercado Pago re-delivers the
//! webhook on a non-2xx response, so retrying here would double up with the
//! provider's own redelivery.

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::PaymentRecord;
use crate::payments::PaymentLookup;

use async_trait::async_trait;

const MP_API_BASE: &str = "https://api.mercadopago.com";

#[derive(Clone)]
pub struct MercadoPagoClient {
    client: Client,
    access_token: String,
}

impl MercadoPagoClient {
    /// The access token is validated for presence at startup by
    /// `Config::from_env`; this constructor assumes a non-empty token.
    pub fn new(access_token: String) -> Self {
        Self {
            client: Client::new(),
            access_token,
        }
    }
}

#[async_trait]
impl PaymentLookup for MercadoPagoClient {
    async fn get_payment(&self, payment_id: &str) -> Result<PaymentRecord> {
        let url = format!("{}/v1/payments/{}", MP_API_BASE, payment_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::PaymentApi(format!("Failed to fetch payment {}: {}", payment_id, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PaymentApi(format!(
                "Failed to fetch payment {}: {} - {}",
                payment_id, status, body
            )));
        }

        response.json().await.map_err(|e| {
            AppError::PaymentApi(format!(
                "Failed to parse payment {} response: {}",
                payment_id, e
            ))
        })
    }
}
