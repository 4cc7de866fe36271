// rest_api/src/gateway.rs
//
// The payment processor is an opaque collaborator behind a trait: given a
// phone number, an amount and our payment id it either returns a gateway
// reference or fails. The HTTP client implementation posts to a Waafi-style
// endpoint; tests use the mock.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Payment processing failed")]
    Declined,
    #[error("Payment gateway unreachable: {0}")]
    Transport(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges the given phone number; returns the gateway's transaction
    /// reference on success.
    async fn charge(&self, phone: &str, amount: f64, payment_id: u64)
        -> Result<String, GatewayError>;
}

pub struct HttpGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpGateway {
    pub fn new(url: String) -> Self {
        HttpGateway {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[derive(Deserialize)]
struct GatewayResponse {
    success: bool,
    #[serde(rename = "referenceId")]
    reference_id: Option<String>,
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn charge(
        &self,
        phone: &str,
        amount: f64,
        payment_id: u64,
    ) -> Result<String, GatewayError> {
        let body = json!({
            "accountNo": phone,
            "amount": amount,
            "invoiceId": payment_id.to_string(),
        });
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let parsed: GatewayResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        match (parsed.success, parsed.reference_id) {
            (true, Some(reference)) => Ok(reference),
            _ => Err(GatewayError::Declined),
        }
    }
}

/// Always-approve gateway for development and tests.
pub struct MockGateway;

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn charge(
        &self,
        _phone: &str,
        _amount: f64,
        payment_id: u64,
    ) -> Result<String, GatewayError> {
        Ok(format!("MOCK-{payment_id}"))
    }
}
