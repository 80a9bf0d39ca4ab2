//! # Stripe Billing Provider
//!
//! `BillingProvider` implemented against Stripe's REST API.
//! Customers are looked up and created via `/v1/customers`; payment intents
//! via `/v1/payment_intents` with automatic payment-method selection.

use crate::config::StripeConfig;
use async_trait::async_trait;
use billing_core::{
    BillingError, BillingProvider, BillingResult, Customer, IntentRequest, NewCustomer,
    PaymentIntent, PaymentIntentStatus,
};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

/// Stripe-backed billing provider
pub struct StripeBillingProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeBillingProvider {
    /// Create a new Stripe provider
    pub fn new(config: StripeConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> BillingResult<Self> {
        let config = StripeConfig::from_env()?;
        Ok(Self::new(config))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    async fn read_response(
        &self,
        response: reqwest::Response,
    ) -> BillingResult<(StatusCode, String)> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BillingError::Network(e.to_string()))?;
        Ok((status, body))
    }

    fn api_error(&self, status: StatusCode, body: &str) -> BillingError {
        match serde_json::from_str::<StripeErrorResponse>(body) {
            Ok(envelope) => {
                error!(
                    %status,
                    code = ?envelope.error.code,
                    "Stripe API error: {}",
                    envelope.error.message
                );
                BillingError::Provider {
                    provider: "stripe".to_string(),
                    message: envelope.error.message,
                }
            }
            Err(_) => {
                error!(%status, body, "Stripe API error with unparseable body");
                BillingError::Provider {
                    provider: "stripe".to_string(),
                    message: format!("HTTP {}: {}", status, body),
                }
            }
        }
    }

    fn parse<T: serde::de::DeserializeOwned>(&self, body: &str) -> BillingResult<T> {
        serde_json::from_str(body).map_err(|e| {
            BillingError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl BillingProvider for StripeBillingProvider {
    #[instrument(skip(self, email), fields(email = %email, limit))]
    async fn list_customers_by_email(
        &self,
        email: &str,
        limit: u32,
    ) -> BillingResult<Vec<Customer>> {
        let limit = limit.to_string();

        let response = self
            .client
            .get(self.url("/v1/customers"))
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .query(&[("email", email), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| BillingError::Network(e.to_string()))?;

        let (status, body) = self.read_response(response).await?;
        if !status.is_success() {
            return Err(self.api_error(status, &body));
        }

        let list: StripeCustomerList = self.parse(&body)?;
        debug!(count = list.data.len(), "listed customers by email");

        Ok(list
            .data
            .into_iter()
            .map(|c| c.into_customer(email))
            .collect())
    }

    #[instrument(skip(self, new), fields(email = %new.email))]
    async fn create_customer(&self, new: &NewCustomer) -> BillingResult<Customer> {
        let mut form_params: Vec<(&str, String)> = vec![("email", new.email.clone())];
        if let Some(ref name) = new.name {
            form_params.push(("name", name.clone()));
        }
        if let Some(ref description) = new.description {
            form_params.push(("description", description.clone()));
        }

        let mut request = self
            .client
            .post(self.url("/v1/customers"))
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params);

        if let Some(ref key) = new.idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BillingError::Network(e.to_string()))?;

        let (status, body) = self.read_response(response).await?;
        if !status.is_success() {
            return Err(self.api_error(status, &body));
        }

        let created: StripeCustomer = self.parse(&body)?;
        info!(customer_id = %created.id, "created Stripe customer");

        Ok(created.into_customer(&new.email))
    }

    #[instrument(
        skip(self, request),
        fields(customer_id = %request.customer_id, amount = request.amount)
    )]
    async fn create_payment_intent(
        &self,
        request: &IntentRequest,
    ) -> BillingResult<PaymentIntent> {
        let mut form_params: Vec<(&str, String)> = vec![
            ("amount", request.amount.to_string()),
            ("currency", request.currency.as_str().to_string()),
            ("customer", request.customer_id.clone()),
        ];
        if request.automatic_payment_methods {
            form_params.push(("automatic_payment_methods[enabled]", "true".to_string()));
        }

        let mut http_request = self
            .client
            .post(self.url("/v1/payment_intents"))
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params);

        if let Some(ref key) = request.idempotency_key {
            http_request = http_request.header("Idempotency-Key", key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| BillingError::Network(e.to_string()))?;

        let (status, body) = self.read_response(response).await?;
        if !status.is_success() {
            return Err(self.api_error(status, &body));
        }

        let intent: StripePaymentIntent = self.parse(&body)?;
        info!(intent_id = %intent.id, "created Stripe payment intent");

        intent.into_payment_intent(request)
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCustomerList {
    data: Vec<StripeCustomer>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomer {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    created: Option<i64>,
}

impl StripeCustomer {
    fn into_customer(self, fallback_email: &str) -> Customer {
        Customer {
            id: self.id,
            email: self.email.unwrap_or_else(|| fallback_email.to_string()),
            name: self.name,
            created: self.created.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
    amount: i64,
    currency: String,
    #[serde(default)]
    customer: Option<String>,
    status: PaymentIntentStatus,
    created: i64,
}

impl StripePaymentIntent {
    fn into_payment_intent(self, request: &IntentRequest) -> BillingResult<PaymentIntent> {
        let currency = self
            .currency
            .parse()
            .map_err(|_| BillingError::Serialization(format!(
                "Stripe returned unrecognized currency: {}",
                self.currency
            )))?;

        Ok(PaymentIntent {
            id: self.id,
            client_secret: self.client_secret.unwrap_or_default(),
            amount: self.amount,
            currency,
            customer_id: self
                .customer
                .unwrap_or_else(|| request.customer_id.clone()),
            status: self.status,
            created: DateTime::from_timestamp(self.created, 0).unwrap_or_else(Utc::now),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}
