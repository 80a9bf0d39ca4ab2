//! # Request Handlers
//!
//! Axum request handlers for the subscription checkout API.
//! The wire format is camelCase, matching the storefront client.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use billing_core::{BillingError, CheckoutRequest};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Subscription checkout request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    /// Customer email (required)
    #[serde(default)]
    pub customer_email: String,
    /// Amount in minor currency units (optional, server default applies)
    #[serde(default)]
    pub amount: Option<i64>,
    /// ISO 4217 currency code (optional, server default applies)
    #[serde(default)]
    pub currency: Option<String>,
}

/// Subscription checkout response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    /// Secret the client uses to complete payment
    pub client_secret: String,
    /// Provider id of the payment intent
    pub payment_intent_id: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

fn billing_error_to_response(err: BillingError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "subscribe-rs",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Initiate a subscription checkout: resolve the customer, open a payment
/// intent, hand back the client secret.
#[instrument(skip(state, request), fields(email = %request.customer_email))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let checkout = CheckoutRequest {
        customer_email: request.customer_email,
        amount: request.amount,
        currency: request.currency,
    };

    let outcome = state.orchestrator.initiate(&checkout).await.map_err(|e| {
        error!("Checkout initiation failed: {}", e);
        billing_error_to_response(e)
    })?;

    info!(
        intent_id = %outcome.payment_intent_id,
        "subscription checkout initiated"
    );

    Ok(Json(SubscribeResponse {
        client_secret: outcome.client_secret,
        payment_intent_id: outcome.payment_intent_id,
    }))
}
