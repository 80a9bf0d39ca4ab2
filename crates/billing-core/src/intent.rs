//! # Payment Intent Types
//!
//! A payment intent tracks the lifecycle of a single checkout attempt at the
//! provider and yields the client secret used to complete payment client-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Currency;

/// Provider-side status of a payment intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    /// Statuses this version doesn't know about yet
    #[serde(other)]
    Unknown,
}

/// A payment intent created at the billing provider.
///
/// Immutable from this system's perspective once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider-assigned id (e.g. pi_...)
    pub id: String,

    /// Secret shared with the caller to complete payment client-side
    pub client_secret: String,

    /// Amount in minor currency units
    pub amount: i64,

    /// Currency of the amount
    pub currency: Currency,

    /// Customer the intent is scoped to
    pub customer_id: String,

    /// Lifecycle status
    pub status: PaymentIntentStatus,

    /// When the provider created the intent
    pub created: DateTime<Utc>,
}

/// Parameters for creating a payment intent at the provider
#[derive(Debug, Clone)]
pub struct IntentRequest {
    /// Amount in minor currency units (already validated positive)
    pub amount: i64,

    /// Currency
    pub currency: Currency,

    /// Customer id the intent is scoped to (non-empty, checked upstream)
    pub customer_id: String,

    /// Ask the provider to select applicable payment methods
    pub automatic_payment_methods: bool,

    /// Idempotency key (prevents duplicate intents on retry)
    pub idempotency_key: Option<String>,
}

impl IntentRequest {
    /// Create with automatic payment methods and a generated idempotency key
    pub fn new(amount: i64, currency: Currency, customer_id: impl Into<String>) -> Self {
        Self {
            amount,
            currency,
            customer_id: customer_id.into(),
            automatic_payment_methods: true,
            idempotency_key: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Builder: set idempotency key
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}
