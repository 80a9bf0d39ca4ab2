//! # Checkout Orchestration
//!
//! The top-level checkout-initiation flow: validate the request, resolve the
//! customer, open a payment intent. Per request the flow moves
//! validating → resolving-customer → creating-intent → completed, failing out
//! of any phase with a caller-visible error.

use crate::customer::Customer;
use crate::error::{BillingError, BillingResult};
use crate::intent::{IntentRequest, PaymentIntent};
use crate::money::Currency;
use crate::provider::BoxedBillingProvider;
use crate::resolver::CustomerResolver;
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// An incoming checkout-initiation request, already decoded from the wire
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Customer email (required, non-empty after trim)
    pub customer_email: String,

    /// Amount in minor currency units; policy default when absent
    pub amount: Option<i64>,

    /// ISO 4217 currency code; policy default when absent
    pub currency: Option<String>,
}

impl CheckoutRequest {
    pub fn new(customer_email: impl Into<String>) -> Self {
        Self {
            customer_email: customer_email.into(),
            amount: None,
            currency: None,
        }
    }

    /// Builder: set amount in minor units
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Builder: set currency code
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

/// Server-side defaults applied when the request omits amount or currency
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckoutPolicy {
    /// Default charge in minor units
    pub default_amount: i64,

    /// Default currency
    pub default_currency: Currency,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            default_amount: 1000,
            default_currency: Currency::GBP,
        }
    }
}

/// Result of a successful checkout initiation
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    /// Secret the caller uses to complete payment client-side
    pub client_secret: String,

    /// Provider id of the created intent
    pub payment_intent_id: String,
}

/// Opens payment intents for resolved customers.
pub struct IntentInitiator {
    provider: BoxedBillingProvider,
}

impl IntentInitiator {
    pub fn new(provider: BoxedBillingProvider) -> Self {
        Self { provider }
    }

    /// Create a payment intent scoped to `customer`.
    ///
    /// An id-less customer fails fast without touching the provider.
    #[instrument(
        skip(self, customer),
        fields(customer_id = %customer.id, amount, currency = %currency)
    )]
    pub async fn create_intent(
        &self,
        customer: &Customer,
        amount: i64,
        currency: Currency,
    ) -> BillingResult<PaymentIntent> {
        if !customer.has_id() {
            return Err(BillingError::Precondition(
                "cannot create a payment intent for a customer without an id".to_string(),
            ));
        }

        let request = IntentRequest::new(amount, currency, &customer.id);
        let intent = self.provider.create_payment_intent(&request).await?;

        if intent.client_secret.is_empty() {
            return Err(BillingError::Provider {
                provider: self.provider.provider_name().to_string(),
                message: "payment intent response is missing a client secret".to_string(),
            });
        }

        info!(intent_id = %intent.id, "created payment intent");
        Ok(intent)
    }
}

/// Top-level entry point for the checkout-initiation workflow.
pub struct CheckoutOrchestrator {
    resolver: CustomerResolver,
    initiator: IntentInitiator,
    policy: CheckoutPolicy,
}

impl CheckoutOrchestrator {
    pub fn new(provider: BoxedBillingProvider, policy: CheckoutPolicy) -> Self {
        Self {
            resolver: CustomerResolver::new(provider.clone()),
            initiator: IntentInitiator::new(provider),
            policy,
        }
    }

    /// Validate the request, resolve the customer, open the intent.
    ///
    /// Validation failures return before any provider call is made.
    #[instrument(skip(self, request), fields(email = %request.customer_email))]
    pub async fn initiate(&self, request: &CheckoutRequest) -> BillingResult<CheckoutOutcome> {
        let (email, amount, currency) = self.validate(request)?;

        debug!(amount, %currency, "resolving customer");
        let customer = self.resolver.resolve(&email).await?;

        debug!(customer_id = %customer.id, "creating payment intent");
        let intent = self
            .initiator
            .create_intent(&customer, amount, currency)
            .await?;

        info!(
            intent_id = %intent.id,
            customer_id = %customer.id,
            "checkout initiated"
        );
        Ok(CheckoutOutcome {
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
        })
    }

    fn validate(&self, request: &CheckoutRequest) -> BillingResult<(String, i64, Currency)> {
        let email = request.customer_email.trim();
        if email.is_empty() {
            return Err(BillingError::Validation(
                "missing customer email".to_string(),
            ));
        }

        let currency = match &request.currency {
            Some(code) => code.parse::<Currency>()?,
            None => self.policy.default_currency,
        };

        let amount = request.amount.unwrap_or(self.policy.default_amount);
        if amount <= 0 {
            return Err(BillingError::Validation(format!(
                "amount must be a positive number of minor units, got {amount}"
            )));
        }

        let minimum = currency.minimum_charge();
        if amount < minimum {
            return Err(BillingError::AmountBelowMinimum {
                amount,
                minimum,
                currency: currency.to_string(),
            });
        }

        Ok((email.to_string(), amount, currency))
    }
}
